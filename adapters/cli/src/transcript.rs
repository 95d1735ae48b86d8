//! Recorded match transcripts replayed through the agent.
//!
//! A transcript stores every turn the engine delivered: both resource pools,
//! the placed units and the action-frame events of the preceding turn. Units
//! are named by their engine shorthand and resolved through the catalog.

use rampart_core::{
    CatalogError, CellCoord, Event, Owner, ResourcePool, TurnSnapshot, UnitCatalog, UnitSnapshot,
};
use serde::Deserialize;
use thiserror::Error;

/// Every turn of a recorded match, in play order.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct Transcript {
    pub(crate) turns: Vec<RecordedTurn>,
}

impl Transcript {
    /// Parses a transcript from its JSON text.
    pub(crate) fn from_json(text: &str) -> Result<Self, TranscriptError> {
        serde_json::from_str(text).map_err(TranscriptError::InvalidJson)
    }
}

/// One turn as delivered by the engine.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct RecordedTurn {
    pub(crate) turn: u32,
    pub(crate) defender: RecordedPool,
    pub(crate) opponent: RecordedPool,
    #[serde(default)]
    pub(crate) units: Vec<RecordedUnit>,
    #[serde(default)]
    pub(crate) frames: Vec<RecordedEvent>,
}

/// Resource pool using the engine's field names.
#[derive(Clone, Copy, Debug, Deserialize)]
pub(crate) struct RecordedPool {
    pub(crate) sp: f64,
    pub(crate) mp: f64,
}

/// Placed unit using the engine's shorthand.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct RecordedUnit {
    pub(crate) unit: String,
    pub(crate) owner: Owner,
    pub(crate) x: u32,
    pub(crate) y: u32,
    pub(crate) health: f64,
    pub(crate) max_health: f64,
    #[serde(default)]
    pub(crate) upgraded: bool,
}

/// Action-frame event using the engine's shorthand.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum RecordedEvent {
    Spawn {
        unit: String,
        owner: Owner,
        x: u32,
        y: u32,
    },
    Breach {
        owner: Owner,
        x: u32,
        y: u32,
    },
}

/// Errors raised while loading a transcript.
#[derive(Debug, Error)]
pub(crate) enum TranscriptError {
    /// The transcript was not valid JSON of the expected shape.
    #[error("could not parse transcript: {0}")]
    InvalidJson(#[source] serde_json::Error),
    /// A unit shorthand did not resolve against the catalog.
    #[error("turn {turn}: {source}")]
    UnknownUnit {
        /// Turn that referenced the unit.
        turn: u32,
        /// Resolution failure.
        #[source]
        source: CatalogError,
    },
}

impl RecordedTurn {
    /// Converts the recorded turn into a snapshot and its event feed.
    pub(crate) fn resolve(
        &self,
        catalog: &UnitCatalog,
    ) -> Result<(TurnSnapshot, Vec<Event>), TranscriptError> {
        let resolve = |shorthand: &str| {
            catalog
                .resolve(shorthand)
                .map_err(|source| TranscriptError::UnknownUnit {
                    turn: self.turn,
                    source,
                })
        };

        let units = self
            .units
            .iter()
            .map(|unit| {
                Ok(UnitSnapshot {
                    class: resolve(&unit.unit)?,
                    owner: unit.owner,
                    cell: CellCoord::new(unit.x, unit.y),
                    health: unit.health,
                    max_health: unit.max_health,
                    upgraded: unit.upgraded,
                })
            })
            .collect::<Result<Vec<_>, TranscriptError>>()?;

        let events = self
            .frames
            .iter()
            .map(|event| match event {
                RecordedEvent::Spawn { unit, owner, x, y } => Ok(Event::Spawned {
                    owner: *owner,
                    class: resolve(unit)?,
                    cell: CellCoord::new(*x, *y),
                }),
                RecordedEvent::Breach { owner, x, y } => Ok(Event::Breached {
                    owner: *owner,
                    cell: CellCoord::new(*x, *y),
                }),
            })
            .collect::<Result<Vec<_>, TranscriptError>>()?;

        let snapshot = TurnSnapshot::new(
            self.turn,
            ResourcePool::new(self.defender.sp, self.defender.mp),
            ResourcePool::new(self.opponent.sp, self.opponent.mp),
            units,
        );
        Ok((snapshot, events))
    }
}
