#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Rampart combat agent.
//!
//! This crate defines the message surface that connects the host engine, the
//! reference battlefield, and the pure decision systems. The engine delivers a
//! [`TurnSnapshot`] and a feed of [`Event`] values each turn, systems query the
//! battlefield through the [`Battlefield`] trait, and respond exclusively by
//! appending [`Command`] intents to a caller-provided buffer. Intents are best
//! effort: the engine silently drops anything blocked or unaffordable.

mod catalog;
mod doctrine;

pub use catalog::{
    CatalogError, GameConfig, UnitCatalog, UnitInformation, UnitStats, UpgradeInformation,
};
pub use doctrine::{Doctrine, PlanCells, SideDoctrine};

use serde::{Deserialize, Serialize};

/// Location of a single arena cell expressed as column and row coordinates.
///
/// Serialises as a two element `[column, row]` array to match the engine's
/// coordinate convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new arena cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Reports whether `other` lies within `radius` of this cell.
    ///
    /// The comparison is inclusive and performed on squared integer distances
    /// so that radii such as `4.5` behave identically to the engine's range
    /// checks.
    #[must_use]
    pub fn within_range(self, other: CellCoord, radius: f64) -> bool {
        if radius < 0.0 {
            return false;
        }

        let dx = u64::from(self.column().abs_diff(other.column()));
        let dy = u64::from(self.row().abs_diff(other.row()));
        let distance_sq = (dx * dx + dy * dy) as f64;
        distance_sq <= radius * radius
    }
}

impl From<[u32; 2]> for CellCoord {
    fn from([column, row]: [u32; 2]) -> Self {
        Self::new(column, row)
    }
}

impl From<CellCoord> for [u32; 2] {
    fn from(cell: CellCoord) -> Self {
        [cell.column, cell.row]
    }
}

/// Closed set of unit classes resolved from the engine configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitClass {
    /// Cheap stationary blocker.
    Wall,
    /// Stationary unit that shields friendly mobile units.
    Support,
    /// Stationary unit that attacks mobile units in range.
    Turret,
    /// Fast, fragile mobile attacker.
    FastRanged,
    /// Slow mobile attacker that outranges turrets.
    Siege,
    /// Short-range mobile unit that hunts other mobile units.
    DefensiveMobile,
}

impl UnitClass {
    /// Every unit class in the order the engine lists them in its configuration.
    pub const ALL: [UnitClass; 6] = [
        Self::Wall,
        Self::Support,
        Self::Turret,
        Self::FastRanged,
        Self::Siege,
        Self::DefensiveMobile,
    ];

    /// Reports whether units of this class stay fixed once placed.
    #[must_use]
    pub const fn is_stationary(self) -> bool {
        matches!(self, Self::Wall | Self::Support | Self::Turret)
    }
}

/// Player that owns a unit or resource pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Owner {
    /// The side controlled by this agent.
    Defender,
    /// The adversary.
    Opponent,
}

/// Half of the board split along the vertical centre line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Columns `0..columns / 2`.
    Left,
    /// Columns `columns / 2..columns`.
    Right,
}

impl Side {
    /// Both sides in evaluation order.
    pub const ALL: [Side; 2] = [Self::Left, Self::Right];

    /// Classifies a column into its board half.
    #[must_use]
    pub const fn of_column(column: u32, columns: u32) -> Self {
        if column < columns / 2 {
            Self::Left
        } else {
            Self::Right
        }
    }
}

/// Offensive push variants selected by the attack state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    /// Push from adjacent near-edge cells close to the centre.
    Short,
    /// Push from flanking cells further back, routing around a central choke.
    Long,
}

/// Both currencies held by a single player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourcePool {
    structure: f64,
    mobility: f64,
}

impl ResourcePool {
    /// Creates a resource pool from structure and mobility points.
    #[must_use]
    pub const fn new(structure: f64, mobility: f64) -> Self {
        Self {
            structure,
            mobility,
        }
    }

    /// Structure points, spent on stationary units.
    #[must_use]
    pub const fn structure(&self) -> f64 {
        self.structure
    }

    /// Mobility points, spent on mobile units.
    #[must_use]
    pub const fn mobility(&self) -> f64 {
        self.mobility
    }
}

/// Immutable representation of a single placed unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitSnapshot {
    /// Class of the unit.
    pub class: UnitClass,
    /// Player that owns the unit.
    pub owner: Owner,
    /// Cell the unit occupies.
    pub cell: CellCoord,
    /// Remaining health.
    pub health: f64,
    /// Health the unit was created with.
    pub max_health: f64,
    /// Indicates whether the unit has been upgraded.
    pub upgraded: bool,
}

impl UnitSnapshot {
    /// Remaining health as a fraction of maximum health.
    ///
    /// Units with a non-positive maximum report full health.
    #[must_use]
    pub fn health_fraction(&self) -> f64 {
        if self.max_health <= 0.0 {
            return 1.0;
        }
        self.health / self.max_health
    }
}

/// Read-only snapshot of the battlefield delivered at the start of a turn.
#[derive(Clone, Debug, Default)]
pub struct TurnSnapshot {
    turn: u32,
    defender: ResourcePool,
    opponent: ResourcePool,
    units: Vec<UnitSnapshot>,
}

impl TurnSnapshot {
    /// Creates a new snapshot. Units are stored in deterministic cell order.
    #[must_use]
    pub fn new(
        turn: u32,
        defender: ResourcePool,
        opponent: ResourcePool,
        mut units: Vec<UnitSnapshot>,
    ) -> Self {
        units.sort_by_key(|unit| (unit.cell, unit.class, unit.owner));
        Self {
            turn,
            defender,
            opponent,
            units,
        }
    }

    /// Zero-based turn number.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Resource pool held by the provided player.
    #[must_use]
    pub const fn resources(&self, owner: Owner) -> ResourcePool {
        match owner {
            Owner::Defender => self.defender,
            Owner::Opponent => self.opponent,
        }
    }

    /// Iterator over every placed unit in deterministic order.
    pub fn units(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.units.iter()
    }

    /// Iterator over the units occupying `cell`.
    pub fn units_at(&self, cell: CellCoord) -> impl Iterator<Item = &UnitSnapshot> {
        self.units.iter().filter(move |unit| unit.cell == cell)
    }

    /// Reports whether any stationary unit occupies `cell`.
    #[must_use]
    pub fn contains_stationary(&self, cell: CellCoord) -> bool {
        self.units_at(cell).any(|unit| unit.class.is_stationary())
    }

    /// Iterator over the stationary units owned by `owner`.
    pub fn stationary_units(&self, owner: Owner) -> impl Iterator<Item = &UnitSnapshot> {
        self.units
            .iter()
            .filter(move |unit| unit.owner == owner && unit.class.is_stationary())
    }
}

/// Action-frame events reported by the engine while the previous turn played out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    /// A unit was deployed.
    Spawned {
        /// Player that deployed the unit.
        owner: Owner,
        /// Class of the deployed unit.
        class: UnitClass,
        /// Cell the unit was deployed on.
        cell: CellCoord,
    },
    /// A mobile unit reached the edge it was heading for.
    Breached {
        /// Player owning the unit that scored.
        owner: Owner,
        /// Cell the breach happened on.
        cell: CellCoord,
    },
}

/// Best-effort intents emitted by the agent for the engine to execute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Command {
    /// Requests `count` units of `class` at each listed cell.
    Spawn {
        /// Class of unit to deploy.
        class: UnitClass,
        /// Cells to deploy at, attempted in order.
        cells: Vec<CellCoord>,
        /// Number of units requested per cell.
        count: u32,
    },
    /// Requests an upgrade of the friendly structures on the listed cells.
    Upgrade {
        /// Cells holding structures to upgrade.
        cells: Vec<CellCoord>,
    },
    /// Marks the friendly structures on the listed cells for removal.
    Remove {
        /// Cells holding structures to remove.
        cells: Vec<CellCoord>,
    },
}

impl Command {
    /// Convenience constructor for a spawn of a single unit per cell.
    #[must_use]
    pub fn spawn(class: UnitClass, cells: &[CellCoord]) -> Self {
        Self::Spawn {
            class,
            cells: cells.to_vec(),
            count: 1,
        }
    }

    /// Convenience constructor for an upgrade request.
    #[must_use]
    pub fn upgrade(cells: &[CellCoord]) -> Self {
        Self::Upgrade {
            cells: cells.to_vec(),
        }
    }

    /// Convenience constructor for a removal request.
    #[must_use]
    pub fn remove(cells: &[CellCoord]) -> Self {
        Self::Remove {
            cells: cells.to_vec(),
        }
    }
}

/// Pathing and threat queries answered by the host engine.
///
/// The agent never mutates the battlefield through this trait; it only asks
/// how a mobile unit would travel and who could shoot at it.
pub trait Battlefield {
    /// Projected path for a mobile unit spawned at `start`, beginning with
    /// `start` itself, or `None` if the unit could not reach any edge cell.
    fn find_path_to_edge(&self, start: CellCoord) -> Option<Vec<CellCoord>>;

    /// Stationary attackers belonging to `owner` able to hit a mobile unit
    /// standing on `cell`.
    fn attackers_in_range(&self, cell: CellCoord, owner: Owner) -> Vec<UnitSnapshot>;
}
