#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Static defensive layouts rebuilt and upgraded every turn.
//!
//! Every request is idempotent: the engine ignores spawns on occupied cells
//! and anything we cannot afford, so the full layout is requested each turn
//! and whatever was destroyed gets rebuilt as structure points allow.

use rampart_core::{CellCoord, Command, Doctrine, Owner, Side, TurnSnapshot, UnitClass};
use tracing::debug;

/// Emits the fixed layout requests described by the doctrine.
#[derive(Clone, Debug)]
pub struct Fortification {
    doctrine: Doctrine,
}

impl Fortification {
    /// Creates the system for the provided doctrine.
    #[must_use]
    pub fn new(doctrine: Doctrine) -> Self {
        Self { doctrine }
    }

    /// Requests the turn-start defences.
    ///
    /// Corner walls listed in `open_lane` are neither rebuilt nor upgraded so
    /// a pending push can pass. When reactive turrets are enabled a turret is
    /// requested one row above every cell in `breaches`.
    pub fn rebuild(
        &self,
        snapshot: &TurnSnapshot,
        breaches: &[CellCoord],
        open_lane: &[CellCoord],
        out: &mut Vec<Command>,
    ) {
        push_nonempty(out, Command::spawn(UnitClass::Wall, &self.reinforcements()));

        self.corner_defence(snapshot, open_lane, out);

        let structure = snapshot.resources(Owner::Defender).structure();
        if structure >= self.doctrine.center_gate {
            self.center_defence(structure, out);
        }

        if self.doctrine.reactive_turrets {
            self.reactive_turrets(breaches, out);
        }
    }

    /// Requests the end-of-turn support units and, when structure points are
    /// plentiful, reinforcement upgrades.
    pub fn reinforce(&self, snapshot: &TurnSnapshot, out: &mut Vec<Command>) {
        let supports = &self.doctrine.supports;
        push_nonempty(out, Command::spawn(UnitClass::Support, supports));
        push_nonempty(out, Command::upgrade(supports));

        if snapshot.resources(Owner::Defender).structure() > self.doctrine.surplus_gate {
            push_nonempty(out, Command::upgrade(&self.reinforcements()));
        }
    }

    fn reinforcements(&self) -> Vec<CellCoord> {
        Side::ALL
            .iter()
            .flat_map(|&side| self.doctrine.side(side).reinforcements.iter().copied())
            .collect()
    }

    fn corner_defence(
        &self,
        snapshot: &TurnSnapshot,
        open_lane: &[CellCoord],
        out: &mut Vec<Command>,
    ) {
        let turrets: Vec<CellCoord> = Side::ALL
            .iter()
            .map(|&side| self.doctrine.side(side).corner_turret)
            .collect();
        push_nonempty(out, Command::spawn(UnitClass::Turret, &turrets));

        let walls: Vec<CellCoord> = Side::ALL
            .iter()
            .flat_map(|&side| self.doctrine.side(side).corner_walls.iter().copied())
            .filter(|cell| !open_lane.contains(cell))
            .collect();

        let mut degraded = Vec::new();
        let mut missing = Vec::new();
        for &cell in &walls {
            if snapshot.contains_stationary(cell) {
                if snapshot.units_at(cell).any(|unit| {
                    unit.owner == Owner::Defender
                        && unit.class == UnitClass::Wall
                        && unit.health_fraction() <= self.doctrine.rebuild_health_threshold
                }) {
                    degraded.push(cell);
                }
            } else {
                missing.push(cell);
            }
        }

        if !degraded.is_empty() {
            debug!(count = degraded.len(), "corner walls marked for rebuild");
        }
        push_nonempty(out, Command::remove(&degraded));
        push_nonempty(out, Command::spawn(UnitClass::Wall, &missing));
        push_nonempty(out, Command::upgrade(&walls));
    }

    fn center_defence(&self, structure: f64, out: &mut Vec<Command>) {
        for side in Side::ALL {
            let cells = self.doctrine.side(side);
            out.push(Command::spawn(UnitClass::Turret, &[cells.center_turret]));
            out.push(Command::spawn(UnitClass::Wall, &[cells.center_key_wall]));
            out.push(Command::upgrade(&[cells.center_key_wall]));
        }

        if structure >= self.doctrine.helper_gate {
            for side in Side::ALL {
                let helpers = &self.doctrine.side(side).center_helpers;
                push_nonempty(out, Command::spawn(UnitClass::Wall, helpers));
                push_nonempty(out, Command::upgrade(helpers));
            }
        }
    }

    fn reactive_turrets(&self, breaches: &[CellCoord], out: &mut Vec<Command>) {
        let mut cells: Vec<CellCoord> = Vec::new();
        for breach in breaches {
            let above = CellCoord::new(breach.column(), breach.row() + 1);
            if !cells.contains(&above) {
                cells.push(above);
            }
        }
        if !cells.is_empty() {
            debug!(count = cells.len(), "reactive turrets requested");
        }
        push_nonempty(out, Command::spawn(UnitClass::Turret, &cells));
    }
}

/// Appends `command` unless it targets no cells.
fn push_nonempty(out: &mut Vec<Command>, command: Command) {
    let empty = match &command {
        Command::Spawn { cells, .. } | Command::Upgrade { cells } | Command::Remove { cells } => {
            cells.is_empty()
        }
    };
    if !empty {
        out.push(command);
    }
}
