#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Reference battlefield answering pathing and threat queries for Rampart.
//!
//! The live engine owns the authoritative pathfinder. This crate reproduces
//! its contract on the standard diamond arena so the decision systems can be
//! exercised end to end from recorded snapshots.

mod navigation;

use rampart_core::{
    Battlefield, CellCoord, Owner, TurnSnapshot, UnitCatalog, UnitClass, UnitSnapshot,
};

use crate::navigation::DistanceField;

/// Width and height of the standard arena.
pub const ARENA_SIZE: u32 = 28;

/// Row index of the first cell row owned by the opponent.
const HALF: u32 = ARENA_SIZE / 2;

/// One of the four diagonal edges bounding the diamond arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Opponent edge on the right half.
    TopRight,
    /// Opponent edge on the left half.
    TopLeft,
    /// Defender edge on the left half.
    BottomLeft,
    /// Defender edge on the right half.
    BottomRight,
}

impl Edge {
    /// All edges in field storage order.
    pub const ALL: [Edge; 4] = [
        Self::TopRight,
        Self::TopLeft,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    /// Cells composing the edge, ordered from the board centre outward.
    #[must_use]
    pub fn cells(self) -> Vec<CellCoord> {
        (0..HALF)
            .map(|offset| match self {
                Self::TopRight => CellCoord::new(HALF + offset, ARENA_SIZE - 1 - offset),
                Self::TopLeft => CellCoord::new(HALF - 1 - offset, ARENA_SIZE - 1 - offset),
                Self::BottomLeft => CellCoord::new(HALF - 1 - offset, offset),
                Self::BottomRight => CellCoord::new(HALF + offset, offset),
            })
            .collect()
    }

    /// Edge a mobile unit starting on `cell` heads for: the one opposite its quadrant.
    #[must_use]
    pub const fn target_for(cell: CellCoord) -> Self {
        match (cell.column() < HALF, cell.row() < HALF) {
            (true, true) => Self::TopRight,
            (false, true) => Self::TopLeft,
            (true, false) => Self::BottomRight,
            (false, false) => Self::BottomLeft,
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::TopRight => 0,
            Self::TopLeft => 1,
            Self::BottomLeft => 2,
            Self::BottomRight => 3,
        }
    }
}

/// Reports whether `cell` lies inside the diamond arena.
#[must_use]
pub const fn in_arena(cell: CellCoord) -> bool {
    let column = cell.column();
    let row = cell.row();
    if row >= ARENA_SIZE || column >= ARENA_SIZE {
        return false;
    }

    if row < HALF {
        column + row + 1 >= HALF && column <= HALF + row
    } else {
        column + HALF >= row && column + row <= ARENA_SIZE + HALF - 1
    }
}

/// Arena built from a turn snapshot, with one distance field per target edge.
#[derive(Debug)]
pub struct Arena {
    stationary: Vec<UnitSnapshot>,
    catalog: UnitCatalog,
    fields: [DistanceField; 4],
}

impl Arena {
    /// Builds an arena from the stationary units captured in `snapshot`.
    #[must_use]
    pub fn from_snapshot(snapshot: &TurnSnapshot, catalog: &UnitCatalog) -> Self {
        let stationary = snapshot
            .units()
            .filter(|unit| unit.class.is_stationary())
            .copied()
            .collect();
        Self::new(stationary, catalog.clone())
    }

    /// Builds an arena from an explicit list of stationary units.
    #[must_use]
    pub fn new(mut stationary: Vec<UnitSnapshot>, catalog: UnitCatalog) -> Self {
        stationary.retain(|unit| unit.class.is_stationary() && in_arena(unit.cell));
        stationary.sort_by_key(|unit| (unit.cell, unit.class, unit.owner));

        let fields = Edge::ALL.map(|edge| {
            DistanceField::flood(ARENA_SIZE, ARENA_SIZE, &edge.cells(), |cell| {
                !in_arena(cell) || stationary.iter().any(|unit| unit.cell == cell)
            })
        });

        Self {
            stationary,
            catalog,
            fields,
        }
    }

    /// Reports whether a stationary unit occupies `cell`.
    #[must_use]
    pub fn is_blocked(&self, cell: CellCoord) -> bool {
        self.stationary.iter().any(|unit| unit.cell == cell)
    }

    fn attack_range(&self, unit: &UnitSnapshot) -> f64 {
        let stats = self.catalog.stats(unit.class);
        if unit.upgraded {
            stats.upgraded_attack_range
        } else {
            stats.attack_range
        }
    }
}

impl Battlefield for Arena {
    fn find_path_to_edge(&self, start: CellCoord) -> Option<Vec<CellCoord>> {
        if !in_arena(start) || self.is_blocked(start) {
            return None;
        }

        self.fields[Edge::target_for(start).slot()].trace_from(start)
    }

    fn attackers_in_range(&self, cell: CellCoord, owner: Owner) -> Vec<UnitSnapshot> {
        self.stationary
            .iter()
            .filter(|unit| unit.owner == owner && unit.class == UnitClass::Turret)
            .filter(|unit| unit.cell.within_range(cell, self.attack_range(unit)))
            .copied()
            .collect()
    }
}
