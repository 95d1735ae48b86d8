#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Scores deployment cells by the fire a mobile unit would walk through.

use rampart_core::{Battlefield, CellCoord, Owner, UnitCatalog, UnitClass};
use tracing::trace;

/// Exposure of a projected path.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ThreatScore {
    /// Expected damage accumulated along the path.
    pub damage: f64,
    /// Attacker sightings summed over every path step.
    pub threats: u32,
}

/// Wraps the engine's path and attacker queries into a single risk score.
#[derive(Clone, Copy, Debug)]
pub struct PathRisk {
    hostile: Owner,
    damage_per_attacker: f64,
}

impl PathRisk {
    /// Creates an assessor scoring paths against `hostile` turrets.
    #[must_use]
    pub const fn new(hostile: Owner, damage_per_attacker: f64) -> Self {
        Self {
            hostile,
            damage_per_attacker,
        }
    }

    /// Assessor for our own units walking into opponent turrets.
    #[must_use]
    pub fn against_opponent(catalog: &UnitCatalog) -> Self {
        Self::new(
            Owner::Opponent,
            catalog.stats(UnitClass::Turret).damage_to_mobile,
        )
    }

    /// Projected path from `cell`, or `None` when the cell cannot reach an edge.
    pub fn projected_path<B>(&self, battlefield: &B, cell: CellCoord) -> Option<Vec<CellCoord>>
    where
        B: Battlefield + ?Sized,
    {
        battlefield.find_path_to_edge(cell)
    }

    /// Scores `cell`, returning `None` when no path leaves it.
    pub fn assess<B>(&self, battlefield: &B, cell: CellCoord) -> Option<ThreatScore>
    where
        B: Battlefield + ?Sized,
    {
        let path = self.projected_path(battlefield, cell)?;
        let mut score = ThreatScore::default();
        for step in path {
            let attackers = battlefield.attackers_in_range(step, self.hostile).len();
            let attackers = u32::try_from(attackers).unwrap_or(u32::MAX);
            score.damage += f64::from(attackers) * self.damage_per_attacker;
            score.threats = score.threats.saturating_add(attackers);
        }
        Some(score)
    }

    /// Scores `cell`; a blocked cell scores zero on both counts.
    ///
    /// Zero is ambiguous with a genuinely safe path, so comparisons between
    /// candidates should go through [`PathRisk::safest_of`] instead.
    pub fn risk<B>(&self, battlefield: &B, cell: CellCoord) -> ThreatScore
    where
        B: Battlefield + ?Sized,
    {
        self.assess(battlefield, cell).unwrap_or_default()
    }

    /// Candidate with the least expected damage, ignoring blocked cells.
    ///
    /// Ties go to the earliest candidate. Returns `None` when no candidate
    /// has a path.
    pub fn safest_of<B>(&self, battlefield: &B, candidates: &[CellCoord]) -> Option<CellCoord>
    where
        B: Battlefield + ?Sized,
    {
        let mut best: Option<(CellCoord, f64)> = None;
        for &cell in candidates {
            let Some(score) = self.assess(battlefield, cell) else {
                trace!(column = cell.column(), row = cell.row(), "candidate has no path");
                continue;
            };
            match best {
                Some((_, damage)) if score.damage >= damage => {}
                _ => best = Some((cell, score.damage)),
            }
        }
        best.map(|(cell, _)| cell)
    }
}
