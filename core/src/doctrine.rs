//! Doctrine: every hand-tuned coordinate and threshold used by the decision systems.

use serde::Deserialize;

use crate::{CellCoord, Plan, Side};

/// Aggregated tuning knobs controlling every adjustable aspect of the agent.
///
/// All fields default to the reference policy, so a configuration file only
/// needs to list the values it overrides.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Doctrine {
    /// Width of the arena; columns below half of it form the left side.
    pub board_columns: u32,
    /// Minimum unexplained mobility drop counted as a spending spike, and the
    /// value returned when no spike has been observed.
    pub spike_floor: f64,
    /// Mobility a player regains between turns without spending.
    pub passive_mobility_income: f64,
    /// Own mobility at which the attack state machine starts preparing a push.
    pub commit_threshold: f64,
    /// Lead time assumed for both sides while no enemy spawns have been seen.
    pub fallback_lead_time: u32,
    /// Radius around the short detonation point inside which an origin needs no pre-positioning.
    pub interaction_radius: f64,
    /// Path steps a mobile unit covers per simulated turn.
    pub step_group: usize,
    /// Minimum lead time of each spawn bucket, from the furthest back to the most forward.
    pub lead_buckets: [u32; 4],
    /// Weight of an opponent turret when scoring a board half.
    pub turret_weight: u32,
    /// Weight of an opponent wall when scoring a board half.
    pub wall_weight: u32,
    /// Weight of an opponent support when scoring a board half.
    pub support_weight: u32,
    /// Side targeted when both halves score equally.
    pub tie_break_side: Side,
    /// Size of the probing first wave of an offensive push.
    pub probe_wave: u32,
    /// Size of the second wave, large enough to drain remaining mobility.
    pub surge_wave: u32,
    /// Health fraction at or below which a corner wall is torn down for rebuilding.
    pub rebuild_health_threshold: f64,
    /// Structure points required before the centre defence is built.
    pub center_gate: f64,
    /// Structure points required before centre helper walls are built.
    pub helper_gate: f64,
    /// Structure points above which reinforcement walls get upgraded.
    pub surplus_gate: f64,
    /// Whether a turret is placed one row above every recorded breach.
    pub reactive_turrets: bool,
    /// Support structures spawned and upgraded every turn.
    pub supports: Vec<CellCoord>,
    /// Cells for the left half of the board.
    pub left: SideDoctrine,
    /// Cells for the right half of the board.
    pub right: SideDoctrine,
}

impl Doctrine {
    /// Per-side tables for `side`.
    #[must_use]
    pub fn side(&self, side: Side) -> &SideDoctrine {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Classifies a column into its board half.
    #[must_use]
    pub fn side_of(&self, cell: CellCoord) -> Side {
        Side::of_column(cell.column(), self.board_columns)
    }
}

impl Default for Doctrine {
    fn default() -> Self {
        Self {
            board_columns: 28,
            spike_floor: 10.0,
            passive_mobility_income: 5.0,
            commit_threshold: 13.0,
            fallback_lead_time: 7,
            interaction_radius: 9.0,
            step_group: 4,
            lead_buckets: [9, 7, 5, 3],
            turret_weight: 12,
            wall_weight: 1,
            support_weight: 1,
            tie_break_side: Side::Left,
            probe_wave: 8,
            surge_wave: 100,
            rebuild_health_threshold: 0.65,
            center_gate: 6.5,
            helper_gate: 3.0,
            surplus_gate: 20.0,
            reactive_turrets: false,
            supports: cells(&[
                [10, 8],
                [11, 8],
                [16, 8],
                [17, 8],
                [24, 10],
                [25, 11],
                [3, 10],
                [2, 11],
            ]),
            left: SideDoctrine::reference_left(),
            right: SideDoctrine::reference_right(),
        }
    }
}

/// Spawn cells used by one offensive plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct PlanCells {
    /// Cell that receives the small probing wave.
    pub probe: CellCoord,
    /// Cell that receives the large follow-up wave.
    pub surge: CellCoord,
}

/// Doctrinal cells for one half of the board.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SideDoctrine {
    /// Choke point for the immediate interception pattern.
    pub short_detonation: CellCoord,
    /// Choke point for the pre-positioned interception pattern.
    pub long_detonation: CellCoord,
    /// Added to the qualifying path step before grouping into turns.
    pub rounding_offset: usize,
    /// Interceptor spawn cell for the immediate pattern.
    pub near_spawn: CellCoord,
    /// One-turn wall pair placed in front of the near spawn.
    pub sacrificial_walls: Vec<CellCoord>,
    /// Walls supporting the pre-positioned pattern.
    pub support_walls: Vec<CellCoord>,
    /// Interceptor spawn cells matching each lead bucket.
    pub bucket_spawns: [CellCoord; 4],
    /// Wall toggled on lead-time parity to shift the interceptor's final step.
    pub auxiliary_wall: CellCoord,
    /// Spawn cells of the short offensive plan against this half. They sit on
    /// the mirrored half of our territory, since units head for the edge
    /// opposite their starting quadrant.
    pub short_plan: PlanCells,
    /// Flanking spawn cells of the long offensive plan against this half.
    pub long_plan: PlanCells,
    /// Corner turret guarding this flank.
    pub corner_turret: CellCoord,
    /// Corner walls, removed to open a lane before a push on this side.
    pub corner_walls: Vec<CellCoord>,
    /// Diagonal reinforcement walls funnelling units toward the detonation points.
    pub reinforcements: Vec<CellCoord>,
    /// Turret anchoring the centre defence on this side.
    pub center_turret: CellCoord,
    /// Wall shielding the centre turret.
    pub center_key_wall: CellCoord,
    /// Walls flanking the centre turret.
    pub center_helpers: Vec<CellCoord>,
}

impl SideDoctrine {
    /// Cells used by `plan`.
    #[must_use]
    pub fn plan(&self, plan: Plan) -> PlanCells {
        match plan {
            Plan::Short => self.short_plan,
            Plan::Long => self.long_plan,
        }
    }

    fn reference_left() -> Self {
        Self {
            short_detonation: CellCoord::new(7, 7),
            long_detonation: CellCoord::new(4, 10),
            rounding_offset: 0,
            near_spawn: CellCoord::new(9, 4),
            sacrificial_walls: cells(&[[8, 5], [9, 5]]),
            support_walls: cells(&[[5, 9], [6, 9]]),
            bucket_spawns: [
                CellCoord::new(13, 0),
                CellCoord::new(11, 2),
                CellCoord::new(9, 4),
                CellCoord::new(7, 6),
            ],
            auxiliary_wall: CellCoord::new(7, 9),
            short_plan: PlanCells {
                probe: CellCoord::new(14, 0),
                surge: CellCoord::new(15, 1),
            },
            long_plan: PlanCells {
                probe: CellCoord::new(22, 8),
                surge: CellCoord::new(23, 9),
            },
            corner_turret: CellCoord::new(3, 12),
            corner_walls: cells(&[[0, 13], [1, 13], [2, 13], [3, 13], [4, 12]]),
            reinforcements: cells(&[[6, 8], [7, 8], [8, 7], [9, 6], [10, 5], [10, 4]]),
            center_turret: CellCoord::new(11, 9),
            center_key_wall: CellCoord::new(11, 10),
            center_helpers: cells(&[[10, 9], [12, 9]]),
        }
    }

    fn reference_right() -> Self {
        Self {
            short_detonation: CellCoord::new(20, 7),
            long_detonation: CellCoord::new(23, 10),
            rounding_offset: 1,
            near_spawn: CellCoord::new(18, 4),
            sacrificial_walls: cells(&[[19, 5], [18, 5]]),
            support_walls: cells(&[[22, 9], [21, 9]]),
            bucket_spawns: [
                CellCoord::new(14, 0),
                CellCoord::new(16, 2),
                CellCoord::new(18, 4),
                CellCoord::new(20, 6),
            ],
            auxiliary_wall: CellCoord::new(20, 9),
            short_plan: PlanCells {
                probe: CellCoord::new(13, 0),
                surge: CellCoord::new(12, 1),
            },
            long_plan: PlanCells {
                probe: CellCoord::new(5, 8),
                surge: CellCoord::new(4, 9),
            },
            corner_turret: CellCoord::new(24, 12),
            corner_walls: cells(&[[27, 13], [26, 13], [25, 13], [24, 13], [23, 12]]),
            reinforcements: cells(&[[21, 8], [20, 8], [19, 7], [18, 6], [17, 5], [17, 4]]),
            center_turret: CellCoord::new(16, 9),
            center_key_wall: CellCoord::new(16, 10),
            center_helpers: cells(&[[15, 9], [17, 9]]),
        }
    }
}

fn cells(pairs: &[[u32; 2]]) -> Vec<CellCoord> {
    pairs.iter().copied().map(CellCoord::from).collect()
}
