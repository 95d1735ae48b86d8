#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Resource-gated attack state machine.
//!
//! A push takes three turns. The machine starts preparing once our mobility
//! reaches the commitment threshold, arms on the following turn by choosing a
//! plan at random and targeting the opponent's weaker half, and executes on
//! the turn after that before returning to idle. Only the cycle
//! `Idle → Preparing → Armed → Idle` is possible, one step per turn.

use rampart_core::{
    Battlefield, CellCoord, Command, Doctrine, Owner, Plan, PlanCells, Side, TurnSnapshot,
    UnitClass,
};
use rampart_system_path_risk::PathRisk;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

/// Phase of the offensive cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AttackState {
    /// Saving mobility, no push planned.
    #[default]
    Idle,
    /// Enough mobility banked; the push is chosen next turn.
    Preparing,
    /// Push chosen and executed next turn.
    Armed {
        /// Board half under attack.
        side: Side,
        /// Spawn cells used for the push.
        plan: Plan,
    },
}

impl AttackState {
    /// Reports whether a push executes this turn.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        matches!(self, Self::Armed { .. })
    }

    /// Half targeted by the armed push, if any.
    #[must_use]
    pub const fn side(&self) -> Option<Side> {
        match self {
            Self::Armed { side, .. } => Some(*side),
            Self::Idle | Self::Preparing => None,
        }
    }

    /// Plan of the armed push, if any.
    #[must_use]
    pub const fn plan(&self) -> Option<Plan> {
        match self {
            Self::Armed { plan, .. } => Some(*plan),
            Self::Idle | Self::Preparing => None,
        }
    }
}

/// Weighted structural investment of the opponent on each board half.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SideScores {
    /// Score of the left half.
    pub left: u32,
    /// Score of the right half.
    pub right: u32,
}

impl SideScores {
    /// Tallies opponent structures in `snapshot` using the doctrine weights.
    #[must_use]
    pub fn tally(snapshot: &TurnSnapshot, doctrine: &Doctrine) -> Self {
        let mut scores = Self::default();
        for unit in snapshot.stationary_units(Owner::Opponent) {
            let weight = match unit.class {
                UnitClass::Turret => doctrine.turret_weight,
                UnitClass::Wall => doctrine.wall_weight,
                UnitClass::Support => doctrine.support_weight,
                UnitClass::FastRanged | UnitClass::Siege | UnitClass::DefensiveMobile => 0,
            };
            let total = match doctrine.side_of(unit.cell) {
                Side::Left => &mut scores.left,
                Side::Right => &mut scores.right,
            };
            *total = total.saturating_add(weight);
        }
        scores
    }

    /// Half with the lower score, or `tie_break` when both are equal.
    #[must_use]
    pub const fn weaker(&self, tie_break: Side) -> Side {
        if self.left < self.right {
            Side::Left
        } else if self.right < self.left {
            Side::Right
        } else {
            tie_break
        }
    }
}

/// Picks the opponent's less fortified half.
#[must_use]
pub fn weaker_side(snapshot: &TurnSnapshot, doctrine: &Doctrine) -> Side {
    SideScores::tally(snapshot, doctrine).weaker(doctrine.tie_break_side)
}

/// Owns the attack state and the generator used for plan selection.
#[derive(Clone, Debug)]
pub struct Offense {
    doctrine: Doctrine,
    state: AttackState,
    rng: ChaCha8Rng,
}

impl Offense {
    /// Creates an idle machine whose generator is seeded once with `seed`.
    #[must_use]
    pub fn new(doctrine: Doctrine, seed: u64) -> Self {
        Self {
            doctrine,
            state: AttackState::Idle,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn state(&self) -> AttackState {
        self.state
    }

    /// Corner walls that must stay down this turn.
    ///
    /// While armed this is the lane of the queued push. While preparing it is
    /// the lane of the weaker side in `snapshot`, which the push opens when it
    /// arms later this turn.
    #[must_use]
    pub fn lane(&self, snapshot: &TurnSnapshot) -> &[CellCoord] {
        let side = match self.state {
            AttackState::Armed { side, .. } => side,
            AttackState::Preparing => weaker_side(snapshot, &self.doctrine),
            AttackState::Idle => return &[],
        };
        &self.doctrine.side(side).corner_walls
    }

    /// Advances the machine by exactly one step and emits its commands.
    pub fn handle<B>(
        &mut self,
        snapshot: &TurnSnapshot,
        assessor: &PathRisk,
        battlefield: &B,
        out: &mut Vec<Command>,
    ) where
        B: Battlefield + ?Sized,
    {
        let next = match self.state {
            AttackState::Armed { side, plan } => {
                self.execute(side, plan, assessor, battlefield, out);
                AttackState::Idle
            }
            AttackState::Preparing => self.arm(snapshot, out),
            AttackState::Idle => {
                let mobility = snapshot.resources(Owner::Defender).mobility();
                if mobility >= self.doctrine.commit_threshold {
                    info!(turn = snapshot.turn(), mobility, "preparing offensive push");
                    AttackState::Preparing
                } else {
                    AttackState::Idle
                }
            }
        };
        debug!(from = ?self.state, to = ?next, "attack state step");
        self.state = next;
    }

    fn arm(&mut self, snapshot: &TurnSnapshot, out: &mut Vec<Command>) -> AttackState {
        let plan = if self.rng.gen_bool(0.5) {
            Plan::Short
        } else {
            Plan::Long
        };
        let scores = SideScores::tally(snapshot, &self.doctrine);
        let side = scores.weaker(self.doctrine.tie_break_side);
        info!(
            turn = snapshot.turn(),
            ?side,
            ?plan,
            left_score = scores.left,
            right_score = scores.right,
            "offensive push armed"
        );

        out.push(Command::remove(&self.doctrine.side(side).corner_walls));
        AttackState::Armed { side, plan }
    }

    fn execute<B>(
        &self,
        side: Side,
        plan: Plan,
        assessor: &PathRisk,
        battlefield: &B,
        out: &mut Vec<Command>,
    ) where
        B: Battlefield + ?Sized,
    {
        let cells = self.waves(self.doctrine.side(side).plan(plan), assessor, battlefield);
        info!(?side, ?plan, probe = ?cells.probe, surge = ?cells.surge, "executing push");

        out.push(Command::Spawn {
            class: UnitClass::FastRanged,
            cells: vec![cells.probe],
            count: self.doctrine.probe_wave,
        });
        out.push(Command::Spawn {
            class: UnitClass::FastRanged,
            cells: vec![cells.surge],
            count: self.doctrine.surge_wave,
        });
    }

    /// Sends the large wave down the safer of the two plan cells.
    fn waves<B>(&self, cells: PlanCells, assessor: &PathRisk, battlefield: &B) -> PlanCells
    where
        B: Battlefield + ?Sized,
    {
        match assessor.safest_of(battlefield, &[cells.surge, cells.probe]) {
            Some(safest) if safest == cells.probe => PlanCells {
                probe: cells.surge,
                surge: cells.probe,
            },
            Some(_) => cells,
            None => {
                debug!("both plan cells blocked, keeping doctrine order");
                cells
            }
        }
    }
}
