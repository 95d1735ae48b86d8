#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-match agent state and the turn orchestration that drives the systems.
//!
//! One [`Agent`] lives for exactly one match. It owns the observation log,
//! the attack state machine and its generator, and threads them through the
//! systems in a fixed order every turn:
//!
//! 1. rebuild the static defences,
//! 2. fold the action-frame events into the observation log,
//! 3. estimate the opponent's surge capacity,
//! 4. execute an armed push, or otherwise advance the attack state machine,
//! 5. plan interceptors when mobility allows,
//! 6. spend surplus structure points on supports and upgrades.

use rampart_core::{Battlefield, Command, Doctrine, Event, Owner, TurnSnapshot, UnitCatalog};
use rampart_system_fortification::Fortification;
use rampart_system_interception::{InterceptPlanner, LeadTimes, Readiness};
use rampart_system_observation::{Config as ObservationConfig, ObservationLog};
use rampart_system_offense::{AttackState, Offense};
use rampart_system_path_risk::PathRisk;
use tracing::{debug, info};

/// Summary of the decisions taken during the most recent turn.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TurnReport {
    /// Turn number the report belongs to.
    pub turn: u32,
    /// Opponent surge estimate computed this turn.
    pub surge_threshold: f64,
    /// Attack state after the turn.
    pub attack_state: AttackState,
    /// Interceptor lead times, when the planner ran.
    pub lead_times: Option<LeadTimes>,
}

/// Decision engine for one match.
#[derive(Debug)]
pub struct Agent {
    seed: u64,
    log: ObservationLog,
    assessor: PathRisk,
    interception: InterceptPlanner,
    offense: Offense,
    fortification: Fortification,
    last_report: TurnReport,
}

impl Agent {
    /// Creates the agent for a new match.
    ///
    /// `seed` initialises the plan-selection generator once; it is logged so
    /// a match can be replayed.
    #[must_use]
    pub fn new(doctrine: Doctrine, catalog: &UnitCatalog, seed: u64) -> Self {
        info!(seed, "agent seeded");
        let assessor = PathRisk::against_opponent(catalog);
        Self {
            seed,
            log: ObservationLog::new(ObservationConfig::from_doctrine(&doctrine)),
            assessor,
            interception: InterceptPlanner::from_catalog(doctrine.clone(), catalog),
            offense: Offense::new(doctrine.clone(), seed),
            fortification: Fortification::new(doctrine),
            last_report: TurnReport::default(),
        }
    }

    /// Seed the generator was initialised with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Current attack phase.
    #[must_use]
    pub const fn attack_state(&self) -> AttackState {
        self.offense.state()
    }

    /// Everything observed about the opponent so far.
    #[must_use]
    pub const fn observations(&self) -> &ObservationLog {
        &self.log
    }

    /// Decisions taken during the most recent turn.
    #[must_use]
    pub const fn last_report(&self) -> TurnReport {
        self.last_report
    }

    /// Decides this turn's intents.
    ///
    /// `events` holds the action-frame events reported since the previous
    /// turn. Commands are best effort and returned in execution order.
    pub fn on_turn<B>(
        &mut self,
        snapshot: &TurnSnapshot,
        events: &[Event],
        battlefield: &B,
    ) -> Vec<Command>
    where
        B: Battlefield + ?Sized,
    {
        let mut out = Vec::new();

        self.fortification.rebuild(
            snapshot,
            self.log.breaches(),
            self.offense.lane(snapshot),
            &mut out,
        );

        self.log.ingest(events);
        let surge_threshold = self
            .log
            .mobility_spend_threshold(snapshot.resources(Owner::Opponent).mobility());

        let executing = self.offense.state().is_armed();
        self.offense
            .handle(snapshot, &self.assessor, battlefield, &mut out);
        let attack_state = self.offense.state();

        let readiness = Readiness {
            turn: snapshot.turn(),
            own_mobility: snapshot.resources(Owner::Defender).mobility(),
            surge_threshold,
            armed: executing || attack_state.is_armed(),
        };
        let lead_times = self
            .interception
            .handle(readiness, &self.log, battlefield, &mut out);

        self.fortification.reinforce(snapshot, &mut out);

        self.last_report = TurnReport {
            turn: snapshot.turn(),
            surge_threshold,
            attack_state,
            lead_times,
        };
        debug!(
            turn = snapshot.turn(),
            surge_threshold,
            ?attack_state,
            commands = out.len(),
            "turn decided"
        );
        out
    }
}
