#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Interceptor timing: how early a defensive unit must leave so that it meets
//! the opponent's favourite rush at a detonation point.
//!
//! Each board half is planned independently. A lead time of one turn means the
//! predicted origin is already close to the short detonation point and the
//! interceptor leaves immediately behind a one-turn wall pair. Longer lead
//! times pre-position the interceptor from a spawn cell picked by bucket, and
//! zero means no credible threat was projected on that half.

use rampart_core::{
    Battlefield, CellCoord, Command, Doctrine, Side, SideDoctrine, UnitCatalog, UnitClass,
};
use rampart_system_observation::ObservationLog;
use rampart_system_path_risk::PathRisk;
use tracing::debug;

/// Mobile classes whose rushes the interceptors are timed against.
const DANGEROUS: [UnitClass; 2] = [UnitClass::FastRanged, UnitClass::Siege];

/// Shortest lead time produced by walking a projected path. One turn is
/// reserved for origins inside the interaction radius.
const MIN_PATH_LEAD: u32 = 2;

/// Lead time in turns for each board half.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LeadTimes {
    left: u32,
    right: u32,
}

impl LeadTimes {
    /// Creates lead times from per-side values.
    #[must_use]
    pub const fn new(left: u32, right: u32) -> Self {
        Self { left, right }
    }

    /// Same lead time on both halves.
    #[must_use]
    pub const fn uniform(turns: u32) -> Self {
        Self::new(turns, turns)
    }

    /// Lead time for the left half.
    #[must_use]
    pub const fn left(&self) -> u32 {
        self.left
    }

    /// Lead time for the right half.
    #[must_use]
    pub const fn right(&self) -> u32 {
        self.right
    }

    /// Lead time for `side`.
    #[must_use]
    pub const fn get(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn set(&mut self, side: Side, turns: u32) {
        match side {
            Side::Left => self.left = turns,
            Side::Right => self.right = turns,
        }
    }
}

/// Conditions under which interception may spend mobility this turn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Readiness {
    /// Current turn number.
    pub turn: u32,
    /// Mobility held by the defender.
    pub own_mobility: f64,
    /// Estimated mobility the opponent can surge with.
    pub surge_threshold: f64,
    /// Whether an offensive push is queued for this turn.
    pub armed: bool,
}

impl Readiness {
    /// Reports whether the planner may run.
    #[must_use]
    pub fn permits(&self) -> bool {
        self.turn != 0 && !self.armed && self.own_mobility >= self.surge_threshold
    }
}

/// Plans interceptor lead times and the matching defensive placements.
#[derive(Clone, Debug)]
pub struct InterceptPlanner {
    doctrine: Doctrine,
    paths: PathRisk,
    interceptor_range: f64,
}

impl InterceptPlanner {
    /// Creates a planner for the provided doctrine, projecting enemy paths
    /// through `paths`. `interceptor_range` is the attack radius of the
    /// defensive mobile unit sent to each detonation point.
    #[must_use]
    pub fn new(doctrine: Doctrine, paths: PathRisk, interceptor_range: f64) -> Self {
        Self {
            doctrine,
            paths,
            interceptor_range,
        }
    }

    /// Planner whose interceptor range comes from the engine catalog.
    #[must_use]
    pub fn from_catalog(doctrine: Doctrine, catalog: &UnitCatalog) -> Self {
        Self::new(
            doctrine,
            PathRisk::against_opponent(catalog),
            catalog.stats(UnitClass::DefensiveMobile).attack_range,
        )
    }

    /// Plans this turn's interception, emitting placements into `out`.
    ///
    /// Returns the lead times acted upon, or `None` when `readiness` forbids
    /// spending this turn.
    pub fn handle<B>(
        &self,
        readiness: Readiness,
        log: &ObservationLog,
        battlefield: &B,
        out: &mut Vec<Command>,
    ) -> Option<LeadTimes>
    where
        B: Battlefield + ?Sized,
    {
        if !readiness.permits() {
            debug!(
                turn = readiness.turn,
                own_mobility = readiness.own_mobility,
                surge_threshold = readiness.surge_threshold,
                armed = readiness.armed,
                "interception skipped"
            );
            return None;
        }

        let leads = self.lead_times(log, battlefield);
        debug!(left = leads.left(), right = leads.right(), "interceptor lead times");
        self.place(leads, out);
        Some(leads)
    }

    /// Computes lead times from the opponent's favourite spawn cells.
    pub fn lead_times<B>(&self, log: &ObservationLog, battlefield: &B) -> LeadTimes
    where
        B: Battlefield + ?Sized,
    {
        let origins: Vec<CellCoord> = DANGEROUS
            .iter()
            .filter_map(|&class| log.most_frequent_spawn(class))
            .collect();

        if origins.is_empty() {
            return LeadTimes::uniform(self.doctrine.fallback_lead_time);
        }

        let paths: Vec<(CellCoord, Option<Vec<CellCoord>>)> = origins
            .into_iter()
            .map(|origin| (origin, self.paths.projected_path(battlefield, origin)))
            .collect();

        let mut leads = LeadTimes::default();
        for side in Side::ALL {
            let candidates = paths
                .iter()
                .map(|(origin, path)| self.lead_time(side, *origin, path.as_deref()));
            leads.set(side, combine(candidates));
        }
        leads
    }

    /// Lead time on `side` for a rush starting at `origin` along `path`.
    #[must_use]
    pub fn lead_time(&self, side: Side, origin: CellCoord, path: Option<&[CellCoord]>) -> u32 {
        let cells = self.doctrine.side(side);
        if origin.within_range(cells.short_detonation, self.doctrine.interaction_radius) {
            return 1;
        }

        let Some(path) = path else {
            return 0;
        };

        let group = self.doctrine.step_group.max(1);
        let range = self.interceptor_range;
        path.iter()
            .position(|step| step.within_range(cells.long_detonation, range))
            .map_or(0, |index| {
                let turns = (index + cells.rounding_offset) / group + 1;
                u32::try_from(turns).unwrap_or(u32::MAX).max(MIN_PATH_LEAD)
            })
    }

    /// Emits the placement pattern matching each side's lead time.
    pub fn place(&self, leads: LeadTimes, out: &mut Vec<Command>) {
        for side in Side::ALL {
            let cells = self.doctrine.side(side);
            match leads.get(side) {
                0 => {}
                1 => fast_pattern(cells, out),
                lead => self.slow_pattern(cells, lead, out),
            }
        }
    }

    fn slow_pattern(&self, cells: &SideDoctrine, lead: u32, out: &mut Vec<Command>) {
        out.push(Command::spawn(UnitClass::Wall, &cells.support_walls));
        if lead % 2 == 1 {
            out.push(Command::remove(&[cells.auxiliary_wall]));
        } else {
            out.push(Command::spawn(UnitClass::Wall, &[cells.auxiliary_wall]));
        }
        let spawn = cells.bucket_spawns[self.bucket(lead)];
        out.push(Command::spawn(UnitClass::DefensiveMobile, &[spawn]));
    }

    /// Index of the first bucket whose minimum `lead` meets; shorter leads
    /// use the most forward bucket.
    fn bucket(&self, lead: u32) -> usize {
        let buckets = &self.doctrine.lead_buckets;
        buckets
            .iter()
            .position(|&minimum| lead >= minimum)
            .unwrap_or(buckets.len() - 1)
    }
}

fn fast_pattern(cells: &SideDoctrine, out: &mut Vec<Command>) {
    out.push(Command::spawn(UnitClass::Wall, &cells.sacrificial_walls));
    out.push(Command::remove(&cells.sacrificial_walls));
    out.push(Command::spawn(UnitClass::DefensiveMobile, &[cells.near_spawn]));
}

/// An immediate threat from any class wins; otherwise the longest lead is the
/// conservative choice.
fn combine(leads: impl Iterator<Item = u32>) -> u32 {
    let mut longest = 0;
    for lead in leads {
        if lead == 1 {
            return 1;
        }
        longest = longest.max(lead);
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planner() -> InterceptPlanner {
        InterceptPlanner::from_catalog(Doctrine::default(), &UnitCatalog::standard())
    }

    #[test]
    fn combine_prefers_immediate_threats() {
        assert_eq!(combine([3, 1, 9].into_iter()), 1);
        assert_eq!(combine([3, 0, 5].into_iter()), 5);
        assert_eq!(combine(std::iter::empty()), 0);
    }

    #[test]
    fn buckets_map_from_furthest_to_most_forward() {
        let planner = planner();
        assert_eq!(planner.bucket(12), 0);
        assert_eq!(planner.bucket(9), 0);
        assert_eq!(planner.bucket(8), 1);
        assert_eq!(planner.bucket(5), 2);
        assert_eq!(planner.bucket(3), 3);
        assert_eq!(planner.bucket(2), 3);
    }

    #[test]
    fn origin_near_short_detonation_needs_one_turn() {
        let planner = planner();
        assert_eq!(planner.lead_time(Side::Left, CellCoord::new(3, 14), None), 1);
        assert_eq!(planner.lead_time(Side::Right, CellCoord::new(3, 14), None), 0);
    }

    #[test]
    fn right_side_rounds_one_step_later() {
        let planner = planner();
        let far = CellCoord::new(13, 27);
        let mut path = vec![far; 11];
        path.push(CellCoord::new(4, 10));
        path.push(CellCoord::new(23, 10));

        // Index 11 reaches the left point: 11 / 4 + 1 = 3.
        assert_eq!(planner.lead_time(Side::Left, far, Some(&path)), 3);
        // Index 12 reaches the right point: (12 + 1) / 4 + 1 = 4.
        assert_eq!(planner.lead_time(Side::Right, far, Some(&path)), 4);
    }

    #[test]
    fn early_path_contact_still_pre_positions() {
        let planner = planner();
        let origin = CellCoord::new(0, 15);
        let path = [origin, CellCoord::new(1, 13)];

        assert_eq!(planner.lead_time(Side::Left, origin, Some(&path)), 2);
    }

    #[test]
    fn odd_lead_opens_the_auxiliary_lane() {
        let planner = planner();
        let mut out = Vec::new();
        planner.place(LeadTimes::new(7, 0), &mut out);

        let left = &Doctrine::default().left;
        assert_eq!(
            out,
            vec![
                Command::spawn(UnitClass::Wall, &left.support_walls),
                Command::remove(&[left.auxiliary_wall]),
                Command::spawn(UnitClass::DefensiveMobile, &[left.bucket_spawns[1]]),
            ]
        );
    }

    #[test]
    fn even_lead_closes_the_auxiliary_lane() {
        let planner = planner();
        let mut out = Vec::new();
        planner.place(LeadTimes::new(0, 10), &mut out);

        let right = &Doctrine::default().right;
        assert_eq!(
            out,
            vec![
                Command::spawn(UnitClass::Wall, &right.support_walls),
                Command::spawn(UnitClass::Wall, &[right.auxiliary_wall]),
                Command::spawn(UnitClass::DefensiveMobile, &[right.bucket_spawns[0]]),
            ]
        );
    }

    #[test]
    fn readiness_requires_history_mobility_and_no_queued_push() {
        let ready = Readiness {
            turn: 4,
            own_mobility: 12.0,
            surge_threshold: 10.0,
            armed: false,
        };
        assert!(ready.permits());
        assert!(!Readiness { turn: 0, ..ready }.permits());
        assert!(!Readiness { armed: true, ..ready }.permits());
        assert!(!Readiness {
            own_mobility: 9.5,
            ..ready
        }
        .permits());
    }
}
