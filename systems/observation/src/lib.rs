#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Opponent behaviour model built from the action-frame event feed.
//!
//! The log only ever grows during a match. Every judgement it offers, such as
//! the favourite spawn cell of a unit class or the opponent's surge capacity,
//! is recomputed from the accumulated history on demand.

use rampart_core::{CellCoord, Doctrine, Event, Owner, UnitClass};
use tracing::debug;

/// Mobile classes tracked by the log, in table order.
const TRACKED: [UnitClass; 3] = [
    UnitClass::FastRanged,
    UnitClass::Siege,
    UnitClass::DefensiveMobile,
];

/// Thresholds used when judging the opponent's mobility spending.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    spike_floor: f64,
    passive_income: f64,
}

impl Config {
    /// Creates a configuration from the spike floor and per-turn mobility income.
    #[must_use]
    pub const fn new(spike_floor: f64, passive_income: f64) -> Self {
        Self {
            spike_floor,
            passive_income,
        }
    }

    /// Extracts the relevant thresholds from the doctrine table.
    #[must_use]
    pub fn from_doctrine(doctrine: &Doctrine) -> Self {
        Self::new(doctrine.spike_floor, doctrine.passive_mobility_income)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_doctrine(&Doctrine::default())
    }
}

/// Spawn counts per cell, kept in first-insertion order.
#[derive(Clone, Debug, Default)]
struct SpawnTable {
    entries: Vec<(CellCoord, u32)>,
}

impl SpawnTable {
    fn increment(&mut self, cell: CellCoord) {
        if let Some((_, count)) = self.entries.iter_mut().find(|(known, _)| *known == cell) {
            *count += 1;
            return;
        }
        self.entries.push((cell, 1));
    }

    fn count(&self, cell: CellCoord) -> u32 {
        self.entries
            .iter()
            .find(|(known, _)| *known == cell)
            .map_or(0, |(_, count)| *count)
    }

    /// Cell with the highest count; the earliest inserted wins ties.
    fn most_frequent(&self) -> Option<CellCoord> {
        let mut best: Option<(CellCoord, u32)> = None;
        for &(cell, count) in &self.entries {
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((cell, count)),
            }
        }
        best.map(|(cell, _)| cell)
    }
}

/// Append-only record of what the opponent has done this match.
#[derive(Clone, Debug)]
pub struct ObservationLog {
    config: Config,
    spawns: [SpawnTable; 3],
    breaches: Vec<CellCoord>,
    mobility_samples: Vec<f64>,
}

impl ObservationLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            spawns: Default::default(),
            breaches: Vec::new(),
            mobility_samples: Vec::new(),
        }
    }

    /// Folds one turn's action-frame events into the log.
    ///
    /// Only opponent spawns of mobile classes and opponent breaches of the
    /// defender's edge are recorded.
    pub fn ingest(&mut self, events: &[Event]) {
        for event in events {
            match *event {
                Event::Spawned {
                    owner: Owner::Opponent,
                    class,
                    cell,
                } => self.record_spawn(class, cell),
                Event::Breached {
                    owner: Owner::Opponent,
                    cell,
                } => self.record_breach(cell),
                Event::Spawned { .. } | Event::Breached { .. } => {}
            }
        }
    }

    /// Counts one observed enemy spawn. Stationary classes are not tracked.
    pub fn record_spawn(&mut self, class: UnitClass, cell: CellCoord) {
        let Some(table) = table_index(class).map(|index| &mut self.spawns[index]) else {
            return;
        };
        table.increment(cell);
    }

    /// Remembers a cell where an enemy unit scored against us.
    pub fn record_breach(&mut self, cell: CellCoord) {
        debug!(column = cell.column(), row = cell.row(), "breach recorded");
        self.breaches.push(cell);
    }

    /// Breach cells in the order they were recorded.
    #[must_use]
    pub fn breaches(&self) -> &[CellCoord] {
        &self.breaches
    }

    /// Number of times `class` was seen spawning on `cell`.
    #[must_use]
    pub fn spawn_count(&self, class: UnitClass, cell: CellCoord) -> u32 {
        table_index(class).map_or(0, |index| self.spawns[index].count(cell))
    }

    /// Cell the opponent spawned `class` on most often, if it ever did.
    ///
    /// Ties resolve to the cell that was first observed.
    #[must_use]
    pub fn most_frequent_spawn(&self, class: UnitClass) -> Option<CellCoord> {
        table_index(class).and_then(|index| self.spawns[index].most_frequent())
    }

    /// Records the opponent's current mobility pool and estimates how much
    /// mobility it is able to surge with.
    ///
    /// A spike is a turn-over-turn drop of at least the spike floor beyond
    /// what passive income explains. The smallest spike seen so far is
    /// returned; without one the spike floor itself is returned. Call this
    /// once per turn, as every call appends a sample.
    pub fn mobility_spend_threshold(&mut self, opponent_mobility: f64) -> f64 {
        self.mobility_samples.push(opponent_mobility);

        let floor = self.config.spike_floor;
        let smallest_spike = self
            .mobility_samples
            .windows(2)
            .map(|pair| pair[0] + self.config.passive_income - pair[1])
            .filter(|delta| *delta >= floor)
            .fold(None, |smallest: Option<f64>, delta| {
                Some(smallest.map_or(delta, |current| current.min(delta)))
            });

        match smallest_spike {
            Some(spike) if spike >= floor => spike,
            _ => floor,
        }
    }

    /// Opponent mobility samples in recording order.
    #[must_use]
    pub fn mobility_samples(&self) -> &[f64] {
        &self.mobility_samples
    }
}

impl Default for ObservationLog {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

fn table_index(class: UnitClass) -> Option<usize> {
    TRACKED.iter().position(|tracked| *tracked == class)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_frequent_spawn_is_none_without_observations() {
        let log = ObservationLog::default();
        for class in TRACKED {
            assert_eq!(log.most_frequent_spawn(class), None);
        }
    }

    #[test]
    fn most_frequent_spawn_prefers_the_highest_count() {
        let mut log = ObservationLog::default();
        log.record_spawn(UnitClass::Siege, CellCoord::new(3, 17));
        log.record_spawn(UnitClass::Siege, CellCoord::new(24, 17));
        log.record_spawn(UnitClass::Siege, CellCoord::new(24, 17));

        assert_eq!(
            log.most_frequent_spawn(UnitClass::Siege),
            Some(CellCoord::new(24, 17))
        );
        assert_eq!(log.most_frequent_spawn(UnitClass::FastRanged), None);
        assert_eq!(log.spawn_count(UnitClass::Siege, CellCoord::new(24, 17)), 2);
    }

    #[test]
    fn ties_resolve_to_the_first_observed_cell() {
        let mut log = ObservationLog::default();
        log.record_spawn(UnitClass::FastRanged, CellCoord::new(10, 17));
        log.record_spawn(UnitClass::FastRanged, CellCoord::new(17, 17));
        log.record_spawn(UnitClass::FastRanged, CellCoord::new(17, 17));
        log.record_spawn(UnitClass::FastRanged, CellCoord::new(10, 17));

        assert_eq!(
            log.most_frequent_spawn(UnitClass::FastRanged),
            Some(CellCoord::new(10, 17))
        );
    }

    #[test]
    fn stationary_spawns_are_ignored() {
        let mut log = ObservationLog::default();
        log.record_spawn(UnitClass::Turret, CellCoord::new(3, 15));

        assert_eq!(log.most_frequent_spawn(UnitClass::Turret), None);
        assert_eq!(log.spawn_count(UnitClass::Turret, CellCoord::new(3, 15)), 0);
    }

    #[test]
    fn ingest_keeps_only_opponent_activity() {
        let mut log = ObservationLog::default();
        log.ingest(&[
            Event::Spawned {
                owner: Owner::Opponent,
                class: UnitClass::Siege,
                cell: CellCoord::new(6, 20),
            },
            Event::Spawned {
                owner: Owner::Defender,
                class: UnitClass::FastRanged,
                cell: CellCoord::new(13, 0),
            },
            Event::Breached {
                owner: Owner::Opponent,
                cell: CellCoord::new(2, 11),
            },
            Event::Breached {
                owner: Owner::Defender,
                cell: CellCoord::new(20, 20),
            },
        ]);

        assert_eq!(
            log.most_frequent_spawn(UnitClass::Siege),
            Some(CellCoord::new(6, 20))
        );
        assert_eq!(log.most_frequent_spawn(UnitClass::FastRanged), None);
        assert_eq!(log.breaches(), &[CellCoord::new(2, 11)]);
    }

    #[test]
    fn threshold_defaults_to_floor_without_history() {
        let mut log = ObservationLog::default();
        assert_eq!(log.mobility_spend_threshold(5.0), 10.0);
        assert_eq!(log.mobility_samples(), &[5.0]);
    }

    #[test]
    fn threshold_reports_the_smallest_spike() {
        let mut log = ObservationLog::default();
        // 20 + 5 - 3 = 22, then 3 + 5 - 8 = 0, then 8 + 5 - 1 = 12.
        assert_eq!(log.mobility_spend_threshold(20.0), 10.0);
        assert_eq!(log.mobility_spend_threshold(3.0), 22.0);
        assert_eq!(log.mobility_spend_threshold(8.0), 22.0);
        assert_eq!(log.mobility_spend_threshold(1.0), 12.0);
    }

    #[test]
    fn drops_explained_by_income_are_not_spikes() {
        let mut log = ObservationLog::default();
        // 12 + 5 - 8 = 9, just under the floor.
        let _ = log.mobility_spend_threshold(12.0);
        assert_eq!(log.mobility_spend_threshold(8.0), 10.0);
    }
}
