use proptest::prelude::*;
use rampart_core::{CellCoord, UnitClass};
use rampart_system_observation::{Config, ObservationLog};

fn cell() -> impl Strategy<Value = CellCoord> {
    (0u32..6, 14u32..18).prop_map(|(column, row)| CellCoord::new(column, row))
}

proptest! {
    #[test]
    fn most_frequent_spawn_is_first_inserted_maximum(cells in prop::collection::vec(cell(), 1..64)) {
        let mut log = ObservationLog::default();
        for &cell in &cells {
            log.record_spawn(UnitClass::FastRanged, cell);
        }

        let mut first_seen: Vec<CellCoord> = Vec::new();
        for &cell in &cells {
            if !first_seen.contains(&cell) {
                first_seen.push(cell);
            }
        }
        let count = |target: CellCoord| cells.iter().filter(|&&cell| cell == target).count();
        let maximum = first_seen.iter().map(|&cell| count(cell)).max().unwrap_or(0);
        let expected = first_seen.iter().copied().find(|&cell| count(cell) == maximum);

        prop_assert_eq!(log.most_frequent_spawn(UnitClass::FastRanged), expected);
    }

    #[test]
    fn spend_threshold_never_drops_below_floor(
        samples in prop::collection::vec(0.0f64..60.0, 1..32),
        floor in 1.0f64..20.0,
    ) {
        let mut log = ObservationLog::new(Config::new(floor, 5.0));
        for sample in samples {
            let threshold = log.mobility_spend_threshold(sample);
            prop_assert!(threshold >= floor);
        }
    }
}
