use rampart_core::{
    CellCoord, Command, Doctrine, Owner, Plan, ResourcePool, Side, TurnSnapshot, UnitCatalog,
    UnitClass, UnitSnapshot,
};
use rampart_system_offense::{weaker_side, AttackState, Offense, SideScores};
use rampart_system_path_risk::PathRisk;
use rampart_world::Arena;

fn opponent_turret(column: u32, row: u32) -> UnitSnapshot {
    UnitSnapshot {
        class: UnitClass::Turret,
        owner: Owner::Opponent,
        cell: CellCoord::new(column, row),
        health: 75.0,
        max_health: 75.0,
        upgraded: false,
    }
}

fn snapshot(turn: u32, mobility: f64, units: Vec<UnitSnapshot>) -> TurnSnapshot {
    TurnSnapshot::new(
        turn,
        ResourcePool::new(10.0, mobility),
        ResourcePool::new(10.0, 5.0),
        units,
    )
}

fn left_heavy_defence() -> Vec<UnitSnapshot> {
    (0..12).map(|column| opponent_turret(column, 14)).collect()
}

struct Harness {
    offense: Offense,
    assessor: PathRisk,
    catalog: UnitCatalog,
}

impl Harness {
    fn new(seed: u64) -> Self {
        let catalog = UnitCatalog::standard();
        Self {
            offense: Offense::new(Doctrine::default(), seed),
            assessor: PathRisk::against_opponent(&catalog),
            catalog,
        }
    }

    fn turn(&mut self, snapshot: &TurnSnapshot) -> Vec<Command> {
        let arena = Arena::from_snapshot(snapshot, &self.catalog);
        let mut out = Vec::new();
        self.offense
            .handle(snapshot, &self.assessor, &arena, &mut out);
        out
    }
}

#[test]
fn heavily_turreted_left_makes_right_the_weaker_side() {
    let doctrine = Doctrine::default();
    let snapshot = snapshot(3, 0.0, left_heavy_defence());

    assert_eq!(
        SideScores::tally(&snapshot, &doctrine),
        SideScores {
            left: 144,
            right: 0
        }
    );
    assert_eq!(weaker_side(&snapshot, &doctrine), Side::Right);
}

#[test]
fn push_prepares_arms_and_executes_over_three_turns() {
    let doctrine = Doctrine::default();
    let mut harness = Harness::new(7);

    let prepare = harness.turn(&snapshot(10, 13.0, left_heavy_defence()));
    assert!(prepare.is_empty());
    assert_eq!(harness.offense.state(), AttackState::Preparing);

    let arming = snapshot(11, 2.0, left_heavy_defence());
    assert_eq!(
        harness.offense.lane(&arming),
        doctrine.right.corner_walls.as_slice()
    );
    let arm = harness.turn(&arming);
    let state = harness.offense.state();
    assert_eq!(state.side(), Some(Side::Right));
    let plan = state.plan().expect("armed push has a plan");
    assert_eq!(arm, vec![Command::remove(&doctrine.right.corner_walls)]);

    let executing = snapshot(12, 20.0, left_heavy_defence());
    assert_eq!(
        harness.offense.lane(&executing),
        doctrine.right.corner_walls.as_slice()
    );
    let execute = harness.turn(&executing);
    assert_eq!(harness.offense.state(), AttackState::Idle);
    assert!(harness.offense.lane(&executing).is_empty());

    let cells = doctrine.right.plan(plan);
    let mut spawned = Vec::new();
    let mut counts = Vec::new();
    for command in &execute {
        match command {
            Command::Spawn {
                class: UnitClass::FastRanged,
                cells,
                count,
            } => {
                spawned.extend(cells.iter().copied());
                counts.push(*count);
            }
            other => panic!("unexpected command during execution: {other:?}"),
        }
    }
    assert_eq!(counts, vec![8, 100]);
    spawned.sort();
    let mut expected = vec![cells.probe, cells.surge];
    expected.sort();
    assert_eq!(spawned, expected);
}

#[test]
fn below_commit_threshold_stays_idle() {
    let mut harness = Harness::new(1);
    for turn in 1..20 {
        let out = harness.turn(&snapshot(turn, 12.5, Vec::new()));
        assert!(out.is_empty());
        assert_eq!(harness.offense.state(), AttackState::Idle);
    }
}

#[test]
fn states_only_advance_around_the_cycle() {
    let mut harness = Harness::new(0x5eed);
    let mut previous = harness.offense.state();

    for turn in 1..200 {
        let mobility = f64::from((turn * 7) % 20);
        let _ = harness.turn(&snapshot(turn, mobility, Vec::new()));
        let current = harness.offense.state();
        let allowed = matches!(
            (previous, current),
            (AttackState::Idle, AttackState::Idle)
                | (AttackState::Idle, AttackState::Preparing)
                | (AttackState::Preparing, AttackState::Armed { .. })
                | (AttackState::Armed { .. }, AttackState::Idle)
        );
        assert!(allowed, "turn {turn}: {previous:?} -> {current:?}");
        previous = current;
    }
}

#[test]
fn same_seed_chooses_the_same_plans() {
    let plans = |seed: u64| {
        let mut harness = Harness::new(seed);
        let mut chosen = Vec::new();
        for turn in 1..150 {
            let _ = harness.turn(&snapshot(turn, 15.0, Vec::new()));
            if let Some(plan) = harness.offense.state().plan() {
                chosen.push(plan);
            }
        }
        chosen
    };

    let first = plans(42);
    assert_eq!(first, plans(42));
    assert!(first.contains(&Plan::Short));
    assert!(first.contains(&Plan::Long));
}
