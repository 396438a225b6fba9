//! Physics engine and spatial grid behavior through the public API.

use proptest::prelude::*;
use rain_wallpaper::{DropState, PhysicsConfig, PhysicsEngine, SpatialHashGrid, Tuning};

const STEP: f32 = 1.0 / 60.0;

fn quiet() -> PhysicsConfig {
    PhysicsConfig { spawn_rate: 0.0, ..PhysicsConfig::default() }
}

fn total_mass(engine: &PhysicsEngine) -> f32 {
    engine.drops().iter().map(|d| d.mass()).sum()
}

#[test]
fn merge_conserves_mass_and_weights_position() {
    let mut engine = PhysicsEngine::new(640.0, 960.0, quiet());
    engine.add_drop(100.0, 100.0, 400.0);
    engine.add_drop(100.0, 110.0, 50.0);
    engine.update(STEP);

    assert_eq!(engine.len(), 1);
    let d = engine.drops()[0];
    assert_eq!(d.mass(), 450.0);
    // The heavy drop slid 12px before meeting the bead.
    let expected_y = (400.0 * 112.0 + 50.0 * 110.0) / 450.0;
    assert!((d.y - expected_y).abs() < 1e-3);
    assert_eq!(d.x, 100.0);
}

#[test]
fn state_follows_mass_every_tick() {
    let mut engine = PhysicsEngine::new(640.0, 960.0, PhysicsConfig::default());
    for x in [80.0, 240.0, 400.0] {
        engine.add_drop(x, 50.0, 600.0);
    }
    let crit = engine.config().critical_mass;
    for _ in 0..600 {
        engine.update(STEP);
        for d in engine.drops() {
            assert_eq!(d.state == DropState::Flowing, d.mass() >= crit, "drop {}", d.id);
        }
    }
}

#[test]
fn trails_never_drain_parent_below_critical_mass() {
    let config = PhysicsConfig { spawn_rate: 0.0, trail_density: 1.0, ..PhysicsConfig::default() };
    let mut engine = PhysicsEngine::new(640.0, 100_000.0, config);
    let parent = engine.add_drop(320.0, 10.0, 260.0).unwrap();

    for _ in 0..120 {
        engine.update(STEP);
        assert!((total_mass(&engine) - 260.0).abs() < 1e-2);
        let p = engine.drops().iter().find(|d| d.id == parent).unwrap();
        assert!(p.mass() > config.critical_mass);
    }
    assert!(engine.len() > 1, "no trail was shed");
    for trail in engine.drops().iter().filter(|d| d.id != parent) {
        assert_eq!(trail.state, DropState::Static);
    }
}

#[test]
fn drops_below_the_canvas_despawn() {
    let mut engine = PhysicsEngine::new(100.0, 100.0, quiet());
    engine.add_drop(50.0, 107.0, 9.0);
    engine.add_drop(20.0, 50.0, 9.0);
    engine.update(STEP);
    assert_eq!(engine.len(), 1);
    assert_eq!(engine.drops()[0].y, 50.0);
}

#[test]
fn ten_seconds_of_rain_stays_bounded() {
    let mut engine = PhysicsEngine::new(640.0, 960.0, PhysicsConfig::default());
    for _ in 0..600 {
        engine.update(STEP);
    }
    // 15 drops/s for 10 s; spawned drops are far below critical mass.
    assert!((140..=151).contains(&engine.len()), "{} drops", engine.len());
    for d in engine.drops() {
        assert!((d.radius() - d.mass().sqrt()).abs() < 1e-4);
        assert_eq!(d.state, DropState::Static);
    }
}

#[test]
fn resize_to_same_size_changes_nothing() {
    let mut engine = PhysicsEngine::new(640.0, 960.0, PhysicsConfig::default());
    engine.add_drop(300.0, 100.0, 500.0);
    for _ in 0..90 {
        engine.update(STEP);
    }
    let before = engine.drops().to_vec();
    let (w, h) = engine.dimensions();
    engine.resize(w, h);
    assert_eq!(engine.drops(), &before[..]);
}

#[test]
fn resize_keeps_drops_in_place() {
    let mut engine = PhysicsEngine::new(640.0, 960.0, quiet());
    engine.add_drop(600.0, 900.0, 20.0);
    engine.resize(320.0, 480.0);
    assert_eq!(engine.dimensions(), (320.0, 480.0));
    assert_eq!((engine.drops()[0].x, engine.drops()[0].y), (600.0, 900.0));
}

#[test]
fn same_seed_same_rain() {
    let run = |seed| {
        let mut e = PhysicsEngine::seeded(640.0, 960.0, PhysicsConfig::default(), seed);
        for _ in 0..120 {
            e.update(STEP);
        }
        e.drops().to_vec()
    };
    assert_eq!(run(7), run(7));
    assert_ne!(run(7), run(8));
}

#[test]
fn clear_empties_the_arena() {
    let mut engine = PhysicsEngine::new(640.0, 960.0, quiet());
    engine.add_drop(1.0, 1.0, 1.0);
    engine.clear();
    assert!(engine.is_empty());
}

#[test]
fn out_of_bounds_points_are_not_indexed() {
    let mut grid = SpatialHashGrid::new(640.0, 960.0, 60.0);
    assert!(!grid.insert(0usize, -1.0, 10.0));
    assert!(!grid.insert(1, 10.0, 961.0));
    assert!(grid.insert(2, 10.0, 10.0));
    assert!(grid.neighbors(9, 10.0, 10.0) == vec![2]);
    assert!(grid.neighbors(9, 0.5, 955.0).is_empty());
}

fn cell(v: f32) -> i64 {
    (v / 60.0).floor() as i64
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn close_points_are_neighbors(
        ax in 0.0f32..640.0, ay in 0.0f32..960.0,
        dx in -42.0f32..42.0, dy in -42.0f32..42.0,
    ) {
        let (bx, by) = (ax + dx, ay + dy);
        prop_assume!((0.0..640.0).contains(&bx) && (0.0..960.0).contains(&by));

        let mut grid = SpatialHashGrid::new(640.0, 960.0, 60.0);
        grid.insert(0usize, ax, ay);
        grid.insert(1, bx, by);
        prop_assert!(grid.neighbors(0, ax, ay).contains(&1));
        prop_assert!(grid.neighbors(1, bx, by).contains(&0));
    }

    #[test]
    fn distant_cells_are_not_neighbors(
        ax in 0.0f32..640.0, ay in 0.0f32..960.0,
        bx in 0.0f32..640.0, by in 0.0f32..960.0,
    ) {
        prop_assume!((cell(ax) - cell(bx)).abs() > 1 || (cell(ay) - cell(by)).abs() > 1);

        let mut grid = SpatialHashGrid::new(640.0, 960.0, 60.0);
        grid.insert(0usize, ax, ay);
        grid.insert(1, bx, by);
        prop_assert!(!grid.neighbors(0, ax, ay).contains(&1));
    }

    #[test]
    fn ticks_never_produce_nan(seed in any::<i64>(), steps in 1usize..200) {
        let mut engine = PhysicsEngine::seeded(320.0, 480.0, PhysicsConfig::default(), seed);
        engine.add_drop(160.0, 10.0, 900.0);
        for _ in 0..steps {
            engine.update(STEP);
        }
        for d in engine.drops() {
            prop_assert!(d.x.is_finite() && d.y.is_finite() && d.mass() > 0.0);
        }
    }
}

fn classic(tuning: Tuning) -> PhysicsEngine {
    PhysicsEngine::new(640.0, 960.0, PhysicsConfig { spawn_rate: 0.0, ..PhysicsConfig::classic() }).with_tuning(tuning)
}

#[test]
fn classic_preset_spawns_over_the_whole_pane() {
    let mut engine = PhysicsEngine::new(640.0, 960.0, PhysicsConfig::classic()).with_tuning(Tuning::classic());
    for _ in 0..600 {
        engine.update(STEP);
    }
    assert!((95..=101).contains(&engine.len()), "{} drops", engine.len());
    // The standard model keeps new drops in the top tenth.
    assert!(engine.drops().iter().any(|d| d.y > 480.0));
    for d in engine.drops() {
        assert!((2.0..12.0).contains(&d.mass()));
    }
}

#[test]
fn classic_preset_merges_on_contact() {
    // After sliding 10px the runner (r 20) is 28px from the bead (r 10):
    // inside contact distance 30, outside 0.9 * 30.
    let run = |tuning| {
        let mut engine = classic(tuning);
        engine.add_drop(100.0, 100.0, 400.0);
        engine.add_drop(128.0, 110.0, 100.0);
        engine.update(STEP);
        engine.drops().iter().map(|d| d.mass()).collect::<Vec<_>>()
    };
    assert_eq!(run(Tuning::classic()), vec![500.0]);
    assert_eq!(run(Tuning::default()), vec![400.0, 100.0]);
}
