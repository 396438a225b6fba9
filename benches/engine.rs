use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use rain_wallpaper::{Mulberry32, PhysicsConfig, PhysicsEngine, generate};

const STEP: f32 = 1.0 / 60.0;

/// `beads` resting drops scattered over a 1280x1920 pane plus a row of heavy
/// runners sliding through them.
fn populated(beads: usize) -> PhysicsEngine {
    let mut engine = PhysicsEngine::new(1280.0, 1920.0, PhysicsConfig::default());
    let mut rng = Mulberry32::new(7);
    for _ in 0..beads {
        engine.add_drop(rng.range_f32(0.0, 1280.0), rng.range_f32(0.0, 1920.0), rng.range_f32(3.0, 15.0));
    }
    for x in (40..1280).step_by(160) {
        engine.add_drop(x as f32, 20.0, 800.0);
    }
    engine
}

fn engine_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_tick");
    for beads in [150usize, 1000, 4000] {
        group.bench_with_input(BenchmarkId::from_parameter(beads), &beads, |b, &beads| {
            b.iter_batched_ref(
                || populated(beads),
                |engine| {
                    engine.update(black_box(STEP));
                    black_box(engine.len());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn generator_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for count in [300i64, 1000, 5000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| black_box(generate(black_box(count), 42)))
        });
    }
    group.finish();
}

criterion_group!(benches, engine_benchmark, generator_benchmark);
criterion_main!(benches);
