use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use scale_loop::{Entity, SimulationConfig, Universe};

fn build_universe(entities: usize) -> Universe {
    let mut universe =
        Universe::with_standard_rules(SimulationConfig::default().with_seed(42)).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    universe.add_entity(Entity::observer_from_rng(&mut rng));
    for _ in 0..entities {
        universe.add_entity(Entity::from_rng(&mut rng));
    }
    universe
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    for size in [4usize, 32, 128] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut universe = build_universe(size);
            b.iter(|| black_box(universe.tick().len()));
        });
    }
    group.finish();
}

fn bench_patterns(c: &mut Criterion) {
    let mut universe = build_universe(16);
    universe.run(200);
    let observer = universe.observers().next().map(|o| o.id()).unwrap();

    c.bench_function("find_patterns", |b| {
        b.iter(|| black_box(universe.entity(observer).and_then(|o| o.find_patterns())))
    });
}

criterion_group!(benches, bench_tick, bench_patterns);
criterion_main!(benches);
