//! Metabolism and transfer benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use hecs::World;
use reagent_core::config::LiverConfig;
use reagent_core::prelude::*;
use reagent_core::registry::{ConstantMetabolism, FixedRateMetabolism};
use reagent_core::systems::metabolism_system;
use reagent_logic::transfer;

const REAGENTS: [&str; 6] = ["Water", "Ethanol", "Sugar", "Iron", "Toxin", "Plasma"];

fn registry() -> ReagentRegistry {
    ReagentRegistry::builder()
        .reagent("Ethanol", FixedRateMetabolism { rate: 1.0 })
        .reagent("Sugar", FixedRateMetabolism { rate: 0.5 })
        .reagent("Toxin", ConstantMetabolism { amount: 1 })
        .build()
        .unwrap()
}

fn populated_world(livers: usize) -> World {
    let mut world = World::new();
    for i in 0..livers {
        let mut liver = Liver::new(&LiverConfig { max_volume: 600 });
        for (offset, id) in REAGENTS.iter().enumerate() {
            liver.internal_mut().add_reagent(*id, 50 + ((i + offset) % 40) as u32);
        }
        world.spawn((liver, Position::default()));
    }
    world
}

fn bench_metabolism_system(c: &mut Criterion) {
    let registry = registry();

    c.bench_function("metabolism_1000_livers", |b| {
        b.iter_batched(
            || populated_world(1000),
            |mut world| metabolism_system(black_box(&mut world), black_box(&registry), 1.0),
            criterion::BatchSize::LargeInput,
        )
    });
}

fn bench_split(c: &mut Criterion) {
    let mut mixture = Solution::with_capacity(10_000);
    for (i, id) in REAGENTS.iter().enumerate() {
        mixture.add_reagent(*id, 997 + i as u32 * 13);
    }

    c.bench_function("split_six_reagents", |b| {
        b.iter(|| {
            let mut source = mixture.clone();
            source.split(black_box(1234))
        })
    });
}

fn bench_transfer_relay(c: &mut Criterion) {
    c.bench_function("transfer_relay", |b| {
        b.iter(|| {
            let mut a = Solution::with_capacity(100);
            let mut z = Solution::with_capacity(100);
            for id in REAGENTS {
                a.add_reagent(id, 15);
            }
            while transfer(&mut a, &mut z, black_box(7)).is_ok() {}
            z
        })
    });
}

criterion_group!(
    benches,
    bench_metabolism_system,
    bench_split,
    bench_transfer_relay
);
criterion_main!(benches);
