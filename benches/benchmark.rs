use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use avl_map::AvlTreeMap;

const N: usize = 100_000;

pub fn benchmarks(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let values: Vec<i32> = (1..=N).map(|_| rng.gen()).collect();

    c.bench_function("map_insert", |b| {
        b.iter_batched(
            AvlTreeMap::new,
            |mut map| {
                for value in &values {
                    map.insert(*value, *value);
                }
                map
            },
            BatchSize::LargeInput,
        )
    });

    c.bench_function("map_get_or_default", |b| {
        b.iter_batched(
            AvlTreeMap::<i32, u32>::new,
            |mut map| {
                for value in &values {
                    *map.get_or_default(value % 1_000) += 1;
                }
                map
            },
            BatchSize::LargeInput,
        )
    });

    let map: AvlTreeMap<_, _> = values.iter().map(|&value| (value, value)).collect();

    c.bench_function("map_get", |b| {
        b.iter(|| {
            for value in &values {
                black_box(map.get(value));
            }
        })
    });

    c.bench_function("map_iter", |b| {
        b.iter(|| {
            for (k, v) in &map {
                black_box((k, v));
            }
        })
    });

    c.bench_function("map_positions", |b| {
        b.iter(|| {
            let mut position = map.begin();
            while let Ok(next) = map.next_position(position) {
                position = black_box(next);
            }
        })
    });

    c.bench_function("map_remove", |b| {
        b.iter_batched(
            || map.clone(),
            |mut map| {
                for value in &values {
                    map.remove(value);
                }
                map
            },
            BatchSize::LargeInput,
        )
    });

    c.bench_function("map_erase_first", |b| {
        b.iter_batched(
            || map.clone(),
            |mut map| {
                while !map.is_empty() {
                    let first = map.begin();
                    map.erase(first);
                }
                map
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
