// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use understory_benches::{gen_clustered_points, gen_flat_grid, gen_uniform_points};
use understory_locator::{
    Backend, LinearScan, Locator, Octree, OctreeConfig, PointLocator, Vec3,
};

fn targets(count: usize, size: f32) -> Vec<Vec3> {
    gen_uniform_points(0x81FD_BEE7_94F0_AF1A, count, size)
        .into_iter()
        .map(Vec3::from)
        .collect()
}

fn bench_insert(c: &mut Criterion) {
    fn bench<F, B>(b: &mut criterion::Bencher, points: &[[f32; 3]], make_locator: F)
    where
        F: FnMut() -> Locator<B>,
        B: Backend,
    {
        b.iter_batched(
            make_locator,
            |mut loc| {
                loc.add_point_set(points);
                loc
            },
            BatchSize::SmallInput,
        )
    }

    let mut group = c.benchmark_group("insert_uniform");
    for &n in &[1_000_usize, 10_000, 100_000] {
        let points = gen_uniform_points(0x3C6E_F35F_4750_2932, n, 1000.0);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(BenchmarkId::new("LinearScan", n), |b| {
            bench(b, &points, Locator::<LinearScan>::linear)
        });
        group.bench_function(BenchmarkId::new("Octree", n), |b| {
            bench(b, &points, Locator::<Octree>::new)
        });
        group.bench_function(BenchmarkId::new("Octree(split=64)", n), |b| {
            bench(b, &points, || {
                PointLocator::with_config(OctreeConfig::default().with_split_threshold(64))
                    .unwrap_or_default()
            })
        });
    }
    group.finish();
}

fn bench_closest_point(
    c: &mut Criterion,
    benchmark_group_name: &str,
    make_points: impl Fn(usize) -> Vec<[f32; 3]>,
    world: f32,
) {
    fn bench<B: Backend>(b: &mut criterion::Bencher, loc: &Locator<B>, targets: &[Vec3]) {
        b.iter(|| {
            let mut total = 0_usize;
            for &t in targets {
                if let Some(info) = loc.closest_point(t) {
                    total += info.index;
                }
            }
            total
        })
    }

    let queries = targets(1000, world);
    let mut group = c.benchmark_group(benchmark_group_name);
    for &n in &[1_000_usize, 10_000, 100_000] {
        let points = make_points(n);
        group.throughput(Throughput::Elements(queries.len() as u64));
        let tree = Locator::<Octree>::from_points(&points);
        group.bench_function(BenchmarkId::new("Octree", n), |b| {
            bench(b, &tree, &queries)
        });
        // Brute force gets slow quickly; keep it to the small sizes as a baseline.
        if n <= 10_000 {
            let scan = Locator::<LinearScan>::from_points(&points);
            group.bench_function(BenchmarkId::new("LinearScan", n), |b| {
                bench(b, &scan, &queries)
            });
        }
    }
    group.finish();
}

fn bench_closest_point_uniform(c: &mut Criterion) {
    bench_closest_point(
        c,
        "closest_point_uniform",
        |n| gen_uniform_points(0xFACE_FEED_CAFE_BABE, n, 1000.0),
        1000.0,
    );
}

fn bench_closest_point_clustered(c: &mut Criterion) {
    bench_closest_point(
        c,
        "closest_point_clustered",
        // 64 clusters; the per-cluster size scales with n.
        |n| gen_clustered_points(64, n / 64, 40.0),
        2000.0,
    );
}

fn bench_closest_point_flat(c: &mut Criterion) {
    bench_closest_point(
        c,
        "closest_point_flat",
        // Square grid with about n points, 1.0 apart.
        |n| gen_flat_grid((n as f64).sqrt() as usize, 1.0),
        316.0,
    );
}

fn bench_points_in_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("points_in_range_uniform");
    let queries = targets(200, 1000.0);
    for &radius in &[5.0_f32, 25.0, 100.0] {
        let points = gen_uniform_points(0x0BAD_C0DE_DEAD_BEEF, 50_000, 1000.0);
        let tree = Locator::<Octree>::from_points(&points);
        group.bench_function(BenchmarkId::new("Octree", radius), |b| {
            b.iter(|| {
                let mut total = 0_usize;
                for &t in &queries {
                    tree.visit_points_in_range(t, radius, |_| total += 1);
                }
                total
            })
        });
    }
    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    let sets: Vec<Vec<[f32; 3]>> = (0..32)
        .map(|i| gen_uniform_points(0x7777_1111_3333_5555 + i, 2_000, 500.0))
        .collect();
    group.bench_function("add_remove_query", |b| {
        b.iter_batched(
            Locator::<Octree>::new,
            |mut loc| {
                let mut live = Vec::new();
                for (i, pts) in sets.iter().enumerate() {
                    live.push(loc.add_point_set(pts));
                    if i % 2 == 1 {
                        let set = live.swap_remove(0);
                        loc.remove_point_set(set);
                    }
                    black_box(loc.closest_point(Vec3::splat(250.0)));
                }
                loc
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_closest_point_uniform,
    bench_closest_point_clustered,
    bench_closest_point_flat,
    bench_points_in_range,
    bench_churn,
);
criterion_main!(benches);
