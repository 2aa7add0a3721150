// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compares the octree locator with `rstar` on the same point data.
//!
//! Run with `cargo bench -p understory_benches --features compare_rstar`.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rstar::RTree;
use rstar::primitives::GeomWithData;
use understory_benches::{gen_clustered_points, gen_uniform_points};
use understory_locator::{PointLocator, Vec3};

type Entry = GeomWithData<[f32; 3], usize>;

fn rtree_from(points: &[[f32; 3]]) -> RTree<Entry> {
    RTree::bulk_load(
        points
            .iter()
            .enumerate()
            .map(|(i, &p)| GeomWithData::new(p, i))
            .collect(),
    )
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_vs_rstar");
    for &n in &[10_000_usize, 100_000] {
        let points = gen_uniform_points(0x3C6E_F35F_4750_2932, n, 1000.0);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(BenchmarkId::new("Octree", n), |b| {
            b.iter(|| PointLocator::from_points(&points))
        });
        group.bench_function(BenchmarkId::new("rstar bulk_load", n), |b| {
            b.iter(|| rtree_from(&points))
        });
    }
    group.finish();
}

fn bench_nearest(c: &mut Criterion) {
    let queries = gen_uniform_points(0x81FD_BEE7_94F0_AF1A, 1000, 2000.0);
    let mut group = c.benchmark_group("nearest_vs_rstar");
    for (name, points) in [
        (
            "uniform",
            gen_uniform_points(0xFACE_FEED_CAFE_BABE, 100_000, 2000.0),
        ),
        ("clustered", gen_clustered_points(64, 1_500, 40.0)),
    ] {
        let loc = PointLocator::from_points(&points);
        let tree = rtree_from(&points);
        group.throughput(Throughput::Elements(queries.len() as u64));
        group.bench_function(BenchmarkId::new("Octree", name), |b| {
            b.iter(|| {
                let mut total = 0_usize;
                for &q in &queries {
                    if let Some(info) = loc.closest_point(Vec3::from(q)) {
                        total += info.index;
                    }
                }
                total
            })
        });
        group.bench_function(BenchmarkId::new("rstar", name), |b| {
            b.iter(|| {
                let mut total = 0_usize;
                for q in &queries {
                    if let Some(hit) = tree.nearest_neighbor(q) {
                        total += hit.data;
                    }
                }
                total
            })
        });
    }
    group.finish();
}

fn bench_within(c: &mut Criterion) {
    let points = gen_uniform_points(0x0BAD_C0DE_DEAD_BEEF, 100_000, 1000.0);
    let queries = gen_uniform_points(0x7777_1111_3333_5555, 200, 1000.0);
    let loc = PointLocator::from_points(&points);
    let tree = rtree_from(&points);
    let mut group = c.benchmark_group("within_vs_rstar");
    for &radius in &[10.0_f32, 50.0] {
        group.bench_function(BenchmarkId::new("Octree", radius), |b| {
            b.iter(|| {
                let mut total = 0_usize;
                for &q in &queries {
                    loc.visit_points_in_range(Vec3::from(q), radius, |_| total += 1);
                }
                total
            })
        });
        group.bench_function(BenchmarkId::new("rstar", radius), |b| {
            b.iter(|| {
                let mut total = 0_usize;
                for &q in &queries {
                    total += tree.locate_within_distance(q, radius * radius).count();
                }
                total
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_nearest, bench_within);
criterion_main!(benches);
