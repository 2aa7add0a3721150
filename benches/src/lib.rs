// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared point generators for the Understory benchmarks.

/// Deterministic xorshift generator, so every run benchmarks the same data.
#[derive(Clone, Debug)]
pub struct Rng(u64);

impl Rng {
    /// Create a generator from a non-zero seed.
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Next raw value.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Uniform value in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        let v = self.next_u64() >> 40;
        (v as f32) / ((1u64 << 24) as f32)
    }
}

/// `count` points uniformly distributed in the cube `[0, size)^3`.
pub fn gen_uniform_points(seed: u64, count: usize, size: f32) -> Vec<[f32; 3]> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| {
            [
                rng.next_f32() * size,
                rng.next_f32() * size,
                rng.next_f32() * size,
            ]
        })
        .collect()
}

/// `n_clusters * per_cluster` points in tight clusters scattered over `[0, 2000)^3`.
///
/// Closer to surface meshes than uniform noise: dense patches with empty space between them.
pub fn gen_clustered_points(n_clusters: usize, per_cluster: usize, spread: f32) -> Vec<[f32; 3]> {
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    let centers: Vec<[f32; 3]> = (0..n_clusters)
        .map(|_| {
            [
                rng.next_f32() * 2000.0,
                rng.next_f32() * 2000.0,
                rng.next_f32() * 2000.0,
            ]
        })
        .collect();
    for [cx, cy, cz] in centers {
        for _ in 0..per_cluster {
            out.push([
                cx + (rng.next_f32() - 0.5) * spread,
                cy + (rng.next_f32() - 0.5) * spread,
                cz + (rng.next_f32() - 0.5) * spread,
            ]);
        }
    }
    out
}

/// A regular `n * n` grid in the `z = 0` plane, like a flat surface patch.
pub fn gen_flat_grid(n: usize, cell: f32) -> Vec<[f32; 3]> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            out.push([x as f32 * cell, y as f32 * cell, 0.0]);
        }
    }
    out
}
