// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat vector backend with linear scans. Small and simple; good for tiny sets and as a
//! brute-force reference.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::queue::BoundedMaxQueue;
use crate::trace::LocatorTrace;
use crate::types::{Aabb3D, LocatorInfo, Neighbor, Point, SetId, Vec3};

/// Flat vector backend with linear scans.
#[derive(Clone, Default)]
pub struct LinearScan {
    points: Vec<Point>,
}

impl LinearScan {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if no points are stored.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl Debug for LinearScan {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LinearScan")
            .field("points", &self.points.len())
            .finish_non_exhaustive()
    }
}

impl Backend for LinearScan {
    fn insert_set<Tr: LocatorTrace>(
        &mut self,
        set: SetId,
        points: &[[f32; 3]],
        trace: &mut Tr,
    ) -> usize {
        let before = self.points.len();
        for (index, &p) in points.iter().enumerate() {
            let position = Vec3::from(p);
            if position.is_finite() {
                self.points.push(Point {
                    position,
                    index,
                    set,
                });
            } else {
                trace.point_skipped(set, index);
            }
        }
        self.points.len() - before
    }

    fn remove_set(&mut self, set: SetId) -> usize {
        let before = self.points.len();
        self.points.retain(|p| p.set != set);
        before - self.points.len()
    }

    fn clear(&mut self) {
        self.points.clear();
    }

    fn nearest(&self, target: Vec3, max_distance_squared: f32) -> Option<LocatorInfo> {
        let mut best: Option<(f32, &Point)> = None;
        for p in &self.points {
            let d = p.position.distance_squared(target);
            let better = match best {
                Some((best_d, _)) => d < best_d,
                None => d <= max_distance_squared,
            };
            if better {
                best = Some((d, p));
            }
        }
        best.map(|(_, p)| p.info())
    }

    fn nearest_k(&self, target: Vec3, k: usize, max_distance_squared: f32) -> Vec<Neighbor> {
        let mut kept = BoundedMaxQueue::new(k);
        for p in &self.points {
            let d = p.position.distance_squared(target);
            if d <= max_distance_squared {
                kept.push(d, p.info());
            }
        }
        kept.into_sorted_vec()
            .into_iter()
            .map(|(distance_squared, info)| Neighbor {
                info,
                distance_squared,
            })
            .collect()
    }

    fn visit_within<F: FnMut(LocatorInfo)>(
        &self,
        target: Vec3,
        max_distance_squared: f32,
        mut f: F,
    ) {
        for p in &self.points {
            if p.position.distance_squared(target) <= max_distance_squared {
                f(p.info());
            }
        }
    }

    fn bounds(&self) -> Option<Aabb3D> {
        Aabb3D::from_points(self.points.iter().map(|p| p.position))
    }
}
