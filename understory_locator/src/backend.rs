// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend trait for point storage and queries.

use alloc::vec::Vec;

use crate::trace::LocatorTrace;
use crate::types::{Aabb3D, LocatorInfo, Neighbor, SetId, Vec3};

/// Spatial backend abstraction used by [`Locator`](crate::Locator).
///
/// Backends store points tagged with their set and position, and answer distance queries across
/// all stored sets. Set-id bookkeeping lives in the locator; a backend only ever sees ids that
/// are live.
///
/// All distance limits are squared and inclusive. `f32::INFINITY` means "no limit".
pub trait Backend {
    /// Insert the points of `set`; point `i` gets index `i`.
    ///
    /// Points with a non-finite coordinate are skipped and reported to `trace`.
    /// Returns the number of points stored.
    fn insert_set<Tr: LocatorTrace>(
        &mut self,
        set: SetId,
        points: &[[f32; 3]],
        trace: &mut Tr,
    ) -> usize;

    /// Remove every point of `set`. Returns the number of points removed.
    fn remove_set(&mut self, set: SetId) -> usize;

    /// Remove all points.
    fn clear(&mut self);

    /// The point closest to `target` within `max_distance_squared`, if any.
    ///
    /// On ties any of the equally close points may be returned.
    fn nearest(&self, target: Vec3, max_distance_squared: f32) -> Option<LocatorInfo>;

    /// Up to `k` points closest to `target` within `max_distance_squared`, nearest first.
    fn nearest_k(&self, target: Vec3, k: usize, max_distance_squared: f32) -> Vec<Neighbor>;

    /// Visit every point within `max_distance_squared` of `target`, in no particular order.
    fn visit_within<F: FnMut(LocatorInfo)>(&self, target: Vec3, max_distance_squared: f32, f: F);

    /// Box enclosing every stored point, if the backend tracks one.
    fn bounds(&self) -> Option<Aabb3D>;
}
