// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The locator: set-id bookkeeping in front of a spatial backend.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::backend::Backend;
use crate::backends::LinearScan;
use crate::config::OctreeConfig;
use crate::error::{LocatorError, triples};
use crate::octree::Octree;
use crate::trace::LocatorTrace;
use crate::types::{Aabb3D, LocatorInfo, Neighbor, SetId, Vec3};

/// Point locator over removable point sets.
///
/// Every query spans all live sets at once. Ids of removed sets are handed out again, most
/// recently released first.
///
/// ```
/// use understory_locator::{PointLocator, SetId, Vec3};
///
/// let mut loc = PointLocator::from_points(&[
///     [0.0, 0.0, 0.0],
///     [10.0, 0.0, 0.0],
///     [0.0, 10.0, 0.0],
///     [0.0, 0.0, 10.0],
/// ]);
/// let target = Vec3::new(1.0, 0.0, 0.0);
/// assert_eq!(loc.closest_point(target).map(|i| i.index), Some(0));
///
/// let extra = loc.add_point_set(&[[1.0, 1.0, 1.0]]);
/// assert_eq!(loc.closest_point(target).map(|i| i.set), Some(SetId::FIRST));
///
/// loc.remove_point_set(SetId::FIRST);
/// assert_eq!(loc.closest_point(target).map(|i| i.set), Some(extra));
/// ```
#[derive(Clone, Debug)]
pub struct Locator<B: Backend = Octree> {
    backend: B,
    next_set: u32,
    free_sets: Vec<SetId>,
    /// Stored point count of every live set.
    live: HashMap<SetId, usize>,
    len: usize,
}

/// A [`Locator`] on the [`Octree`] backend.
pub type PointLocator = Locator<Octree>;

impl<B: Backend + Default> Default for Locator<B> {
    fn default() -> Self {
        Self::with_backend(B::default())
    }
}

impl<B: Backend + Default> Locator<B> {
    /// Create an empty locator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a locator holding one point set, [`SetId::FIRST`], with indices `0..points.len()`.
    ///
    /// The id is issued even when `points` is empty.
    pub fn from_points(points: &[[f32; 3]]) -> Self {
        let mut loc = Self::new();
        loc.add_point_set(points);
        loc
    }

    /// Like [`from_points`](Self::from_points), from a flat `[x0, y0, z0, x1, ...]` buffer.
    pub fn from_flat(coords: &[f32]) -> Result<Self, LocatorError> {
        Ok(Self::from_points(triples(coords)?))
    }
}

impl Locator<Octree> {
    /// Create an empty locator whose octree root covers the box spanned by `min` and `max`.
    ///
    /// The box still grows if points outside it are added.
    pub fn with_bounds(min: Vec3, max: Vec3) -> Self {
        Self::with_backend(Octree::with_bounds(min, max))
    }

    /// Create an empty locator with a custom octree configuration.
    pub fn with_config(config: OctreeConfig) -> Result<Self, LocatorError> {
        Ok(Self::with_backend(Octree::with_config(config)?))
    }
}

impl Locator<LinearScan> {
    /// Create an empty locator that answers queries by scanning every point.
    pub fn linear() -> Self {
        Self::with_backend(LinearScan::new())
    }
}

impl<B: Backend> Locator<B> {
    /// Create an empty locator on top of `backend`.
    ///
    /// The backend is expected to be empty.
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            next_set: 0,
            free_sets: Vec::new(),
            live: HashMap::new(),
            len: 0,
        }
    }

    /// Access the backend, e.g. for [`Octree::stats`].
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Number of stored points across all sets.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no points are stored.
    ///
    /// Live but empty point sets do not count.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of live point sets.
    pub fn set_count(&self) -> usize {
        self.live.len()
    }

    /// Returns `true` if `set` is live.
    pub fn contains_set(&self, set: SetId) -> bool {
        self.live.contains_key(&set)
    }

    /// Number of points stored for `set`, or `None` if it is not live.
    ///
    /// Skipped non-finite points are not counted.
    pub fn set_len(&self, set: SetId) -> Option<usize> {
        self.live.get(&set).copied()
    }

    /// Live set ids, in ascending order.
    pub fn sets(&self) -> Vec<SetId> {
        let mut sets: Vec<SetId> = self.live.keys().copied().collect();
        sets.sort_unstable();
        sets
    }

    /// Box enclosing all stored points, if any were ever stored.
    ///
    /// For the octree this is the root box, which may be larger than the points and does not
    /// shrink on removal.
    pub fn bounds(&self) -> Option<Aabb3D> {
        self.backend.bounds()
    }

    /// Add a point set and return its id. Point `i` gets index `i`.
    ///
    /// An id is issued even when `points` is empty. Points with a non-finite coordinate are
    /// skipped; their indices are simply never returned by queries.
    ///
    /// # Panics
    ///
    /// Panics if `u32::MAX` sets are already live, so no id is left to issue. Use
    /// [`try_add_point_set`](Self::try_add_point_set) to handle that case.
    pub fn add_point_set(&mut self, points: &[[f32; 3]]) -> SetId {
        self.add_point_set_with_trace(points, &mut ())
    }

    /// Like [`add_point_set`](Self::add_point_set), but returns
    /// [`LocatorError::SetIdsExhausted`] instead of panicking when no id is left.
    pub fn try_add_point_set(&mut self, points: &[[f32; 3]]) -> Result<SetId, LocatorError> {
        self.try_add_point_set_with_trace(points, &mut ())
    }

    /// Like [`add_point_set`](Self::add_point_set), from a flat `[x0, y0, z0, x1, ...]` buffer.
    ///
    /// No id is issued if the buffer is rejected or no id is left.
    pub fn add_point_set_flat(&mut self, coords: &[f32]) -> Result<SetId, LocatorError> {
        self.try_add_point_set(triples(coords)?)
    }

    /// Like [`add_point_set`](Self::add_point_set), reporting structural events to `trace`.
    ///
    /// # Panics
    ///
    /// Panics if no id is left, as [`add_point_set`](Self::add_point_set) does.
    pub fn add_point_set_with_trace<Tr: LocatorTrace>(
        &mut self,
        points: &[[f32; 3]],
        trace: &mut Tr,
    ) -> SetId {
        match self.try_add_point_set_with_trace(points, trace) {
            Ok(set) => set,
            Err(err) => panic!("{err}"),
        }
    }

    /// Like [`try_add_point_set`](Self::try_add_point_set), reporting structural events to
    /// `trace`. Nothing is stored when no id is left.
    pub fn try_add_point_set_with_trace<Tr: LocatorTrace>(
        &mut self,
        points: &[[f32; 3]],
        trace: &mut Tr,
    ) -> Result<SetId, LocatorError> {
        let set = self.allocate_set_id()?;
        let stored = self.backend.insert_set(set, points, trace);
        self.live.insert(set, stored);
        self.len += stored;
        Ok(set)
    }

    /// Remove a point set and release its id for reuse.
    ///
    /// Returns `false`, doing nothing, if `set` is not live; removing a set twice is harmless.
    pub fn remove_point_set(&mut self, set: SetId) -> bool {
        self.remove_point_set_with_trace(set, &mut ())
    }

    /// Like [`remove_point_set`](Self::remove_point_set), reporting the removal to `trace`.
    pub fn remove_point_set_with_trace<Tr: LocatorTrace>(
        &mut self,
        set: SetId,
        trace: &mut Tr,
    ) -> bool {
        let Some(stored) = self.live.remove(&set) else {
            return false;
        };
        let removed = if stored > 0 {
            self.backend.remove_set(set)
        } else {
            0
        };
        debug_assert_eq!(removed, stored, "backend and locator disagree on set size");
        self.len -= stored;
        self.free_sets.push(set);
        trace.set_removed(set, removed);
        true
    }

    /// Remove every point and forget every id. The next id issued is [`SetId::FIRST`].
    pub fn clear(&mut self) {
        self.backend.clear();
        self.next_set = 0;
        self.free_sets.clear();
        self.live.clear();
        self.len = 0;
    }

    /// The point closest to `target`, across all sets.
    pub fn closest_point(&self, target: Vec3) -> Option<LocatorInfo> {
        self.backend.nearest(target, f32::INFINITY)
    }

    /// The point closest to `target` that is at most `max_distance` away.
    ///
    /// Returns `None` for a negative or NaN `max_distance`.
    pub fn closest_point_limited(&self, target: Vec3, max_distance: f32) -> Option<LocatorInfo> {
        let limit = limit_squared(max_distance)?;
        self.backend.nearest(target, limit)
    }

    /// Up to `k` points closest to `target`, nearest first.
    pub fn closest_points(&self, target: Vec3, k: usize) -> Vec<Neighbor> {
        self.backend.nearest_k(target, k, f32::INFINITY)
    }

    /// Up to `k` points closest to `target` that are at most `max_distance` away, nearest first.
    pub fn closest_points_limited(
        &self,
        target: Vec3,
        k: usize,
        max_distance: f32,
    ) -> Vec<Neighbor> {
        match limit_squared(max_distance) {
            Some(limit) => self.backend.nearest_k(target, k, limit),
            None => Vec::new(),
        }
    }

    /// Every point at most `max_distance` away from `target`.
    pub fn points_in_range(&self, target: Vec3, max_distance: f32) -> BTreeSet<LocatorInfo> {
        let mut out = BTreeSet::new();
        self.visit_points_in_range(target, max_distance, |info| {
            out.insert(info);
        });
        out
    }

    /// Visit every point at most `max_distance` away from `target`, in no particular order.
    pub fn visit_points_in_range<F: FnMut(LocatorInfo)>(
        &self,
        target: Vec3,
        max_distance: f32,
        f: F,
    ) {
        if let Some(limit) = limit_squared(max_distance) {
            self.backend.visit_within(target, limit, f);
        }
    }

    /// Pop the most recently released id, or mint a new one.
    ///
    /// Ids are only minted while the free list is empty, so minted ids are all live and the
    /// counter runs out only with `u32::MAX` live sets. `u32::MAX` itself is never issued.
    fn allocate_set_id(&mut self) -> Result<SetId, LocatorError> {
        if let Some(set) = self.free_sets.pop() {
            return Ok(set);
        }
        let set = SetId(self.next_set);
        self.next_set = self
            .next_set
            .checked_add(1)
            .ok_or(LocatorError::SetIdsExhausted)?;
        Ok(set)
    }
}

/// Squared query radius, or `None` if no point can qualify.
fn limit_squared(max_distance: f32) -> Option<f32> {
    (max_distance >= 0.0).then(|| max_distance * max_distance)
}
