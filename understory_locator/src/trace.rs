// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observability hooks for structural changes.
//!
//! The locator never logs on its own. Operations that reshape the tree have `*_with_trace`
//! variants taking a [`LocatorTrace`] sink, which is told about leaf splits, refused splits, root
//! growth, skipped points and removed sets. `()` is the no-op sink used by the plain variants.
//!
//! [`TraceCounts`] tallies events, which is handy in tests and for tuning
//! [`OctreeConfig`](crate::OctreeConfig). With the `log` feature, [`LogTrace`] forwards events to
//! the [`log`](https://docs.rs/log) facade.

use crate::types::{Aabb3D, SetId};

/// A callback sink for structural events.
///
/// Every method has an empty default so sinks only implement what they need.
pub trait LocatorTrace {
    /// A leaf holding `points` points inside `bounds` was split into eight octants.
    fn leaf_split(&mut self, bounds: &Aabb3D, points: usize) {
        let _ = (bounds, points);
    }

    /// A leaf over the split threshold was left unsplit because its points are (nearly)
    /// coincident or its box cannot be halved in `f32`.
    fn split_refused(&mut self, bounds: &Aabb3D, points: usize) {
        let _ = (bounds, points);
    }

    /// The root box grew from `old` to `new` to make room for incoming points.
    fn root_grown(&mut self, old: &Aabb3D, new: &Aabb3D) {
        let _ = (old, new);
    }

    /// Point `index` of `set` was skipped because a coordinate is not finite.
    fn point_skipped(&mut self, set: SetId, index: usize) {
        let _ = (set, index);
    }

    /// `set` was removed together with `points` stored points.
    fn set_removed(&mut self, set: SetId, points: usize) {
        let _ = (set, points);
    }
}

impl LocatorTrace for () {}

impl<T: LocatorTrace + ?Sized> LocatorTrace for &mut T {
    fn leaf_split(&mut self, bounds: &Aabb3D, points: usize) {
        (**self).leaf_split(bounds, points);
    }

    fn split_refused(&mut self, bounds: &Aabb3D, points: usize) {
        (**self).split_refused(bounds, points);
    }

    fn root_grown(&mut self, old: &Aabb3D, new: &Aabb3D) {
        (**self).root_grown(old, new);
    }

    fn point_skipped(&mut self, set: SetId, index: usize) {
        (**self).point_skipped(set, index);
    }

    fn set_removed(&mut self, set: SetId, points: usize) {
        (**self).set_removed(set, points);
    }
}

/// Counts events by kind.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TraceCounts {
    /// Number of leaf splits.
    pub splits: usize,
    /// Number of refused splits.
    ///
    /// A degenerate leaf refuses once; it is only reconsidered after a point arrives that could
    /// let it split, or after a removal takes points out of it.
    pub refused_splits: usize,
    /// Number of root growth steps.
    pub root_growths: usize,
    /// Number of skipped non-finite points.
    pub skipped_points: usize,
    /// Number of removed sets.
    pub removed_sets: usize,
}

impl TraceCounts {
    /// Creates a zeroed counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocatorTrace for TraceCounts {
    fn leaf_split(&mut self, _bounds: &Aabb3D, _points: usize) {
        self.splits += 1;
    }

    fn split_refused(&mut self, _bounds: &Aabb3D, _points: usize) {
        self.refused_splits += 1;
    }

    fn root_grown(&mut self, _old: &Aabb3D, _new: &Aabb3D) {
        self.root_growths += 1;
    }

    fn point_skipped(&mut self, _set: SetId, _index: usize) {
        self.skipped_points += 1;
    }

    fn set_removed(&mut self, _set: SetId, _points: usize) {
        self.removed_sets += 1;
    }
}

/// Forwards events to the `log` facade under the `understory_locator` target.
///
/// Splits and refusals are logged at `trace`, growth and removals at `debug`, skipped points at
/// `warn`.
#[cfg(feature = "log")]
#[derive(Copy, Clone, Debug, Default)]
pub struct LogTrace;

#[cfg(feature = "log")]
impl LocatorTrace for LogTrace {
    fn leaf_split(&mut self, bounds: &Aabb3D, points: usize) {
        log::trace!(target: "understory_locator", "split leaf of {points} points at {bounds:?}");
    }

    fn split_refused(&mut self, bounds: &Aabb3D, points: usize) {
        log::trace!(
            target: "understory_locator",
            "refused split of degenerate leaf of {points} points at {bounds:?}"
        );
    }

    fn root_grown(&mut self, old: &Aabb3D, new: &Aabb3D) {
        log::debug!(target: "understory_locator", "root grown from {old:?} to {new:?}");
    }

    fn point_skipped(&mut self, set: SetId, index: usize) {
        log::warn!(
            target: "understory_locator",
            "skipped non-finite point {index} of set {}",
            set.get()
        );
    }

    fn set_removed(&mut self, set: SetId, points: usize) {
        log::debug!(
            target: "understory_locator",
            "removed set {} ({points} points)",
            set.get()
        );
    }
}
