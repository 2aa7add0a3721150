// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tuning knobs for the octree backend.

use crate::error::LocatorError;

/// Default number of points a leaf holds before it is considered for splitting.
pub const DEFAULT_SPLIT_THRESHOLD: usize = 16;

/// Default minimum spread, as a fraction of the leaf diagonal, required to split a leaf.
pub const DEFAULT_MIN_SPLIT_SEPARATION: f32 = 0.01;

/// Configuration for [`Octree`](crate::Octree).
///
/// Neither value affects query results, only the shape of the tree.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OctreeConfig {
    /// A leaf is split once it holds more than this many points.
    pub split_threshold: usize,
    /// A leaf is only split if some point lies farther than this fraction of the leaf diagonal
    /// from the first point of the leaf.
    ///
    /// Leaves whose points are (nearly) coincident stay unsplit and keep growing; splitting them
    /// would recurse without ever separating the points.
    pub min_split_separation: f32,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            split_threshold: DEFAULT_SPLIT_THRESHOLD,
            min_split_separation: DEFAULT_MIN_SPLIT_SEPARATION,
        }
    }
}

impl OctreeConfig {
    /// Returns a copy with the given split threshold.
    #[must_use]
    pub const fn with_split_threshold(mut self, split_threshold: usize) -> Self {
        self.split_threshold = split_threshold;
        self
    }

    /// Returns a copy with the given minimum split separation.
    #[must_use]
    pub const fn with_min_split_separation(mut self, min_split_separation: f32) -> Self {
        self.min_split_separation = min_split_separation;
        self
    }

    /// Checks the configuration, returning it unchanged if it is usable.
    pub fn validate(self) -> Result<Self, LocatorError> {
        if self.split_threshold == 0 {
            return Err(LocatorError::InvalidConfig {
                reason: "split_threshold must be at least 1",
            });
        }
        if !(self.min_split_separation > 0.0 && self.min_split_separation <= 1.0) {
            return Err(LocatorError::InvalidConfig {
                reason: "min_split_separation must be in (0, 1]",
            });
        }
        Ok(self)
    }

    /// Squared separation threshold for a leaf with the given squared diagonal.
    pub(crate) fn separation_squared(&self, diagonal_squared: f32) -> f32 {
        self.min_split_separation * self.min_split_separation * diagonal_squared
    }
}
