// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Octree arena nodes and octant addressing.

use smallvec::SmallVec;

use crate::config::OctreeConfig;
use crate::types::{Aabb3D, Point, Vec3};

/// Index of a node in the arena.
pub(crate) type NodeIdx = usize;

/// Points stored directly in a leaf.
pub(crate) type Bucket = SmallVec<[Point; 8]>;

#[derive(Clone, Debug)]
pub(crate) enum NodeKind {
    /// `refused` is set once the leaf declined to split. Until it is cleared, every point in the
    /// bucket lies within the split separation of the first one.
    Leaf { bucket: Bucket, refused: bool },
    /// Eight children indexed by octant code. `split` is the shared corner of the octants; it is
    /// the box center for regular splits but sits on the old root's corner after growth.
    Branch {
        split: Vec3,
        children: [NodeIdx; 8],
    },
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) bounds: Aabb3D,
    pub(crate) kind: NodeKind,
}

impl Node {
    pub(crate) fn leaf(bounds: Aabb3D) -> Self {
        Self {
            bounds,
            kind: NodeKind::Leaf {
                bucket: Bucket::new(),
                refused: false,
            },
        }
    }
}

/// 3-bit octant code: bit 0 = upper x half, bit 1 = upper y half, bit 2 = upper z half.
///
/// Coordinates equal to the split go to the upper half.
#[inline]
pub(crate) fn octant_of(split: Vec3, p: Vec3) -> usize {
    usize::from(p.x >= split.x)
        | (usize::from(p.y >= split.y) << 1)
        | (usize::from(p.z >= split.z) << 2)
}

/// Box of octant `code` of `bounds` split at `split`.
pub(crate) fn octant_bounds(bounds: &Aabb3D, split: Vec3, code: usize) -> Aabb3D {
    let half = |bit: usize, lo: f32, mid: f32, hi: f32| {
        if code & bit != 0 {
            (mid, hi)
        } else {
            (lo, mid)
        }
    };
    let (min_x, max_x) = half(1, bounds.min.x, split.x, bounds.max.x);
    let (min_y, max_y) = half(2, bounds.min.y, split.y, bounds.max.y);
    let (min_z, max_z) = half(4, bounds.min.z, split.z, bounds.max.z);
    Aabb3D {
        min: Vec3::new(min_x, min_y, min_z),
        max: Vec3::new(max_x, max_y, max_z),
    }
}

/// Whether a leaf over the threshold may be split.
///
/// Refuses when every point sits within `min_split_separation` of the diagonal from the first
/// one, or when the center cannot separate the box on some axis in `f32`.
pub(crate) fn can_split(config: &OctreeConfig, bounds: &Aabb3D, bucket: &[Point]) -> bool {
    let center = bounds.center();
    let halvable = center.x > bounds.min.x
        && center.x < bounds.max.x
        && center.y > bounds.min.y
        && center.y < bounds.max.y
        && center.z > bounds.min.z
        && center.z < bounds.max.z;
    if !halvable {
        return false;
    }
    let Some((first, rest)) = bucket.split_first() else {
        return false;
    };
    rest.iter()
        .any(|p| separated(config, bounds, first.position, p.position))
}

/// Whether `p` lies farther than the split separation of `bounds` from `first`.
///
/// Compares half-coordinates scaled by the widest half side, so boxes spanning most of the `f32`
/// range do not overflow.
pub(crate) fn separated(config: &OctreeConfig, bounds: &Aabb3D, first: Vec3, p: Vec3) -> bool {
    let half = bounds.half_extent();
    let scale = half.max_element();
    let offset = (p * 0.5 - first * 0.5) / scale;
    let diagonal = half / scale;
    offset.length_squared() > config.separation_squared(diagonal.length_squared())
}
