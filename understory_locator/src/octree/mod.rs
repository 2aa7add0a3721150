// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Octree backend: adaptive subdivision with best-first nearest search.
//!
//! Nodes live in an arena and refer to their children by index. A node is either a leaf holding
//! a bucket of points or a branch with exactly eight children. Leaves split once they hold more
//! than [`OctreeConfig::split_threshold`] points that are not (nearly) coincident; nothing is
//! ever merged back, so removing points leaves empty leaves in place.
//!
//! The root box grows on demand: a point outside it wraps the old root as one octant of a box
//! twice its size, repeatedly, until the point fits. Stored points never move during growth.

mod node;

use alloc::vec::Vec;
use core::fmt::Debug;

use smallvec::SmallVec;

use crate::backend::Backend;
use crate::config::OctreeConfig;
use crate::error::LocatorError;
use crate::queue::{BoundedMaxQueue, MinQueue};
use crate::trace::LocatorTrace;
use crate::types::{Aabb3D, LocatorInfo, Neighbor, Point, SetId, Vec3};

use node::{Node, NodeIdx, NodeKind, can_split, octant_bounds, octant_of, separated};

/// Shape statistics of an [`Octree`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct OctreeStats {
    /// Total number of nodes, branches included.
    pub nodes: usize,
    /// Number of leaves, empty ones included.
    pub leaves: usize,
    /// Number of stored points.
    pub points: usize,
    /// Depth of the deepest leaf; the root is at depth 0.
    pub max_depth: usize,
    /// Number of points in the fullest leaf.
    pub largest_leaf: usize,
}

/// Octree point storage.
#[derive(Clone)]
pub struct Octree {
    config: OctreeConfig,
    nodes: Vec<Node>,
    root: Option<NodeIdx>,
    len: usize,
}

impl Default for Octree {
    fn default() -> Self {
        Self {
            config: OctreeConfig::default(),
            nodes: Vec::new(),
            root: None,
            len: 0,
        }
    }
}

impl Debug for Octree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Octree")
            .field("config", &self.config)
            .field("nodes", &self.nodes.len())
            .field("points", &self.len)
            .field("bounds", &self.bounds())
            .finish_non_exhaustive()
    }
}

impl Octree {
    /// Create an empty octree with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty octree with a custom configuration.
    pub fn with_config(config: OctreeConfig) -> Result<Self, LocatorError> {
        Ok(Self {
            config: config.validate()?,
            ..Self::default()
        })
    }

    /// Create an empty octree whose root covers the box spanned by `min` and `max`.
    ///
    /// Flat axes are padded (see [`Aabb3D::padded`]). Non-finite corners are ignored and the
    /// root is then created by the first insertion instead.
    pub fn with_bounds(min: Vec3, max: Vec3) -> Self {
        let mut tree = Self::default();
        if min.is_finite() && max.is_finite() {
            let root = tree.push_node(Node::leaf(Aabb3D::new(min, max).padded()));
            tree.root = Some(root);
        }
        tree
    }

    /// The active configuration.
    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    /// Number of stored points.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no points are stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Compute shape statistics by walking the tree.
    pub fn stats(&self) -> OctreeStats {
        let mut stats = OctreeStats {
            nodes: self.nodes.len(),
            points: self.len,
            ..OctreeStats::default()
        };
        let Some(root) = self.root else {
            return stats;
        };
        let mut stack: SmallVec<[(NodeIdx, usize); 64]> = SmallVec::new();
        stack.push((root, 0));
        while let Some((idx, depth)) = stack.pop() {
            match &self.nodes[idx].kind {
                NodeKind::Leaf { bucket, .. } => {
                    stats.leaves += 1;
                    stats.max_depth = stats.max_depth.max(depth);
                    stats.largest_leaf = stats.largest_leaf.max(bucket.len());
                }
                NodeKind::Branch { children, .. } => {
                    stack.extend(children.iter().map(|&c| (c, depth + 1)));
                }
            }
        }
        stats
    }

    fn push_node(&mut self, node: Node) -> NodeIdx {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Grow the root until it contains `target`. Requires a root.
    fn grow_to_contain<Tr: LocatorTrace>(&mut self, target: &Aabb3D, trace: &mut Tr) {
        while let Some(root) = self.root {
            let old = self.nodes[root].bounds;
            if old.contains_box(target) {
                return;
            }
            // Double every axis, toward the target where it sticks out below and upward
            // otherwise, so the old root is exactly one octant of the new box. Growth stops at
            // the finite `f32` range; the target is finite, so it still ends up contained.
            let extent = old.extent();
            let grow = |lo: f32, hi: f32, ext: f32, below: bool| {
                if below {
                    ((lo - ext).max(f32::MIN), hi, lo, true)
                } else {
                    (lo, (hi + ext).min(f32::MAX), hi, false)
                }
            };
            let (min_x, max_x, split_x, hi_x) =
                grow(old.min.x, old.max.x, extent.x, target.min.x < old.min.x);
            let (min_y, max_y, split_y, hi_y) =
                grow(old.min.y, old.max.y, extent.y, target.min.y < old.min.y);
            let (min_z, max_z, split_z, hi_z) =
                grow(old.min.z, old.max.z, extent.z, target.min.z < old.min.z);
            let bounds = Aabb3D {
                min: Vec3::new(min_x, min_y, min_z),
                max: Vec3::new(max_x, max_y, max_z),
            };
            let split = Vec3::new(split_x, split_y, split_z);
            let old_code =
                usize::from(hi_x) | (usize::from(hi_y) << 1) | (usize::from(hi_z) << 2);
            let children: [NodeIdx; 8] = core::array::from_fn(|code| {
                if code == old_code {
                    root
                } else {
                    self.push_node(Node::leaf(octant_bounds(&bounds, split, code)))
                }
            });
            let new_root = self.push_node(Node {
                bounds,
                kind: NodeKind::Branch { split, children },
            });
            self.root = Some(new_root);
            trace.root_grown(&old, &bounds);
        }
    }

    /// Insert one finite point below `root`, splitting the receiving leaf if needed.
    ///
    /// A leaf that already refused to split is only reconsidered once a point arrives that is
    /// separated from its first point, so piling up coincident points costs O(1) each.
    fn insert_point<Tr: LocatorTrace>(&mut self, root: NodeIdx, point: Point, trace: &mut Tr) {
        let mut idx = root;
        while let NodeKind::Branch { split, children } = &self.nodes[idx].kind {
            idx = children[octant_of(*split, point.position)];
        }
        self.len += 1;
        let node = &mut self.nodes[idx];
        if let NodeKind::Leaf { bucket, refused } = &mut node.kind {
            if *refused {
                let still_refused = bucket.first().is_some_and(|first| {
                    !separated(&self.config, &node.bounds, first.position, point.position)
                });
                bucket.push(point);
                if still_refused {
                    return;
                }
                *refused = false;
            } else {
                bucket.push(point);
            }
        }
        self.split_overfull(idx, trace);
    }

    /// Split `leaf` if it is over the threshold, then re-check the new children, since all of
    /// its points may land in one octant.
    fn split_overfull<Tr: LocatorTrace>(&mut self, leaf: NodeIdx, trace: &mut Tr) {
        let mut pending: SmallVec<[NodeIdx; 16]> = SmallVec::new();
        pending.push(leaf);
        while let Some(idx) = pending.pop() {
            let node = &self.nodes[idx];
            let NodeKind::Leaf { bucket, .. } = &node.kind else {
                continue;
            };
            if bucket.len() <= self.config.split_threshold {
                continue;
            }
            let bounds = node.bounds;
            let count = bucket.len();
            if !can_split(&self.config, &bounds, bucket) {
                if let NodeKind::Leaf { refused, .. } = &mut self.nodes[idx].kind {
                    *refused = true;
                }
                trace.split_refused(&bounds, count);
                continue;
            }

            let split = bounds.center();
            let children: [NodeIdx; 8] = core::array::from_fn(|code| {
                self.push_node(Node::leaf(octant_bounds(&bounds, split, code)))
            });
            let old = core::mem::replace(
                &mut self.nodes[idx].kind,
                NodeKind::Branch { split, children },
            );
            if let NodeKind::Leaf { bucket: points, .. } = old {
                for p in points {
                    let child = children[octant_of(split, p.position)];
                    if let NodeKind::Leaf { bucket, .. } = &mut self.nodes[child].kind {
                        bucket.push(p);
                    }
                }
            }
            trace.leaf_split(&bounds, count);
            pending.extend(children);
        }
    }
}

/// Whether something at squared distance `d` can still improve on the current best.
#[inline]
fn admits(best: Option<f32>, limit: f32, d: f32) -> bool {
    match best {
        Some(best) => d < best,
        None => d <= limit,
    }
}

impl Backend for Octree {
    fn insert_set<Tr: LocatorTrace>(
        &mut self,
        set: SetId,
        points: &[[f32; 3]],
        trace: &mut Tr,
    ) -> usize {
        let Some(set_bounds) = Aabb3D::from_points(points.iter().map(|&p| Vec3::from(p))) else {
            for index in 0..points.len() {
                trace.point_skipped(set, index);
            }
            return 0;
        };
        let root = match self.root {
            Some(root) => {
                self.grow_to_contain(&set_bounds, trace);
                self.root.unwrap_or(root)
            }
            None => {
                let root = self.push_node(Node::leaf(set_bounds.padded()));
                self.root = Some(root);
                root
            }
        };

        let mut stored = 0;
        for (index, &p) in points.iter().enumerate() {
            let position = Vec3::from(p);
            if !position.is_finite() {
                trace.point_skipped(set, index);
                continue;
            }
            self.insert_point(
                root,
                Point {
                    position,
                    index,
                    set,
                },
                trace,
            );
            stored += 1;
        }
        stored
    }

    fn remove_set(&mut self, set: SetId) -> usize {
        let mut removed = 0;
        for node in &mut self.nodes {
            if let NodeKind::Leaf { bucket, refused } = &mut node.kind {
                let before = bucket.len();
                bucket.retain(|p| p.set != set);
                if bucket.len() != before {
                    // The first point may be gone; re-check on the next insertion.
                    *refused = false;
                    removed += before - bucket.len();
                }
            }
        }
        self.len -= removed;
        removed
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    fn nearest(&self, target: Vec3, max_distance_squared: f32) -> Option<LocatorInfo> {
        let root = self.root?;
        let root_bound = self.nodes[root].bounds.distance_squared_to(target);
        if !admits(None, max_distance_squared, root_bound) {
            return None;
        }

        let mut queue = MinQueue::new();
        queue.push(root_bound, root);
        let mut best: Option<(f32, &Point)> = None;
        while let Some((bound, idx)) = queue.pop() {
            // Everything still queued is at least `bound` away.
            if !admits(best.map(|b| b.0), max_distance_squared, bound) {
                break;
            }
            match &self.nodes[idx].kind {
                NodeKind::Leaf { bucket, .. } => {
                    for p in bucket {
                        let d = p.position.distance_squared(target);
                        if admits(best.map(|b| b.0), max_distance_squared, d) {
                            best = Some((d, p));
                        }
                    }
                }
                NodeKind::Branch { children, .. } => {
                    for &child in children {
                        let child_bound = self.nodes[child].bounds.distance_squared_to(target);
                        if admits(best.map(|b| b.0), max_distance_squared, child_bound) {
                            queue.push(child_bound, child);
                        }
                    }
                }
            }
        }
        best.map(|(_, p)| p.info())
    }

    fn nearest_k(&self, target: Vec3, k: usize, max_distance_squared: f32) -> Vec<Neighbor> {
        let Some(root) = self.root else {
            return Vec::new();
        };
        let root_bound = self.nodes[root].bounds.distance_squared_to(target);
        if k == 0 || !admits(None, max_distance_squared, root_bound) {
            return Vec::new();
        }

        let mut kept = BoundedMaxQueue::new(k);
        let mut queue = MinQueue::new();
        queue.push(root_bound, root);
        while let Some((bound, idx)) = queue.pop() {
            if !admits(kept.worst_key(), max_distance_squared, bound) {
                break;
            }
            match &self.nodes[idx].kind {
                NodeKind::Leaf { bucket, .. } => {
                    for p in bucket {
                        let d = p.position.distance_squared(target);
                        if admits(kept.worst_key(), max_distance_squared, d) {
                            kept.push(d, p.info());
                        }
                    }
                }
                NodeKind::Branch { children, .. } => {
                    for &child in children {
                        let child_bound = self.nodes[child].bounds.distance_squared_to(target);
                        if admits(kept.worst_key(), max_distance_squared, child_bound) {
                            queue.push(child_bound, child);
                        }
                    }
                }
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
        let Some(root) = self.root else {
            return;
        };
        let mut stack: SmallVec<[NodeIdx; 64]> = SmallVec::new();
        stack.push(root);
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if !(node.bounds.distance_squared_to(target) <= max_distance_squared) {
                continue;
            }
            match &node.kind {
                NodeKind::Leaf { bucket, .. } => {
                    for p in bucket {
                        if p.position.distance_squared(target) <= max_distance_squared {
                            f(p.info());
                        }
                    }
                }
                NodeKind::Branch { children, .. } => stack.extend_from_slice(children),
            }
        }
    }

    fn bounds(&self) -> Option<Aabb3D> {
        self.root.map(|root| self.nodes[root].bounds)
    }
}
