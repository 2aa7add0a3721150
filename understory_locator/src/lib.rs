// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Locator: an octree point locator over removable point sets.
//!
//! Callers hand in raw coordinate buffers, one point set at a time, and get back a [`SetId`].
//! Queries span every live set and answer with [`LocatorInfo`] records naming the set, the
//! point's index within it and its position:
//!
//! - [`Locator::closest_point`]: the nearest point, anywhere.
//! - [`Locator::closest_point_limited`]: the nearest point within a radius.
//! - [`Locator::closest_points`] / [`Locator::closest_points_limited`]: the `k` nearest points.
//! - [`Locator::points_in_range`]: every point within a radius, deduplicated and ordered.
//! - [`Locator::remove_point_set`]: drop a whole set; its id is reused by the next insertion.
//!
//! ## Example
//!
//! ```rust
//! use understory_locator::{PointLocator, Vec3};
//!
//! let mut loc = PointLocator::new();
//! let left = loc.add_point_set(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
//! let right = loc.add_point_set_flat(&[5.0, 0.0, 0.0, 6.0, 0.0, 0.0]).unwrap();
//!
//! let hit = loc.closest_point(Vec3::new(4.0, 0.0, 0.0)).unwrap();
//! assert_eq!((hit.set, hit.index), (right, 0));
//!
//! let near: Vec<_> = loc
//!     .points_in_range(Vec3::ZERO, 1.0)
//!     .into_iter()
//!     .map(|info| (info.set, info.index))
//!     .collect();
//! assert_eq!(near, [(left, 0), (left, 1)]);
//!
//! loc.remove_point_set(right);
//! assert_eq!(loc.closest_point(Vec3::new(4.0, 0.0, 0.0)).unwrap().set, left);
//! ```
//!
//! ## Backends
//!
//! [`Locator`] keeps the set-id bookkeeping and delegates storage to a [`Backend`]:
//!
//! - [`Octree`] (default, [`PointLocator`]): leaves split once they exceed
//!   [`OctreeConfig::split_threshold`] points, unless the points are (nearly) coincident.
//!   Nearest queries are best-first branch-and-bound searches over node boxes. The root box grows
//!   to fit points added outside it without moving stored points.
//! - [`LinearScan`]: a flat vector scanned on every query. Useful for tiny sets and as a
//!   brute-force reference.
//!
//! ## Semantics
//!
//! - Distance limits are inclusive. A negative or NaN limit matches nothing.
//! - An id is issued for every [`Locator::add_point_set`] call, even with no points.
//! - Removing a set that is not live is a no-op, so removals are idempotent.
//! - Points with a non-finite coordinate are skipped at insertion.
//! - Removal never restructures the octree; empty leaves stay in place.
//!
//! ## Tracing
//!
//! Structural events (splits, refused splits, root growth, skipped points, removals) can be
//! observed through a [`LocatorTrace`] sink passed to the `*_with_trace` operations. See
//! [`TraceCounts`] and, with the `log` feature, `LogTrace`.
//!
//! ## Threading
//!
//! The locator does no internal locking. Queries take `&self` and may run concurrently;
//! insertion and removal take `&mut self`.
//!
//! ## Features
//!
//! - `std` (default): enables [`Vec3::length`] and [`Vec3::distance`].
//! - `libm`: provides the same helpers in `no_std` builds.
//! - `log`: enables `LogTrace`, which forwards events to the `log` facade.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod backend;
mod backends;
mod config;
mod error;
mod locator;
mod octree;
mod queue;
mod trace;
mod types;

pub use backend::Backend;
pub use backends::LinearScan;
pub use config::{DEFAULT_MIN_SPLIT_SEPARATION, DEFAULT_SPLIT_THRESHOLD, OctreeConfig};
pub use error::LocatorError;
pub use locator::{Locator, PointLocator};
pub use octree::{Octree, OctreeStats};
#[cfg(feature = "log")]
pub use trace::LogTrace;
pub use trace::{LocatorTrace, TraceCounts};
pub use types::{Aabb3D, LocatorInfo, Neighbor, SetId, Vec3};
