// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Alternative backends.
//!
//! The default backend, [`Octree`](crate::Octree), lives in its own module.

mod linear;

pub use linear::LinearScan;
