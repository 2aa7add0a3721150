// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported at the API boundary.
//!
//! Queries never fail: an empty locator or a target with nothing in range yields `None` or an
//! empty collection. Errors are only produced for malformed inputs and for running out of set
//! ids.

use core::fmt;

/// Error returned for malformed coordinate buffers or configurations, or when no set id is left.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LocatorError {
    /// A flat coordinate buffer whose length is not a multiple of 3.
    RaggedCoordinates {
        /// Length of the rejected buffer.
        len: usize,
    },
    /// Every set id is in use by a live set.
    SetIdsExhausted,
    /// An [`OctreeConfig`](crate::OctreeConfig) that failed validation.
    InvalidConfig {
        /// What was wrong with the configuration.
        reason: &'static str,
    },
}

impl fmt::Display for LocatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RaggedCoordinates { len } => write!(
                f,
                "flat coordinate buffer of length {len} is not a multiple of 3"
            ),
            Self::SetIdsExhausted => f.write_str("no set id left: u32::MAX sets are live"),
            Self::InvalidConfig { reason } => write!(f, "invalid octree configuration: {reason}"),
        }
    }
}

impl core::error::Error for LocatorError {}

/// Reinterprets a flat `[x0, y0, z0, x1, ...]` buffer as coordinate triples.
pub(crate) fn triples(coords: &[f32]) -> Result<&[[f32; 3]], LocatorError> {
    let (triples, rest) = coords.as_chunks::<3>();
    if rest.is_empty() {
        Ok(triples)
    } else {
        Err(LocatorError::RaggedCoordinates { len: coords.len() })
    }
}
