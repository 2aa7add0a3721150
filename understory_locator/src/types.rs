// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types: coordinates, boxes, set identifiers and query results.

use core::cmp::Ordering;

/// A 3D coordinate.
///
/// Inputs are assumed to be finite; non-finite coordinates are skipped on insertion.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec3 {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
    /// Z coordinate.
    pub z: f32,
}

impl Vec3 {
    /// The origin.
    pub const ZERO: Self = Self::splat(0.0);

    /// Create a vector from its components.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Create a vector with all components set to `v`.
    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v, z: v }
    }

    /// Component-wise minimum.
    #[inline]
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
        )
    }

    /// Component-wise maximum.
    #[inline]
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
        )
    }

    /// Squared Euclidean length.
    #[inline]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Squared Euclidean distance to `other`.
    #[inline]
    pub fn distance_squared(self, other: Self) -> f32 {
        (self - other).length_squared()
    }

    /// Euclidean length.
    #[cfg(any(feature = "std", feature = "libm"))]
    #[inline]
    pub fn length(self) -> f32 {
        sqrt(self.length_squared())
    }

    /// Euclidean distance to `other`.
    #[cfg(any(feature = "std", feature = "libm"))]
    #[inline]
    pub fn distance(self, other: Self) -> f32 {
        sqrt(self.distance_squared(other))
    }

    /// Returns `true` if every component is finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Largest absolute component.
    #[inline]
    pub(crate) fn max_abs(self) -> f32 {
        self.x.abs().max(self.y.abs()).max(self.z.abs())
    }

    /// Largest component.
    #[inline]
    pub(crate) fn max_element(self) -> f32 {
        self.x.max(self.y).max(self.z)
    }

    /// Returns the components as an array.
    #[inline]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    fn total_cmp(&self, other: &Self) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
            .then_with(|| self.z.total_cmp(&other.z))
    }
}

#[cfg(feature = "std")]
#[inline]
fn sqrt(v: f32) -> f32 {
    v.sqrt()
}

#[cfg(all(not(feature = "std"), feature = "libm"))]
#[inline]
fn sqrt(v: f32) -> f32 {
    libm::sqrtf(v)
}

impl From<[f32; 3]> for Vec3 {
    #[inline]
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Vec3> for [f32; 3] {
    #[inline]
    fn from(v: Vec3) -> Self {
        v.to_array()
    }
}

impl core::ops::Add for Vec3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl core::ops::Sub for Vec3 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl core::ops::Mul<f32> for Vec3 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl core::ops::Div<f32> for Vec3 {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

/// Axis-aligned bounding box in 3D.
///
/// Boxes are closed: points on the boundary are contained.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3D {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb3D {
    /// Create a box from two corners. The corners are normalized component-wise.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Smallest box containing every finite point, or `None` if there is none.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut iter = points.into_iter().filter(|p| p.is_finite());
        let first = iter.next()?;
        Some(iter.fold(Self::new(first, first), |b, p| b.union_point(p)))
    }

    /// Returns `true` if `p` lies inside or on the boundary.
    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Returns `true` if `other` lies entirely within `self`.
    #[inline]
    pub fn contains_box(&self, other: &Self) -> bool {
        self.contains(other.min) && self.contains(other.max)
    }

    /// Center of the box.
    ///
    /// Halves before adding, so boxes reaching `f32::MIN`/`f32::MAX` still have a finite center.
    #[inline]
    pub fn center(&self) -> Vec3 {
        self.min * 0.5 + self.max * 0.5
    }

    /// Half of the side lengths. Finite for every finite box, unlike [`extent`](Self::extent).
    #[inline]
    pub fn half_extent(&self) -> Vec3 {
        self.max * 0.5 - self.min * 0.5
    }

    /// Side lengths of the box.
    #[inline]
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Squared length of the diagonal.
    #[inline]
    pub fn diagonal_squared(&self) -> f32 {
        self.extent().length_squared()
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[must_use]
    fn union_point(&self, p: Vec3) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    /// Squared distance from `p` to the closest point of the box.
    ///
    /// This is `0` when `p` is inside, and a lower bound for the squared distance from `p` to
    /// anything stored within the box.
    #[inline]
    pub fn distance_squared_to(&self, p: Vec3) -> f32 {
        let d = (self.min - p).max(p - self.max).max(Vec3::ZERO);
        d.length_squared()
    }

    /// Returns a copy with every axis widened to a strictly positive extent.
    ///
    /// Flat or single-point boxes cannot be halved or doubled, so axes narrower than
    /// `max(1% of the widest axis, 1e-3 * (1 + magnitude))` are widened symmetrically about their
    /// center. The floor scales with the coordinate magnitude so the padding survives `f32`
    /// rounding far from the origin. Padded corners are clamped to the finite `f32` range.
    #[must_use]
    pub fn padded(&self) -> Self {
        let half = self.half_extent();
        let magnitude = self.min.max_abs().max(self.max.max_abs());
        let half_floor = (half.max_element() * 0.01).max(0.5e-3 * (1.0 + magnitude));
        let pad = |lo: f32, hi: f32| {
            if hi * 0.5 - lo * 0.5 >= half_floor {
                (lo, hi)
            } else {
                let mid = lo * 0.5 + hi * 0.5;
                (
                    (mid - half_floor).max(f32::MIN),
                    (mid + half_floor).min(f32::MAX),
                )
            }
        };
        let (min_x, max_x) = pad(self.min.x, self.max.x);
        let (min_y, max_y) = pad(self.min.y, self.max.y);
        let (min_z, max_z) = pad(self.min.z, self.max.z);
        Self {
            min: Vec3::new(min_x, min_y, min_z),
            max: Vec3::new(max_x, max_y, max_z),
        }
    }
}

/// Identifier of a point set stored in a [`Locator`](crate::Locator).
///
/// Ids are issued by [`Locator::add_point_set`](crate::Locator::add_point_set) and released by
/// [`Locator::remove_point_set`](crate::Locator::remove_point_set). Released ids are reused in
/// LIFO order, so an id only identifies a set while that set is live.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SetId(pub(crate) u32);

impl SetId {
    /// The id of the point set passed to [`Locator::from_points`](crate::Locator::from_points).
    pub const FIRST: Self = Self(0);

    /// Raw value of the id.
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// A point returned by a query.
#[derive(Copy, Clone, Debug)]
pub struct LocatorInfo {
    /// The point set the point belongs to.
    pub set: SetId,
    /// Position of the point within its point set.
    pub index: usize,
    /// Coordinates of the point.
    pub position: Vec3,
}

impl PartialEq for LocatorInfo {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LocatorInfo {}

impl PartialOrd for LocatorInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Orders by index, then set, then position (using `f32::total_cmp`).
impl Ord for LocatorInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index
            .cmp(&other.index)
            .then_with(|| self.set.cmp(&other.set))
            .then_with(|| self.position.total_cmp(&other.position))
    }
}

/// A stored point: immutable once inserted, dropped only when its set is removed.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Point {
    pub(crate) position: Vec3,
    pub(crate) index: usize,
    pub(crate) set: SetId,
}

impl Point {
    #[inline]
    pub(crate) fn info(&self) -> LocatorInfo {
        LocatorInfo {
            set: self.set,
            index: self.index,
            position: self.position,
        }
    }
}

/// A point returned by a k-nearest query, with its squared distance to the target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Neighbor {
    /// The point.
    pub info: LocatorInfo,
    /// Squared distance from the query target.
    pub distance_squared: f32,
}
