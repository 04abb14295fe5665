//! Common types and traits for integer 3D geometry.
//!
//! All coordinates live on an integer lattice: a box of width `w` placed at
//! `x` occupies the half-open interval `[x, x + w)` along the X axis.

use crate::geometry::overlap_1d;

/// Dimensions as (width, depth, height).
pub type Dims = (u32, u32, u32);

/// Position of the lower-left-front corner as (x, y, z).
pub type Position = (u32, u32, u32);

/// Trait for objects with 3D dimensions.
pub trait Dimensional {
    /// Returns the dimensions (width, depth, height).
    fn dims(&self) -> Dims;

    /// Calculates the volume.
    fn volume(&self) -> u64 {
        let (w, d, h) = self.dims();
        u64::from(w) * u64::from(d) * u64::from(h)
    }

    /// Checks if this object fits into a region of the given dimensions
    /// without rotation.
    fn fits_within(&self, outer: Dims) -> bool {
        let (w, d, h) = self.dims();
        w <= outer.0 && d <= outer.1 && h <= outer.2
    }
}

/// Axis-aligned bounding box on the integer lattice.
///
/// `min` is inclusive, `max` is exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub min: Position,
    pub max: Position,
}

impl BoundingBox {
    /// Creates a bounding box from position and dimensions.
    #[inline]
    pub fn from_position_and_dims(position: Position, dims: Dims) -> Self {
        Self {
            min: position,
            max: (position.0 + dims.0, position.1 + dims.1, position.2 + dims.2),
        }
    }

    /// Checks if two boxes share any volume.
    ///
    /// Separating axis test: the boxes are disjoint if they are separated
    /// on at least one axis. Touching faces do not count as overlap.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        !(self.max.0 <= other.min.0
            || other.max.0 <= self.min.0
            || self.max.1 <= other.min.1
            || other.max.1 <= self.min.1
            || self.max.2 <= other.min.2
            || other.max.2 <= self.min.2)
    }

    /// Checks if the X–Y projections of both boxes share any area.
    #[inline]
    pub fn projections_overlap(&self, other: &Self) -> bool {
        overlap_1d(self.min.0, self.max.0, other.min.0, other.max.0) > 0
            && overlap_1d(self.min.1, self.max.1, other.min.1, other.max.1) > 0
    }

    /// Calculates the overlap area in the X–Y plane.
    #[inline]
    pub fn overlap_area_xy(&self, other: &Self) -> u64 {
        let overlap_x = overlap_1d(self.min.0, self.max.0, other.min.0, other.max.0);
        let overlap_y = overlap_1d(self.min.1, self.max.1, other.min.1, other.max.1);
        u64::from(overlap_x) * u64::from(overlap_y)
    }
}
