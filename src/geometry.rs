//! Geometric helpers for collision and contact tests between placed boxes.
//!
//! Everything here works on half-open integer intervals, so two boxes that
//! only share a face neither intersect nor overlap in projection.

use crate::model::PlacedBox;
use crate::types::Dims;

/// Checks whether two placed boxes share any volume.
///
/// Uses the separating axis test on the three intervals.
///
/// # Example
/// ```
/// use binstack::geometry::intersects;
/// use binstack::model::{Box3D, PlacedBox};
///
/// let a = PlacedBox::new(Box3D::new(1, (5, 5, 5)).unwrap(), (0, 0, 0));
/// let b = PlacedBox::new(Box3D::new(2, (5, 5, 5)).unwrap(), (5, 0, 0));
/// assert!(!intersects(&a, &b));
/// ```
pub fn intersects(a: &PlacedBox, b: &PlacedBox) -> bool {
    a.bounding_box().intersects(&b.bounding_box())
}

/// Length of the overlap of the half-open intervals `[a1, a2)` and
/// `[b1, b2)`, zero when they are disjoint.
///
/// # Example
/// ```
/// use binstack::geometry::overlap_1d;
///
/// assert_eq!(overlap_1d(0, 5, 3, 8), 2);
/// ```
#[inline]
pub fn overlap_1d(a1: u32, a2: u32, b1: u32, b2: u32) -> u32 {
    a2.min(b2).saturating_sub(a1.max(b1))
}

/// Checks that `[start, start + len)` lies within `[0, limit)`.
///
/// Never overflows, whatever the inputs.
///
/// # Example
/// ```
/// use binstack::geometry::fits_interval;
///
/// assert!(fits_interval(5, 5, 10));
/// assert!(!fits_interval(u32::MAX, 5, 10));
/// ```
#[inline]
pub fn fits_interval(start: u32, len: u32, limit: u32) -> bool {
    len <= limit && start <= limit - len
}

/// Overlap area of the X–Y footprints of two placed boxes.
pub fn overlap_area_xy(a: &PlacedBox, b: &PlacedBox) -> u64 {
    a.bounding_box().overlap_area_xy(&b.bounding_box())
}

/// Checks that a placed box lies entirely inside a bin of the given size.
pub fn within_bounds(placed: &PlacedBox, bin: Dims) -> bool {
    let (x, y, z) = placed.position;
    let (w, d, h) = placed.object.dims;
    fits_interval(x, w, bin.0) && fits_interval(y, d, bin.1) && fits_interval(z, h, bin.2)
}
