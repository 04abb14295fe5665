//! Data models for the bin packing engine.
//!
//! This module defines the plain records the engine consumes and produces:
//! - `Box3D`: a box to be packed, identified by id, with fixed dimensions
//! - `PlacedBox`: a box together with its final position inside a bin
//! - `BinSize`: the validated dimensions shared by every bin of a run
//!
//! The occupancy model of a single bin lives in [`crate::bin`].

use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToSchema;

use crate::error::PackError;
use crate::types::{BoundingBox, Dimensional, Dims, Position};

/// Helper function to validate a single dimension.
fn validate_dimension(value: u32, name: &str) -> Result<(), PackError> {
    if value == 0 {
        return Err(PackError::InvalidDimension(format!(
            "{} must be positive, got: {}",
            name, value
        )));
    }
    Ok(())
}

fn validate_dims(dims: Dims, prefix: &str) -> Result<(), PackError> {
    validate_dimension(dims.0, &format!("{prefix}width"))?;
    validate_dimension(dims.1, &format!("{prefix}depth"))?;
    validate_dimension(dims.2, &format!("{prefix}height"))?;
    Ok(())
}

/// A box to be packed.
///
/// # Fields
/// * `id` - Identification number, carried through to the placement
/// * `dims` - Dimensions (width, depth, height) in lattice units
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Box3D {
    pub id: usize,
    #[schema(value_type = [u32; 3], example = json!([3, 4, 2]))]
    pub dims: Dims,
}

impl Box3D {
    /// Creates a new box after validating its dimensions.
    ///
    /// # Examples
    /// ```
    /// use binstack::model::Box3D;
    ///
    /// assert!(Box3D::new(1, (10, 20, 30)).is_ok());
    /// assert!(Box3D::new(1, (0, 20, 30)).is_err());
    /// ```
    pub fn new(id: usize, dims: Dims) -> Result<Self, PackError> {
        validate_dims(dims, "Box ")?;
        Ok(Self { id, dims })
    }
}

impl Dimensional for Box3D {
    fn dims(&self) -> Dims {
        self.dims
    }
}

/// A box with its position in a bin.
///
/// The position is the lower-left-front corner; it is fixed once the box
/// has been committed to a bin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacedBox {
    pub object: Box3D,
    pub position: Position,
}

impl PlacedBox {
    pub fn new(object: Box3D, position: Position) -> Self {
        Self { object, position }
    }

    /// Returns the top Z coordinate of the placed box.
    pub fn top_z(&self) -> u32 {
        self.position.2 + self.object.dims.2
    }

    /// Calculates the bounding box of the placed box.
    #[inline]
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_position_and_dims(self.position, self.object.dims)
    }
}

impl Dimensional for PlacedBox {
    fn dims(&self) -> Dims {
        self.object.dims
    }
}

/// Validated dimensions of the bins used in a packing run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinSize {
    pub width: u32,
    pub depth: u32,
    pub height: u32,
}

impl BinSize {
    /// Largest floor (`width × depth`) a bin may have. Every floor cell is
    /// tracked individually, so memory grows with this product.
    pub const MAX_FLOOR_CELLS: u64 = 1_000_000;

    /// Creates a bin size after validating that every dimension is positive
    /// and the floor stays within [`BinSize::MAX_FLOOR_CELLS`].
    pub fn new(dims: Dims) -> Result<Self, PackError> {
        validate_dims(dims, "Bin ")?;
        let cells = u64::from(dims.0) * u64::from(dims.1);
        if cells > Self::MAX_FLOOR_CELLS {
            return Err(PackError::BinTooLarge {
                cells,
                limit: Self::MAX_FLOOR_CELLS,
            });
        }
        Ok(Self {
            width: dims.0,
            depth: dims.1,
            height: dims.2,
        })
    }

    /// Checks that a box fits into an empty bin of this size.
    ///
    /// Returns the configuration error the packer reports otherwise.
    pub fn check_box(&self, object: &Box3D) -> Result<(), PackError> {
        if object.fits_within(self.dims()) {
            Ok(())
        } else {
            Err(PackError::DimensionsExceedBin {
                id: object.id,
                dims: object.dims,
                bin: self.dims(),
            })
        }
    }
}

impl Dimensional for BinSize {
    fn dims(&self) -> Dims {
        (self.width, self.depth, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_rejects_zero_dimensions() {
        assert!(Box3D::new(1, (1, 1, 1)).is_ok());
        for dims in [(0, 1, 1), (1, 0, 1), (1, 1, 0)] {
            let err = Box3D::new(1, dims).unwrap_err();
            assert!(matches!(err, PackError::InvalidDimension(_)));
        }
    }

    #[test]
    fn bin_size_rejects_zero_dimensions() {
        assert!(BinSize::new((10, 10, 10)).is_ok());
        assert!(BinSize::new((10, 0, 10)).is_err());
    }

    #[test]
    fn bin_size_rejects_oversized_floor() {
        assert!(BinSize::new((1000, 1000, u32::MAX)).is_ok());

        let err = BinSize::new((1_000_000, 1_000_000, 1)).unwrap_err();
        assert_eq!(
            err,
            PackError::BinTooLarge {
                cells: 1_000_000_000_000,
                limit: BinSize::MAX_FLOOR_CELLS,
            }
        );
        assert!(matches!(
            BinSize::new((u32::MAX, u32::MAX, 1)),
            Err(PackError::BinTooLarge { .. })
        ));
    }

    #[test]
    fn check_box_reports_oversized_axis() {
        let bin = BinSize::new((10, 10, 10)).unwrap();
        assert!(bin.check_box(&Box3D::new(1, (10, 10, 10)).unwrap()).is_ok());

        let err = bin
            .check_box(&Box3D::new(2, (10, 10, 11)).unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            PackError::DimensionsExceedBin {
                id: 2,
                dims: (10, 10, 11),
                bin: (10, 10, 10),
            }
        );
    }

    #[test]
    fn placed_box_reports_top() {
        let placed = PlacedBox::new(Box3D::new(1, (2, 3, 4)).unwrap(), (1, 1, 5));
        assert_eq!(placed.top_z(), 9);
        assert_eq!(placed.volume(), 24);
        assert_eq!(placed.bounding_box().max, (3, 4, 9));
    }
}
