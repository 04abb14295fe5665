//! Error types for the packing engine.

use thiserror::Error;

use crate::types::Dims;

/// Result type alias for packing operations.
pub type Result<T> = std::result::Result<T, PackError>;

/// Errors that stop a packing run before or while it executes.
///
/// A box that does not fit into one particular bin is *not* an error; the
/// packer simply tries the next bin or opens a new one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackError {
    /// A box or bin dimension is zero.
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    /// The bin floor has more cells than a bin may track.
    #[error("Bin floor of {cells} cells exceeds the limit of {limit} cells")]
    BinTooLarge { cells: u64, limit: u64 },

    /// A box is larger than the bin along at least one axis.
    #[error("Box {id} with dimensions {dims:?} exceeds bin dimensions {bin:?}")]
    DimensionsExceedBin { id: usize, dims: Dims, bin: Dims },

    /// Brute force was requested for more boxes than its configured cap.
    #[error("Brute force is limited to {limit} boxes, got {boxes}")]
    SearchSpaceTooLarge { boxes: usize, limit: usize },

    /// A validated box could not be placed into a fresh, empty bin.
    #[error("Box {0} could not be placed into an empty bin")]
    NoPlacementInEmptyBin(usize),
}

impl PackError {
    /// Short machine-readable code, used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            PackError::InvalidDimension(_) => "invalid_dimension",
            PackError::BinTooLarge { .. } => "bin_too_large",
            PackError::DimensionsExceedBin { .. } => "dimensions_exceed_bin",
            PackError::SearchSpaceTooLarge { .. } => "search_space_too_large",
            PackError::NoPlacementInEmptyBin(_) => "no_placement_in_empty_bin",
        }
    }
}
