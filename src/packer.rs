//! First-fit packing of an ordered box sequence into identical bins.
//!
//! Boxes are offered in the given order to every opened bin, oldest first.
//! The first bin that accepts the box keeps it; if none does, a new bin is
//! opened. The result therefore depends on the order of the input, which is
//! what the order search in [`crate::optimizer`] exploits.

use log::debug;
use serde::Serialize;

use crate::bin::Bin;
use crate::error::{PackError, Result};
use crate::model::{BinSize, Box3D};
use crate::strategy::PlacementStrategy;
use crate::types::{Dims, Position};

/// Result of a packing run.
#[derive(Clone, Debug)]
pub struct PackingResult {
    pub bins: Vec<Bin>,
}

impl PackingResult {
    /// Number of bins used.
    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    /// Number of boxes placed across all bins.
    pub fn placed_count(&self) -> usize {
        self.bins.iter().map(|b| b.placed().len()).sum()
    }

    /// Average volume utilization of all bins in percent.
    pub fn average_utilization(&self) -> f64 {
        if self.bins.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.bins.iter().map(|b| b.utilization_percent()).sum();
        sum / self.bins.len() as f64
    }
}

/// Events emitted while packing, for live consumers.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum PackEvent {
    /// A new bin was opened.
    BinOpened { id: usize, dims: Dims },
    /// A box was placed.
    BoxPlaced {
        bin_id: usize,
        id: usize,
        pos: Position,
        dims: Dims,
    },
    /// Packing finished.
    Finished { bins: usize, boxes: usize },
}

/// Checks that every box fits into an empty bin of `bin_size`.
///
/// A box that is larger than the bin on some axis would never find a
/// place, so it is reported as a configuration error up front.
pub fn validate_boxes(boxes: &[Box3D], bin_size: &BinSize) -> Result<()> {
    boxes.iter().try_for_each(|b| bin_size.check_box(b))
}

/// Packs `boxes` in the given order with `strategy`.
///
/// # Example
/// ```
/// use binstack::model::{BinSize, Box3D};
/// use binstack::packer::pack;
/// use binstack::strategy::PlacementStrategy;
///
/// let bin = BinSize::new((10, 10, 10)).unwrap();
/// let boxes = vec![Box3D::new(1, (10, 10, 6)).unwrap(), Box3D::new(2, (10, 10, 5)).unwrap()];
/// let result = pack(&boxes, bin, PlacementStrategy::DeepestBottomLeft).unwrap();
/// assert_eq!(result.bin_count(), 2);
/// ```
pub fn pack(
    boxes: &[Box3D],
    bin_size: BinSize,
    strategy: PlacementStrategy,
) -> Result<PackingResult> {
    pack_with_progress(boxes, bin_size, strategy, |_| {})
}

/// Like [`pack`], reporting every step to `on_event`.
pub fn pack_with_progress(
    boxes: &[Box3D],
    bin_size: BinSize,
    strategy: PlacementStrategy,
    mut on_event: impl FnMut(&PackEvent),
) -> Result<PackingResult> {
    validate_boxes(boxes, &bin_size)?;

    let mut bins: Vec<Bin> = Vec::new();
    for &b in boxes {
        let existing = bins
            .iter_mut()
            .enumerate()
            .find_map(|(idx, bin)| bin.add_box(b, strategy).map(|pos| (idx, pos)));

        let (idx, pos) = match existing {
            Some(hit) => hit,
            None => {
                let mut fresh = Bin::new(bin_size);
                let pos = fresh
                    .add_box(b, strategy)
                    .ok_or(PackError::NoPlacementInEmptyBin(b.id))?;
                bins.push(fresh);
                on_event(&PackEvent::BinOpened {
                    id: bins.len(),
                    dims: (bin_size.width, bin_size.depth, bin_size.height),
                });
                (bins.len() - 1, pos)
            }
        };

        on_event(&PackEvent::BoxPlaced {
            bin_id: idx + 1,
            id: b.id,
            pos,
            dims: b.dims,
        });
    }

    debug!(
        "packed {} boxes into {} bins ({})",
        boxes.len(),
        bins.len(),
        strategy
    );
    on_event(&PackEvent::Finished {
        bins: bins.len(),
        boxes: boxes.len(),
    });
    Ok(PackingResult { bins })
}
