//! Independent checks of a packing result.
//!
//! The checks replay the placements from scratch and do not trust any
//! state kept by [`Bin`]. They are used by tests and, when enabled in the
//! configuration, by the API before a response is returned.

use std::collections::HashMap;

use thiserror::Error;

use crate::bin::Bin;
use crate::geometry::{intersects, within_bounds};
use crate::model::{BinSize, Box3D};
use crate::packer::PackingResult;
use crate::types::{Dims, Position};

/// A broken packing invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("bin {bin}: box {id} at {pos:?} leaves the bin")]
    OutOfBounds { bin: usize, id: usize, pos: Position },

    #[error("bin {bin}: boxes {a} and {b} overlap")]
    Overlap { bin: usize, a: usize, b: usize },

    #[error("bin {bin}: box {id} at {pos:?} is not fully supported")]
    Unsupported { bin: usize, id: usize, pos: Position },

    #[error("bin {bin} has size {found:?}, expected {expected:?}")]
    WrongBinSize { bin: usize, found: Dims, expected: Dims },

    #[error("placed boxes do not match the input: {0}")]
    Conservation(String),
}

/// Checks containment, non-overlap and support inside one bin.
///
/// Support is verified by replaying the boxes in placement order on a
/// height map: every box must rest at exactly the height of every cell
/// below its footprint.
pub fn verify_bin(index: usize, bin: &Bin) -> Result<(), InvariantViolation> {
    let size = bin.size();
    let dims = (size.width, size.depth, size.height);
    let placed = bin.placed();

    for p in placed {
        if !within_bounds(p, dims) {
            return Err(InvariantViolation::OutOfBounds {
                bin: index,
                id: p.object.id,
                pos: p.position,
            });
        }
    }

    for (i, a) in placed.iter().enumerate() {
        if let Some(b) = placed[i + 1..].iter().find(|b| intersects(a, b)) {
            return Err(InvariantViolation::Overlap {
                bin: index,
                a: a.object.id,
                b: b.object.id,
            });
        }
    }

    let depth = size.depth as usize;
    let mut heights = vec![0u32; size.width as usize * depth];
    for p in placed {
        let (x, y, z) = p.position;
        let (w, d, h) = p.object.dims;
        let cells = (x..x + w).flat_map(|cx| (y..y + d).map(move |cy| cx as usize * depth + cy as usize));

        if cells.clone().any(|idx| heights[idx] != z) {
            return Err(InvariantViolation::Unsupported {
                bin: index,
                id: p.object.id,
                pos: p.position,
            });
        }
        cells.for_each(|idx| heights[idx] = z + h);
    }

    Ok(())
}

/// Checks every bin of `result` and that its boxes are exactly `boxes`.
pub fn verify_result(
    result: &PackingResult,
    boxes: &[Box3D],
    bin_size: BinSize,
) -> Result<(), InvariantViolation> {
    let expected = (bin_size.width, bin_size.depth, bin_size.height);
    for (index, bin) in result.bins.iter().enumerate() {
        let size = bin.size();
        let found = (size.width, size.depth, size.height);
        if found != expected {
            return Err(InvariantViolation::WrongBinSize {
                bin: index,
                found,
                expected,
            });
        }
        verify_bin(index, bin)?;
    }

    let mut counts: HashMap<(usize, Dims), i64> = HashMap::new();
    for b in boxes {
        *counts.entry((b.id, b.dims)).or_default() += 1;
    }
    for p in result.bins.iter().flat_map(|bin| bin.placed()) {
        *counts.entry((p.object.id, p.object.dims)).or_default() -= 1;
    }
    if let Some(((id, dims), diff)) = counts.into_iter().find(|(_, diff)| *diff != 0) {
        let what = if diff > 0 { "missing" } else { "unexpected" };
        return Err(InvariantViolation::Conservation(format!(
            "{what} box {id} {dims:?}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PlacedBox;
    use crate::packer::pack;
    use crate::strategy::PlacementStrategy;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn size(dims: Dims) -> BinSize {
        BinSize::new(dims).unwrap()
    }

    fn random_boxes(rng: &mut StdRng, count: usize) -> Vec<Box3D> {
        (0..count)
            .map(|id| {
                Box3D::new(
                    id,
                    (rng.gen_range(1..=4), rng.gen_range(1..=4), rng.gen_range(1..=4)),
                )
                .unwrap()
            })
            .collect()
    }

    fn bin_with(dims: Dims, placed: Vec<PlacedBox>) -> Bin {
        let mut bin = Bin::new(size(dims));
        bin.placed_mut_for_tests().extend(placed);
        bin
    }

    fn placed(id: usize, dims: Dims, pos: Position) -> PlacedBox {
        PlacedBox::new(Box3D::new(id, dims).unwrap(), pos)
    }

    #[test]
    fn packer_output_passes_for_every_strategy() {
        let mut rng = StdRng::seed_from_u64(77);
        for strategy in PlacementStrategy::ALL {
            for _ in 0..10 {
                let boxes = random_boxes(&mut rng, 25);
                let bin_size = size((6, 5, 6));
                let result = pack(&boxes, bin_size, strategy).unwrap();
                assert_eq!(verify_result(&result, &boxes, bin_size), Ok(()), "{strategy}");
            }
        }
    }

    #[test]
    fn detects_overlap() {
        let bin = bin_with(
            (10, 10, 10),
            vec![placed(1, (4, 4, 4), (0, 0, 0)), placed(2, (4, 4, 4), (2, 2, 0))],
        );
        assert_eq!(
            verify_bin(0, &bin),
            Err(InvariantViolation::Overlap { bin: 0, a: 1, b: 2 })
        );
    }

    #[test]
    fn detects_floating_box() {
        let bin = bin_with((10, 10, 10), vec![placed(1, (4, 4, 4), (0, 0, 3))]);
        assert!(matches!(
            verify_bin(0, &bin),
            Err(InvariantViolation::Unsupported { id: 1, .. })
        ));
    }

    #[test]
    fn detects_partial_support() {
        let bin = bin_with(
            (10, 10, 10),
            vec![placed(1, (2, 2, 2), (0, 0, 0)), placed(2, (4, 2, 2), (0, 0, 2))],
        );
        assert!(matches!(
            verify_bin(0, &bin),
            Err(InvariantViolation::Unsupported { id: 2, .. })
        ));
    }

    #[test]
    fn detects_box_leaving_the_bin() {
        let bin = bin_with((10, 10, 10), vec![placed(1, (4, 4, 4), (7, 0, 0))]);
        assert!(matches!(
            verify_bin(0, &bin),
            Err(InvariantViolation::OutOfBounds { id: 1, .. })
        ));
    }

    #[test]
    fn detects_missing_boxes() {
        let bin_size = size((10, 10, 10));
        let boxes = vec![Box3D::new(1, (2, 2, 2)).unwrap(), Box3D::new(2, (2, 2, 2)).unwrap()];
        let result = pack(&boxes[..1], bin_size, PlacementStrategy::DeepestBottomLeft).unwrap();
        assert_eq!(
            verify_result(&result, &boxes, bin_size),
            Err(InvariantViolation::Conservation("missing box 2 (2, 2, 2)".to_string()))
        );
    }
}
