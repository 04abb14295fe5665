//! Occupancy model of a single bin.
//!
//! A [`Bin`] keeps three pieces of state that are always updated together
//! when a box is committed:
//! - the ordered list of placed boxes,
//! - the top surface, i.e. the highest occupied point above every floor
//!   cell,
//! - the set of floor cells that may still start a placement.
//!
//! Placement requires full support: every floor cell under the footprint of
//! a box must have exactly the height the box rests at. Because of that a
//! candidate origin's height is fully determined by the top surface and no
//! separate list of Z layers is needed.

use std::collections::BTreeSet;

use crate::geometry::{fits_interval, intersects, overlap_area_xy};
use crate::model::{BinSize, Box3D, PlacedBox};
use crate::strategy::PlacementStrategy;
use crate::types::{Dimensional, Dims, Position};

/// Ranking key of a candidate position. Lower is better.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct PlacementScore {
    primary: i64,
    secondary: i64,
    tertiary: i64,
}

impl PlacementScore {
    fn new(primary: i64, secondary: i64, tertiary: i64) -> Self {
        Self {
            primary,
            secondary,
            tertiary,
        }
    }
}

/// A fixed-size bin and everything placed inside it.
#[derive(Clone, Debug)]
pub struct Bin {
    size: BinSize,
    placed: Vec<PlacedBox>,
    /// Row-major `width × depth` grid, indexed by `x * depth + y`.
    top_surface: Vec<u32>,
    candidate_positions: BTreeSet<(u32, u32)>,
}

impl Bin {
    /// Creates an empty bin. Every floor cell starts out as a candidate.
    pub fn new(size: BinSize) -> Self {
        let cells = size.width as usize * size.depth as usize;
        let candidate_positions = (0..size.width)
            .flat_map(|x| (0..size.depth).map(move |y| (x, y)))
            .collect();
        Self {
            size,
            placed: Vec::new(),
            top_surface: vec![0; cells],
            candidate_positions,
        }
    }

    pub fn size(&self) -> BinSize {
        self.size
    }

    /// Boxes in placement order.
    pub fn placed(&self) -> &[PlacedBox] {
        &self.placed
    }

    pub fn into_placed(self) -> Vec<PlacedBox> {
        self.placed
    }

    /// Raw access for tests that need to build invalid layouts.
    #[cfg(test)]
    pub(crate) fn placed_mut_for_tests(&mut self) -> &mut Vec<PlacedBox> {
        &mut self.placed
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Height of the top surface above floor cell `(x, y)`.
    ///
    /// Cells outside the floor report 0.
    pub fn top_at(&self, x: u32, y: u32) -> u32 {
        if x >= self.size.width || y >= self.size.depth {
            return 0;
        }
        self.top_surface[self.cell_index(x, y)]
    }

    /// Floor cells currently considered as placement origins, ascending by
    /// `(x, y)`.
    pub fn candidate_positions(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.candidate_positions.iter().copied()
    }

    /// Sum of the volumes of all placed boxes.
    pub fn used_volume(&self) -> u64 {
        self.placed.iter().map(|p| p.volume()).sum()
    }

    /// Share of the bin volume in use, in percent.
    pub fn utilization_percent(&self) -> f64 {
        let total = self.size.volume();
        if total == 0 {
            return 0.0;
        }
        self.used_volume() as f64 / total as f64 * 100.0
    }

    #[inline]
    fn cell_index(&self, x: u32, y: u32) -> usize {
        x as usize * self.size.depth as usize + y as usize
    }

    /// Checks whether `b` may be placed with its corner at `(x, y, z)`.
    ///
    /// The box must stay inside the bin, must not share volume with any
    /// placed box and every footprint cell must be exactly at height `z`.
    pub fn can_fit(&self, b: &Box3D, x: u32, y: u32, z: u32) -> bool {
        let (w, d, h) = b.dims;
        if !fits_interval(x, w, self.size.width)
            || !fits_interval(y, d, self.size.depth)
            || !fits_interval(z, h, self.size.height)
        {
            return false;
        }

        let candidate = PlacedBox::new(*b, (x, y, z));
        if self.placed.iter().any(|p| intersects(p, &candidate)) {
            return false;
        }

        (x..x + w).all(|cx| (y..y + d).all(|cy| self.top_at(cx, cy) == z))
    }

    /// Height a box with footprint `w × d` would rest at when its corner
    /// is at `(x, y)`.
    ///
    /// Returns `None` if any footprint cell is lower than the highest one,
    /// since the box would then hang over a gap.
    fn resting_height(&self, x: u32, y: u32, w: u32, d: u32) -> Option<u32> {
        let mut z = None;
        for cx in x..x + w {
            for cy in y..y + d {
                let top = self.top_at(cx, cy);
                match z {
                    None => z = Some(top),
                    Some(level) if level != top => return None,
                    Some(_) => {}
                }
            }
        }
        z
    }

    fn evaluate_origin(&self, b: &Box3D, x: u32, y: u32) -> Option<Position> {
        let (w, d, h) = b.dims;
        if !fits_interval(x, w, self.size.width) || !fits_interval(y, d, self.size.depth) {
            return None;
        }
        let z = self.resting_height(x, y, w, d)?;
        if !fits_interval(z, h, self.size.height) {
            return None;
        }
        self.can_fit(b, x, y, z).then_some((x, y, z))
    }

    /// All feasible positions for `b`, drawn from the pruned candidate set,
    /// in ascending `(x, y)` order.
    pub fn placement_candidates(&self, b: &Box3D) -> Vec<Position> {
        self.candidate_positions
            .iter()
            .filter_map(|&(x, y)| self.evaluate_origin(b, x, y))
            .collect()
    }

    /// Same as [`Bin::placement_candidates`] but scans every floor cell
    /// instead of the pruned set. Reference implementation for the pruning.
    pub fn exhaustive_candidates(&self, b: &Box3D) -> Vec<Position> {
        let (w, d, _) = b.dims;
        if w > self.size.width || d > self.size.depth {
            return Vec::new();
        }
        (0..=self.size.width - w)
            .flat_map(|x| (0..=self.size.depth - d).map(move |y| (x, y)))
            .filter_map(|(x, y)| self.evaluate_origin(b, x, y))
            .collect()
    }

    /// Picks the best of `candidates` for `b` under `strategy`.
    ///
    /// Equal scores keep candidate order; the first one wins.
    pub fn select_position(
        &self,
        b: &Box3D,
        candidates: &[Position],
        strategy: PlacementStrategy,
    ) -> Option<Position> {
        candidates
            .iter()
            .copied()
            .min_by_key(|&pos| self.score(b, pos, strategy))
    }

    fn score(&self, b: &Box3D, pos: Position, strategy: PlacementStrategy) -> PlacementScore {
        let (x, y, z) = pos;
        match strategy {
            PlacementStrategy::DeepestBottomLeft => {
                PlacementScore::new(i64::from(z), i64::from(y), i64::from(x))
            }
            PlacementStrategy::MaximumContact => {
                PlacementScore::new(-(self.contact_score(b, pos) as i64), 0, 0)
            }
            PlacementStrategy::SmallestExtrusion => PlacementScore::new(
                i64::from(z),
                i64::from(self.z_extrusion_score(b, pos)),
                0,
            ),
            PlacementStrategy::NeighbourScore => {
                PlacementScore::new(-(self.neighbour_score(b, pos) as i64), 0, 0)
            }
        }
    }

    /// Tries to place `b` using `strategy`.
    ///
    /// Returns the chosen position, or `None` when the box has no feasible
    /// position in this bin. The latter is a normal outcome; the caller
    /// moves on to another bin.
    pub fn add_box(&mut self, b: Box3D, strategy: PlacementStrategy) -> Option<Position> {
        let candidates = self.placement_candidates(&b);
        let position = self.select_position(&b, &candidates, strategy)?;
        self.commit(PlacedBox::new(b, position));
        Some(position)
    }

    fn commit(&mut self, placed: PlacedBox) {
        let (x, y, _) = placed.position;
        let (w, d, _) = placed.object.dims;
        let top = placed.top_z();

        for cx in x..x + w {
            for cy in y..y + d {
                let idx = self.cell_index(cx, cy);
                self.top_surface[idx] = top;
            }
        }

        self.update_candidates(placed.position, placed.object.dims);
        self.placed.push(placed);
    }

    /// Prunes and refreshes the candidate set after a placement.
    ///
    /// The strict interior of a footprint is dropped only once it reaches
    /// the ceiling: below that, smaller boxes can still start on top of it.
    /// The one-cell ring around the footprint is re-inserted wherever
    /// there is headroom left.
    fn update_candidates(&mut self, position: Position, dims: Dims) {
        let (x, y, z) = position;
        let (w, d, h) = dims;

        if z + h >= self.size.height {
            for cx in x + 1..x + w - 1 {
                for cy in y + 1..y + d - 1 {
                    self.candidate_positions.remove(&(cx, cy));
                }
            }
        }

        let x_end = (x + w).min(self.size.width - 1);
        let y_end = (y + d).min(self.size.depth - 1);
        for cx in x.saturating_sub(1)..=x_end {
            for cy in y.saturating_sub(1)..=y_end {
                let on_ring = cx < x || cx >= x + w || cy < y || cy >= y + d;
                if on_ring && self.top_at(cx, cy) < self.size.height {
                    self.candidate_positions.insert((cx, cy));
                }
            }
        }
    }

    /// Footprint area of `b` at `pos` that rests flush on placed boxes
    /// whose top equals the candidate height.
    pub fn contact_score(&self, b: &Box3D, pos: Position) -> u64 {
        let candidate = PlacedBox::new(*b, pos);
        self.placed
            .iter()
            .filter(|p| p.top_z() == pos.2)
            .map(|p| overlap_area_xy(p, &candidate))
            .sum()
    }

    /// Extrusion of `b` along Z at `pos`, which is its resting height.
    pub fn z_extrusion_score(&self, _b: &Box3D, pos: Position) -> u32 {
        pos.2
    }

    /// Number of placed boxes whose X–Y projection overlaps the candidate
    /// footprint and whose base is not above the candidate height.
    pub fn neighbour_score(&self, b: &Box3D, pos: Position) -> usize {
        let candidate = PlacedBox::new(*b, pos).bounding_box();
        self.placed
            .iter()
            .filter(|p| p.position.2 <= pos.2)
            .filter(|p| p.bounding_box().projections_overlap(&candidate))
            .count()
    }
}

impl Dimensional for Bin {
    fn dims(&self) -> Dims {
        self.size.dims()
    }
}
