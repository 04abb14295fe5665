//! Search over box orderings to reduce the number of bins.
//!
//! The packer is order dependent: offering the same boxes in a different
//! sequence can change how many bins it opens. This module treats the
//! packer as a black box and searches permutations of the input:
//! - brute force enumerates every ordering and is only usable for a
//!   handful of boxes,
//! - simulated annealing walks the permutation space with randomized
//!   neighbourhood moves for a fixed iteration budget.
//!
//! The fitness of an ordering is the number of bins it needs. Every
//! evaluation builds fresh bins, so evaluations never share state.

use std::fmt;

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{PackError, Result};
use crate::model::{BinSize, Box3D};
use crate::packer::{PackingResult, pack, validate_boxes};
use crate::strategy::PlacementStrategy;

const PROGRESS_LOG_INTERVAL: usize = 250;

/// Configuration of the order search.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Placement strategy used for every fitness evaluation.
    pub strategy: PlacementStrategy,
    /// Iteration budget of simulated annealing.
    pub iterations: usize,
    /// Largest input brute force accepts.
    pub brute_force_limit: usize,
}

impl SearchConfig {
    pub const DEFAULT_ITERATIONS: usize = 1000;
    pub const DEFAULT_BRUTE_FORCE_LIMIT: usize = 8;

    /// Creates a builder for a custom configuration.
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::default()
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategy: PlacementStrategy::default(),
            iterations: Self::DEFAULT_ITERATIONS,
            brute_force_limit: Self::DEFAULT_BRUTE_FORCE_LIMIT,
        }
    }
}

/// Builder for [`SearchConfig`].
#[derive(Clone, Debug, Default)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    pub fn strategy(mut self, strategy: PlacementStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    pub fn iterations(mut self, iterations: usize) -> Self {
        self.config.iterations = iterations;
        self
    }

    pub fn brute_force_limit(mut self, limit: usize) -> Self {
        self.config.brute_force_limit = limit;
        self
    }

    pub fn build(self) -> SearchConfig {
        self.config
    }
}

/// How the box order is chosen before the final packing run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SearchMethod {
    /// Pack in the order given.
    FirstFit,
    /// Try every ordering.
    BruteForce,
    /// Simulated annealing over orderings.
    SimulatedAnnealing,
    /// Brute force within its limit, simulated annealing above it.
    #[default]
    Auto,
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchMethod::FirstFit => "first_fit",
            SearchMethod::BruteForce => "brute_force",
            SearchMethod::SimulatedAnnealing => "simulated_annealing",
            SearchMethod::Auto => "auto",
        };
        f.write_str(name)
    }
}

/// Result of an order search.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    /// Method that actually ran; never `Auto`.
    pub method: SearchMethod,
    /// Bins produced by packing `best_order`.
    pub result: PackingResult,
    /// Best ordering found, as indices into the input slice.
    pub best_order: Vec<usize>,
    /// Fitness of the ordering the search started from.
    pub initial_fitness: usize,
    pub best_fitness: usize,
    /// Best fitness after every annealing iteration. Empty for the other
    /// methods.
    pub history: Vec<usize>,
    /// Number of packing runs spent on fitness evaluations.
    pub evaluations: usize,
}

impl SearchOutcome {
    /// `boxes` rearranged into the best ordering found.
    pub fn ordered_boxes(&self, boxes: &[Box3D]) -> Vec<Box3D> {
        reorder(boxes, &self.best_order)
    }
}

/// Number of bins needed when packing `boxes` in `order`.
pub fn fitness(
    order: &[usize],
    boxes: &[Box3D],
    bin_size: BinSize,
    strategy: PlacementStrategy,
) -> Result<usize> {
    Ok(pack(&reorder(boxes, order), bin_size, strategy)?.bin_count())
}

fn reorder(boxes: &[Box3D], order: &[usize]) -> Vec<Box3D> {
    order.iter().map(|&i| boxes[i]).collect()
}

/// Packs in the given order without any search.
pub fn first_fit(boxes: &[Box3D], bin_size: BinSize, config: &SearchConfig) -> Result<SearchOutcome> {
    let result = pack(boxes, bin_size, config.strategy)?;
    let bins = result.bin_count();
    Ok(SearchOutcome {
        method: SearchMethod::FirstFit,
        result,
        best_order: (0..boxes.len()).collect(),
        initial_fitness: bins,
        best_fitness: bins,
        history: Vec::new(),
        evaluations: 1,
    })
}

/// Calls `visit` with every permutation of `0..n` (Heap's algorithm).
///
/// The identity permutation comes first.
fn for_each_permutation(n: usize, mut visit: impl FnMut(&[usize]) -> Result<()>) -> Result<()> {
    let mut perm: Vec<usize> = (0..n).collect();
    let mut counters = vec![0usize; n];
    visit(&perm)?;

    let mut i = 1;
    while i < n {
        if counters[i] < i {
            if i % 2 == 0 {
                perm.swap(0, i);
            } else {
                perm.swap(counters[i], i);
            }
            visit(&perm)?;
            counters[i] += 1;
            i = 1;
        } else {
            counters[i] = 0;
            i += 1;
        }
    }
    Ok(())
}

/// Evaluates every ordering of `boxes` and keeps the one needing the
/// fewest bins. The first ordering reaching the minimum wins.
///
/// Refuses inputs larger than `config.brute_force_limit`, since the cost
/// grows factorially.
pub fn brute_force(boxes: &[Box3D], bin_size: BinSize, config: &SearchConfig) -> Result<SearchOutcome> {
    if boxes.len() > config.brute_force_limit {
        return Err(PackError::SearchSpaceTooLarge {
            boxes: boxes.len(),
            limit: config.brute_force_limit,
        });
    }
    validate_boxes(boxes, &bin_size)?;

    let mut best: Option<(Vec<usize>, usize)> = None;
    let mut initial_fitness = None;
    let mut evaluations = 0;

    for_each_permutation(boxes.len(), |perm| {
        let bins = fitness(perm, boxes, bin_size, config.strategy)?;
        evaluations += 1;
        initial_fitness.get_or_insert(bins);
        if best.as_ref().is_none_or(|(_, best_bins)| bins < *best_bins) {
            best = Some((perm.to_vec(), bins));
        }
        Ok(())
    })?;

    let (best_order, best_fitness) = best.unwrap_or_default();
    debug!(
        "brute force: {} orderings of {} boxes, best {} bins",
        evaluations,
        boxes.len(),
        best_fitness
    );

    let result = pack(&reorder(boxes, &best_order), bin_size, config.strategy)?;
    Ok(SearchOutcome {
        method: SearchMethod::BruteForce,
        result,
        best_order,
        initial_fitness: initial_fitness.unwrap_or(best_fitness),
        best_fitness,
        history: Vec::new(),
        evaluations,
    })
}

/// Randomized transformations producing a neighbouring ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NeighborOperator {
    /// Exchange two positions.
    Swap,
    /// Take one element out and put it back at another position.
    Reinsert,
    /// Reverse a contiguous run of at least two elements.
    Reverse,
    /// Shuffle a contiguous run of two to four elements.
    Scramble,
    /// Rotate the whole sequence left or right by up to half its length.
    Rotate,
}

impl NeighborOperator {
    pub const ALL: [NeighborOperator; 5] = [
        NeighborOperator::Swap,
        NeighborOperator::Reinsert,
        NeighborOperator::Reverse,
        NeighborOperator::Scramble,
        NeighborOperator::Rotate,
    ];

    /// Picks one operator uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Applies the operator to a copy of `perm`.
    ///
    /// Sequences shorter than two elements are returned unchanged.
    pub fn apply<R: Rng + ?Sized>(&self, perm: &[usize], rng: &mut R) -> Vec<usize> {
        let mut next = perm.to_vec();
        let n = next.len();
        if n < 2 {
            return next;
        }

        match self {
            NeighborOperator::Swap => {
                let i = rng.gen_range(0..n);
                let j = other_index(rng, n, i);
                next.swap(i, j);
            }
            NeighborOperator::Reinsert => {
                let from = rng.gen_range(0..n);
                let to = other_index(rng, n, from);
                let element = next.remove(from);
                next.insert(to, element);
            }
            NeighborOperator::Reverse => {
                let start = rng.gen_range(0..n - 1);
                let end = rng.gen_range(start + 1..n);
                next[start..=end].reverse();
            }
            NeighborOperator::Scramble => {
                let len = rng.gen_range(2..=4).min(n);
                let start = rng.gen_range(0..=n - len);
                next[start..start + len].shuffle(rng);
            }
            NeighborOperator::Rotate => {
                let by = rng.gen_range(1..=n / 2);
                if rng.gen_bool(0.5) {
                    next.rotate_left(by);
                } else {
                    next.rotate_right(by);
                }
            }
        }
        next
    }
}

/// Uniform index in `0..n` different from `taken`. Requires `n >= 2`.
fn other_index<R: Rng + ?Sized>(rng: &mut R, n: usize, taken: usize) -> usize {
    let idx = rng.gen_range(0..n - 1);
    if idx >= taken { idx + 1 } else { idx }
}

/// Produces a neighbour of `perm` with a randomly chosen operator.
pub fn neighbor<R: Rng + ?Sized>(perm: &[usize], rng: &mut R) -> Vec<usize> {
    NeighborOperator::random(rng).apply(perm, rng)
}

/// Acceptance rule of the annealing walk at 1-based iteration `t`.
///
/// A strictly better candidate is always taken and draws nothing from
/// `rng`. Anything else is taken with probability `1 / t`.
fn accept_move<R: Rng + ?Sized>(candidate: usize, current: usize, t: usize, rng: &mut R) -> bool {
    candidate < current || rng.r#gen::<f64>() < 1.0 / t as f64
}

/// Simulated annealing over box orderings.
///
/// Starts from a uniformly shuffled ordering. Each iteration applies one
/// random neighbourhood move. A move that needs fewer bins than the current
/// ordering is always taken; any other move is taken with probability
/// `1 / t`, `t` being the 1-based iteration number. The best ordering seen
/// is tracked separately and never replaced by a worse one. The returned
/// bins are those of the best ordering.
pub fn simulated_annealing<R: Rng + ?Sized>(
    boxes: &[Box3D],
    bin_size: BinSize,
    config: &SearchConfig,
    rng: &mut R,
) -> Result<SearchOutcome> {
    validate_boxes(boxes, &bin_size)?;

    let mut current: Vec<usize> = (0..boxes.len()).collect();
    current.shuffle(rng);
    let mut current_fitness = fitness(&current, boxes, bin_size, config.strategy)?;

    let initial_fitness = current_fitness;
    let mut best = current.clone();
    let mut best_fitness = current_fitness;
    let mut history = Vec::new();

    for t in 1..=config.iterations {
        let candidate = neighbor(&current, rng);
        let candidate_fitness = fitness(&candidate, boxes, bin_size, config.strategy)?;

        if accept_move(candidate_fitness, current_fitness, t, rng) {
            if candidate_fitness < best_fitness {
                best = candidate.clone();
                best_fitness = candidate_fitness;
            }
            current = candidate;
            current_fitness = candidate_fitness;
        }

        history.push(best_fitness);
        if t % PROGRESS_LOG_INTERVAL == 0 {
            debug!(
                "annealing iteration {}: current={} best={}",
                t, current_fitness, best_fitness
            );
        }
    }

    debug!(
        "annealing finished after {} iterations: {} -> {} bins",
        config.iterations, initial_fitness, best_fitness
    );

    let result = pack(&reorder(boxes, &best), bin_size, config.strategy)?;
    Ok(SearchOutcome {
        method: SearchMethod::SimulatedAnnealing,
        result,
        best_order: best,
        initial_fitness,
        best_fitness,
        history,
        evaluations: config.iterations + 1,
    })
}

/// Runs the order search selected by `method`.
pub fn optimize<R: Rng + ?Sized>(
    boxes: &[Box3D],
    bin_size: BinSize,
    method: SearchMethod,
    config: &SearchConfig,
    rng: &mut R,
) -> Result<SearchOutcome> {
    match method {
        SearchMethod::FirstFit => first_fit(boxes, bin_size, config),
        SearchMethod::BruteForce => brute_force(boxes, bin_size, config),
        SearchMethod::SimulatedAnnealing => simulated_annealing(boxes, bin_size, config, rng),
        SearchMethod::Auto if boxes.len() <= config.brute_force_limit => {
            brute_force(boxes, bin_size, config)
        }
        SearchMethod::Auto => simulated_annealing(boxes, bin_size, config, rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::rngs::mock::StepRng;
    use rand::{RngCore, SeedableRng};

    fn bin_size(dims: (u32, u32, u32)) -> BinSize {
        BinSize::new(dims).unwrap()
    }

    /// Slabs covering the whole floor, so only their heights matter.
    /// In this order first fit needs three bins, two are enough.
    fn slabs() -> Vec<Box3D> {
        [4, 5, 6, 5]
            .iter()
            .enumerate()
            .map(|(id, &h)| Box3D::new(id, (10, 10, h)).unwrap())
            .collect()
    }

    fn is_permutation(perm: &[usize], n: usize) -> bool {
        let mut sorted = perm.to_vec();
        sorted.sort_unstable();
        sorted == (0..n).collect::<Vec<_>>()
    }

    #[test]
    fn heap_enumerates_every_permutation_once() {
        let mut seen = Vec::new();
        for_each_permutation(4, |perm| {
            seen.push(perm.to_vec());
            Ok(())
        })
        .unwrap();
        assert_eq!(seen.len(), 24);
        assert_eq!(seen[0], vec![0, 1, 2, 3]);
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 24);

        let mut count = 0;
        for_each_permutation(0, |perm| {
            assert!(perm.is_empty());
            count += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn operators_keep_a_permutation() {
        let mut rng = StdRng::seed_from_u64(11);
        for n in 0..10 {
            let perm: Vec<usize> = (0..n).collect();
            for op in NeighborOperator::ALL {
                for _ in 0..50 {
                    let next = op.apply(&perm, &mut rng);
                    assert!(is_permutation(&next, n), "{op:?} broke {perm:?} into {next:?}");
                }
            }
        }
    }

    #[test]
    fn swap_and_reinsert_always_move_something() {
        let mut rng = StdRng::seed_from_u64(3);
        let perm: Vec<usize> = (0..6).collect();
        for _ in 0..100 {
            let swapped = NeighborOperator::Swap.apply(&perm, &mut rng);
            let moved = perm.iter().zip(&swapped).filter(|(a, b)| a != b).count();
            assert_eq!(moved, 2);

            assert_ne!(NeighborOperator::Reinsert.apply(&perm, &mut rng), perm);
            assert_ne!(NeighborOperator::Reverse.apply(&perm, &mut rng), perm);
        }
    }

    #[test]
    fn rotate_stays_within_half_the_length() {
        let mut rng = StdRng::seed_from_u64(5);
        let perm: Vec<usize> = (0..8).collect();
        let rotated_by = |k: usize, left: bool| {
            let mut expected = perm.clone();
            if left {
                expected.rotate_left(k);
            } else {
                expected.rotate_right(k);
            }
            expected
        };

        let mut seen = [false; 8];
        for _ in 0..300 {
            let rotated = NeighborOperator::Rotate.apply(&perm, &mut rng);
            let matches_bound = (1..=4)
                .any(|k| rotated == rotated_by(k, true) || rotated == rotated_by(k, false));
            assert!(matches_bound, "{rotated:?} is not a rotation by 1..=4");
            seen[rotated[0]] = true;
        }
        // left by 1..=4 starts with 1..=4, right by 1..=4 starts with 4..=7
        assert!(!seen[0]);
        assert!(seen[1..].iter().all(|&s| s));
    }

    #[test]
    fn strictly_better_moves_are_always_accepted() {
        // always draws the largest sample below 1.0
        let mut rng = StepRng::new(u64::MAX, 0);
        for t in [1, 2, 10, 1000] {
            assert!(accept_move(2, 3, t, &mut rng));
        }
        // no sample is drawn for an improvement
        let mut counter = StepRng::new(0, 1);
        assert!(accept_move(1, 2, 5, &mut counter));
        assert_eq!(counter.next_u64(), 0);
    }

    #[test]
    fn equal_or_worse_moves_are_accepted_only_below_one_over_t() {
        let mut high = StepRng::new(u64::MAX, 0);
        // 1 / 1 is above every sample, so the first iteration always moves
        assert!(accept_move(3, 3, 1, &mut high));
        assert!(accept_move(4, 3, 1, &mut high));
        assert!(!accept_move(3, 3, 2, &mut high));
        assert!(!accept_move(4, 3, 50, &mut high));

        let mut low = StepRng::new(0, 0);
        assert!(accept_move(4, 3, 50, &mut low));
    }

    #[test]
    fn worse_moves_are_accepted_at_rate_one_over_t() {
        let mut rng = StdRng::seed_from_u64(31);
        let trials = 20_000;
        for t in [2usize, 4, 10] {
            let accepted = (0..trials).filter(|_| accept_move(5, 4, t, &mut rng)).count();
            let rate = accepted as f64 / trials as f64;
            let expected = 1.0 / t as f64;
            assert!((rate - expected).abs() < 0.02, "t={t}: rate {rate}, expected {expected}");
        }
    }

    #[test]
    fn short_sequences_are_returned_unchanged() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(neighbor(&[], &mut rng), Vec::<usize>::new());
        assert_eq!(neighbor(&[0], &mut rng), vec![0]);
    }

    #[test]
    fn first_fit_keeps_the_input_order() {
        let outcome = first_fit(&slabs(), bin_size((10, 10, 10)), &SearchConfig::default()).unwrap();
        assert_eq!(outcome.method, SearchMethod::FirstFit);
        assert_eq!(outcome.best_fitness, 3);
        assert_eq!(outcome.best_order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn brute_force_beats_the_given_order() {
        let boxes = slabs();
        let config = SearchConfig::default();
        let baseline = pack(&boxes, bin_size((10, 10, 10)), config.strategy).unwrap();

        let outcome = brute_force(&boxes, bin_size((10, 10, 10)), &config).unwrap();
        assert_eq!(baseline.bin_count(), 3);
        assert_eq!(outcome.best_fitness, 2);
        assert_eq!(outcome.initial_fitness, 3);
        assert_eq!(outcome.result.bin_count(), 2);
        assert_eq!(outcome.evaluations, 24);
        // third ordering in Heap's sequence: 6, 4, 5, 5
        assert_eq!(outcome.best_order, vec![2, 0, 1, 3]);
        let heights: Vec<u32> = outcome.ordered_boxes(&boxes).iter().map(|b| b.dims.2).collect();
        assert_eq!(heights, vec![6, 4, 5, 5]);
        assert!(is_permutation(&outcome.best_order, 4));
    }

    #[test]
    fn brute_force_refuses_large_inputs() {
        let boxes: Vec<_> = (0..9).map(|id| Box3D::new(id, (1, 1, 1)).unwrap()).collect();
        let err = brute_force(&boxes, bin_size((5, 5, 5)), &SearchConfig::default()).unwrap_err();
        assert_eq!(err, PackError::SearchSpaceTooLarge { boxes: 9, limit: 8 });
    }

    #[test]
    fn annealing_finds_the_better_order() {
        let boxes = slabs();
        let config = SearchConfig::builder().iterations(200).build();
        let mut rng = StdRng::seed_from_u64(42);

        let outcome = simulated_annealing(&boxes, bin_size((10, 10, 10)), &config, &mut rng).unwrap();
        assert_eq!(outcome.method, SearchMethod::SimulatedAnnealing);
        assert_eq!(outcome.best_fitness, 2);
        assert_eq!(outcome.result.bin_count(), outcome.best_fitness);
        assert!(outcome.best_fitness <= outcome.initial_fitness);
        assert_eq!(outcome.evaluations, 201);
        assert!(is_permutation(&outcome.best_order, 4));
    }

    #[test]
    fn annealing_best_fitness_never_increases() {
        let boxes: Vec<_> = [(3, 2, 2), (2, 2, 3), (4, 1, 2), (1, 3, 4), (2, 2, 2), (3, 3, 1)]
            .iter()
            .enumerate()
            .map(|(id, &dims)| Box3D::new(id, dims).unwrap())
            .collect();
        let config = SearchConfig::builder().iterations(150).build();
        let mut rng = StdRng::seed_from_u64(9);

        let outcome = simulated_annealing(&boxes, bin_size((4, 4, 4)), &config, &mut rng).unwrap();
        assert_eq!(outcome.history.len(), 150);
        assert!(outcome.history.windows(2).all(|w| w[1] <= w[0]));
        assert!(outcome.history.iter().all(|&h| h <= outcome.initial_fitness));
        assert_eq!(outcome.history.last(), Some(&outcome.best_fitness));
    }

    #[test]
    fn annealing_is_reproducible_for_a_seed() {
        let boxes = slabs();
        let config = SearchConfig::builder().iterations(50).build();

        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            simulated_annealing(&boxes, bin_size((10, 10, 10)), &config, &mut rng).unwrap()
        };
        let (a, b) = (run(17), run(17));
        assert_eq!(a.best_order, b.best_order);
        assert_eq!(a.history, b.history);
    }

    #[test]
    fn searches_never_lose_to_first_fit_on_small_inputs() {
        let bin = bin_size((4, 4, 4));
        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..5 {
            let boxes: Vec<_> = (0..6)
                .map(|id| {
                    Box3D::new(
                        id,
                        (rng.gen_range(1..=3), rng.gen_range(1..=3), rng.gen_range(1..=3)),
                    )
                    .unwrap()
                })
                .collect();
            let config = SearchConfig::builder().iterations(60).build();
            let baseline = first_fit(&boxes, bin, &config).unwrap().best_fitness;

            let exhaustive = brute_force(&boxes, bin, &config).unwrap();
            assert!(exhaustive.best_fitness <= baseline);

            let annealed = simulated_annealing(&boxes, bin, &config, &mut rng).unwrap();
            assert!(annealed.best_fitness <= annealed.initial_fitness);
            assert!(annealed.best_fitness >= exhaustive.best_fitness);
        }
    }

    #[test]
    fn auto_switches_on_the_brute_force_limit() {
        let mut rng = StdRng::seed_from_u64(0);
        let config = SearchConfig::builder().iterations(10).brute_force_limit(3).build();
        let boxes = slabs();
        let outcome = optimize(&boxes[..3], bin_size((10, 10, 10)), SearchMethod::Auto, &config, &mut rng).unwrap();
        assert_eq!(outcome.method, SearchMethod::BruteForce);

        let outcome = optimize(&boxes, bin_size((10, 10, 10)), SearchMethod::Auto, &config, &mut rng).unwrap();
        assert_eq!(outcome.method, SearchMethod::SimulatedAnnealing);
    }

    #[test]
    fn searches_propagate_configuration_errors() {
        let mut rng = StdRng::seed_from_u64(0);
        let boxes = vec![Box3D::new(0, (11, 1, 1)).unwrap()];
        for method in [SearchMethod::FirstFit, SearchMethod::BruteForce, SearchMethod::SimulatedAnnealing] {
            let err = optimize(&boxes, bin_size((10, 10, 10)), method, &SearchConfig::default(), &mut rng)
                .unwrap_err();
            assert!(matches!(err, PackError::DimensionsExceedBin { id: 0, .. }));
        }
    }

    #[test]
    fn empty_input_needs_no_bins() {
        let mut rng = StdRng::seed_from_u64(0);
        for method in [SearchMethod::FirstFit, SearchMethod::BruteForce, SearchMethod::SimulatedAnnealing] {
            let outcome = optimize(&[], bin_size((10, 10, 10)), method, &SearchConfig::default(), &mut rng)
                .unwrap();
            assert_eq!(outcome.best_fitness, 0);
            assert_eq!(outcome.result.bin_count(), 0);
        }
    }
}
