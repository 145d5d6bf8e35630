//! Packing candidates: a rectangle order plus a placement policy.

use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::moves::{self, Move, MoveSet};
use super::types::VnsSolution;
use crate::packing::{place, Layout, Placement, PlacementPolicy, Rectangle};
use crate::random::{create_rng, mix_seed};

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 4563;

/// Settings shared by a candidate and every neighbour derived from it.
///
/// # Examples
///
/// ```
/// use u_strippack::vns::{MoveSet, SearchSpace};
///
/// let space = SearchSpace::new(40).with_moves(MoveSet::Combined).with_seed(7);
/// assert_eq!(space.strip_width, 40);
/// assert_eq!(space.seed, 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchSpace {
    /// Strip width every candidate is placed on.
    pub strip_width: u32,
    /// Move families available to the neighbourhoods.
    pub moves: MoveSet,
    /// Seed for the per-position generators of enumerated neighbourhoods.
    pub seed: u64,
    /// Whether neighbourhood enumeration may use the rayon pool.
    ///
    /// Only effective with the `parallel` feature.
    pub parallel: bool,
}

impl SearchSpace {
    /// Order moves, default seed, parallel evaluation on.
    pub fn new(strip_width: u32) -> Self {
        Self {
            strip_width,
            moves: MoveSet::default(),
            seed: DEFAULT_SEED,
            parallel: true,
        }
    }

    /// Sets the move families.
    pub fn with_moves(mut self, moves: MoveSet) -> Self {
        self.moves = moves;
        self
    }

    /// Sets the neighbourhood seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enables or disables parallel neighbourhood evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// An evaluated packing: order and policy, with the layout they produce.
///
/// The skyline placer runs exactly once, in [`Candidate::new`]; the cost
/// and placements are cached and the candidate is immutable from then on.
#[derive(Debug, Clone)]
pub struct Candidate {
    space: SearchSpace,
    order: Vec<Rectangle>,
    policy: PlacementPolicy,
    layout: Layout,
}

impl Candidate {
    /// Places `order` under `policy` and caches the result.
    pub fn new(order: Vec<Rectangle>, policy: PlacementPolicy, space: SearchSpace) -> Self {
        let layout = place(&order, space.strip_width, &policy);
        Self {
            space,
            order,
            policy,
            layout,
        }
    }

    /// Consumed strip length.
    pub fn cost(&self) -> u32 {
        self.layout.cost()
    }

    /// Whether every rectangle was placed.
    pub fn is_complete(&self) -> bool {
        self.layout.is_complete()
    }

    /// Rectangle order, with any rotations applied by moves.
    pub fn order(&self) -> &[Rectangle] {
        &self.order
    }

    /// Placement policy.
    pub fn policy(&self) -> &PlacementPolicy {
        &self.policy
    }

    /// Placements in the order they were made.
    pub fn placements(&self) -> &[Placement] {
        self.layout.placements()
    }

    /// Full placement result.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Shared search settings.
    pub fn space(&self) -> &SearchSpace {
        &self.space
    }

    /// Move used by neighbourhood `k`.
    pub fn move_for(&self, k: usize) -> Move {
        Move::select(k, self.space.moves, self.order.len())
    }

    /// Number of neighbours in neighbourhood `k`.
    pub fn neighbourhood_size(&self, k: usize) -> usize {
        self.move_for(k).neighbourhood_size(self.order.len())
    }

    /// Neighbour at position `at` of neighbourhood `k`, drawing any
    /// randomness from `rng`.
    pub fn neighbour<R: Rng>(&self, at: usize, k: usize, rng: &mut R) -> Candidate {
        let (order, policy) = moves::apply(
            self.move_for(k),
            &self.order,
            &self.policy,
            at,
            self.space.strip_width,
            rng,
        );
        Candidate::new(order, policy, self.space)
    }

    /// Neighbour at position `at` of neighbourhood `k` with a generator
    /// derived from the candidate seed, so enumeration order does not
    /// matter.
    fn enumerated_neighbour(&self, at: usize, k: usize) -> Candidate {
        let mut rng = create_rng(mix_seed(self.space.seed, k, at));
        self.neighbour(at, k, &mut rng)
    }

    /// The lowest-cost neighbour of neighbourhood `k`, lowest position on ties.
    pub fn best_in_neighbourhood(&self, k: usize) -> Candidate {
        self.evaluate_neighbourhood(k)
            .into_iter()
            .reduce(|best, next| if next.improves_on(&best) { next } else { best })
            .unwrap_or_else(|| self.clone())
    }

    /// The first neighbour of neighbourhood `k` that costs strictly less,
    /// with the 1-based number of neighbours evaluated.
    ///
    /// Returns a copy of `self` and the neighbourhood size if none improves.
    pub fn first_improvement(&self, k: usize) -> (Candidate, usize) {
        let size = self.neighbourhood_size(k);
        match self.find_first_improving(k, size) {
            Some((at, found)) => (found, at + 1),
            None => (self.clone(), size),
        }
    }

    /// One neighbour of neighbourhood `k` at a random position.
    pub fn shake<R: Rng>(&self, k: usize, rng: &mut R) -> Candidate {
        let size = self.neighbourhood_size(k);
        if size == 0 {
            return self.clone();
        }
        let at = rng.random_range(0..size);
        self.neighbour(at, k, rng)
    }

    /// Positions at which the two orders hold rectangles of different
    /// dimensions, plus any length difference.
    pub fn distance(&self, other: &Candidate) -> usize {
        let differing = self
            .order
            .iter()
            .zip(&other.order)
            .filter(|(a, b)| a != b)
            .count();
        differing + self.order.len().abs_diff(other.order.len())
    }

    /// Whether this candidate should replace `other` as incumbent.
    pub fn improves_on(&self, other: &Candidate) -> bool {
        self.is_complete() && (!other.is_complete() || self.cost() < other.cost())
    }

    #[cfg(feature = "parallel")]
    fn evaluate_neighbourhood(&self, k: usize) -> Vec<Candidate> {
        let size = self.neighbourhood_size(k);
        if self.space.parallel {
            (0..size)
                .into_par_iter()
                .map(|at| self.enumerated_neighbour(at, k))
                .collect()
        } else {
            (0..size).map(|at| self.enumerated_neighbour(at, k)).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate_neighbourhood(&self, k: usize) -> Vec<Candidate> {
        let size = self.neighbourhood_size(k);
        (0..size).map(|at| self.enumerated_neighbour(at, k)).collect()
    }

    #[cfg(feature = "parallel")]
    fn find_first_improving(&self, k: usize, size: usize) -> Option<(usize, Candidate)> {
        if self.space.parallel {
            (0..size)
                .into_par_iter()
                .map(|at| (at, self.enumerated_neighbour(at, k)))
                .find_first(|(_, next)| next.improves_on(self))
        } else {
            self.scan_first_improving(k, size)
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn find_first_improving(&self, k: usize, size: usize) -> Option<(usize, Candidate)> {
        self.scan_first_improving(k, size)
    }

    fn scan_first_improving(&self, k: usize, size: usize) -> Option<(usize, Candidate)> {
        (0..size)
            .map(|at| (at, self.enumerated_neighbour(at, k)))
            .find(|(_, next)| next.improves_on(self))
    }
}

impl VnsSolution for Candidate {
    fn cost(&self) -> u32 {
        Candidate::cost(self)
    }

    fn is_complete(&self) -> bool {
        Candidate::is_complete(self)
    }

    fn neighbourhood_size(&self, k: usize) -> usize {
        Candidate::neighbourhood_size(self, k)
    }

    fn best_in_neighbourhood(&self, k: usize) -> Self {
        Candidate::best_in_neighbourhood(self, k)
    }

    fn first_improvement(&self, k: usize) -> (Self, usize) {
        Candidate::first_improvement(self, k)
    }

    fn shake<R: Rng>(&self, k: usize, rng: &mut R) -> Self {
        Candidate::shake(self, k, rng)
    }

    fn distance(&self, other: &Self) -> usize {
        Candidate::distance(self, other)
    }

    fn improves_on(&self, other: &Self) -> bool {
        Candidate::improves_on(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance() -> Vec<Rectangle> {
        [(6, 4), (5, 3), (4, 4), (4, 2), (3, 3), (3, 1), (2, 2), (1, 1)]
            .iter()
            .enumerate()
            .map(|(i, &(w, h))| Rectangle::new(i.to_string(), w, h))
            .collect()
    }

    fn candidate(parallel: bool) -> Candidate {
        Candidate::new(
            instance(),
            PlacementPolicy::default(),
            SearchSpace::new(10).with_parallel(parallel),
        )
    }

    #[test]
    fn test_cost_cached_from_layout() {
        let c = candidate(false);
        let layout = place(c.order(), 10, c.policy());
        assert_eq!(c.cost(), layout.cost());
        assert_eq!(c.placements().len(), c.order().len());
        assert!(c.is_complete());
    }

    #[test]
    fn test_best_in_neighbourhood_is_minimum() {
        let c = candidate(false);
        for k in 1..=6 {
            let best = c.best_in_neighbourhood(k);
            let min = (0..c.neighbourhood_size(k))
                .map(|at| c.enumerated_neighbour(at, k).cost())
                .min()
                .unwrap();
            assert_eq!(best.cost(), min, "k={k}");
        }
    }

    #[test]
    fn test_best_in_neighbourhood_ties_take_lowest_position() {
        let c = candidate(false);
        let k = 2;
        let best = c.best_in_neighbourhood(k);
        let first_min = (0..c.neighbourhood_size(k))
            .map(|at| c.enumerated_neighbour(at, k))
            .find(|n| n.cost() == best.cost())
            .unwrap();
        assert_eq!(best.order(), first_min.order());
    }

    #[test]
    fn test_first_improvement_reports_search_cost() {
        let c = candidate(false);
        for k in 1..=6 {
            let (next, evaluated) = c.first_improvement(k);
            let size = c.neighbourhood_size(k);
            assert!(evaluated >= 1 && evaluated <= size);
            if next.cost() < c.cost() {
                let expected = c.enumerated_neighbour(evaluated - 1, k);
                assert_eq!(next.order(), expected.order());
            } else {
                assert_eq!(evaluated, size);
                assert_eq!(next.order(), c.order());
            }
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let seq = candidate(false);
        let par = candidate(true);
        for k in 1..=9 {
            assert_eq!(
                seq.best_in_neighbourhood(k).order(),
                par.best_in_neighbourhood(k).order(),
                "k={k}"
            );
            let (a, ca) = seq.first_improvement(k);
            let (b, cb) = par.first_improvement(k);
            assert_eq!(ca, cb);
            assert_eq!(a.order(), b.order());
        }
    }

    #[test]
    fn test_shake_deterministic_for_seed() {
        let c = candidate(false);
        let mut r1 = create_rng(11);
        let mut r2 = create_rng(11);
        for k in 1..=12 {
            let a = c.shake(k, &mut r1);
            let b = c.shake(k, &mut r2);
            assert_eq!(a.order(), b.order());
            let ids_a: Vec<_> = a.order().iter().map(|r| r.id().clone()).collect();
            let ids_b: Vec<_> = b.order().iter().map(|r| r.id().clone()).collect();
            assert_eq!(ids_a, ids_b);
        }
    }

    #[test]
    fn test_distance_symmetric_and_zero_on_self() {
        let c = candidate(false);
        let mut rng = create_rng(3);
        let d = c.shake(2, &mut rng);
        assert_eq!(c.distance(&c), 0);
        assert_eq!(c.distance(&d), d.distance(&c));
    }

    #[test]
    fn test_distance_counts_dimensions_only() {
        let space = SearchSpace::new(10);
        let a = Candidate::new(
            vec![Rectangle::new("x", 2, 2), Rectangle::new("y", 2, 2)],
            PlacementPolicy::default(),
            space,
        );
        let b = Candidate::new(
            vec![Rectangle::new("y", 2, 2), Rectangle::new("x", 2, 2)],
            PlacementPolicy::default(),
            space,
        );
        assert_eq!(a.distance(&b), 0, "same shapes in swapped slots");
    }

    #[test]
    fn test_incomplete_never_improves() {
        let space = SearchSpace::new(5);
        let bad = Candidate::new(
            vec![Rectangle::new("big", 9, 9)],
            PlacementPolicy::default(),
            space,
        );
        let good = Candidate::new(
            vec![Rectangle::new("small", 1, 20)],
            PlacementPolicy::default(),
            space,
        );
        assert!(!bad.is_complete());
        assert!(!bad.improves_on(&good));
        assert!(good.improves_on(&bad));
    }

    #[test]
    fn test_policy_moves_keep_order() {
        let c = Candidate::new(
            instance(),
            PlacementPolicy::default(),
            SearchSpace::new(10).with_moves(MoveSet::Policy),
        );
        assert_eq!(c.neighbourhood_size(1), crate::packing::PolicyFlag::COUNT);
        let n = c.best_in_neighbourhood(1);
        assert_eq!(n.order(), c.order());
    }
}
