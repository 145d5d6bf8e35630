//! Core trait for Variable Neighbourhood Search.

use rand::Rng;

/// A solution the VNS drivers can search from.
///
/// Neighbourhoods are indexed from `1`; larger indices are more
/// disruptive. Implementations evaluate their cost once, up front, and are
/// immutable afterwards: every neighbourhood operation returns a new value.
///
/// # Minimisation
///
/// Lower [`cost`](Self::cost) is better. A solution whose evaluation did
/// not complete (see [`is_complete`](Self::is_complete)) is worse than
/// every complete one and is never adopted as incumbent.
///
/// # References
///
/// Hansen, P. & Mladenović, N. (2001). "Variable neighborhood search:
/// Principles and applications", *European Journal of Operational Research* 130(3), 449-467.
pub trait VnsSolution: Clone + Send + Sync {
    /// Objective value. Lower is better.
    fn cost(&self) -> u32;

    /// Whether [`cost`](Self::cost) is meaningful.
    fn is_complete(&self) -> bool {
        true
    }

    /// Number of neighbours in neighbourhood `k`.
    fn neighbourhood_size(&self, k: usize) -> usize;

    /// The lowest-cost neighbour in neighbourhood `k`; ties go to the
    /// lowest position.
    fn best_in_neighbourhood(&self, k: usize) -> Self;

    /// The first neighbour in neighbourhood `k` that improves on `self`,
    /// with the number of neighbours evaluated. Returns a copy of `self`
    /// and the full neighbourhood size when nothing improves.
    fn first_improvement(&self, k: usize) -> (Self, usize);

    /// One random neighbour from neighbourhood `k`.
    fn shake<R: Rng>(&self, k: usize, rng: &mut R) -> Self;

    /// Number of positions at which the two solutions differ.
    fn distance(&self, other: &Self) -> usize;

    /// Whether `self` should replace `other` as incumbent.
    fn improves_on(&self, other: &Self) -> bool {
        self.is_complete() && (!other.is_complete() || self.cost() < other.cost())
    }
}
