//! Strip packing front end: validation, initial candidate, search, result.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::packing::{Placement, PlacementPolicy, Rectangle};
use crate::vns::{Candidate, Method, SearchSpace, VnsConfig, VnsRunner, DEFAULT_SEED};

/// Outcome of one packing search.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackingResult {
    /// Strategy used.
    pub method: Method,
    /// Strip width packed against.
    pub strip_width: u32,
    /// Consumed strip length of the best candidate.
    pub cost: u32,
    /// Consumed length of the starting order.
    pub initial_cost: u32,
    /// Whether every rectangle was placed.
    pub complete: bool,
    /// Placements of the best candidate.
    pub placements: Vec<Placement>,
    /// Order of the best candidate.
    pub order: Vec<Rectangle>,
    /// Placement policy of the best candidate.
    pub policy: PlacementPolicy,
    /// Outer sweeps executed.
    pub iterations: usize,
    /// Neighbours evaluated.
    pub evaluations: u64,
    /// Accepted moves.
    pub improvements: usize,
    /// Wall-clock time.
    pub elapsed: Duration,
    /// Whether the run was cancelled.
    pub cancelled: bool,
    /// Incumbent cost per iteration.
    pub cost_history: Vec<u32>,
}

impl PackingResult {
    /// Strip area consumed: `cost × strip_width`.
    pub fn area(&self) -> u64 {
        u64::from(self.cost) * u64::from(self.strip_width)
    }

    /// Total area of the placed rectangles.
    pub fn item_area(&self) -> u64 {
        self.placements
            .iter()
            .map(|p| u64::from(p.width) * u64::from(p.height))
            .sum()
    }

    /// Fraction of the consumed area covered by rectangles (0.0 - 1.0).
    pub fn utilization(&self) -> f64 {
        match self.area() {
            0 => 0.0,
            area => self.item_area() as f64 / area as f64,
        }
    }
}

/// Results of running every method on the same instance.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Comparison {
    /// One result per method, in [`Method::ALL`] order.
    pub runs: Vec<PackingResult>,
}

impl Comparison {
    /// The lowest-cost complete run; earlier methods win ties.
    pub fn best(&self) -> Option<&PackingResult> {
        self.runs
            .iter()
            .filter(|r| r.complete)
            .reduce(|best, r| if r.cost < best.cost { r } else { best })
    }
}

/// Packs rectangles into a strip with the configured VNS method.
///
/// The rectangles are searched in the order given, so callers normally
/// run [`prepare`](crate::packing::prepare) first.
///
/// # Examples
///
/// ```
/// use u_strippack::packing::Rectangle;
/// use u_strippack::vns::{Method, VnsConfig};
/// use u_strippack::StripPacker;
///
/// let rects = vec![
///     Rectangle::new("1", 8, 4),
///     Rectangle::new("2", 6, 4),
///     Rectangle::new("3", 4, 4),
///     Rectangle::new("4", 2, 4),
/// ];
/// let config = VnsConfig::for_items(rects.len()).with_method(Method::Vnd);
/// let result = StripPacker::new(10, config).solve(&rects).unwrap();
/// assert_eq!(result.cost, 8);
/// ```
#[derive(Debug, Clone)]
pub struct StripPacker {
    strip_width: u32,
    config: VnsConfig,
}

impl StripPacker {
    /// Creates a packer for a strip of `strip_width`.
    pub fn new(strip_width: u32, config: VnsConfig) -> Self {
        Self {
            strip_width,
            config,
        }
    }

    /// Strip width.
    pub fn strip_width(&self) -> u32 {
        self.strip_width
    }

    /// Search configuration.
    pub fn config(&self) -> &VnsConfig {
        &self.config
    }

    /// Search settings shared by every candidate of a run.
    pub fn search_space(&self) -> SearchSpace {
        SearchSpace::new(self.strip_width)
            .with_moves(self.config.moves)
            .with_seed(self.config.seed.unwrap_or(DEFAULT_SEED))
            .with_parallel(self.config.parallel)
    }

    /// Checks the instance and configuration and evaluates the starting
    /// candidate (the identity order under the configured policy).
    pub fn initial_candidate(&self, rectangles: &[Rectangle]) -> Result<Candidate> {
        if self.strip_width == 0 {
            return Err(Error::InvalidStripWidth);
        }
        if rectangles.is_empty() {
            return Err(Error::EmptyInstance);
        }
        self.config.validate()?;

        let initial = Candidate::new(rectangles.to_vec(), self.config.policy, self.search_space());
        if !initial.is_complete() {
            log::warn!("initial order could not be placed completely");
        }
        Ok(initial)
    }

    /// Runs the configured method.
    pub fn solve(&self, rectangles: &[Rectangle]) -> Result<PackingResult> {
        self.solve_with_cancel(rectangles, None)
    }

    /// Runs the configured method with an optional cancellation token.
    pub fn solve_with_cancel(
        &self,
        rectangles: &[Rectangle],
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<PackingResult> {
        let initial = self.initial_candidate(rectangles)?;
        let initial_cost = initial.cost();
        let run = VnsRunner::run_with_cancel(initial, &self.config, cancel)?;

        let best = run.best;
        Ok(PackingResult {
            method: run.method,
            strip_width: self.strip_width,
            cost: run.best_cost,
            initial_cost,
            complete: best.is_complete(),
            placements: best.placements().to_vec(),
            order: best.order().to_vec(),
            policy: *best.policy(),
            iterations: run.iterations,
            evaluations: run.evaluations,
            improvements: run.improvements,
            elapsed: run.elapsed,
            cancelled: run.cancelled,
            cost_history: run.cost_history,
        })
    }

    /// Runs every method from the same starting candidate.
    pub fn compare(&self, rectangles: &[Rectangle]) -> Result<Comparison> {
        let mut runs = Vec::with_capacity(Method::ALL.len());
        for method in Method::ALL {
            let packer = StripPacker::new(
                self.strip_width,
                self.config.clone().with_method(method),
            );
            runs.push(packer.solve(rectangles)?);
        }
        let comparison = Comparison { runs };
        match comparison.best() {
            Some(best) => log::info!(
                "{} found the best packing: length {}, area {}",
                best.method,
                best.cost,
                best.area()
            ),
            None => log::warn!("no method placed every rectangle"),
        }
        Ok(comparison)
    }
}
