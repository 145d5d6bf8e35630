//! Variable Neighbourhood Search execution engine.
//!
//! # Neighbourhood change
//!
//! Every driver moves through neighbourhoods with the same rule: if the
//! candidate improves on the incumbent it is adopted and `k` resets to 1,
//! otherwise `k` advances. A sweep ends once `k` reaches `k_max`.
//!
//! # Drivers
//!
//! - **VND**: `x ← best neighbour in N_k(x)`; no randomness, no time limit.
//! - **RVNS**: `x' ← shake(x, k)`; repeated until the time limit.
//! - **BVNS**: `x'' ← first_improvement(shake(x, k), k)`.
//! - **GVNS**: `x'' ← VND(shake(x, k), l_max)`.
//! - **SVNS**: as BVNS with skewed acceptance
//!   `f(x'') - ⌊α·ρ(x, x'')⌋ < f(x)`, returning the best solution seen and
//!   restarting each sweep from it. Because an accepted move need not
//!   improve, the budget is also polled whenever `k` resets.
//!
//! The cursor `k` is a local of each driver; the descent nested in GVNS
//! keeps its own.
//!
//! # Reference
//!
//! Hansen, P., Mladenović, N. & Moreno Pérez, J. A. (2010). "Variable
//! neighbourhood search: methods and applications", *Annals of Operations
//! Research* 175, 367-407.

use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::candidate::DEFAULT_SEED;
use super::config::{Method, VnsConfig};
use super::types::VnsSolution;
use crate::error::Result;
use crate::random::create_rng;

/// Result of a VNS run.
#[derive(Debug, Clone)]
pub struct VnsResult<S: Clone> {
    /// Best solution found.
    pub best: S,
    /// Cost of the best solution.
    pub best_cost: u32,
    /// Strategy that produced it.
    pub method: Method,
    /// Outer sweeps executed (neighbourhood steps for VND).
    pub iterations: usize,
    /// Neighbours evaluated, counting each placement simulation once.
    pub evaluations: u64,
    /// Accepted moves.
    pub improvements: usize,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
    /// Whether the run was cancelled externally.
    pub cancelled: bool,
    /// Incumbent cost after each iteration.
    pub cost_history: Vec<u32>,
}

/// Neighbourhood change: adopt `candidate` and reset `k` to 1 if it
/// improves on `incumbent`, otherwise keep `incumbent` and advance `k`.
pub fn neighbourhood_change<S: VnsSolution>(incumbent: S, candidate: S, k: usize) -> (S, usize) {
    if candidate.improves_on(&incumbent) {
        (candidate, 1)
    } else {
        (incumbent, k + 1)
    }
}

/// Skewed acceptance test: `candidate` is accepted when its cost, less
/// `⌊alpha × distance⌋`, is below the incumbent's.
///
/// Incomplete candidates are never accepted.
pub fn skewed_accepts<S: VnsSolution>(incumbent: &S, candidate: &S, alpha: f64) -> bool {
    if !candidate.is_complete() {
        return false;
    }
    if !incumbent.is_complete() {
        return true;
    }
    let bonus = (alpha * incumbent.distance(candidate) as f64).floor() as i64;
    i64::from(candidate.cost()) - bonus < i64::from(incumbent.cost())
}

/// Neighbourhood change with the skewed acceptance test.
pub fn skewed_change<S: VnsSolution>(
    incumbent: S,
    candidate: S,
    k: usize,
    alpha: f64,
) -> (S, usize) {
    if skewed_accepts(&incumbent, &candidate, alpha) {
        (candidate, 1)
    } else {
        (incumbent, k + 1)
    }
}

/// Variable Neighbourhood Descent from `x` over neighbourhoods `1..k_max`.
///
/// Deterministic; the cost never increases from one step to the next.
pub fn vnd<S: VnsSolution>(x: S, k_max: usize) -> S {
    descend(x, k_max, &mut Stats::default(), false, None)
}

#[derive(Debug, Default)]
struct Stats {
    iterations: usize,
    evaluations: u64,
    improvements: usize,
    cost_history: Vec<u32>,
}

struct Budget {
    start: Instant,
    limit: Duration,
    cancel: Option<Arc<AtomicBool>>,
}

impl Budget {
    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn exhausted(&self) -> bool {
        self.cancelled() || self.start.elapsed() >= self.limit
    }
}

/// Best-improvement descent. `record` logs every step into the history.
///
/// Stops early, after at least one step, once `budget` is cancelled.
fn descend<S: VnsSolution>(
    mut x: S,
    k_max: usize,
    stats: &mut Stats,
    record: bool,
    budget: Option<&Budget>,
) -> S {
    let mut k = 1;
    loop {
        stats.evaluations += x.neighbourhood_size(k) as u64;
        let candidate = x.best_in_neighbourhood(k);
        let before = k;
        (x, k) = neighbourhood_change(x, candidate, k);
        if k == 1 {
            stats.improvements += 1;
            log::debug!("VND improved at k={} to cost {}", before, x.cost());
        }
        if record {
            stats.iterations += 1;
            stats.cost_history.push(x.cost());
        }
        if k >= k_max || budget.is_some_and(Budget::cancelled) {
            break;
        }
    }
    x
}

fn rvns<S: VnsSolution, R: Rng>(
    mut x: S,
    k_max: usize,
    budget: &Budget,
    rng: &mut R,
    stats: &mut Stats,
) -> S {
    loop {
        let mut k = 1;
        loop {
            let shaken = x.shake(k, rng);
            stats.evaluations += 1;
            let before = k;
            (x, k) = neighbourhood_change(x, shaken, k);
            if k == 1 {
                stats.improvements += 1;
                log::debug!("RVNS improved at k={} to cost {}", before, x.cost());
            }
            if k >= k_max || budget.cancelled() {
                break;
            }
        }
        stats.iterations += 1;
        stats.cost_history.push(x.cost());
        if budget.exhausted() {
            break;
        }
    }
    x
}

fn bvns<S: VnsSolution, R: Rng>(
    mut x: S,
    k_max: usize,
    budget: &Budget,
    rng: &mut R,
    stats: &mut Stats,
) -> S {
    loop {
        let mut k = 1;
        loop {
            let shaken = x.shake(k, rng);
            let (refined, evaluated) = shaken.first_improvement(k);
            stats.evaluations += 1 + evaluated as u64;
            let before = k;
            (x, k) = neighbourhood_change(x, refined, k);
            if k == 1 {
                stats.improvements += 1;
                log::debug!("BVNS improved at k={} to cost {}", before, x.cost());
            }
            if k >= k_max || budget.cancelled() {
                break;
            }
        }
        stats.iterations += 1;
        stats.cost_history.push(x.cost());
        if budget.exhausted() {
            break;
        }
    }
    x
}

fn gvns<S: VnsSolution, R: Rng>(
    mut x: S,
    k_max: usize,
    l_max: usize,
    budget: &Budget,
    rng: &mut R,
    stats: &mut Stats,
) -> S {
    loop {
        let mut k = 1;
        loop {
            let shaken = x.shake(k, rng);
            stats.evaluations += 1;
            let mut inner = Stats::default();
            let refined = descend(shaken, l_max, &mut inner, false, Some(budget));
            stats.evaluations += inner.evaluations;
            let before = k;
            (x, k) = neighbourhood_change(x, refined, k);
            if k == 1 {
                stats.improvements += 1;
                log::debug!("GVNS improved at k={} to cost {}", before, x.cost());
            }
            if k >= k_max || budget.cancelled() {
                break;
            }
        }
        stats.iterations += 1;
        stats.cost_history.push(x.cost());
        if budget.exhausted() {
            break;
        }
    }
    x
}

fn svns<S: VnsSolution, R: Rng>(
    mut x: S,
    k_max: usize,
    alpha: f64,
    budget: &Budget,
    rng: &mut R,
    stats: &mut Stats,
) -> S {
    let mut best = x.clone();
    loop {
        let mut k = 1;
        loop {
            let shaken = x.shake(k, rng);
            let (refined, evaluated) = shaken.first_improvement(k);
            stats.evaluations += 1 + evaluated as u64;
            let before = k;
            (x, k) = skewed_change(x, refined, k, alpha);
            if k == 1 {
                log::trace!("SVNS moved at k={} to cost {}", before, x.cost());
            }
            if x.improves_on(&best) {
                best = x.clone();
                stats.improvements += 1;
                log::debug!("SVNS improved at k={} to cost {}", before, best.cost());
            }
            // Skewed moves can reset k indefinitely without improving.
            if k >= k_max || budget.cancelled() || (k == 1 && budget.exhausted()) {
                break;
            }
        }
        x = best.clone();
        stats.iterations += 1;
        stats.cost_history.push(best.cost());
        if budget.exhausted() {
            break;
        }
    }
    best
}

/// Variable Neighbourhood Search runner.
pub struct VnsRunner;

impl VnsRunner {
    /// Runs `config.method` from `initial`.
    ///
    /// Fails only if the configuration is invalid.
    pub fn run<S: VnsSolution>(initial: S, config: &VnsConfig) -> Result<VnsResult<S>> {
        Self::run_with_cancel(initial, config, None)
    }

    /// Runs with an optional cancellation token.
    ///
    /// The flag is polled after every neighbourhood step, including the
    /// steps of a nested descent, so a cancelled run returns within one
    /// step. The time limit is only polled once per outer sweep and does
    /// not apply to VND.
    pub fn run_with_cancel<S: VnsSolution>(
        initial: S,
        config: &VnsConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<VnsResult<S>> {
        config.validate()?;

        let mut rng = create_rng(config.seed.unwrap_or(DEFAULT_SEED));
        let budget = Budget {
            start: Instant::now(),
            limit: config.time_limit,
            cancel,
        };
        let mut stats = Stats::default();
        let initial_cost = initial.cost();
        if config.method.is_timed() {
            log::debug!(
                "{} starting from cost {} with a {:.3}s budget",
                config.method,
                initial_cost,
                config.time_limit.as_secs_f64()
            );
        } else {
            log::debug!("{} starting from cost {}", config.method, initial_cost);
        }

        let best = match config.method {
            Method::Vnd => descend(initial, config.k_max, &mut stats, true, Some(&budget)),
            Method::Rvns => rvns(initial, config.k_max, &budget, &mut rng, &mut stats),
            Method::Bvns => bvns(initial, config.k_max, &budget, &mut rng, &mut stats),
            Method::Gvns => gvns(
                initial,
                config.k_max,
                config.l_max,
                &budget,
                &mut rng,
                &mut stats,
            ),
            Method::Svns => svns(
                initial,
                config.k_max,
                config.alpha,
                &budget,
                &mut rng,
                &mut stats,
            ),
        };

        let elapsed = budget.start.elapsed();
        log::info!(
            "{} finished: cost {} (from {}), {} iterations, {} evaluations, {:.3}s",
            config.method,
            best.cost(),
            initial_cost,
            stats.iterations,
            stats.evaluations,
            elapsed.as_secs_f64()
        );

        Ok(VnsResult {
            best_cost: best.cost(),
            best,
            method: config.method,
            iterations: stats.iterations,
            evaluations: stats.evaluations,
            improvements: stats.improvements,
            elapsed,
            cancelled: budget.cancelled(),
            cost_history: stats.cost_history,
        })
    }
}
