//! Variable Neighbourhood Search configuration.

use std::fmt;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::moves::MoveSet;
use crate::error::{Error, Result};
use crate::packing::PlacementPolicy;

/// Search strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Method {
    /// Variable Neighbourhood Descent: deterministic best-improvement sweeps.
    Vnd,
    /// Reduced VNS: shaking only.
    Rvns,
    /// Basic VNS: shaking followed by first-improvement descent.
    #[default]
    Bvns,
    /// General VNS: shaking followed by a full VND.
    Gvns,
    /// Skewed VNS: like BVNS, accepting distant solutions that are slightly worse.
    Svns,
}

impl Method {
    /// All methods, in the order they are compared.
    pub const ALL: [Method; 5] = [
        Method::Vnd,
        Method::Rvns,
        Method::Bvns,
        Method::Gvns,
        Method::Svns,
    ];

    /// Short upper-case name.
    pub fn name(self) -> &'static str {
        match self {
            Method::Vnd => "VND",
            Method::Rvns => "RVNS",
            Method::Bvns => "BVNS",
            Method::Gvns => "GVNS",
            Method::Svns => "SVNS",
        }
    }

    /// Whether the method is bounded by the time limit.
    pub fn is_timed(self) -> bool {
        !matches!(self, Method::Vnd)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration parameters for Variable Neighbourhood Search.
///
/// # Examples
///
/// ```
/// use u_strippack::vns::{Method, VnsConfig};
///
/// let config = VnsConfig::for_items(40)
///     .with_method(Method::Gvns)
///     .with_time_limit_ms(250)
///     .with_seed(7);
/// assert_eq!(config.k_max, 120);
/// assert_eq!(config.l_max, 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VnsConfig {
    /// Search strategy.
    pub method: Method,

    /// Neighbourhood indices run from 1 up to (excluding) `k_max`.
    pub k_max: usize,

    /// `k_max` of the nested descent in GVNS.
    pub l_max: usize,

    /// Wall-clock budget for the timed methods.
    ///
    /// Checked once per outer sweep, so a run overshoots by at most one
    /// sweep. VND ignores it.
    pub time_limit: Duration,

    /// Random seed (`None` for the default seed).
    pub seed: Option<u64>,

    /// Distance weight of the skewed acceptance rule (SVNS only).
    pub alpha: f64,

    /// Whether neighbourhoods are evaluated on the rayon pool.
    pub parallel: bool,

    /// Move families the neighbourhoods draw from.
    pub moves: MoveSet,

    /// Placement policy of the initial candidate.
    pub policy: PlacementPolicy,
}

impl Default for VnsConfig {
    fn default() -> Self {
        Self {
            method: Method::default(),
            k_max: 30,
            l_max: 1,
            time_limit: Duration::from_secs(1),
            seed: None,
            alpha: 0.1,
            parallel: true,
            moves: MoveSet::default(),
            policy: PlacementPolicy::default(),
        }
    }
}

impl VnsConfig {
    /// Defaults sized for `n` rectangles: `k_max = 3n`, `l_max = max(1, n / 10)`.
    pub fn for_items(n: usize) -> Self {
        Self {
            k_max: (3 * n).max(1),
            l_max: (n / 10).max(1),
            ..Self::default()
        }
    }

    /// Sets the search strategy.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets `k_max`.
    pub fn with_k_max(mut self, k_max: usize) -> Self {
        self.k_max = k_max;
        self
    }

    /// Sets the nested descent depth of GVNS.
    pub fn with_l_max(mut self, l_max: usize) -> Self {
        self.l_max = l_max;
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = limit;
        self
    }

    /// Sets the wall-clock budget in milliseconds.
    pub fn with_time_limit_ms(self, ms: u64) -> Self {
        self.with_time_limit(Duration::from_millis(ms))
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the skewed-acceptance weight.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Enables or disables parallel neighbourhood evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the move families.
    pub fn with_moves(mut self, moves: MoveSet) -> Self {
        self.moves = moves;
        self
    }

    /// Sets the initial placement policy.
    pub fn with_policy(mut self, policy: PlacementPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.k_max == 0 {
            return Err(Error::InvalidConfig("k_max must be at least 1".into()));
        }
        if self.method == Method::Gvns && self.l_max == 0 {
            return Err(Error::InvalidConfig("l_max must be at least 1 for GVNS".into()));
        }
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "alpha must be a non-negative number, got {}",
                self.alpha
            )));
        }
        Ok(())
    }
}
