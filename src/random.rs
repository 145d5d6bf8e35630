//! Seeded random number generation.
//!
//! Every stochastic step in the crate draws from a generator built here,
//! so a run is fully reproducible from its seed.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a deterministic generator from `seed`.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Derives an independent seed for position `index` of neighbourhood `k`.
///
/// Used wherever a neighbourhood is enumerated position by position, so
/// that each position sees the same random stream regardless of whether
/// positions are evaluated in order or on a worker pool.
pub fn mix_seed(seed: u64, k: usize, index: usize) -> u64 {
    let mut z = seed
        ^ (k as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (index as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    // splitmix64 finaliser
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
