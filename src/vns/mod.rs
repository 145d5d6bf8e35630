//! Variable Neighbourhood Search (VNS) over packing candidates.
//!
//! A [`Candidate`] is a rectangle order plus a [`PlacementPolicy`](crate::packing::PlacementPolicy),
//! evaluated once by the skyline placer. Neighbourhood `k` selects a move
//! family and strength ([`Move::select`]); the drivers in [`VnsRunner`]
//! switch neighbourhoods systematically: back to `k = 1` on every
//! improvement, on to `k + 1` otherwise.
//!
//! The drivers are generic over [`VnsSolution`], so they can be exercised
//! on any solution type that exposes the same neighbourhood operations.
//!
//! # References
//!
//! - Mladenović, N. & Hansen, P. (1997). "Variable neighborhood search",
//!   *Computers & Operations Research* 24(11), 1097-1100.
//! - Hansen, P. & Mladenović, N. (2001). "Variable neighborhood search:
//!   Principles and applications", *European Journal of Operational Research* 130(3), 449-467.

mod candidate;
mod config;
pub mod moves;
mod runner;
mod types;

pub use candidate::{Candidate, SearchSpace, DEFAULT_SEED};
pub use config::{Method, VnsConfig};
pub use moves::{Move, MoveSet};
pub use runner::{
    neighbourhood_change, skewed_accepts, skewed_change, vnd, VnsResult, VnsRunner,
};
pub use types::VnsSolution;
