//! Rectangles, placement policies, and the skyline placer.
//!
//! The placer is a deterministic greedy simulation: given an ordered list
//! of rectangles and a [`PlacementPolicy`], [`place`] lays them onto a
//! strip of fixed width and reports the consumed length. It is the
//! evaluation function that the [`vns`](crate::vns) layer optimises.

mod policy;
mod prepare;
mod skyline;
mod types;

pub use policy::{PlacementPolicy, PolicyFlag};
pub use prepare::{prepare, Prepared};
pub use skyline::{place, Layout, Skyline, ABORT_PASSES, FALLBACK_PASSES, LOWEST_JUMP_PASSES};
pub use types::{Placement, RectId, Rectangle};
