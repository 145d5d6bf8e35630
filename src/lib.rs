//! Skyline strip packing driven by Variable Neighbourhood Search.
//!
//! Rectangles are packed into a strip of fixed width and unbounded length;
//! the objective is the consumed length. The crate is split in two layers:
//!
//! - **Packing**: a skyline placer that turns an ordered list of rectangles
//!   into a layout under a configurable [`PlacementPolicy`](packing::PlacementPolicy),
//!   plus instance preparation (orientation normalisation, area ordering).
//! - **VNS**: generic drivers over the [`VnsSolution`](vns::VnsSolution) trait
//!   (VND, RVNS, BVNS, GVNS and SVNS) and the strip-packing candidate whose
//!   neighbourhoods reorder rectangles and toggle placement flags.
//!
//! [`StripPacker`] ties the two together.
//!
//! # Examples
//!
//! ```
//! use u_strippack::packing::{prepare, Rectangle};
//! use u_strippack::vns::{Method, VnsConfig};
//! use u_strippack::StripPacker;
//!
//! let raw = vec![
//!     Rectangle::new("a", 4, 8),
//!     Rectangle::new("b", 2, 4),
//!     Rectangle::new("c", 6, 4),
//!     Rectangle::new("d", 4, 4),
//! ];
//! let prepared = prepare(&raw, 10);
//! let config = VnsConfig::for_items(raw.len())
//!     .with_method(Method::Gvns)
//!     .with_time_limit_ms(20)
//!     .with_seed(42);
//!
//! let result = StripPacker::new(10, config).solve(&prepared.rectangles).unwrap();
//! assert!(result.complete);
//! assert_eq!(result.placements.len(), 4);
//! ```
//!
//! # Features
//!
//! - `parallel`: evaluates neighbourhoods on the rayon pool.
//! - `serde`: derives `Serialize`/`Deserialize` for instances, configs and results.

pub mod error;
pub mod packing;
pub mod random;
pub mod solver;
pub mod vns;

pub use error::{Error, Result};
pub use solver::{Comparison, PackingResult, StripPacker};
