//! Error types.

use thiserror::Error;

/// Errors raised before a search starts.
///
/// Everything that can go wrong once a driver is running (placement
/// aborts, exhausted neighbourhoods, expired budgets) is reported as data
/// on the result rather than as an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A search parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No rectangles were supplied.
    #[error("no rectangles to pack")]
    EmptyInstance,

    /// The strip has zero width.
    #[error("strip width must be positive")]
    InvalidStripWidth,
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;
