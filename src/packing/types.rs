//! Rectangles and their placements on the strip.

use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque identifier carried by a rectangle into its placement.
pub type RectId = Arc<str>;

/// An axis-aligned rectangle to be packed.
///
/// Equality compares dimensions only: two rectangles with the same width
/// and height are equal even when their identifiers differ. The search
/// uses this to measure how far apart two orderings are.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rectangle {
    id: RectId,
    width: u32,
    height: u32,
}

impl Rectangle {
    /// Creates a rectangle.
    pub fn new(id: impl Into<RectId>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            width,
            height,
        }
    }

    /// Creates a zero-area placeholder that keeps an order slot occupied.
    pub fn placeholder(id: impl Into<RectId>) -> Self {
        Self::new(id, 0, 0)
    }

    /// Identifier.
    pub fn id(&self) -> &RectId {
        &self.id
    }

    /// Horizontal extent.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Vertical extent.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `width * height`.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Returns `true` for zero-area placeholders.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The same rectangle turned by 90°.
    pub fn rotated(&self) -> Self {
        Self {
            id: Arc::clone(&self.id),
            width: self.height,
            height: self.width,
        }
    }

    /// Returns `true` if the rectangle fits a strip of `strip_width` as is.
    pub fn fits(&self, strip_width: u32) -> bool {
        self.width <= strip_width
    }
}

impl PartialEq for Rectangle {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height
    }
}

impl Eq for Rectangle {}

/// Where one rectangle ended up on the strip.
///
/// `width`/`height` are the footprint actually occupied, i.e. already
/// swapped when `rotated` is set. `index` is the rectangle's position in
/// the order that was placed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    /// Left edge.
    pub x: i32,
    /// Bottom edge.
    pub y: i32,
    /// Occupied width.
    pub width: u32,
    /// Occupied height.
    pub height: u32,
    /// Position of the source rectangle in the placed order.
    pub index: usize,
    /// Identifier of the source rectangle.
    pub id: RectId,
    /// Whether the placer turned the rectangle for this placement.
    pub rotated: bool,
}

impl Placement {
    /// Right edge (exclusive).
    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    /// Top edge (exclusive).
    pub fn top(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    /// Returns `true` if the two footprints share interior area.
    pub fn overlaps(&self, other: &Placement) -> bool {
        i64::from(self.x) < other.right()
            && i64::from(other.x) < self.right()
            && i64::from(self.y) < other.top()
            && i64::from(other.y) < self.top()
    }
}
