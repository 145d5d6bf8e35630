//! Input normalisation before a search.

use super::types::Rectangle;

/// Outcome of [`prepare`].
#[derive(Debug, Clone)]
pub struct Prepared {
    /// Rectangles oriented for the strip, largest area first.
    pub rectangles: Vec<Rectangle>,
    /// Input positions that could not fit the strip in either orientation
    /// and were replaced by placeholders.
    pub oversized: Vec<usize>,
}

/// Orients and sorts raw rectangles for a strip of `strip_width`.
///
/// - A rectangle wider than the strip is turned if its height fits.
/// - One that fits in neither orientation becomes a zero-area placeholder,
///   so the rest of the list keeps its positions.
/// - Otherwise the longer side becomes the width.
///
/// The result is sorted by descending area; equal areas keep input order.
pub fn prepare(raw: &[Rectangle], strip_width: u32) -> Prepared {
    let mut oversized = Vec::new();
    let mut rectangles: Vec<Rectangle> = raw
        .iter()
        .enumerate()
        .map(|(i, rect)| {
            if rect.width() > strip_width {
                if rect.height() > strip_width {
                    log::warn!(
                        "rectangle {} ({}x{}) exceeds strip width {} in both orientations",
                        rect.id(),
                        rect.width(),
                        rect.height(),
                        strip_width
                    );
                    oversized.push(i);
                    Rectangle::placeholder("Missing")
                } else {
                    rect.rotated()
                }
            } else if rect.width() < rect.height() && rect.height() <= strip_width {
                rect.rotated()
            } else {
                rect.clone()
            }
        })
        .collect();

    rectangles.sort_by(|a, b| b.area().cmp(&a.area()));

    Prepared {
        rectangles,
        oversized,
    }
}
