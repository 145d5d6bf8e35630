//! Skyline placement simulator.
//!
//! # Algorithm
//!
//! A cursor walks a per-column height profile. On every pass the placer
//! measures the flat run under the cursor (the gap) and places the first
//! pending rectangle that fits it, raising the profile over the occupied
//! columns. When a pass places nothing the cursor moves on to the next
//! level change, wrapping (or, with `zigzag`, bouncing) at the strip edges.
//! After [`FALLBACK_PASSES`] misses the first placeable rectangle is put at
//! the bottom-left-most position that minimises its resting height. After
//! [`ABORT_PASSES`] misses the run gives up and reports an incomplete
//! layout.
//!
//! The result depends only on the rectangle order and the
//! [`PlacementPolicy`], which is what the search layer tunes.

use super::policy::PlacementPolicy;
use super::types::{Placement, Rectangle};

/// Misses after which the bottom-left fallback places a rectangle.
pub const FALLBACK_PASSES: usize = 8;

/// Misses after which the run is abandoned.
pub const ABORT_PASSES: usize = 100;

/// Misses after which `find_lowest_after` jumps to the lowest column.
pub const LOWEST_JUMP_PASSES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn step(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// Per-column height profile owned by one placement run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skyline {
    heights: Vec<u32>,
}

impl Skyline {
    /// A flat profile of `width` columns at height zero.
    pub fn new(width: u32) -> Self {
        Self {
            heights: vec![0; width as usize],
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.heights.len()
    }

    /// Current column heights.
    pub fn heights(&self) -> &[u32] {
        &self.heights
    }

    /// Highest column.
    pub fn max_height(&self) -> u32 {
        self.heights.iter().copied().max().unwrap_or(0)
    }

    fn contains(&self, x: i64) -> bool {
        x >= 0 && (x as usize) < self.heights.len()
    }

    /// Length of the run of columns level with `x`, walking in `dir`.
    fn gap(&self, x: usize, dir: Direction) -> usize {
        let level = self.heights[x];
        match dir {
            Direction::Forward => self.heights[x..]
                .iter()
                .take_while(|&&h| h == level)
                .count(),
            Direction::Backward => self.heights[..=x]
                .iter()
                .rev()
                .take_while(|&&h| h == level)
                .count(),
        }
    }

    /// First column of minimum height, scanning in `dir`.
    fn lowest_column(&self, dir: Direction) -> usize {
        let n = self.heights.len();
        let mut best = match dir {
            Direction::Forward => 0,
            Direction::Backward => n - 1,
        };
        for offset in 0..n {
            let col = match dir {
                Direction::Forward => offset,
                Direction::Backward => n - 1 - offset,
            };
            if self.heights[col] < self.heights[best] {
                best = col;
            }
        }
        best
    }

    /// Leftmost position minimising the resting height of a footprint
    /// `width` columns wide, as `(left, resting height)`.
    fn lowest_fit(&self, width: usize) -> Option<(usize, u32)> {
        if width == 0 || width > self.heights.len() {
            return None;
        }
        self.heights
            .windows(width)
            .enumerate()
            .map(|(left, cols)| (left, cols.iter().copied().max().unwrap_or(0)))
            .min_by_key(|&(left, rest)| (rest, left))
    }

    /// Raises `[left, left + width)` to `top`.
    fn raise(&mut self, left: usize, width: usize, top: u32) {
        for h in &mut self.heights[left..left + width] {
            debug_assert!(*h <= top, "skyline must never decrease");
            *h = top;
        }
    }
}

/// Outcome of one placement run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    placements: Vec<Placement>,
    profile: Vec<u32>,
    cost: u32,
    complete: bool,
}

impl Layout {
    /// Placements in the order they were made.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Final column heights.
    pub fn profile(&self) -> &[u32] {
        &self.profile
    }

    /// Consumed strip length: the highest column.
    ///
    /// Meaningless when [`is_complete`](Self::is_complete) is `false`.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Whether every non-degenerate rectangle was placed.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Sum of the placed footprints.
    pub fn placed_area(&self) -> u64 {
        self.placements
            .iter()
            .map(|p| u64::from(p.width) * u64::from(p.height))
            .sum()
    }
}

struct Cursor {
    x: i64,
    dir: Direction,
}

impl Cursor {
    /// Brings an out-of-range cursor back onto the strip.
    fn normalize(&mut self, width: usize, zigzag: bool) {
        if self.x >= 0 && (self.x as usize) < width {
            return;
        }
        if !zigzag {
            self.x = 0;
            self.dir = Direction::Forward;
        } else if self.x < 0 {
            self.x = 0;
            self.dir = Direction::Forward;
        } else {
            self.x = width as i64 - 1;
            self.dir = Direction::Backward;
        }
    }

    /// Moves past the flat run under the cursor.
    fn skip_flat(&mut self, skyline: &Skyline) {
        if !skyline.contains(self.x) {
            return;
        }
        let level = skyline.heights[self.x as usize];
        while skyline.contains(self.x) && skyline.heights[self.x as usize] == level {
            self.x += self.dir.step();
        }
    }

    /// Walks back over columns that are not higher than the current one,
    /// stopping in front of the first wall.
    fn settle(&mut self, skyline: &Skyline) {
        let h = &skyline.heights;
        match self.dir {
            Direction::Forward => {
                while self.x > 0 && (self.x as usize) < h.len() {
                    let x = self.x as usize;
                    if h[x] < h[x - 1] {
                        break;
                    }
                    self.x -= 1;
                }
            }
            Direction::Backward => {
                while self.x >= 0 && (self.x as usize) + 1 < h.len() {
                    let x = self.x as usize;
                    if h[x] < h[x + 1] {
                        break;
                    }
                    self.x += 1;
                }
            }
        }
    }
}

/// Orientation in which `rect` fits a gap, if any: `Some(rotated)`.
fn fit_in_gap(rect: &Rectangle, gap: usize, allow_rotation: bool) -> Option<bool> {
    if rect.width() as usize <= gap {
        Some(false)
    } else if allow_rotation && rect.height() as usize <= gap {
        Some(true)
    } else {
        None
    }
}

/// First pending rectangle from `from` onwards that fills `gap` exactly.
fn perfect_fit(
    order: &[Rectangle],
    pending: &[usize],
    from: usize,
    gap: usize,
    allow_rotation: bool,
) -> Option<(usize, bool)> {
    pending[from..].iter().enumerate().find_map(|(offset, &idx)| {
        let rect = &order[idx];
        if rect.width() as usize == gap {
            Some((from + offset, false))
        } else if allow_rotation && rect.height() as usize == gap {
            Some((from + offset, true))
        } else {
            None
        }
    })
}

/// Places `order` on a strip of `strip_width` columns.
///
/// Degenerate rectangles keep their order slot but are not placed.
///
/// # Examples
///
/// ```
/// use u_strippack::packing::{place, PlacementPolicy, Rectangle};
///
/// let order = vec![Rectangle::new("a", 6, 2), Rectangle::new("b", 4, 3)];
/// let layout = place(&order, 10, &PlacementPolicy::default());
/// assert!(layout.is_complete());
/// assert_eq!(layout.cost(), 3);
/// ```
pub fn place(order: &[Rectangle], strip_width: u32, policy: &PlacementPolicy) -> Layout {
    let mut skyline = Skyline::new(strip_width);
    let width = skyline.width();
    let mut placements = Vec::with_capacity(order.len());
    let mut pending: Vec<usize> = (0..order.len())
        .filter(|&i| !order[i].is_degenerate())
        .collect();

    let mut cursor = Cursor {
        x: 0,
        dir: Direction::Forward,
    };
    let mut passes = 0usize;

    if width == 0 && !pending.is_empty() {
        return finish(placements, skyline, false);
    }

    while !pending.is_empty() {
        if passes > ABORT_PASSES {
            log::warn!(
                "skyline placement aborted with {} of {} rectangles unplaced",
                pending.len(),
                order.len()
            );
            return finish(placements, skyline, false);
        }

        if passes > 1 {
            if policy.find_lowest_after && passes > LOWEST_JUMP_PASSES {
                cursor.x = skyline.lowest_column(cursor.dir) as i64;
            } else {
                cursor.skip_flat(&skyline);
            }
            cursor.normalize(width, policy.zigzag);
        }

        let x = cursor.x as usize;
        let gap = skyline.gap(x, cursor.dir);
        let scan = if policy.strict_order { 1 } else { pending.len() };

        let mut chosen = None;
        for (pos, &idx) in pending[..scan].iter().enumerate() {
            if let Some(rotated) = fit_in_gap(&order[idx], gap, policy.check_rotation) {
                let perfect = if policy.check_for_perfect && !policy.strict_order {
                    perfect_fit(order, &pending, pos, gap, policy.check_rotation)
                } else {
                    None
                };
                chosen = Some(perfect.unwrap_or((pos, rotated)));
                break;
            }
        }

        if let Some((pos, rotated)) = chosen {
            let idx = pending.remove(pos);
            let rect = oriented(&order[idx], rotated);
            let w = rect.width() as usize;
            let left = match cursor.dir {
                Direction::Forward => x,
                Direction::Backward => x + 1 - w,
            };
            let base = skyline.heights[x];
            skyline.raise(left, w, base.saturating_add(rect.height()));
            placements.push(make_placement(&rect, idx, left, base, rotated));

            cursor.x = match cursor.dir {
                Direction::Forward => (left + w) as i64,
                Direction::Backward => left as i64 - 1,
            };
            if policy.move_back {
                cursor.settle(&skyline);
            }
            cursor.normalize(width, policy.zigzag);
            passes = 0;
            continue;
        }

        if passes > FALLBACK_PASSES {
            let fallback = pending.iter().enumerate().find_map(|(pos, &idx)| {
                let rect = &order[idx];
                if rect.fits(strip_width) {
                    Some((pos, false))
                } else if policy.check_rotation && rect.height() <= strip_width {
                    Some((pos, true))
                } else {
                    None
                }
            });
            if let Some((pos, rotated)) = fallback {
                let rect = oriented(&order[pending[pos]], rotated);
                if let Some((left, rest)) = skyline.lowest_fit(rect.width() as usize) {
                    let idx = pending.remove(pos);
                    let w = rect.width() as usize;
                    skyline.raise(left, w, rest.saturating_add(rect.height()));
                    placements.push(make_placement(&rect, idx, left, rest, rotated));
                    cursor.x = match cursor.dir {
                        Direction::Forward => (left + w) as i64,
                        Direction::Backward => left as i64 - 1,
                    };
                    cursor.normalize(width, policy.zigzag);
                    passes = 0;
                    continue;
                }
            }
        }

        passes += 1;
    }

    finish(placements, skyline, true)
}

fn oriented(rect: &Rectangle, rotated: bool) -> Rectangle {
    if rotated {
        rect.rotated()
    } else {
        rect.clone()
    }
}

fn make_placement(rect: &Rectangle, index: usize, left: usize, base: u32, rotated: bool) -> Placement {
    Placement {
        x: left as i32,
        y: base as i32,
        width: rect.width(),
        height: rect.height(),
        index,
        id: rect.id().clone(),
        rotated,
    }
}

fn finish(placements: Vec<Placement>, skyline: Skyline, complete: bool) -> Layout {
    Layout {
        cost: skyline.max_height(),
        profile: skyline.heights,
        placements,
        complete,
    }
}
