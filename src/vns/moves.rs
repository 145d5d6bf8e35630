//! Neighbourhood move operators.
//!
//! A neighbourhood index `k` picks a move family and a strength. With the
//! default [`MoveSet::Order`] the family cycles with `k mod 3`:
//!
//! | `k mod 3` | Move | Strength `s = ceil(k / 3)` |
//! |-----------|------|----------------------------|
//! | 1 | [`Move::Rotate`] | rotate `s` consecutive rectangles |
//! | 2 | [`Move::Shift`] | move one rectangle `s` places earlier |
//! | 0 | [`Move::Scramble`] | `s` random rotate-and-relocate steps |
//!
//! A rotation run longer than the order, or a shift as long as the order,
//! falls back to a scramble of the same strength.
//!
//! Every operator is a pure function of its inputs (plus the supplied
//! generator for [`Move::Scramble`]) and returns fresh buffers.

use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::packing::{PlacementPolicy, PolicyFlag, Rectangle};

/// Which move families a neighbourhood index can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MoveSet {
    /// Rotate, shift and scramble the rectangle order.
    #[default]
    Order,
    /// Only flip placement-policy flags; the order is never touched.
    Policy,
    /// Order moves plus a fourth family of policy toggles.
    Combined,
}

impl MoveSet {
    /// Number of families `k` cycles through.
    pub fn families(self) -> usize {
        match self {
            MoveSet::Order => 3,
            MoveSet::Policy => 1,
            MoveSet::Combined => 4,
        }
    }
}

/// One neighbourhood move, anchored at a position chosen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Turn `count` consecutive rectangles (wrapping) by 90°.
    Rotate {
        /// Number of rectangles.
        count: usize,
    },
    /// Reinsert the rectangle `offset` places earlier (wrapping).
    Shift {
        /// Distance moved towards the front.
        offset: usize,
    },
    /// `count` rounds of maybe-rotate then relocate by a random offset.
    Scramble {
        /// Number of rounds.
        count: usize,
    },
    /// Flip `count` consecutive policy flags (wrapping).
    TogglePolicy {
        /// Number of flags.
        count: usize,
    },
}

impl Move {
    /// Selects the move of neighbourhood `k` for an order of `n` rectangles.
    pub fn select(k: usize, set: MoveSet, n: usize) -> Move {
        let families = set.families();
        let strength = k.div_ceil(families);
        match set {
            MoveSet::Policy => Move::TogglePolicy { count: k },
            MoveSet::Order | MoveSet::Combined => match k % families {
                1 if strength <= n => Move::Rotate { count: strength },
                2 if strength < n => Move::Shift { offset: strength },
                0 if set == MoveSet::Combined => Move::TogglePolicy { count: strength },
                _ => Move::Scramble { count: strength },
            },
        }
    }

    /// Number of anchor positions the move has over an order of `n`.
    pub fn neighbourhood_size(&self, n: usize) -> usize {
        match self {
            Move::TogglePolicy { .. } => PolicyFlag::COUNT,
            _ => n,
        }
    }
}

/// Applies `mv` at position `at`, returning the neighbour's order and policy.
pub fn apply<R: Rng>(
    mv: Move,
    order: &[Rectangle],
    policy: &PlacementPolicy,
    at: usize,
    strip_width: u32,
    rng: &mut R,
) -> (Vec<Rectangle>, PlacementPolicy) {
    match mv {
        Move::Rotate { count } => (rotate_run(order, at, count, strip_width), *policy),
        Move::Shift { offset } => (shift_earlier(order, at, offset), *policy),
        Move::Scramble { count } => (scramble(order, at, count, strip_width, rng), *policy),
        Move::TogglePolicy { count } => (order.to_vec(), policy.toggled(at, count)),
    }
}

/// Turns `count` rectangles from `at` onwards (wrapping).
///
/// A rectangle whose rotated width would exceed the strip is left as is.
pub fn rotate_run(order: &[Rectangle], at: usize, count: usize, strip_width: u32) -> Vec<Rectangle> {
    let mut next = order.to_vec();
    let n = next.len();
    if n == 0 {
        return next;
    }
    for offset in 0..count.min(n) {
        rotate_in_place(&mut next, (at + offset) % n, strip_width);
    }
    next
}

fn rotate_in_place(order: &mut [Rectangle], at: usize, strip_width: u32) {
    if order[at].height() <= strip_width {
        order[at] = order[at].rotated();
    }
}

/// Moves the rectangle at `at` to `offset` places earlier.
///
/// Underflow wraps towards the end of the order.
pub fn shift_earlier(order: &[Rectangle], at: usize, offset: usize) -> Vec<Rectangle> {
    let mut next = order.to_vec();
    shift_in_place(&mut next, at, offset);
    next
}

fn shift_in_place(order: &mut Vec<Rectangle>, at: usize, offset: usize) {
    let n = order.len();
    if n < 2 || at >= n {
        return;
    }
    let offset = offset % n;
    let target = if offset > at { at + n - 1 - offset } else { at - offset };
    let rect = order.remove(at);
    order.insert(target, rect);
}

/// `count` rounds of: rotate the rectangle at `at` with probability ½,
/// then move it a uniformly random `1..n` places earlier.
pub fn scramble<R: Rng>(
    order: &[Rectangle],
    at: usize,
    count: usize,
    strip_width: u32,
    rng: &mut R,
) -> Vec<Rectangle> {
    let mut next = order.to_vec();
    let n = next.len();
    if n == 0 {
        return next;
    }
    let at = at % n;
    for _ in 0..count {
        if rng.random_bool(0.5) {
            rotate_in_place(&mut next, at, strip_width);
        }
        if n >= 2 {
            let offset = rng.random_range(1..n);
            shift_in_place(&mut next, at, offset);
        }
    }
    next
}
