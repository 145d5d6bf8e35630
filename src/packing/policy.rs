//! Placement policy flags for the skyline placer.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Names one switch of a [`PlacementPolicy`].
///
/// The order of [`PolicyFlag::ALL`] is the order in which policy-toggle
/// moves walk the flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PolicyFlag {
    /// Reverse the scan direction at the strip edges instead of wrapping.
    Zigzag,
    /// Turn a rectangle that is too wide for the gap but fits rotated.
    CheckRotation,
    /// Prefer a later rectangle that exactly fills the gap.
    CheckForPerfect,
    /// After placing, walk the cursor back into lower columns.
    MoveBack,
    /// After repeated misses, jump to the globally lowest column.
    FindLowestAfter,
    /// Only the next rectangle in order may be placed.
    StrictOrder,
}

impl PolicyFlag {
    /// Every flag, in toggle order.
    pub const ALL: [PolicyFlag; 6] = [
        PolicyFlag::Zigzag,
        PolicyFlag::CheckRotation,
        PolicyFlag::CheckForPerfect,
        PolicyFlag::MoveBack,
        PolicyFlag::FindLowestAfter,
        PolicyFlag::StrictOrder,
    ];

    /// Number of flags.
    pub const COUNT: usize = Self::ALL.len();
}

/// Switches that change how the skyline placer chooses positions.
///
/// The default matches a plain left-to-right first-fit with gap refilling:
/// only `move_back` is set.
///
/// # Examples
///
/// ```
/// use u_strippack::packing::{PlacementPolicy, PolicyFlag};
///
/// let policy = PlacementPolicy::default().with_check_rotation(true);
/// assert!(policy.get(PolicyFlag::CheckRotation));
/// assert!(policy.get(PolicyFlag::MoveBack));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementPolicy {
    /// Reverse direction at the strip edges instead of wrapping to column 0.
    pub zigzag: bool,
    /// Rotate a rectangle when only its rotated footprint fits the gap.
    pub check_rotation: bool,
    /// Look ahead for a rectangle that fills the gap exactly.
    pub check_for_perfect: bool,
    /// Walk the cursor back over columns that are not higher after a placement.
    pub move_back: bool,
    /// Jump to the lowest column after a few unsuccessful passes.
    pub find_lowest_after: bool,
    /// Restrict every pass to the first unplaced rectangle.
    pub strict_order: bool,
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        Self {
            zigzag: false,
            check_rotation: false,
            check_for_perfect: false,
            move_back: true,
            find_lowest_after: false,
            strict_order: false,
        }
    }
}

impl PlacementPolicy {
    /// Sets `zigzag`.
    pub fn with_zigzag(mut self, on: bool) -> Self {
        self.zigzag = on;
        self
    }

    /// Sets `check_rotation`.
    pub fn with_check_rotation(mut self, on: bool) -> Self {
        self.check_rotation = on;
        self
    }

    /// Sets `check_for_perfect`.
    pub fn with_check_for_perfect(mut self, on: bool) -> Self {
        self.check_for_perfect = on;
        self
    }

    /// Sets `move_back`.
    pub fn with_move_back(mut self, on: bool) -> Self {
        self.move_back = on;
        self
    }

    /// Sets `find_lowest_after`.
    pub fn with_find_lowest_after(mut self, on: bool) -> Self {
        self.find_lowest_after = on;
        self
    }

    /// Sets `strict_order`.
    pub fn with_strict_order(mut self, on: bool) -> Self {
        self.strict_order = on;
        self
    }

    /// Reads one flag.
    pub fn get(&self, flag: PolicyFlag) -> bool {
        match flag {
            PolicyFlag::Zigzag => self.zigzag,
            PolicyFlag::CheckRotation => self.check_rotation,
            PolicyFlag::CheckForPerfect => self.check_for_perfect,
            PolicyFlag::MoveBack => self.move_back,
            PolicyFlag::FindLowestAfter => self.find_lowest_after,
            PolicyFlag::StrictOrder => self.strict_order,
        }
    }

    /// Writes one flag.
    pub fn set(&mut self, flag: PolicyFlag, on: bool) {
        let slot = match flag {
            PolicyFlag::Zigzag => &mut self.zigzag,
            PolicyFlag::CheckRotation => &mut self.check_rotation,
            PolicyFlag::CheckForPerfect => &mut self.check_for_perfect,
            PolicyFlag::MoveBack => &mut self.move_back,
            PolicyFlag::FindLowestAfter => &mut self.find_lowest_after,
            PolicyFlag::StrictOrder => &mut self.strict_order,
        };
        *slot = on;
    }

    /// Returns a copy with `count` consecutive flags flipped, starting at
    /// flag `start` and wrapping around [`PolicyFlag::ALL`].
    ///
    /// `count` is capped at the number of flags so no flag flips twice.
    pub fn toggled(&self, start: usize, count: usize) -> Self {
        let mut next = *self;
        for offset in 0..count.min(PolicyFlag::COUNT) {
            let flag = PolicyFlag::ALL[(start + offset) % PolicyFlag::COUNT];
            next.set(flag, !self.get(flag));
        }
        next
    }
}
