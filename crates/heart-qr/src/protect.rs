//! Protected-region classification.
//!
//! Finder corners and timing lines are the scanner's geometric anchors.
//! Cells in these regions are never subject to heart masking.

use serde::{Deserialize, Serialize};

/// Side of each protected finder corner block, in modules:
/// 7 (finder) + 1 (separator) + 1 (margin).
pub const FINDER_PROTECT: usize = 9;

/// Extra margin around the finder blocks in which no decorative pattern
/// is ever transferred onto light modules.
pub const FINDER_PATTERN_BAN: usize = FINDER_PROTECT + 2;

/// Row and column index of the timing patterns.
pub const TIMING_INDEX: usize = 6;

/// Protection class of a module position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtectionClass {
    None,
    Finder,
    Timing,
}

impl ProtectionClass {
    /// Whether the heart mask must leave this cell alone.
    pub fn is_protected(self) -> bool {
        !matches!(self, ProtectionClass::None)
    }
}

/// Classify `(row, col)` in an `n`-module symbol.
///
/// Finder takes precedence over timing. Timing lines are only reported when
/// `timing_protected` is set.
pub fn classify(row: usize, col: usize, n: usize, timing_protected: bool) -> ProtectionClass {
    if in_corner_block(row, col, n, FINDER_PROTECT) {
        ProtectionClass::Finder
    } else if timing_protected && (row == TIMING_INDEX || col == TIMING_INDEX) {
        ProtectionClass::Timing
    } else {
        ProtectionClass::None
    }
}

/// Whether `(row, col)` is inside one of the three `side`×`side` corner
/// blocks: top-left, top-right, bottom-left. Bottom-right never holds a
/// finder pattern.
pub fn in_corner_block(row: usize, col: usize, n: usize, side: usize) -> bool {
    let far = n.saturating_sub(side);
    let top = row < side;
    let left = col < side;
    (top && left) || (top && col >= far) || (row >= far && left)
}
