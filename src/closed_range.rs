/*!
A 1-based, inclusive column range.
Column positions throughout this crate follow alignment conventions, so the first column is 1 and a range `[2, 4]` covers three columns.
The empty range is used wherever an operation accepts "the whole table".
*/

use std::fmt;

/// Inclusive, 1-based range of columns. A range with `begin > end` is empty.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ClosedRange {
    /// First column in the range
    pub begin: usize,
    /// Last column in the range (inclusive)
    pub end: usize
}

impl ClosedRange {
    /// Constructor
    /// # Arguments
    /// * `begin` - the first column, 1-based
    /// * `end` - the last column, inclusive
    pub fn new(begin: usize, end: usize) -> ClosedRange {
        ClosedRange { begin, end }
    }

    /// Returns the canonical empty range.
    pub fn empty() -> ClosedRange {
        ClosedRange { begin: 1, end: 0 }
    }

    /// Builds the range covering `count` columns starting at `begin`; `count` of 0 gives an empty range.
    /// # Arguments
    /// * `begin` - the first column, 1-based
    /// * `count` - the number of columns spanned
    pub fn with_length(begin: usize, count: usize) -> ClosedRange {
        if count == 0 {
            ClosedRange::empty()
        } else {
            ClosedRange { begin, end: begin + count - 1 }
        }
    }

    /// Returns the number of columns in the range, 0 if empty.
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.end - self.begin + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.begin > self.end
    }

    /// Returns true if `position` falls inside the range.
    pub fn contains(&self, position: usize) -> bool {
        !self.is_empty() && position >= self.begin && position <= self.end
    }

    /// Converts to the equivalent 0-based, half-open range for slicing.
    pub fn to_zero_based(&self) -> std::ops::Range<usize> {
        if self.is_empty() {
            0..0
        } else {
            (self.begin - 1)..self.end
        }
    }
}

impl Default for ClosedRange {
    fn default() -> Self {
        ClosedRange::empty()
    }
}

impl fmt::Display for ClosedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.begin, self.end)
    }
}
