/*!
This module provides the ColumnFrequencyTable, a column-wise character count table for an alignment.
Every column maps a character to the number of times it occurs in that column.
The table can be merged with other tables (or raw sequences) at an offset, resized, sliced, and converted into percentages.

# Example usage
```rust
use msa_symbols::closed_range::ClosedRange;
use msa_symbols::column_frequency::ColumnFrequencyTable;

let rows: [&[u8]; 2] = [b"AC-T", b"AGGT"];
let mut table = ColumnFrequencyTable::from_sequences(&rows, Some(b'-'));
assert_eq!(table.length(), 4);
assert_eq!(table.count(1, b'A'), 2);
assert_eq!(table.count(3, b'-'), 0);

// add a third row on top of the tally
table.add_sequence(b"TC", None, 3);
table.set_divisor(3);
let percents = table.percentages(ClosedRange::new(4, 4));
assert!((percents[0][&b'T'] - 2.0 / 3.0).abs() < 1e-12);
assert!((percents[0][&b'C'] - 1.0 / 3.0).abs() < 1e-12);
```

Note that keys with a count of 0 are allowed; they typically appear after paired add/subtract calls.
They are functionally equivalent to a missing key, and `purge_zero_entries` removes them on request.
*/

use rustc_hash::FxHashMap as HashMap;

use crate::closed_range::ClosedRange;

/// Character counts for a single column
pub type CharCounts = HashMap<u8, i64>;
/// Normalized character proportions for a single column
pub type CharPercents = HashMap<u8, f64>;

/// Ordered table of per-column character counts with a divisor used for normalization.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnFrequencyTable {
    /// One map per column, in column order
    columns: Vec<CharCounts>,
    /// Denominator used when converting counts to percentages, typically the number of rows
    divisor: usize
}

impl ColumnFrequencyTable {
    /// Creates a table from raw counts.
    /// # Arguments
    /// * `columns` - the character counts, one map per column
    /// * `divisor` - the denominator for percentages; a divisor of 0 is allowed until percentages are requested
    pub fn from_counts(columns: Vec<CharCounts>, divisor: usize) -> ColumnFrequencyTable {
        ColumnFrequencyTable {
            columns,
            divisor
        }
    }

    /// Creates a table with `length` empty columns.
    /// # Arguments
    /// * `length` - the number of columns
    /// * `divisor` - the denominator for percentages
    pub fn with_blank_columns(length: usize, divisor: usize) -> ColumnFrequencyTable {
        ColumnFrequencyTable {
            columns: vec![Default::default(); length],
            divisor
        }
    }

    /// Tallies a set of equal-length aligned rows into a new table; the divisor is the number of rows.
    /// # Arguments
    /// * `rows` - the aligned rows, all of the same length
    /// * `skip_char` - optional character that is never tallied, e.g. a gap
    /// # Panics
    /// * if the rows are not all the same length
    pub fn from_sequences<S: AsRef<[u8]>>(rows: &[S], skip_char: Option<u8>) -> ColumnFrequencyTable {
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut table = ColumnFrequencyTable::with_blank_columns(width, rows.len());
        if width > 0 {
            for row in rows.iter() {
                assert_eq!(row.as_ref().len(), width, "rows must all be the same length");
                table.add_sequence(row.as_ref(), skip_char, 1);
            }
        }
        table
    }

    /// Adds the counts in `other` to this table, aligning column 1 of `other` with column `offset` of this table.
    /// Keys missing in this table are created.
    /// An add without the matching subtract is the caller's responsibility to keep consistent.
    /// # Arguments
    /// * `other` - the counts to add
    /// * `offset` - 1-based column of this table where `other` begins
    /// # Panics
    /// * if `offset` is outside `[1, length()]` or `other` runs past the end of this table
    /// # Example
    /// ```text
    /// this:   [ (A, 2) (C, 2) ], [ (T, 1) (G, 3) ]
    /// other:  [ (A, 1) (G, 1) ], [ (G, 1) ]
    /// result: [ (A, 3) (C, 2) (G, 1) ], [ (T, 1) (G, 4) ]
    /// ```
    pub fn add_counts(&mut self, other: &ColumnFrequencyTable, offset: usize) {
        self.merge_counts(other, offset, 1);
    }

    /// Subtracts the counts in `other` from this table, aligning column 1 of `other` with column `offset` of this table.
    /// Keys missing in this table are created with a negative count.
    /// # Arguments
    /// * `other` - the counts to subtract
    /// * `offset` - 1-based column of this table where `other` begins
    /// # Panics
    /// * if `offset` is outside `[1, length()]` or `other` runs past the end of this table
    pub fn subtract_counts(&mut self, other: &ColumnFrequencyTable, offset: usize) {
        self.merge_counts(other, offset, -1);
    }

    fn merge_counts(&mut self, other: &ColumnFrequencyTable, offset: usize, sign: i64) {
        assert!(offset > 0 && offset <= self.length(), "offset out of range");
        assert!(offset + other.length() - 1 <= self.length(), "offset + other.length() - 1 exceeded table length");

        for (other_column, column) in other.columns.iter().zip(self.columns[offset-1..].iter_mut()) {
            for (&c, &count) in other_column.iter() {
                *column.entry(c).or_insert(0) += sign * count;
            }
        }
    }

    /// Tallies one character per column from `characters`, starting at column `offset`.
    /// # Arguments
    /// * `characters` - the flat sequence, one character per column
    /// * `skip_char` - optional character that is not tallied
    /// * `offset` - 1-based column where `characters` begins
    /// # Panics
    /// * if `offset` is outside `[1, length()]` or `characters` runs past the end of this table
    pub fn add_sequence(&mut self, characters: &[u8], skip_char: Option<u8>, offset: usize) {
        self.merge_sequence(characters, skip_char, offset, 1);
    }

    /// Removes one tally per column for each character in `characters`, starting at column `offset`.
    /// # Arguments
    /// * `characters` - the flat sequence, one character per column
    /// * `skip_char` - optional character that is not tallied
    /// * `offset` - 1-based column where `characters` begins
    /// # Panics
    /// * if `offset` is outside `[1, length()]` or `characters` runs past the end of this table
    pub fn subtract_sequence(&mut self, characters: &[u8], skip_char: Option<u8>, offset: usize) {
        self.merge_sequence(characters, skip_char, offset, -1);
    }

    fn merge_sequence(&mut self, characters: &[u8], skip_char: Option<u8>, offset: usize, sign: i64) {
        if characters.is_empty() {
            return;
        }
        assert!(offset > 0 && offset <= self.length(), "offset out of range");
        assert!(offset + characters.len() - 1 <= self.length(), "offset + characters.len() - 1 exceeded table length");

        for (&c, column) in characters.iter().zip(self.columns[offset-1..].iter_mut()) {
            if skip_char == Some(c) {
                continue;
            }
            *column.entry(c).or_insert(0) += sign;
        }
    }

    /// Inserts `count` empty columns before `position`.
    /// # Arguments
    /// * `position` - 1-based column to insert before; `length() + 1` appends
    /// * `count` - the number of blank columns to insert
    /// # Panics
    /// * if `position` is outside `[1, length() + 1]`
    pub fn insert_blank_columns(&mut self, position: usize, count: usize) {
        assert!(position > 0 && position <= self.length() + 1, "position out of range");
        let index = position - 1;
        self.columns.splice(index..index, std::iter::repeat_with(CharCounts::default).take(count));
    }

    /// Removes `count` columns beginning at `position`.
    /// If fewer than `count` columns remain from `position`, only the remaining columns are removed.
    /// # Arguments
    /// * `position` - 1-based column where removal starts
    /// * `count` - the number of columns to remove
    /// # Panics
    /// * if `position` is outside `[1, length()]`
    pub fn remove_columns(&mut self, position: usize, count: usize) {
        assert!(position > 0 && position <= self.length(), "position out of range");
        let index = position - 1;
        let end = (index + count).min(self.length());
        self.columns.drain(index..end);
    }

    /// Returns an independent table containing only the columns in `range`, with the same divisor.
    /// # Arguments
    /// * `range` - the non-empty, 1-based inclusive range to copy
    /// # Panics
    /// * if `range` is empty or extends past `length()`
    pub fn slice(&self, range: ClosedRange) -> ColumnFrequencyTable {
        assert!(!range.is_empty(), "range must not be empty");
        assert!(range.begin > 0 && range.end <= self.length(), "range out of bounds");
        ColumnFrequencyTable {
            columns: self.columns[range.to_zero_based()].to_vec(),
            divisor: self.divisor
        }
    }

    /// Converts the counts in `range` into proportions by dividing each count by the divisor.
    /// An empty `range` converts every column.
    /// # Arguments
    /// * `range` - the 1-based inclusive range to convert, or empty for the whole table
    /// # Panics
    /// * if the range is out of bounds, or the divisor is 0 and there is anything to convert
    pub fn percentages(&self, range: ClosedRange) -> Vec<CharPercents> {
        assert!(range.is_empty() || (range.begin > 0 && range.end <= self.length()), "range out of bounds");
        if self.columns.is_empty() {
            return vec![];
        }
        assert!(self.divisor != 0, "divisor may not be zero");

        let columns = if range.is_empty() {
            &self.columns[..]
        } else {
            &self.columns[range.to_zero_based()]
        };
        let divisor = self.divisor as f64;
        columns.iter()
            .map(|column| {
                column.iter()
                    .map(|(&c, &count)| (c, count as f64 / divisor))
                    .collect::<CharPercents>()
            })
            .collect()
    }

    /// Removes every character key whose count is exactly zero within the columns `[from, to]`.
    /// If both are 0, every column is processed; if only `to` is 0, columns `from` through `length()` are processed.
    /// # Arguments
    /// * `from` - 1-based first column, or 0
    /// * `to` - 1-based last column, or 0
    /// # Panics
    /// * if either bound is beyond `length()`, `from > to` with a non-zero `to`, or `from` is 0 with a non-zero `to`
    /// # Example
    /// ```text
    /// this:   [ (B, 0) ], [ (A, 2) (C, 2) (G, 0) ], [ (T, 1) (G, 3) ], []
    /// result: [ ], [ (A, 2) (C, 2) ], [ (T, 1) (G, 3) ], []
    /// ```
    pub fn purge_zero_entries(&mut self, from: usize, to: usize) {
        assert!(from <= self.length(), "from out of range");
        assert!(to <= self.length(), "to out of range");
        assert!(from <= to || to == 0, "from must not exceed to");
        assert!(!(from == 0 && to != 0), "from may not be zero if to is not zero");

        let actual_from = if from == 0 { 1 } else { from };
        let actual_to = if to == 0 { self.length() } else { to };
        if actual_from > actual_to {
            return;
        }
        for column in self.columns[actual_from-1..actual_to].iter_mut() {
            column.retain(|_c, count| *count != 0);
        }
    }

    /// Returns true if no column has any character key.
    pub fn all_columns_empty(&self) -> bool {
        self.columns.iter().all(|c| c.is_empty())
    }

    /// Returns the count for character `c` at 1-based `position`, 0 if absent.
    pub fn count(&self, position: usize, c: u8) -> i64 {
        self.column(position).get(&c).copied().unwrap_or(0)
    }

    /// Returns the counts of the column at 1-based `position`.
    /// # Panics
    /// * if `position` is outside `[1, length()]`
    pub fn column(&self, position: usize) -> &CharCounts {
        assert!(position > 0 && position <= self.length(), "position out of range");
        &self.columns[position - 1]
    }

    pub fn set_divisor(&mut self, divisor: usize) {
        self.divisor = divisor;
    }

    // getters
    pub fn columns(&self) -> &[CharCounts] {
        &self.columns
    }

    pub fn divisor(&self) -> usize {
        self.divisor
    }

    pub fn length(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a table from a compact list of (char, count) columns
    fn make_table(columns: &[&[(u8, i64)]], divisor: usize) -> ColumnFrequencyTable {
        let columns = columns.iter()
            .map(|col| col.iter().cloned().collect::<CharCounts>())
            .collect();
        ColumnFrequencyTable::from_counts(columns, divisor)
    }

    #[test]
    fn test_add_counts() {
        let mut table = make_table(&[&[(b'A', 2), (b'C', 2)], &[(b'T', 1), (b'G', 3)]], 4);
        let other = make_table(&[&[(b'A', 1), (b'G', 1)], &[(b'G', 1)]], 4);
        table.add_counts(&other, 1);
        assert_eq!(table, make_table(&[&[(b'A', 3), (b'C', 2), (b'G', 1)], &[(b'T', 1), (b'G', 4)]], 4));
    }

    #[test]
    fn test_add_counts_offset() {
        let mut table = ColumnFrequencyTable::with_blank_columns(3, 1);
        let other = make_table(&[&[(b'A', 1)]], 1);
        table.add_counts(&other, 3);
        assert_eq!(table.count(3, b'A'), 1);
        assert!(table.column(1).is_empty());
        assert!(table.column(2).is_empty());
    }

    #[test]
    fn test_subtract_counts() {
        let mut table = make_table(&[&[(b'A', 2), (b'C', 2)], &[(b'T', 1), (b'G', 3)]], 4);
        let other = make_table(&[&[(b'A', 1), (b'G', 1)], &[(b'-', 1), (b'G', 1)]], 4);
        table.subtract_counts(&other, 1);
        assert_eq!(table, make_table(&[
            &[(b'A', 1), (b'C', 2), (b'G', -1)],
            &[(b'T', 1), (b'G', 2), (b'-', -1)]
        ], 4));

        // paired add restores the values, leaving zero keys behind
        table.add_counts(&other, 1);
        assert_eq!(table.count(1, b'G'), 0);
        assert!(table.column(1).contains_key(&b'G'));
        table.purge_zero_entries(0, 0);
        assert_eq!(table, make_table(&[&[(b'A', 2), (b'C', 2)], &[(b'T', 1), (b'G', 3)]], 4));
    }

    #[test]
    #[should_panic(expected = "exceeded table length")]
    fn test_add_counts_overflow() {
        let mut table = ColumnFrequencyTable::with_blank_columns(2, 1);
        let other = ColumnFrequencyTable::with_blank_columns(2, 1);
        table.add_counts(&other, 2);
    }

    #[test]
    #[should_panic(expected = "offset out of range")]
    fn test_add_counts_zero_offset() {
        let mut table = ColumnFrequencyTable::with_blank_columns(2, 1);
        let other = ColumnFrequencyTable::with_blank_columns(1, 1);
        table.add_counts(&other, 0);
    }

    #[test]
    fn test_sequences() {
        let mut table = ColumnFrequencyTable::with_blank_columns(5, 2);
        table.add_sequence(b"A-C", Some(b'-'), 2);
        assert_eq!(table, make_table(&[&[], &[(b'A', 1)], &[], &[(b'C', 1)], &[]], 2));

        // without a skip character the gap is counted
        table.add_sequence(b"A-C", None, 2);
        assert_eq!(table, make_table(&[&[], &[(b'A', 2)], &[(b'-', 1)], &[(b'C', 2)], &[]], 2));

        table.subtract_sequence(b"A-C", None, 2);
        table.subtract_sequence(b"A-C", Some(b'-'), 2);
        table.purge_zero_entries(0, 0);
        assert!(table.all_columns_empty());
    }

    #[test]
    fn test_from_sequences() {
        let rows = [b"AB-".to_vec(), b"A-C".to_vec()];
        let table = ColumnFrequencyTable::from_sequences(&rows, Some(b'-'));
        assert_eq!(table, make_table(&[&[(b'A', 2)], &[(b'B', 1)], &[(b'C', 1)]], 2));

        let empty = ColumnFrequencyTable::from_sequences::<Vec<u8>>(&[], Some(b'-'));
        assert!(empty.is_empty());
        assert_eq!(empty.divisor(), 0);
    }

    #[test]
    fn test_insert_blank_columns() {
        let mut table = make_table(&[&[(b'A', 1)], &[(b'C', 1)]], 1);
        table.insert_blank_columns(2, 2);
        assert_eq!(table, make_table(&[&[(b'A', 1)], &[], &[], &[(b'C', 1)]], 1));

        // append
        table.insert_blank_columns(5, 1);
        assert_eq!(table.length(), 5);
        assert!(table.column(5).is_empty());

        // prepend, and zero count is a no-op
        table.insert_blank_columns(1, 1);
        table.insert_blank_columns(1, 0);
        assert_eq!(table.length(), 6);
        assert_eq!(table.count(2, b'A'), 1);
    }

    #[test]
    #[should_panic(expected = "position out of range")]
    fn test_insert_blank_columns_out_of_range() {
        let mut table = ColumnFrequencyTable::with_blank_columns(2, 1);
        table.insert_blank_columns(4, 1);
    }

    #[test]
    fn test_remove_columns() {
        let mut table = make_table(&[&[(b'A', 1)], &[(b'C', 1)], &[(b'G', 1)], &[(b'T', 1)]], 1);
        table.remove_columns(2, 1);
        assert_eq!(table, make_table(&[&[(b'A', 1)], &[(b'G', 1)], &[(b'T', 1)]], 1));

        // count is clamped to what remains
        table.remove_columns(2, 10);
        assert_eq!(table, make_table(&[&[(b'A', 1)]], 1));

        table.remove_columns(1, 1);
        assert!(table.is_empty());
    }

    #[test]
    fn test_slice_is_independent() {
        let table = make_table(&[&[(b'A', 1)], &[(b'C', 2)], &[(b'G', 3)]], 3);
        let mut slice = table.slice(ClosedRange::new(2, 3));
        assert_eq!(slice, make_table(&[&[(b'C', 2)], &[(b'G', 3)]], 3));

        slice.add_sequence(b"C", None, 1);
        assert_eq!(slice.count(1, b'C'), 3);
        assert_eq!(table.count(2, b'C'), 2);
    }

    #[test]
    #[should_panic(expected = "range must not be empty")]
    fn test_slice_empty() {
        let table = ColumnFrequencyTable::with_blank_columns(2, 1);
        table.slice(ClosedRange::empty());
    }

    #[test]
    fn test_percentages() {
        let table = make_table(&[&[(b'A', 1), (b'C', 3)], &[(b'G', 2)]], 4);
        let all = table.percentages(ClosedRange::empty());
        assert_eq!(all.len(), 2);
        assert_eq!(all[0][&b'A'], 0.25);
        assert_eq!(all[0][&b'C'], 0.75);
        assert_eq!(all[1][&b'G'], 0.5);

        let second = table.percentages(ClosedRange::new(2, 2));
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].len(), 1);
        assert_eq!(second[0][&b'G'], 0.5);

        // nothing to convert, so the divisor is irrelevant
        assert!(ColumnFrequencyTable::default().percentages(ClosedRange::empty()).is_empty());
    }

    #[test]
    #[should_panic(expected = "divisor may not be zero")]
    fn test_percentages_zero_divisor() {
        let table = make_table(&[&[(b'A', 1)]], 0);
        table.percentages(ClosedRange::empty());
    }

    #[test]
    fn test_purge_zero_entries_ranges() {
        let mut table = make_table(&[&[(b'B', 0)], &[(b'A', 2), (b'C', 2), (b'G', 0)], &[(b'T', 1), (b'G', 3)], &[]], 2);

        // only the first column
        table.purge_zero_entries(1, 1);
        assert!(table.column(1).is_empty());
        assert!(table.column(2).contains_key(&b'G'));

        // from 2 through the end
        table.purge_zero_entries(2, 0);
        assert_eq!(table, make_table(&[&[], &[(b'A', 2), (b'C', 2)], &[(b'T', 1), (b'G', 3)], &[]], 2));
    }

    #[test]
    fn test_all_columns_empty() {
        assert!(ColumnFrequencyTable::default().all_columns_empty());
        assert!(ColumnFrequencyTable::with_blank_columns(3, 1).all_columns_empty());
        assert!(!make_table(&[&[], &[(b'A', 1)]], 1).all_columns_empty());
    }
}
