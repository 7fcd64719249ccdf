/*!
This module provides the LiveAlignment, an editable set of aligned rows that keeps its ColumnFrequencyTable in sync with every edit.
After each edit, registered observers are told which columns were inserted, removed, or changed, so a LiveSymbolCache can follow along.
The divisor of the table is always the number of rows, and the gap character (if configured) is never tallied.

# Example usage
```rust
use std::cell::RefCell;
use std::rc::Rc;
use msa_symbols::live_alignment::LiveAlignment;
use msa_symbols::live_symbol_cache::LiveSymbolCache;
use msa_symbols::rule::Rule;
use msa_symbols::rule_set::RuleSet;
use msa_symbols::symbol_config::SymbolConfig;
use msa_symbols::symbol_resolver::SymbolResolver;

let config = SymbolConfig::default();
let mut alignment = LiveAlignment::from_rows(vec![b"AC".to_vec(), b"AG".to_vec()], config.clone()).unwrap();

let rules: RuleSet = vec![Rule::new(b'a', b"A", 0.5)].into_iter().collect();
let cache = Rc::new(RefCell::new(
    LiveSymbolCache::new(Some(&alignment), SymbolResolver::with_config(rules, &config))
));
alignment.subscribe(cache.clone());
assert_eq!(cache.borrow().as_str(), Some("a "));

// the cache follows structural edits
alignment.insert_gap_columns(2, 1).unwrap();
assert_eq!(cache.borrow().as_str(), Some("a  "));
let removed = alignment.remove_gap_columns();
assert_eq!(removed.len(), 1);
assert_eq!(cache.borrow().as_str(), Some("a "));
```
*/

use log::{debug, trace};
use simple_error::bail;
use std::cell::RefCell;
use std::rc::Rc;

use crate::closed_range::ClosedRange;
use crate::column_frequency::ColumnFrequencyTable;
use crate::live_symbol_cache::{ColumnObserver, FrequencySource};
use crate::symbol_config::SymbolConfig;

/// Shared handle to a registered observer
pub type SharedObserver = Rc<RefCell<dyn ColumnObserver>>;

/// The structural or content change that observers are told about
#[derive(Clone, Copy, Debug)]
enum SourceChange {
    Inserted(ClosedRange),
    Removed(ClosedRange),
    Changed(ClosedRange)
}

/// Aligned rows with a live column frequency table and change observers.
pub struct LiveAlignment {
    /// The rows, all of the same length
    rows: Vec<Vec<u8>>,
    /// Counts of every non-gap character per column, divisor is the row count
    table: ColumnFrequencyTable,
    /// Gap and purge settings
    config: SymbolConfig,
    /// Notified after every edit, in registration order
    observers: Vec<SharedObserver>
}

impl LiveAlignment {
    /// Creates an empty alignment.
    /// # Arguments
    /// * `config` - provides the gap character and whether zero counts are purged
    pub fn with_config(config: SymbolConfig) -> LiveAlignment {
        LiveAlignment {
            rows: vec![],
            table: ColumnFrequencyTable::default(),
            config,
            observers: vec![]
        }
    }

    /// Creates an alignment pre-loaded with `rows`.
    /// # Arguments
    /// * `rows` - the aligned rows
    /// * `config` - provides the gap character and whether zero counts are purged
    /// # Errors
    /// * if the rows are not all the same, non-zero, length
    pub fn from_rows(rows: Vec<Vec<u8>>, config: SymbolConfig) -> Result<LiveAlignment, Box<dyn std::error::Error>> {
        let mut alignment = LiveAlignment::with_config(config);
        alignment.append_rows(rows)?;
        Ok(alignment)
    }

    /// Registers an observer for all future edits.
    pub fn subscribe(&mut self, observer: SharedObserver) {
        self.observers.push(observer);
    }

    /// Adds rows to the bottom of the alignment.
    /// On an empty alignment the columns are created and reported as inserted; otherwise every column is reported as changed.
    /// # Arguments
    /// * `rows` - the new rows, each as wide as the alignment
    /// # Errors
    /// * if any row is empty or differs in length from the alignment
    pub fn append_rows(&mut self, rows: Vec<Vec<u8>>) -> Result<(), Box<dyn std::error::Error>> {
        if rows.is_empty() {
            return Ok(());
        }
        let width = if self.rows.is_empty() { rows[0].len() } else { self.length() };
        if width == 0 {
            bail!("rows may not be empty");
        }
        if let Some(bad_row) = rows.iter().find(|r| r.len() != width) {
            bail!("row length {} does not match alignment width {}", bad_row.len(), width);
        }

        let gap_char = self.config.gap_char;
        if self.rows.is_empty() {
            self.rows = rows;
            self.table = ColumnFrequencyTable::from_sequences(&self.rows, gap_char);
            debug!("Alignment created with {} rows x {} columns", self.rows.len(), width);
            self.notify(SourceChange::Inserted(ClosedRange::new(1, width)));
        } else {
            for row in rows.iter() {
                self.table.add_sequence(row, gap_char, 1);
            }
            self.rows.extend(rows);
            self.table.set_divisor(self.rows.len());
            debug!("Alignment grew to {} rows", self.rows.len());
            self.notify(SourceChange::Changed(ClosedRange::new(1, width)));
        }
        Ok(())
    }

    /// Removes the rows in `range`.
    /// Removing every row empties the alignment and reports all columns as removed; otherwise every column is reported as changed.
    /// # Arguments
    /// * `range` - 1-based inclusive range of rows
    /// # Errors
    /// * if `range` is empty or outside the rows
    pub fn remove_rows(&mut self, range: ClosedRange) -> Result<(), Box<dyn std::error::Error>> {
        if range.is_empty() || range.begin == 0 || range.end > self.rows.len() {
            bail!("row range {} is invalid for {} rows", range, self.rows.len());
        }

        let width = self.length();
        if range.len() == self.rows.len() {
            self.rows.clear();
            self.table = ColumnFrequencyTable::default();
            debug!("All rows removed");
            self.notify(SourceChange::Removed(ClosedRange::new(1, width)));
            return Ok(());
        }

        let gap_char = self.config.gap_char;
        for row in self.rows.drain(range.to_zero_based()) {
            self.table.subtract_sequence(&row, gap_char, 1);
        }
        self.table.set_divisor(self.rows.len());
        if self.config.purge_zero_entries {
            self.table.purge_zero_entries(0, 0);
        }
        debug!("Rows {} removed, {} remain", range, self.rows.len());
        self.notify(SourceChange::Changed(ClosedRange::new(1, width)));
        Ok(())
    }

    /// Inserts `count` all-gap columns before `position`.
    /// # Arguments
    /// * `position` - 1-based column to insert before; `length() + 1` appends
    /// * `count` - the number of gap columns
    /// # Errors
    /// * if there is no gap character, the alignment has no rows, or `position` is out of range
    pub fn insert_gap_columns(&mut self, position: usize, count: usize) -> Result<(), Box<dyn std::error::Error>> {
        let gap_char = match self.config.gap_char {
            Some(g) => g,
            None => bail!("no gap character is configured")
        };
        if self.rows.is_empty() {
            bail!("cannot insert columns into an alignment without rows");
        }
        if position == 0 || position > self.length() + 1 {
            bail!("position {} is outside [1, {}]", position, self.length() + 1);
        }
        if count == 0 {
            return Ok(());
        }

        let index = position - 1;
        for row in self.rows.iter_mut() {
            row.splice(index..index, std::iter::repeat(gap_char).take(count));
        }
        self.table.insert_blank_columns(position, count);
        debug!("Inserted {count} gap columns at {position}");
        self.notify(SourceChange::Inserted(ClosedRange::with_length(position, count)));
        Ok(())
    }

    /// Removes every column that contains only gaps.
    /// Runs of adjacent gap columns are removed from right to left, one notification per run, so each range is valid when it is reported.
    /// Returns the removed runs in ascending order, in pre-removal column numbering.
    /// Without a gap character nothing is removed. If every column is removed, the rows are dropped as well.
    pub fn remove_gap_columns(&mut self) -> Vec<ClosedRange> {
        let gap_char = match self.config.gap_char {
            Some(g) => g,
            None => return vec![]
        };

        let mut runs: Vec<ClosedRange> = vec![];
        for index in 0..self.length() {
            if !self.rows.iter().all(|row| row[index] == gap_char) {
                continue;
            }
            let position = index + 1;
            match runs.last_mut() {
                Some(run) if run.end + 1 == position => run.end = position,
                _ => runs.push(ClosedRange::new(position, position))
            }
        }

        for &run in runs.iter().rev() {
            for row in self.rows.iter_mut() {
                row.drain(run.to_zero_based());
            }
            self.table.remove_columns(run.begin, run.len());
            trace!("Removed gap columns {run}");
            self.notify(SourceChange::Removed(run));
        }
        if !runs.is_empty() && self.length() == 0 {
            // zero-width rows are not kept around
            self.rows.clear();
            self.table = ColumnFrequencyTable::default();
        }
        debug!("Removed {} gap column runs", runs.len());
        runs
    }

    /// Overwrites part of a row starting at `column`.
    /// Only the counts of the overwritten span are touched, and that span is reported as changed.
    /// # Arguments
    /// * `row` - 1-based row index
    /// * `column` - 1-based column where `bytes` begins
    /// * `bytes` - the replacement characters
    /// # Errors
    /// * if `bytes` is empty or the span falls outside the alignment
    pub fn replace_segment(&mut self, row: usize, column: usize, bytes: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
        if bytes.is_empty() {
            bail!("replacement may not be empty");
        }
        if row == 0 || row > self.rows.len() {
            bail!("row {} is outside [1, {}]", row, self.rows.len());
        }
        let span = ClosedRange::with_length(column, bytes.len());
        if column == 0 || span.end > self.length() {
            bail!("columns {} are outside [1, {}]", span, self.length());
        }

        let gap_char = self.config.gap_char;
        let segment = &mut self.rows[row-1][span.to_zero_based()];
        self.table.subtract_sequence(segment, gap_char, column);
        segment.copy_from_slice(bytes);
        self.table.add_sequence(bytes, gap_char, column);
        if self.config.purge_zero_entries {
            self.table.purge_zero_entries(span.begin, span.end);
        }
        trace!("Row {row} replaced at {span}");
        self.notify(SourceChange::Changed(span));
        Ok(())
    }

    /// Removes all rows and columns, reporting every column as removed.
    pub fn clear(&mut self) {
        let width = self.length();
        self.rows.clear();
        self.table = ColumnFrequencyTable::default();
        if width > 0 {
            debug!("Alignment cleared");
            self.notify(SourceChange::Removed(ClosedRange::new(1, width)));
        }
    }

    fn notify(&self, change: SourceChange) {
        for observer in self.observers.iter() {
            let mut observer = observer.borrow_mut();
            match change {
                SourceChange::Inserted(range) => observer.on_columns_inserted(self, range),
                SourceChange::Removed(range) => observer.on_columns_removed(self, range),
                SourceChange::Changed(range) => observer.on_data_changed(self, range)
            }
        }
    }

    // getters
    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }

    /// Returns the 1-based `row`, if it exists
    pub fn row(&self, row: usize) -> Option<&[u8]> {
        if row == 0 {
            None
        } else {
            self.rows.get(row - 1).map(|r| r.as_slice())
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn config(&self) -> &SymbolConfig {
        &self.config
    }
}

impl FrequencySource for LiveAlignment {
    fn frequency_table(&self) -> &ColumnFrequencyTable {
        &self.table
    }
}

impl std::fmt::Debug for LiveAlignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveAlignment")
            .field("rows", &self.rows.iter().map(|r| String::from_utf8_lossy(r)).collect::<Vec<_>>())
            .field("config", &self.config)
            .field("observers", &self.observers.len())
            .finish()
    }
}
