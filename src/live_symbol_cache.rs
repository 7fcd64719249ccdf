/*!
This module provides the LiveSymbolCache, which keeps a symbol string in sync with a changing column frequency source.
The full string is computed once at construction; afterwards only the columns named by each source notification are recomputed.
At any point between notifications, the cached string equals resolving every column of the source from scratch.

Sources report three kinds of change, always after the change has been applied:
* columns inserted - the range is in post-insertion numbering; those columns are resolved and spliced in
* columns removed - the range is in pre-removal numbering; those symbols are dropped without recomputation
* data changed - same column count, the range is recomputed and replaced only if different

# Example usage
```rust
use msa_symbols::closed_range::ClosedRange;
use msa_symbols::column_frequency::ColumnFrequencyTable;
use msa_symbols::live_symbol_cache::{LiveSymbolCache, SymbolEvent};
use msa_symbols::rule::Rule;
use msa_symbols::rule_set::RuleSet;
use msa_symbols::symbol_resolver::SymbolResolver;

let rules: RuleSet = vec![Rule::new(b'a', b"A", 0.5)].into_iter().collect();
let mut table = ColumnFrequencyTable::from_sequences(&[b"AC", b"AG"], None);
let mut cache = LiveSymbolCache::new(Some(&table), SymbolResolver::new(rules, b'_'));
assert_eq!(cache.symbol_string(), b"a_");

// the source grows by one column at the front
table.insert_blank_columns(1, 1);
table.add_sequence(b"A", None, 1);
let event = cache.columns_inserted(&table, ClosedRange::new(1, 1));
assert_eq!(event, SymbolEvent::SymbolsInserted(ClosedRange::new(1, 1)));
assert_eq!(cache.as_str(), Some("aa_"));
```
*/

use log::{debug, trace};
use std::fmt;

use crate::closed_range::ClosedRange;
use crate::column_frequency::ColumnFrequencyTable;
use crate::rule_set::RuleSet;
use crate::symbol_resolver::SymbolResolver;

/// Read access to an observable column frequency table.
pub trait FrequencySource {
    /// The current frequency table; its divisor is used for normalization
    fn frequency_table(&self) -> &ColumnFrequencyTable;

    /// The current number of columns
    fn length(&self) -> usize {
        self.frequency_table().length()
    }
}

impl FrequencySource for ColumnFrequencyTable {
    fn frequency_table(&self) -> &ColumnFrequencyTable {
        self
    }
}

/// Receiver of source change notifications. Notifications must be delivered in the order the changes happened.
pub trait ColumnObserver {
    /// `range` columns were inserted, in post-insertion numbering
    fn on_columns_inserted(&mut self, source: &dyn FrequencySource, range: ClosedRange);
    /// `range` columns were removed, in pre-removal numbering
    fn on_columns_removed(&mut self, source: &dyn FrequencySource, range: ClosedRange);
    /// the values of `range` columns changed without changing the column count
    fn on_data_changed(&mut self, source: &dyn FrequencySource, range: ClosedRange);
}

/// Change notifications for downstream consumers of the symbol string
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SymbolEvent {
    /// Symbols were inserted at this range
    SymbolsInserted(ClosedRange),
    /// Symbols were removed from this range (pre-removal numbering)
    SymbolsRemoved(ClosedRange),
    /// Symbols within this range changed
    DataChanged(ClosedRange)
}

/// Callback invoked for every emitted SymbolEvent
pub type SymbolListener = Box<dyn FnMut(&SymbolEvent)>;

/// Cached, incrementally maintained symbol string for a frequency source.
pub struct LiveSymbolCache {
    /// Resolver holding the rules and default symbol
    resolver: SymbolResolver,
    /// One symbol per source column
    symbols: Vec<u8>,
    /// Subscribers to emitted events
    listeners: Vec<SymbolListener>
}

impl LiveSymbolCache {
    /// Creates the cache and computes the full symbol string from `source`.
    /// Without a source, the string is empty.
    /// # Arguments
    /// * `source` - optional frequency source to resolve
    /// * `resolver` - the rules and default symbol to resolve with
    pub fn new(source: Option<&dyn FrequencySource>, resolver: SymbolResolver) -> LiveSymbolCache {
        let mut cache = LiveSymbolCache {
            resolver,
            symbols: vec![],
            listeners: vec![]
        };
        if let Some(s) = source {
            cache.symbols = cache.calculate(s, ClosedRange::empty());
            debug!("Initial symbol string computed for {} columns", cache.symbols.len());
        }
        cache
    }

    /// Registers a listener for every future SymbolEvent.
    pub fn subscribe(&mut self, listener: SymbolListener) {
        self.listeners.push(listener);
    }

    /// Splices in symbols for columns the source just inserted.
    /// # Arguments
    /// * `source` - the source, already containing the new columns
    /// * `range` - the inserted columns in post-insertion numbering
    /// # Panics
    /// * if `range` is empty, does not fit within the source, or does not start within the cached string
    pub fn columns_inserted(&mut self, source: &dyn FrequencySource, range: ClosedRange) -> SymbolEvent {
        assert!(!range.is_empty(), "inserted range may not be empty");
        assert!(range.begin <= self.symbols.len() + 1, "inserted range begins beyond the symbol string");
        let new_symbols = self.calculate(source, range);
        let index = range.begin - 1;
        self.symbols.splice(index..index, new_symbols);
        debug_assert_eq!(self.symbols.len(), source.length());

        debug!("Symbols inserted at {range}");
        self.emit(SymbolEvent::SymbolsInserted(range))
    }

    /// Drops the symbols for columns the source just removed.
    /// # Arguments
    /// * `range` - the removed columns in pre-removal numbering
    /// # Panics
    /// * if `range` is empty or extends past the cached string
    pub fn columns_removed(&mut self, source: &dyn FrequencySource, range: ClosedRange) -> SymbolEvent {
        assert!(!range.is_empty(), "removed range may not be empty");
        assert!(range.end <= self.symbols.len(), "removed range extends beyond the symbol string");
        self.symbols.drain(range.to_zero_based());
        debug_assert_eq!(self.symbols.len(), source.length());

        debug!("Symbols removed at {range}");
        self.emit(SymbolEvent::SymbolsRemoved(range))
    }

    /// Recomputes the symbols for columns whose values changed.
    /// Returns None, and notifies nobody, if the recomputed symbols are identical.
    /// # Arguments
    /// * `source` - the source with the updated values
    /// * `range` - the changed columns
    /// # Panics
    /// * if `range` is empty or extends past the source or the cached string
    pub fn data_changed(&mut self, source: &dyn FrequencySource, range: ClosedRange) -> Option<SymbolEvent> {
        assert!(!range.is_empty(), "changed range may not be empty");
        assert!(range.end <= self.symbols.len(), "changed range extends beyond the symbol string");
        let new_symbols = self.calculate(source, range);
        let old_symbols = &mut self.symbols[range.to_zero_based()];
        if old_symbols[..] == new_symbols[..] {
            trace!("Data change at {range} left symbols untouched");
            return None;
        }
        old_symbols.copy_from_slice(&new_symbols);

        debug!("Symbols changed at {range}");
        Some(self.emit(SymbolEvent::DataChanged(range)))
    }

    /// Replaces the rules and recomputes the full string.
    /// Emits a DataChanged over every column if the string changed, see `recalculate_all` for width changes.
    /// # Arguments
    /// * `rule_set` - the new rules
    /// * `source` - the source being tracked, if any
    pub fn set_rule_set(&mut self, rule_set: RuleSet, source: Option<&dyn FrequencySource>) -> Option<SymbolEvent> {
        self.resolver.set_rule_set(rule_set);
        self.recalculate_all(source)
    }

    /// Replaces the default symbol and recomputes the full string.
    /// Emits a DataChanged over every column if the string changed, see `recalculate_all` for width changes.
    /// # Arguments
    /// * `default_symbol` - the new default symbol
    /// * `source` - the source being tracked, if any
    pub fn set_default_symbol(&mut self, default_symbol: u8, source: Option<&dyn FrequencySource>) -> Option<SymbolEvent> {
        self.resolver.set_default_symbol(default_symbol);
        self.recalculate_all(source)
    }

    /// Recomputes every column from `source`, or empties the string without one.
    /// If the width is unchanged, a single DataChanged is emitted.
    /// If the width changed, the old symbols are reported removed and the new ones inserted, and the last emitted event is returned.
    fn recalculate_all(&mut self, source: Option<&dyn FrequencySource>) -> Option<SymbolEvent> {
        let new_symbols = match source {
            Some(s) => self.calculate(s, ClosedRange::empty()),
            None => vec![]
        };
        debug!("Full recomputation over {} columns", new_symbols.len());
        if new_symbols == self.symbols {
            return None;
        }

        let old_len = self.symbols.len();
        let new_len = new_symbols.len();
        self.symbols = new_symbols;
        if old_len == new_len {
            return Some(self.emit(SymbolEvent::DataChanged(ClosedRange::new(1, new_len))));
        }

        debug!("Symbol string width changed from {old_len} to {new_len}");
        let mut last_event = None;
        if old_len > 0 {
            last_event = Some(self.emit(SymbolEvent::SymbolsRemoved(ClosedRange::new(1, old_len))));
        }
        if new_len > 0 {
            last_event = Some(self.emit(SymbolEvent::SymbolsInserted(ClosedRange::new(1, new_len))));
        }
        last_event
    }

    /// Resolves `range` of the source, or every column if `range` is empty
    fn calculate(&self, source: &dyn FrequencySource, range: ClosedRange) -> Vec<u8> {
        let table = source.frequency_table();
        if table.is_empty() {
            assert!(range.is_empty(), "range given for an empty source");
            return vec![];
        }
        assert!(range.is_empty() || range.end <= table.length(), "range extends beyond the source");
        self.resolver.resolve_columns(&table.percentages(range))
    }

    fn emit(&mut self, event: SymbolEvent) -> SymbolEvent {
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
        event
    }

    /// Returns the symbol string as text if every symbol is ASCII
    pub fn as_str(&self) -> Option<&str> {
        if self.symbols.is_ascii() {
            std::str::from_utf8(&self.symbols).ok()
        } else {
            None
        }
    }

    // getters
    pub fn symbol_string(&self) -> &[u8] {
        &self.symbols
    }

    pub fn resolver(&self) -> &SymbolResolver {
        &self.resolver
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl ColumnObserver for LiveSymbolCache {
    fn on_columns_inserted(&mut self, source: &dyn FrequencySource, range: ClosedRange) {
        self.columns_inserted(source, range);
    }

    fn on_columns_removed(&mut self, source: &dyn FrequencySource, range: ClosedRange) {
        self.columns_removed(source, range);
    }

    fn on_data_changed(&mut self, source: &dyn FrequencySource, range: ClosedRange) {
        self.data_changed(source, range);
    }
}

impl fmt::Debug for LiveSymbolCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveSymbolCache")
            .field("resolver", &self.resolver)
            .field("symbols", &String::from_utf8_lossy(&self.symbols))
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::rule::Rule;

    use std::cell::RefCell;
    use std::rc::Rc;

    fn ab_resolver() -> SymbolResolver {
        let rules: RuleSet = vec![
            Rule::new(b'a', b"A", 0.5),
            Rule::new(b'b', b"B", 0.5)
        ].into_iter().collect();
        SymbolResolver::new(rules, b'_')
    }

    /// Resolves the whole source from scratch, the reference the cache must always match
    fn from_scratch(source: &ColumnFrequencyTable, resolver: &SymbolResolver) -> Vec<u8> {
        resolver.resolve_columns(&source.percentages(ClosedRange::empty()))
    }

    /// Attaches a listener that records every event
    fn record_events(cache: &mut LiveSymbolCache) -> Rc<RefCell<Vec<SymbolEvent>>> {
        let events = Rc::new(RefCell::new(vec![]));
        let sink = events.clone();
        cache.subscribe(Box::new(move |event| sink.borrow_mut().push(*event)));
        events
    }

    #[test]
    fn test_no_source() {
        let cache = LiveSymbolCache::new(None, ab_resolver());
        assert!(cache.is_empty());
        assert_eq!(cache.as_str(), Some(""));
        assert_eq!(cache.resolver(), &ab_resolver());
    }

    #[test]
    fn test_empty_source() {
        let table = ColumnFrequencyTable::default();
        let cache = LiveSymbolCache::new(Some(&table), ab_resolver());
        assert!(cache.symbol_string().is_empty());
    }

    #[test]
    fn test_initial_string() {
        let table = ColumnFrequencyTable::from_sequences(&[b"--AB--C-DEF", b"---B-XC-DE-"], Some(b'-'));
        let cache = LiveSymbolCache::new(Some(&table), ab_resolver());
        assert_eq!(cache.symbol_string(), from_scratch(&table, &ab_resolver()));
        assert_eq!(cache.as_str(), Some("__ab_______"));
        assert_eq!(cache.len(), 11);
    }

    #[test]
    fn test_columns_inserted() {
        let mut table = ColumnFrequencyTable::default();
        let mut cache = LiveSymbolCache::new(Some(&table), ab_resolver());
        let events = record_events(&mut cache);

        // append a first row to an empty source
        table = ColumnFrequencyTable::from_sequences(&[b"ABCD"], Some(b'-'));
        cache.columns_inserted(&table, ClosedRange::new(1, 4));
        assert_eq!(cache.as_str(), Some("ab__"));

        // three gap columns at position 2
        table.insert_blank_columns(2, 3);
        cache.columns_inserted(&table, ClosedRange::new(2, 4));
        assert_eq!(cache.as_str(), Some("a___b__"));

        assert_eq!(*events.borrow(), vec![
            SymbolEvent::SymbolsInserted(ClosedRange::new(1, 4)),
            SymbolEvent::SymbolsInserted(ClosedRange::new(2, 4))
        ]);
    }

    #[test]
    fn test_columns_removed() {
        let mut table = ColumnFrequencyTable::from_sequences(&[b"-AAB--C--DEF", b"--AB-XC--D--", b"---B-XC--DE-"], Some(b'-'));
        let mut cache = LiveSymbolCache::new(Some(&table), ab_resolver());
        let events = record_events(&mut cache);
        assert_eq!(cache.as_str(), Some("__ab________"));

        for range in [ClosedRange::new(8, 9), ClosedRange::new(5, 5), ClosedRange::new(1, 1)] {
            table.remove_columns(range.begin, range.len());
            cache.columns_removed(&table, range);
        }
        assert_eq!(cache.as_str(), Some("_ab_____"));
        assert_eq!(*events.borrow(), vec![
            SymbolEvent::SymbolsRemoved(ClosedRange::new(8, 9)),
            SymbolEvent::SymbolsRemoved(ClosedRange::new(5, 5)),
            SymbolEvent::SymbolsRemoved(ClosedRange::new(1, 1))
        ]);
    }

    #[test]
    fn test_data_changed() {
        let mut table = ColumnFrequencyTable::from_sequences(&[b"-AAB--", b"--AB-X", b"---A-X"], Some(b'-'));
        let mut cache = LiveSymbolCache::new(Some(&table), ab_resolver());
        let events = record_events(&mut cache);
        assert_eq!(cache.as_str(), Some("__ab__"));

        // slide rows 2-3 of columns 3-4 one to the left
        //  -AAB--       -AAB--
        //  --AB-X  -->  -AB--X
        //  ---A-X       --A--X
        table.subtract_sequence(b"AB", None, 3);
        table.subtract_sequence(b"-A", Some(b'-'), 3);
        table.add_sequence(b"AB-", Some(b'-'), 2);
        table.add_sequence(b"-A-", Some(b'-'), 2);
        table.purge_zero_entries(2, 4);
        let event = cache.data_changed(&table, ClosedRange::new(2, 4));
        assert_eq!(event, Some(SymbolEvent::DataChanged(ClosedRange::new(2, 4))));
        assert_eq!(cache.as_str(), Some("_aa___"));
        assert_eq!(cache.symbol_string(), from_scratch(&table, &ab_resolver()));

        // a notification without an effective change is swallowed
        assert_eq!(cache.data_changed(&table, ClosedRange::new(1, 6)), None);
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn test_set_rule_set() {
        let table = ColumnFrequencyTable::from_sequences(&[b"AB", b"AC"], None);
        let mut cache = LiveSymbolCache::new(Some(&table), ab_resolver());
        let events = record_events(&mut cache);
        assert_eq!(cache.as_str(), Some("ab"));

        // same rules in a new set, nothing to report
        assert_eq!(cache.set_rule_set(ab_resolver().rule_set().clone(), Some(&table)), None);

        let rules: RuleSet = vec![Rule::new(b'x', b"BC", 1.0)].into_iter().collect();
        assert_eq!(
            cache.set_rule_set(rules, Some(&table)),
            Some(SymbolEvent::DataChanged(ClosedRange::new(1, 2)))
        );
        assert_eq!(cache.as_str(), Some("_x"));

        assert_eq!(
            cache.set_default_symbol(b'.', Some(&table)),
            Some(SymbolEvent::DataChanged(ClosedRange::new(1, 2)))
        );
        assert_eq!(cache.as_str(), Some(".x"));
        assert_eq!(events.borrow().len(), 2);
    }

    #[test]
    fn test_set_rule_set_width_change() {
        let table = ColumnFrequencyTable::from_sequences(&[b"ABA"], None);
        let mut cache = LiveSymbolCache::new(None, ab_resolver());
        let events = record_events(&mut cache);

        // attaching a source through a rule change reports the whole string as new
        assert_eq!(
            cache.set_rule_set(ab_resolver().rule_set().clone(), Some(&table)),
            Some(SymbolEvent::SymbolsInserted(ClosedRange::new(1, 3)))
        );
        assert_eq!(cache.as_str(), Some("aba"));

        // a source of another width replaces every symbol
        let narrow = ColumnFrequencyTable::from_sequences(&[b"BB"], None);
        assert_eq!(
            cache.set_default_symbol(b'.', Some(&narrow)),
            Some(SymbolEvent::SymbolsInserted(ClosedRange::new(1, 2)))
        );
        assert_eq!(cache.as_str(), Some("bb"));

        // detaching empties the string
        assert_eq!(
            cache.set_default_symbol(b'*', None),
            Some(SymbolEvent::SymbolsRemoved(ClosedRange::new(1, 2)))
        );
        assert!(cache.is_empty());

        assert_eq!(*events.borrow(), vec![
            SymbolEvent::SymbolsInserted(ClosedRange::new(1, 3)),
            SymbolEvent::SymbolsRemoved(ClosedRange::new(1, 3)),
            SymbolEvent::SymbolsInserted(ClosedRange::new(1, 2)),
            SymbolEvent::SymbolsRemoved(ClosedRange::new(1, 2))
        ]);
    }

    #[test]
    fn test_independent_caches() {
        let mut table = ColumnFrequencyTable::from_sequences(&[b"AB"], None);
        let mut first = LiveSymbolCache::new(Some(&table), ab_resolver());
        let mut second = LiveSymbolCache::new(Some(&table), SymbolResolver::new(RuleSet::default(), b'*'));

        table.insert_blank_columns(3, 1);
        table.add_sequence(b"B", None, 3);
        for cache in [&mut first, &mut second] {
            cache.on_columns_inserted(&table, ClosedRange::new(3, 3));
        }
        assert_eq!(first.as_str(), Some("abb"));
        assert_eq!(second.as_str(), Some("***"));
    }

    #[test]
    fn test_non_ascii() {
        let rules: RuleSet = vec![Rule::new(0xff, b"A", 0.5)].into_iter().collect();
        let table = ColumnFrequencyTable::from_sequences(&[b"A"], None);
        let cache = LiveSymbolCache::new(Some(&table), SymbolResolver::new(rules, b'_'));
        assert_eq!(cache.symbol_string(), &[0xffu8]);
        assert_eq!(cache.as_str(), None);
    }

    #[test]
    #[should_panic(expected = "removed range extends beyond the symbol string")]
    fn test_remove_out_of_range() {
        let table = ColumnFrequencyTable::from_sequences(&[b"AB"], None);
        let mut cache = LiveSymbolCache::new(Some(&table), ab_resolver());
        cache.columns_removed(&table, ClosedRange::new(2, 3));
    }
}
