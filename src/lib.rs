/*!
# msa_symbols
This library derives one-character symbols for the columns of a multiple sequence alignment, e.g. consensus or conservation tracks.
Each column's character proportions are matched against a set of tagged rules; the best matching rule's tag becomes the column symbol.

Key benefits:
* Rules are plain data: a tag, a set of member characters, and a threshold; presets for ClustalX amino groups and physico-chemical consensus classes are included
* Ties are resolved deterministically, preferring the most specific rule and then the earliest inserted one
* Symbol strings can be kept live, recomputing only the columns touched by each alignment edit

# Example usage
```rust
use msa_symbols::closed_range::ClosedRange;
use msa_symbols::column_frequency::ColumnFrequencyTable;
use msa_symbols::rule::Rule;
use msa_symbols::rule_set::RuleSet;
use msa_symbols::symbol_resolver::SymbolResolver;

let rows: [&[u8]; 4] = [b"AIK", b"AVR", b"ALE", b"G-D"];
let table = ColumnFrequencyTable::from_sequences(&rows, Some(b'-'));

// column 1 matches both 'A' and 'h'; the single-residue rule is more specific
let rules: RuleSet = vec![
    Rule::new(b'A', b"A", 0.7),
    Rule::new(b'h', b"AVILMFWC", 0.6),
    Rule::new(b'+', b"KR", 0.5)
].into_iter().collect();
let resolver = SymbolResolver::new(rules, b' ');

let symbols = resolver.resolve_columns(&table.percentages(ClosedRange::empty()));
assert_eq!(symbols, b"Ah+");
```
*/

/// A 1-based inclusive column range
pub mod closed_range;
/// Per-column character counts and conversion into proportions
pub mod column_frequency;
/// Utility for generating random alignments
pub mod example_gen;
/// An editable alignment that keeps its frequency table current and notifies observers
pub mod live_alignment;
/// Incrementally maintained symbol strings
pub mod live_symbol_cache;
/// Tagged character-group rules
pub mod rule;
/// Built-in rule sets
pub mod rule_presets;
/// Ordered collections of rules
pub mod rule_set;
/// Configuration shared by resolution and live tallying
pub mod symbol_config;
/// Column symbol resolution
pub mod symbol_resolver;
