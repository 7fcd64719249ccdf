/*!
This module resolves the character proportions of alignment columns into single consensus symbols under a RuleSet.

For one column, every character's proportion is credited to every rule that lists the character as a member.
Rules whose accumulated proportion reaches their threshold are candidates:
* no candidates - the default symbol is used
* one candidate - its tag is used
* several candidates - the candidate with the highest effective score (proportion divided by member count) wins, so more specific rules are preferred; exact ties go to the lowest serial number, i.e. the rule that has held its tag the longest

# Example usage
```rust
use msa_symbols::column_frequency::CharPercents;
use msa_symbols::rule::Rule;
use msa_symbols::rule_set::RuleSet;
use msa_symbols::symbol_resolver::SymbolResolver;

let rules: RuleSet = vec![
    Rule::new(b'a', b"AB", 0.3),
    Rule::new(b'c', b"C", 0.3)
].into_iter().collect();
let resolver = SymbolResolver::new(rules, b'_');

// both rules reach 0.3, but 'c' needs only one character to get there
let column: CharPercents = [(b'A', 0.2), (b'B', 0.1), (b'C', 0.3)].into_iter().collect();
assert_eq!(resolver.resolve_column(&column), b'c');

// nothing reaches a threshold
let column: CharPercents = [(b'A', 0.1), (b'G', 0.9)].into_iter().collect();
assert_eq!(resolver.resolve_column(&column), b'_');
```
*/

use log::trace;
use rustc_hash::FxHashMap as HashMap;
use std::cmp::Reverse;

use crate::column_frequency::CharPercents;
use crate::rule_set::RuleSet;
use crate::symbol_config::SymbolConfig;

/// Slack allowed when checking that a column's proportions sum to at most 1
const COLUMN_SUM_TOLERANCE: f64 = 1e-9;

/// Resolves columns into symbols for a fixed RuleSet and default symbol.
/// The inverse character-to-tags association is built once so each column costs one lookup per character.
#[derive(Clone, Debug)]
pub struct SymbolResolver {
    /// The classification rules
    rule_set: RuleSet,
    /// Symbol used when no rule matches
    default_symbol: u8,
    /// For each character, the tags of every rule containing it
    char_tags: HashMap<u8, Vec<u8>>
}

impl SymbolResolver {
    /// Creates a new resolver.
    /// # Arguments
    /// * `rule_set` - the rules to resolve with
    /// * `default_symbol` - the symbol emitted when no rule matches
    pub fn new(rule_set: RuleSet, default_symbol: u8) -> SymbolResolver {
        let char_tags = build_char_tags(&rule_set);
        SymbolResolver {
            rule_set,
            default_symbol,
            char_tags
        }
    }

    /// Creates a new resolver using the default symbol from `config`.
    /// # Arguments
    /// * `rule_set` - the rules to resolve with
    /// * `config` - source of the default symbol
    pub fn with_config(rule_set: RuleSet, config: &SymbolConfig) -> SymbolResolver {
        SymbolResolver::new(rule_set, config.default_symbol)
    }

    /// Resolves a single column into its symbol.
    /// # Arguments
    /// * `column` - character proportions for the column; these are expected to sum to at most 1
    pub fn resolve_column(&self, column: &CharPercents) -> u8 {
        debug_check_column_sum(column);

        let mut proportions: HashMap<u8, f64> = Default::default();
        for (c, &percent) in column.iter() {
            if let Some(tags) = self.char_tags.get(c) {
                for &tag in tags.iter() {
                    *proportions.entry(tag).or_insert(0.0) += percent;
                }
            }
        }

        pick_symbol(&proportions, &self.rule_set, self.default_symbol)
    }

    /// Resolves every column, returning one symbol per column.
    /// # Arguments
    /// * `columns` - character proportions, one map per column
    pub fn resolve_columns(&self, columns: &[CharPercents]) -> Vec<u8> {
        columns.iter()
            .map(|column| self.resolve_column(column))
            .collect()
    }

    /// Replaces the rules and rebuilds the character association
    pub fn set_rule_set(&mut self, rule_set: RuleSet) {
        self.char_tags = build_char_tags(&rule_set);
        self.rule_set = rule_set;
    }

    pub fn set_default_symbol(&mut self, default_symbol: u8) {
        self.default_symbol = default_symbol;
    }

    // getters
    pub fn rule_set(&self) -> &RuleSet {
        &self.rule_set
    }

    pub fn default_symbol(&self) -> u8 {
        self.default_symbol
    }
}

impl PartialEq for SymbolResolver {
    fn eq(&self, other: &Self) -> bool {
        self.rule_set == other.rule_set && self.default_symbol == other.default_symbol
    }
}

/// Resolves a single column into its symbol without any precomputation.
/// Produces the same symbol as `SymbolResolver::resolve_column` for the same inputs.
/// # Arguments
/// * `column` - character proportions for the column; these are expected to sum to at most 1
/// * `rule_set` - the rules to resolve with
/// * `default_symbol` - the symbol emitted when no rule matches
pub fn resolve_column(column: &CharPercents, rule_set: &RuleSet, default_symbol: u8) -> u8 {
    debug_check_column_sum(column);

    let mut proportions: HashMap<u8, f64> = Default::default();
    for (&c, &percent) in column.iter() {
        for rule in rule_set.rules().values() {
            if rule.has_member(c) {
                *proportions.entry(rule.tag()).or_insert(0.0) += percent;
            }
        }
    }

    pick_symbol(&proportions, rule_set, default_symbol)
}

/// Picks the winning tag from accumulated per-rule proportions.
fn pick_symbol(proportions: &HashMap<u8, f64>, rule_set: &RuleSet, default_symbol: u8) -> u8 {
    let candidates: Vec<(u8, f64)> = proportions.iter()
        .map(|(&tag, &proportion)| (tag, proportion))
        .filter(|&(tag, proportion)| {
            rule_set.get(tag)
                .map(|rule| proportion >= rule.threshold())
                .unwrap_or(false)
        })
        .collect();

    match candidates.len() {
        0 => default_symbol,
        1 => candidates[0].0,
        _ => {
            let winner = candidates.iter()
                .map(|&(tag, proportion)| {
                    let member_count = rule_set.get(tag).map(|r| r.members().len()).unwrap_or(1).max(1);
                    (tag, proportion / member_count as f64)
                })
                .max_by(|(tag_a, score_a), (tag_b, score_b)| {
                    score_a.total_cmp(score_b)
                        .then_with(|| Reverse(rule_set.serial_of(*tag_a)).cmp(&Reverse(rule_set.serial_of(*tag_b))))
                })
                .map(|(tag, _score)| tag)
                .unwrap_or(default_symbol);
            trace!("{} candidates, winner '{}'", candidates.len(), winner as char);
            winner
        }
    }
}

/// Inverts a rule set into character -> tags containing that character
fn build_char_tags(rule_set: &RuleSet) -> HashMap<u8, Vec<u8>> {
    let mut char_tags: HashMap<u8, Vec<u8>> = Default::default();
    for (&tag, rule) in rule_set.rules().iter() {
        debug_assert_eq!(tag, rule.tag());
        for &c in rule.members().iter() {
            char_tags.entry(c).or_default().push(tag);
        }
    }
    char_tags
}

fn debug_check_column_sum(column: &CharPercents) {
    if cfg!(debug_assertions) {
        let sum: f64 = column.values().sum();
        assert!(sum <= 1.0 + COLUMN_SUM_TOLERANCE, "sum of values in column must be <= 1, found {sum}");
    }
}
