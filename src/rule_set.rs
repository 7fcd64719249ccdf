/*!
This module provides the RuleSet, an ordered collection of Rules keyed by their tag.
At most one Rule exists per tag; inserting a Rule with an existing tag replaces it.
Each insertion stamps the tag with a fresh serial number from a counter owned by the set, which is used to break resolution ties.

# Example usage
```rust
use msa_symbols::rule::Rule;
use msa_symbols::rule_set::RuleSet;

let mut rules = RuleSet::default();
rules.upsert(Rule::new(b'a', b"AB", 0.3));
rules.upsert(Rule::new(b'c', b"CD", 0.3));
assert_eq!(rules.ordered_tags(), vec![b'a', b'c']);

// replacing a rule moves its tag to the end
rules.upsert(Rule::new(b'a', b"A", 0.5));
assert_eq!(rules.ordered_tags(), vec![b'c', b'a']);
assert_eq!(rules.len(), 2);
assert_eq!(rules.serial_of(b'z'), 0);
```
*/

use itertools::Itertools;
use rustc_hash::FxHashMap as HashMap;

use crate::rule::Rule;

/// Collection of Rules, unique by tag, with insertion-order serial numbers.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    /// The rules, keyed by tag
    rules: HashMap<u8, Rule>,
    /// The serial number stamped on each tag at its most recent insertion
    serials: HashMap<u8, u64>,
    /// Last serial number handed out; 0 is reserved for "not a member"
    last_serial: u64
}

impl RuleSet {
    /// Inserts `rule`, replacing any rule with the same tag, and stamps the tag with a new serial number.
    /// # Arguments
    /// * `rule` - the rule to add
    pub fn upsert(&mut self, rule: Rule) {
        let tag = rule.tag();
        self.last_serial += 1;
        self.rules.insert(tag, rule);
        self.serials.insert(tag, self.last_serial);
    }

    /// Removes the rule for `tag` along with its serial number, returning the rule if it was present.
    pub fn remove(&mut self, tag: u8) -> Option<Rule> {
        self.serials.remove(&tag);
        self.rules.remove(&tag)
    }

    /// Removes every rule. The serial counter keeps running, so later insertions still order after earlier ones.
    pub fn clear(&mut self) {
        self.rules.clear();
        self.serials.clear();
    }

    /// Returns the current serial number for `tag`, or 0 if the tag is not in the set.
    pub fn serial_of(&self, tag: u8) -> u64 {
        match self.serials.get(&tag) {
            Some(&serial) => {
                debug_assert!(self.rules.contains_key(&tag));
                serial
            },
            None => 0
        }
    }

    /// Returns all tags in ascending serial order, i.e. the order they were (last) inserted.
    pub fn ordered_tags(&self) -> Vec<u8> {
        self.serials.iter()
            .sorted_by_key(|(_tag, serial)| **serial)
            .map(|(&tag, _serial)| tag)
            .collect()
    }

    /// Returns the rules in ascending serial order.
    pub fn rules_in_order(&self) -> Vec<&Rule> {
        self.ordered_tags().into_iter()
            .map(|tag| &self.rules[&tag])
            .collect()
    }

    /// Sets the threshold of every rule, clamped into [0, 1]. Serial numbers are untouched.
    /// # Arguments
    /// * `threshold` - the new threshold for all rules
    pub fn set_all_thresholds(&mut self, threshold: f64) {
        for rule in self.rules.values_mut() {
            rule.set_threshold(threshold);
        }
    }

    /// Returns true if there is a rule for `tag` and `c` is one of its members.
    pub fn is_member_of(&self, c: u8, tag: u8) -> bool {
        self.rules.get(&tag)
            .map(|rule| rule.has_member(c))
            .unwrap_or(false)
    }

    pub fn get(&self, tag: u8) -> Option<&Rule> {
        self.rules.get(&tag)
    }

    pub fn contains(&self, tag: u8) -> bool {
        self.rules.contains_key(&tag)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the rules keyed by tag, in no particular order
    pub fn rules(&self) -> &HashMap<u8, Rule> {
        &self.rules
    }
}

/// Two sets are equal when they hold equal rules; serial numbers are not compared.
impl PartialEq for RuleSet {
    fn eq(&self, other: &Self) -> bool {
        self.rules == other.rules
    }
}

impl Extend<Rule> for RuleSet {
    fn extend<T: IntoIterator<Item = Rule>>(&mut self, iter: T) {
        for rule in iter {
            self.upsert(rule);
        }
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<T: IntoIterator<Item = Rule>>(iter: T) -> Self {
        let mut rule_set = RuleSet::default();
        rule_set.extend(iter);
        rule_set
    }
}
