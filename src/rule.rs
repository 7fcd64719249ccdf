/*!
A Rule is a single-character-tagged classification of alignment columns.
It matches a column when the summed proportion of its member characters reaches its threshold.

# Example usage
```rust
use msa_symbols::rule::Rule;

let hydrophobic = Rule::with_label("hydrophobic", b'h', b"AVLIMFWC", 0.5);
assert_eq!(hydrophobic.tag(), b'h');
assert!(hydrophobic.has_member(b'L'));
assert!(!hydrophobic.has_member(b'l'));

// thresholds are always clamped into [0, 1]
let greedy = Rule::new(b'x', b"A", 1.5);
assert_eq!(greedy.threshold(), 1.0);
```
*/

use itertools::Itertools;
use log::debug;
use rustc_hash::FxHashSet as HashSet;
use std::fmt;

/// A named, tagged membership test with a match threshold.
/// Equality ignores the label.
#[derive(Clone, Debug)]
pub struct Rule {
    /// Display-only name
    label: String,
    /// Identity of the rule within a set, and the symbol emitted when it wins
    tag: u8,
    /// Case-sensitive member characters
    members: HashSet<u8>,
    /// Minimum summed proportion of members required to match, in [0, 1]
    threshold: f64
}

impl Rule {
    /// Creates a rule whose label is the tag itself.
    /// # Arguments
    /// * `tag` - the symbol for this rule
    /// * `members` - the member characters; duplicates are ignored
    /// * `threshold` - match threshold, clamped into [0, 1]
    pub fn new(tag: u8, members: &[u8], threshold: f64) -> Rule {
        Rule::with_label(&(tag as char).to_string(), tag, members, threshold)
    }

    /// Creates a rule with a display label.
    /// # Arguments
    /// * `label` - display name for the rule
    /// * `tag` - the symbol for this rule
    /// * `members` - the member characters; duplicates are ignored
    /// * `threshold` - match threshold, clamped into [0, 1]
    pub fn with_label(label: &str, tag: u8, members: &[u8], threshold: f64) -> Rule {
        Rule {
            label: label.to_string(),
            tag,
            members: members.iter().cloned().collect(),
            threshold: clamp_threshold(threshold)
        }
    }

    /// Returns true if `c` is one of the member characters
    pub fn has_member(&self, c: u8) -> bool {
        self.members.contains(&c)
    }

    pub fn add_members(&mut self, members: &[u8]) {
        self.members.extend(members.iter().cloned());
    }

    pub fn remove_members(&mut self, members: &[u8]) {
        for c in members.iter() {
            self.members.remove(c);
        }
    }

    /// Replaces the member characters
    pub fn set_members(&mut self, members: &[u8]) {
        self.members.clear();
        self.add_members(members);
    }

    /// Returns the members as a byte string in ascending order, which gives a stable rendering
    pub fn members_string(&self) -> Vec<u8> {
        self.members.iter().cloned().sorted().collect()
    }

    /// Sets the threshold, clamped into [0, 1]
    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = clamp_threshold(threshold);
    }

    pub fn set_label(&mut self, label: &str) {
        self.label = label.to_string();
    }

    /// Changes the tag. A rule already stored in a RuleSet must be re-inserted for this to take effect there.
    pub fn set_tag(&mut self, tag: u8) {
        self.tag = tag;
    }

    // getters
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn tag(&self) -> u8 {
        self.tag
    }

    pub fn members(&self) -> &HashSet<u8> {
        &self.members
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
            && self.threshold == other.threshold
            && self.members == other.members
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f, "{} '{}' [{}] >= {}",
            self.label,
            self.tag as char,
            String::from_utf8_lossy(&self.members_string()),
            self.threshold
        )
    }
}

/// Restricts a threshold to [0, 1]; NaN becomes 0
fn clamp_threshold(threshold: f64) -> f64 {
    if threshold.is_nan() {
        debug!("NaN threshold replaced with 0");
        0.0
    } else if !(0.0..=1.0).contains(&threshold) {
        debug!("threshold {threshold} clamped into [0, 1]");
        threshold.clamp(0.0, 1.0)
    } else {
        threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor() {
        let rule = Rule::new(b'%', b"ACGTNA", 0.5);
        assert_eq!(rule.tag(), b'%');
        assert_eq!(rule.label(), "%");
        assert_eq!(rule.members().len(), 5);
        assert_eq!(rule.members_string(), b"ACGNT".to_vec());
        assert_eq!(rule.threshold(), 0.5);

        let labeled = Rule::with_label("polar", b'p', b"QNST", 0.25);
        assert_eq!(labeled.label(), "polar");
        assert_eq!(labeled.to_string(), "polar 'p' [NQST] >= 0.25");
    }

    #[test]
    fn test_threshold_clamp() {
        assert_eq!(Rule::new(b'a', b"A", -0.1).threshold(), 0.0);
        assert_eq!(Rule::new(b'a', b"A", 1.1).threshold(), 1.0);
        assert_eq!(Rule::new(b'a', b"A", f64::NAN).threshold(), 0.0);

        let mut rule = Rule::new(b'a', b"A", 0.3);
        rule.set_threshold(2.0);
        assert_eq!(rule.threshold(), 1.0);
        rule.set_threshold(0.75);
        assert_eq!(rule.threshold(), 0.75);
    }

    #[test]
    fn test_members_case_sensitive() {
        let mut rule = Rule::new(b'a', b"Ab", 0.5);
        assert!(rule.has_member(b'A'));
        assert!(!rule.has_member(b'a'));
        assert!(rule.has_member(b'b'));

        rule.add_members(b"CC");
        assert_eq!(rule.members_string(), b"ACb".to_vec());

        rule.remove_members(b"Ab");
        assert_eq!(rule.members_string(), b"C".to_vec());

        rule.set_members(b"XY");
        assert_eq!(rule.members_string(), b"XY".to_vec());

        rule.set_members(b"");
        assert!(rule.members().is_empty());
    }

    #[test]
    fn test_equality_ignores_label() {
        let a = Rule::with_label("first", b'a', b"AB", 0.5);
        let b = Rule::with_label("second", b'a', b"BA", 0.5);
        assert_eq!(a, b);

        let mut c = b.clone();
        c.set_threshold(0.6);
        assert_ne!(a, c);

        let mut d = b.clone();
        d.set_tag(b'd');
        assert_ne!(a, d);

        let mut e = b.clone();
        e.add_members(b"C");
        assert_ne!(a, e);
    }
}
