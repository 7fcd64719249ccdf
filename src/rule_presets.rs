/*!
Built-in rule sets for amino acid alignments.
* `clustal_amino_rules` - the ClustalX consensus groups, each with its own threshold
* `default_consensus_rules` - single residues followed by physico-chemical classes, all sharing one threshold; one set is typically built per consensus level

# Example usage
```rust
use msa_symbols::rule_presets::{default_consensus_rules, DEFAULT_CONSENSUS_SYMBOL};
use msa_symbols::symbol_resolver::SymbolResolver;

let resolver = SymbolResolver::new(default_consensus_rules(0.5), DEFAULT_CONSENSUS_SYMBOL);
let column = [(b'I', 0.3), (b'V', 0.3)].into_iter().collect();
assert_eq!(resolver.resolve_column(&column), b'l'); // aliphatic
```
*/

use crate::rule::Rule;
use crate::rule_set::RuleSet;

/// Symbol emitted by consensus rows for columns no rule claims
pub const DEFAULT_CONSENSUS_SYMBOL: u8 = b' ';

/// Residues shared by the ClustalX hydrophobic groups
const CLUSTAL_HYDROPHOBIC: &[u8] = b"WLVIMAFCYHP";
/// The twenty standard residues, in the order they are added to the consensus prototype
const SINGLE_RESIDUES: &[u8] = b"GAIVLMFYWHCPKRDEQNST";

/// Builds the ClustalX amino acid consensus groups.
pub fn clustal_amino_rules() -> RuleSet {
    let mut rule_set: RuleSet = vec![
        Rule::new(b'%', CLUSTAL_HYDROPHOBIC, 0.6),
        Rule::new(b'#', CLUSTAL_HYDROPHOBIC, 0.8),
        Rule::new(b'-', b"DE", 0.5),
        Rule::new(b'+', b"KR", 0.6),
        Rule::new(b'g', b"G", 0.5),
        Rule::new(b'n', b"N", 0.5),
        Rule::new(b'q', b"QE", 0.5),
        Rule::new(b'p', b"P", 0.5),
        Rule::new(b't', b"ST", 0.5)
    ].into_iter().collect();

    // conserved single residues, alphabetical
    for &residue in b"ACDEFGHIKLMNPQRSTVWY".iter() {
        rule_set.upsert(Rule::new(residue, &[residue], 0.85));
    }
    rule_set
}

/// Builds the consensus prototype with every rule set to `threshold`.
/// # Arguments
/// * `threshold` - the consensus level, clamped into [0, 1]
pub fn default_consensus_rules(threshold: f64) -> RuleSet {
    let aromatic = b"FYWH".to_vec();
    let aliphatic = b"IVL".to_vec();
    let hydrophobic = [&aromatic[..], &aliphatic[..], b"AGMCKRT"].concat();
    let positive = b"HKR".to_vec();
    let negative = b"DE".to_vec();
    let charged = [&positive[..], &negative[..]].concat();
    let polar = [&charged[..], b"QNSTC"].concat();
    let alcohol = b"ST".to_vec();
    let tiny = b"GAS".to_vec();
    let small = [&tiny[..], b"VTDNPC"].concat();
    let turnlike = [&tiny[..], &polar[..]].concat();

    let mut rule_set: RuleSet = SINGLE_RESIDUES.iter()
        .map(|&residue| Rule::new(residue, &[residue], threshold))
        .collect();

    rule_set.extend(vec![
        Rule::with_label("aromatic", b'a', &aromatic, threshold),
        Rule::with_label("aliphatic", b'l', &aliphatic, threshold),
        Rule::with_label("hydrophobic", b'h', &hydrophobic, threshold),
        Rule::with_label("positive", b'+', &positive, threshold),
        Rule::with_label("negative", b'-', &negative, threshold),
        Rule::with_label("charged", b'c', &charged, threshold),
        Rule::with_label("polar", b'p', &polar, threshold),
        Rule::with_label("alcohol", b'o', &alcohol, threshold),
        Rule::with_label("tiny", b'u', &tiny, threshold),
        Rule::with_label("small", b's', &small, threshold),
        Rule::with_label("turnlike", b't', &turnlike, threshold)
    ]);
    rule_set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clustal_layout() {
        let rule_set = clustal_amino_rules();
        assert_eq!(rule_set.len(), 29);
        assert_eq!(&rule_set.ordered_tags()[..9], b"%#-+gnqpt");
        assert_eq!(rule_set.get(b'#').unwrap().threshold(), 0.8);
        assert_eq!(rule_set.get(b'#').unwrap().members().len(), 11);
        assert_eq!(rule_set.get(b'W').unwrap().threshold(), 0.85);
    }

    #[test]
    fn test_consensus_layout() {
        let rule_set = default_consensus_rules(0.7);
        assert_eq!(rule_set.len(), 31);
        assert!(rule_set.rules().values().all(|r| r.threshold() == 0.7));

        let tags = rule_set.ordered_tags();
        assert_eq!(&tags[..20], SINGLE_RESIDUES);
        assert_eq!(&tags[20..], b"alh+-cpoust");

        let hydrophobic = rule_set.get(b'h').unwrap();
        assert_eq!(hydrophobic.label(), "hydrophobic");
        assert_eq!(hydrophobic.members().len(), 14);
        assert_eq!(rule_set.get(b't').unwrap().members().len(), 12);
        assert_eq!(rule_set.get(b'p').unwrap().members_string(), b"CDEHKNQRST".to_vec());
    }
}
