/*!
Contains configuration information shared by the symbol resolver and the live alignment source.
Build it with the builder, e.g.
```
use msa_symbols::symbol_config::{SymbolConfig, SymbolConfigBuilder};
let config: SymbolConfig = SymbolConfigBuilder::default()
    .default_symbol(b'_')
    .gap_char(Some(b'.'))
    .build()
    .unwrap();
assert_eq!(config.default_symbol, b'_');
```
*/

/**
Contains configuration information for symbol resolution and live tallying.
Build it with the builder, e.g.
```
use msa_symbols::symbol_config::{SymbolConfig, SymbolConfigBuilder};
let config: SymbolConfig = SymbolConfigBuilder::default()
    .purge_zero_entries(false)
    .build()
    .unwrap();
assert_eq!(config.gap_char, Some(b'-'));
```
*/
#[derive(derive_builder::Builder, Clone, Debug, PartialEq)]
#[builder(default)]
pub struct SymbolConfig {
    /// The symbol emitted for any column that no rule claims
    pub default_symbol: u8,
    /// Optional gap character, which is never tallied when a live alignment counts its rows
    pub gap_char: Option<u8>,
    /// If true, a live alignment removes zero-count characters after every incremental update
    pub purge_zero_entries: bool
}

impl Default for SymbolConfig {
    fn default() -> Self {
        Self {
            // blank consensus cells are the conventional rendering
            default_symbol: crate::rule_presets::DEFAULT_CONSENSUS_SYMBOL,
            // standard alignment gap
            gap_char: Some(b'-'),
            // add/subtract cycles leave zero-count keys behind otherwise
            purge_zero_entries: true
        }
    }
}
