//! sigla-analysis: structural analyzers over a loaded corpus.
//!
//! - `formula`: slot-template extraction of formula variants and agreement-rule testing
//! - `information`: sign frequencies, entropy, redundancy, bigram predictability
//! - `administrative`: positional classes, co-occurrence network, arithmetic checks,
//!   document types

pub mod administrative;
pub mod formula;
pub mod information;
