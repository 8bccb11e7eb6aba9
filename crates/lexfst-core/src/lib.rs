//! Shared types for compiling pronunciation lexicons into transducers.
//!
//! # Architecture
//!
//! - [`position`] -- Positional phone tags and word-boundary categories
//! - [`phone`] -- Silence / non-silence phone inventory
//! - [`entry`] -- Lexicon entries (word, weight, pronunciation)

pub mod entry;
pub mod phone;
pub mod position;

pub use entry::LexiconEntry;
pub use phone::{PhoneClass, PhoneSet, PhoneSetError};
pub use position::{PositionTag, WordBoundary};

/// Epsilon symbol name, always id 0 in both symbol tables.
pub const EPSILON_SYMBOL: &str = "<eps>";

/// Sentence-start word symbol.
pub const SENTENCE_START: &str = "<s>";

/// Sentence-end word symbol.
pub const SENTENCE_END: &str = "</s>";

/// Prefix of disambiguation symbols (`#0`, `#1`, ...).
pub const DISAMBIG_PREFIX: char = '#';

/// `#0`, the only disambiguation symbol that is also a word symbol.
pub const WORD_DISAMBIG_SYMBOL: &str = "#0";

/// Render the name of disambiguation symbol `n`.
pub fn disambig_symbol(n: u32) -> String {
    format!("{DISAMBIG_PREFIX}{n}")
}

/// Grammar-decoding symbols added when the nonterminal extension is enabled.
pub mod nonterm {
    /// Left-context phone marking the beginning of a sentence.
    pub const BOS: &str = "#nonterm_bos";
    /// Entry point of a spliced sub-automaton.
    pub const BEGIN: &str = "#nonterm_begin";
    /// Exit point of a spliced sub-automaton.
    pub const END: &str = "#nonterm_end";
    /// Re-entry into the enclosing automaton.
    pub const REENTER: &str = "#nonterm_reenter";

    /// Phone-side symbols, in table order.
    pub const PHONE_SYMBOLS: [&str; 4] = [BOS, BEGIN, END, REENTER];

    /// Word-side symbols, in table order.
    pub const WORD_SYMBOLS: [&str; 2] = [BEGIN, END];
}
