//! Pronunciation lexicon to lexicon-transducer compiler.
//!
//! Turns `(word, weight, pronunciation)` triples into the `L` transducer used
//! when building speech-recognition decoding graphs, together with the phone
//! and word symbol tables it refers to.
//!
//! # Pipeline
//!
//! 1. [`tagging`] -- decorate phones with their position in the word
//! 2. [`disambig`] -- append `#n` symbols so homophones and prefixes stay
//!    distinguishable
//! 3. [`registry`] -- allocate phone / word ids
//! 4. [`emitter`] -- emit states and arcs with optional silence between words
//! 5. [`nonterminal`] -- optionally add grammar splicing points
//!
//! [`compiler::LexiconCompiler`] runs all of the above; [`reader`] parses the
//! text inputs and [`options::CompileOptions`] holds the configuration.

pub mod compiler;
pub mod disambig;
pub mod emitter;
pub mod nonterminal;
pub mod options;
pub mod reader;
pub mod registry;
pub mod tagging;

pub use compiler::{CompiledLexicon, LexiconCompiler};
pub use options::CompileOptions;

use lexfst_core::PhoneSetError;
use lexfst_fst::FstError;

/// Error type for lexicon compilation.
///
/// Every error aborts the compilation; no partial output is produced.
#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("invalid phone {phone:?} in pronunciation of {word:?}")]
    InvalidPhone { word: String, phone: String },
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("invalid word {word:?}: {reason}")]
    InvalidWord { word: String, reason: String },
    #[error("invalid weight {weight} for {word:?}: must be finite and non-negative")]
    InvalidWeight { word: String, weight: f64 },
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error("symbol {symbol:?} is missing from the {table} table")]
    UnknownSymbol { table: &'static str, symbol: String },
    #[error(transparent)]
    PhoneSet(#[from] PhoneSetError),
    #[error(transparent)]
    Fst(#[from] FstError),
    #[error("invalid options: {0}")]
    Options(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = LexiconError> = std::result::Result<T, E>;
