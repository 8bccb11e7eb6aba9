//! Weighted transducer bookkeeping for lexicon transducers.
//!
//! This crate holds the pieces an FST library would normally provide: symbol
//! tables, arcs, an in-memory weighted graph, and the line-oriented text
//! encoding consumed by external FST compilers.
//!
//! # Architecture
//!
//! - [`arc`] -- Arc struct and label / state id aliases
//! - [`symbols`] -- Bijective string-to-id symbol table
//! - [`weight`] -- Probability / cost conversions
//! - [`weighted`] -- In-memory weighted transducer
//! - [`format`] -- Text encoding of transducers, symbol tables and id lists

pub mod arc;
pub mod format;
pub mod symbols;
pub mod weight;
pub mod weighted;

pub use arc::{Arc, EPSILON, Label, StateId};
pub use symbols::SymbolTable;
pub use weighted::WeightedFst;

/// Error type for symbol table and transducer encoding operations.
#[derive(Debug, thiserror::Error)]
pub enum FstError {
    #[error("symbol {0:?} is already present in the table")]
    DuplicateSymbol(String),
    #[error("label {label} has no entry in the {table} symbol table")]
    UnknownLabel { table: &'static str, label: Label },
    #[error("invalid symbol table line {line}: {reason}")]
    InvalidSymbolTable { line: usize, reason: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Destination for emitted arcs and final states.
///
/// The lexicon compiler writes through this trait so the same emission code
/// can build an in-memory [`WeightedFst`] or stream text lines with
/// [`format::TextFstWriter`].
pub trait ArcSink {
    /// Append one arc.
    fn add_arc(&mut self, arc: Arc) -> Result<(), FstError>;

    /// Mark `state` as final with the given cost.
    fn set_final(&mut self, state: StateId, cost: f64) -> Result<(), FstError>;
}

impl<S: ArcSink + ?Sized> ArcSink for &mut S {
    fn add_arc(&mut self, arc: Arc) -> Result<(), FstError> {
        (**self).add_arc(arc)
    }

    fn set_final(&mut self, state: StateId, cost: f64) -> Result<(), FstError> {
        (**self).set_final(state, cost)
    }
}
