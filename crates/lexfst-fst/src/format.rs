// Line-oriented text encoding of transducers, symbol tables and id lists.
//
// Arc lines:   src<TAB>dst<TAB>isymbol<TAB>osymbol<TAB>cost
// Final lines: state<TAB>cost
// Tables:      symbol<SPACE>id

use std::fmt::Display;
use std::io::Write;

use crate::arc::{Arc, Label, StateId};
use crate::symbols::SymbolTable;
use crate::{ArcSink, FstError};

/// Render a cost the way the downstream FST compiler tools print floats:
/// shortest round-trip form, always with a fractional part (`0.0`, `0.5`,
/// `0.6931471805599453`).
pub fn format_cost(cost: f64) -> String {
    format!("{cost:?}")
}

/// Streams arcs and final states as text, resolving labels through the input
/// and output symbol tables.
pub struct TextFstWriter<'a, W: Write> {
    out: W,
    isymbols: &'a SymbolTable,
    osymbols: &'a SymbolTable,
    lines: usize,
}

impl<'a, W: Write> TextFstWriter<'a, W> {
    pub fn new(out: W, isymbols: &'a SymbolTable, osymbols: &'a SymbolTable) -> Self {
        Self {
            out,
            isymbols,
            osymbols,
            lines: 0,
        }
    }

    /// Number of lines written so far.
    pub fn lines_written(&self) -> usize {
        self.lines
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn resolve(table: &'a SymbolTable, name: &'static str, label: Label) -> Result<&'a str, FstError> {
        table
            .symbol(label)
            .ok_or(FstError::UnknownLabel { table: name, label })
    }
}

impl<W: Write> ArcSink for TextFstWriter<'_, W> {
    fn add_arc(&mut self, arc: Arc) -> Result<(), FstError> {
        let isym = Self::resolve(self.isymbols, "input", arc.ilabel)?;
        let osym = Self::resolve(self.osymbols, "output", arc.olabel)?;
        writeln!(
            self.out,
            "{}\t{}\t{}\t{}\t{}",
            arc.src,
            arc.dst,
            isym,
            osym,
            format_cost(arc.cost)
        )?;
        self.lines += 1;
        Ok(())
    }

    fn set_final(&mut self, state: StateId, cost: f64) -> Result<(), FstError> {
        writeln!(self.out, "{}\t{}", state, format_cost(cost))?;
        self.lines += 1;
        Ok(())
    }
}

/// Write a symbol table as `symbol id` lines in id order.
pub fn write_symbol_table<W: Write>(table: &SymbolTable, mut out: W) -> Result<(), FstError> {
    for (id, symbol) in table.iter() {
        writeln!(out, "{symbol} {id}")?;
    }
    Ok(())
}

/// Write one integer per line.
pub fn write_int_list<W, I>(ids: I, mut out: W) -> Result<(), FstError>
where
    W: Write,
    I: IntoIterator<Item = Label>,
{
    for id in ids {
        writeln!(out, "{id}")?;
    }
    Ok(())
}

/// Write `id value` pairs, one per line.
pub fn write_id_pairs<W, I, D>(pairs: I, mut out: W) -> Result<(), FstError>
where
    W: Write,
    I: IntoIterator<Item = (Label, D)>,
    D: Display,
{
    for (id, value) in pairs {
        writeln!(out, "{id} {value}")?;
    }
    Ok(())
}
