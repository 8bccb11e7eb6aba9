// Symbol table: bijection between symbol strings and contiguous ids

use crate::arc::Label;
use crate::FstError;
use hashbrown::HashMap;
use lexfst_core::EPSILON_SYMBOL;

/// Bijective mapping between symbol strings and the ids `0..len`.
///
/// Ids are handed out in insertion order with no gaps, so the table can be
/// written and read back positionally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    /// Maps id to symbol string.
    symbols: Vec<String>,
    /// Maps symbol string to id.
    ids: HashMap<String, Label>,
}

impl SymbolTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table whose id 0 is `<eps>`.
    pub fn with_epsilon() -> Self {
        let mut table = Self::new();
        table.symbols.push(EPSILON_SYMBOL.to_string());
        table.ids.insert(EPSILON_SYMBOL.to_string(), 0);
        table
    }

    /// Append `symbol` and return its id.
    ///
    /// Fails if the symbol is already present; ids are never reassigned.
    pub fn add_symbol(&mut self, symbol: impl Into<String>) -> Result<Label, FstError> {
        let symbol = symbol.into();
        if self.ids.contains_key(&symbol) {
            return Err(FstError::DuplicateSymbol(symbol));
        }
        let id = self.symbols.len() as Label;
        self.ids.insert(symbol.clone(), id);
        self.symbols.push(symbol);
        Ok(id)
    }

    /// Look up the id of `symbol`.
    pub fn find(&self, symbol: &str) -> Option<Label> {
        self.ids.get(symbol).copied()
    }

    /// Look up the string of `label`.
    pub fn symbol(&self, label: Label) -> Option<&str> {
        self.symbols.get(label as usize).map(String::as_str)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.ids.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterate `(id, symbol)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (Label, &str)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (i as Label, s.as_str()))
    }
}

/// Parse a text symbol table (`symbol id` per line).
///
/// Ids must be contiguous from 0 and appear in order; blank lines are skipped.
pub fn parse_symbol_table(text: &str) -> Result<SymbolTable, FstError> {
    let mut table = SymbolTable::new();
    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let mut fields = line.split_whitespace();
        let Some(symbol) = fields.next() else {
            continue;
        };
        let id = fields
            .next()
            .ok_or_else(|| FstError::InvalidSymbolTable {
                line: line_no,
                reason: "missing id".to_string(),
            })?
            .parse::<Label>()
            .map_err(|e| FstError::InvalidSymbolTable {
                line: line_no,
                reason: format!("bad id: {e}"),
            })?;
        if fields.next().is_some() {
            return Err(FstError::InvalidSymbolTable {
                line: line_no,
                reason: "trailing fields".to_string(),
            });
        }
        if id as usize != table.len() {
            return Err(FstError::InvalidSymbolTable {
                line: line_no,
                reason: format!("expected id {}, got {id}", table.len()),
            });
        }
        table.add_symbol(symbol)?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epsilon_is_zero() {
        let table = SymbolTable::with_epsilon();
        assert_eq!(table.find("<eps>"), Some(0));
        assert_eq!(table.symbol(0), Some("<eps>"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn ids_are_contiguous() {
        let mut table = SymbolTable::with_epsilon();
        assert_eq!(table.add_symbol("a_B").unwrap(), 1);
        assert_eq!(table.add_symbol("a_E").unwrap(), 2);
        assert_eq!(table.add_symbol("#0").unwrap(), 3);
        let ids: Vec<_> = table.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn duplicate_rejected() {
        let mut table = SymbolTable::with_epsilon();
        table.add_symbol("x").unwrap();
        assert!(matches!(
            table.add_symbol("x"),
            Err(FstError::DuplicateSymbol(s)) if s == "x"
        ));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn unknown_lookups() {
        let table = SymbolTable::with_epsilon();
        assert_eq!(table.find("nope"), None);
        assert_eq!(table.symbol(5), None);
    }

    #[test]
    fn parse_simple_table() {
        let table = parse_symbol_table("<eps> 0\nsil 1\n\nsil_B 2\n").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.find("sil_B"), Some(2));
    }

    #[test]
    fn parse_rejects_gap() {
        let err = parse_symbol_table("<eps> 0\nsil 2\n").unwrap_err();
        assert!(matches!(err, FstError::InvalidSymbolTable { line: 2, .. }));
    }

    #[test]
    fn parse_rejects_missing_id() {
        let err = parse_symbol_table("<eps>\n").unwrap_err();
        assert!(matches!(err, FstError::InvalidSymbolTable { line: 1, .. }));
    }
}
