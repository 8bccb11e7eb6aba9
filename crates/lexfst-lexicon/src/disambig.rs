// Disambiguation symbol assignment.
//
// A pronunciation needs a `#n` suffix when it is shared by several entries or
// when it is a proper prefix of another pronunciation. Without it the lexicon
// transducer could not be determinized once composed with a grammar.

use hashbrown::{HashMap, HashSet};
use lexfst_core::{LexiconEntry, disambig_symbol};
use tracing::debug;

/// Numbering state for disambiguation symbols.
///
/// Non-empty pronunciations share a numbering space: every distinct
/// pronunciation string counts up from [`FIRST_SYMBOL`](Self::FIRST_SYMBOL)
/// on its own, so `#1` may be used by many different pronunciations. Empty
/// pronunciations instead get a fresh number above everything handed out so
/// far, and that number is reserved so no other pronunciation reuses it.
#[derive(Debug, Clone, Default)]
pub struct DisambigAllocator {
    /// Highest symbol handed out so far (0 = none).
    max_disambig: u32,
    /// Symbols owned by empty pronunciations.
    reserved_empty: HashSet<u32>,
    /// Last symbol handed out per pronunciation string.
    last_symbol: HashMap<String, u32>,
}

impl DisambigAllocator {
    /// `#0` is reserved for the word-level disambiguation symbol.
    pub const FIRST_SYMBOL: u32 = 1;

    pub fn new() -> Self {
        Self::default()
    }

    /// Next symbol for another occurrence of the non-empty pronunciation
    /// `key`.
    pub fn next_for(&mut self, key: &str) -> u32 {
        let mut symbol = match self.last_symbol.get(key) {
            Some(&last) => last + 1,
            None => Self::FIRST_SYMBOL,
        };
        while self.reserved_empty.contains(&symbol) {
            symbol += 1;
        }
        self.max_disambig = self.max_disambig.max(symbol);
        self.last_symbol.insert(key.to_string(), symbol);
        symbol
    }

    /// A symbol nobody else has or will get, for an empty pronunciation.
    pub fn fresh(&mut self) -> u32 {
        self.max_disambig += 1;
        self.reserved_empty.insert(self.max_disambig);
        self.max_disambig
    }

    /// Highest symbol handed out so far.
    pub fn max_disambig(&self) -> u32 {
        self.max_disambig
    }

    /// The symbol reserved for the optional-silence branch: one above every
    /// per-pronunciation symbol.
    pub fn silence_symbol(&self) -> u32 {
        self.max_disambig + 1
    }
}

/// Result of [`assign_disambig`].
#[derive(Debug, Clone)]
pub struct Disambiguation {
    /// Input entries, with `#n` appended to the pronunciations that need it.
    pub entries: Vec<LexiconEntry>,
    /// The symbol appended to each entry, if any.
    pub assigned: Vec<Option<u32>>,
    /// Highest per-pronunciation symbol (0 if none was needed).
    pub max_disambig: u32,
    /// Symbol dedicated to the optional-silence branch.
    pub silence_disambig: u32,
}

/// Decide which entries need a disambiguation symbol and append it.
///
/// Runs two passes over `lexicon`: the first counts every pronunciation and
/// collects all proper prefixes, the second assigns symbols in entry order.
/// The passes must stay separate; the numbering depends on seeing the full
/// counts before the first assignment.
pub fn assign_disambig(lexicon: &[LexiconEntry]) -> Disambiguation {
    let keys: Vec<String> = lexicon.iter().map(LexiconEntry::pronunciation_key).collect();

    let mut count: HashMap<&str, usize> = HashMap::new();
    for key in &keys {
        *count.entry(key.as_str()).or_insert(0) += 1;
    }

    // every proper prefix, including the empty one
    let mut prefixes: HashSet<String> = HashSet::new();
    for entry in lexicon {
        for len in 0..entry.pronunciation.len() {
            prefixes.insert(entry.pronunciation[..len].join(" "));
        }
    }

    let mut allocator = DisambigAllocator::new();
    let mut entries = Vec::with_capacity(lexicon.len());
    let mut assigned = Vec::with_capacity(lexicon.len());

    for (entry, key) in lexicon.iter().zip(&keys) {
        let unique = count.get(key.as_str()) == Some(&1) && !prefixes.contains(key);
        let symbol = if entry.is_empty() {
            Some(allocator.fresh())
        } else if unique {
            None
        } else {
            Some(allocator.next_for(key))
        };

        let mut entry = entry.clone();
        if let Some(n) = symbol {
            entry.pronunciation.push(disambig_symbol(n));
        }
        entries.push(entry);
        assigned.push(symbol);
    }

    debug!(
        entries = lexicon.len(),
        disambiguated = assigned.iter().filter(|s| s.is_some()).count(),
        max_disambig = allocator.max_disambig(),
        "assigned disambiguation symbols"
    );

    Disambiguation {
        entries,
        assigned,
        max_disambig: allocator.max_disambig(),
        silence_disambig: allocator.silence_symbol(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(word: &str, pron: &[&str]) -> LexiconEntry {
        LexiconEntry::new(word, 0.0, pron.iter().copied())
    }

    fn prons(result: &Disambiguation) -> Vec<String> {
        result.entries.iter().map(LexiconEntry::pronunciation_key).collect()
    }

    #[test]
    fn unique_entries_untouched() {
        let result = assign_disambig(&[entry("ma", &["m_B", "a_E"]), entry("a", &["a_S"])]);
        assert_eq!(result.assigned, vec![None, None]);
        assert_eq!(prons(&result), vec!["m_B a_E", "a_S"]);
        assert_eq!(result.max_disambig, 0);
        assert_eq!(result.silence_disambig, 1);
    }

    #[test]
    fn homophones_get_consecutive_symbols() {
        let result = assign_disambig(&[entry("a", &["x_S"]), entry("b", &["x_S"])]);
        assert_eq!(prons(&result), vec!["x_S #1", "x_S #2"]);
        assert_eq!(result.silence_disambig, 3);
    }

    #[test]
    fn separate_pronunciations_share_numbering() {
        let result = assign_disambig(&[
            entry("a", &["x_S"]),
            entry("b", &["y_S"]),
            entry("c", &["x_S"]),
            entry("d", &["y_S"]),
            entry("e", &["x_S"]),
        ]);
        assert_eq!(
            result.assigned,
            vec![Some(1), Some(1), Some(2), Some(2), Some(3)]
        );
        assert_eq!(result.max_disambig, 3);
    }

    #[test]
    fn prefix_gets_symbol() {
        let result = assign_disambig(&[entry("a", &["x"]), entry("ab", &["x", "y"])]);
        assert_eq!(result.assigned, vec![Some(1), None]);
        assert_eq!(prons(&result), vec!["x #1", "x y"]);
    }

    #[test]
    fn empty_pronunciation_alone() {
        let result = assign_disambig(&[entry("a", &[])]);
        assert_eq!(prons(&result), vec!["#1"]);
        assert_eq!(result.max_disambig, 1);
        assert_eq!(result.silence_disambig, 2);
    }

    #[test]
    fn empty_pronunciations_never_share() {
        let result = assign_disambig(&[entry("a", &[]), entry("b", &[])]);
        assert_eq!(result.assigned, vec![Some(1), Some(2)]);
        assert_eq!(result.silence_disambig, 3);
    }

    #[test]
    fn reserved_symbols_are_skipped() {
        let result = assign_disambig(&[
            entry("a", &["x_S"]),
            entry("b", &["x_S"]),
            entry("c", &[]),
            entry("d", &["x_S"]),
        ]);
        // c takes 3, so the third x_S skips it
        assert_eq!(result.assigned, vec![Some(1), Some(2), Some(3), Some(4)]);
        assert_eq!(result.silence_disambig, 5);
    }

    #[test]
    fn empty_first_reserves_one() {
        let result = assign_disambig(&[entry("c", &[]), entry("a", &["x_S"]), entry("b", &["x_S"])]);
        assert_eq!(result.assigned, vec![Some(1), Some(2), Some(3)]);
        assert_eq!(result.max_disambig, 3);
    }

    #[test]
    fn empty_symbol_used_by_no_other_entry() {
        let result = assign_disambig(&[
            entry("a", &["x_S"]),
            entry("b", &[]),
            entry("c", &["x_S"]),
            entry("d", &["y_S"]),
            entry("e", &["y_S"]),
            entry("f", &["y_S"]),
        ]);
        let empty_symbol = result.assigned[1].unwrap();
        for (i, symbol) in result.assigned.iter().enumerate() {
            if i != 1 {
                assert_ne!(*symbol, Some(empty_symbol));
            }
        }
    }

    #[test]
    fn allocator_counts_per_key() {
        let mut alloc = DisambigAllocator::new();
        assert_eq!(alloc.next_for("a"), 1);
        assert_eq!(alloc.next_for("a"), 2);
        assert_eq!(alloc.next_for("b"), 1);
        assert_eq!(alloc.fresh(), 3);
        assert_eq!(alloc.next_for("b"), 2);
        assert_eq!(alloc.next_for("b"), 4);
        assert_eq!(alloc.max_disambig(), 4);
        assert_eq!(alloc.silence_symbol(), 5);
    }
}
