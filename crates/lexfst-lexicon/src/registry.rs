// Phone and word symbol registry.
//
// Ids are positional: downstream tools look phones up by id, so the order
// below must not change.
//
// Phones: <eps>, per silence phone {plain, _B, _E, _S, _I}, per non-silence
//         phone {_B, _E, _S, _I}, #0..=#max, then (nonterminals only)
//         #nonterm_bos, #nonterm_begin, #nonterm_end, #nonterm_reenter and the
//         user nonterminals.
// Words:  <eps>, sorted distinct words, #0, <s>, </s>, then (nonterminals
//         only) #nonterm_begin, #nonterm_end and the user nonterminals.

use std::collections::BTreeSet;

use lexfst_core::{
    LexiconEntry, PhoneSet, PositionTag, SENTENCE_END, SENTENCE_START, WORD_DISAMBIG_SYMBOL,
    WordBoundary, disambig_symbol, nonterm,
};
use lexfst_fst::{Label, SymbolTable};
use tracing::debug;

use crate::emitter::EncodedEntry;
use crate::{LexiconError, Result};

/// Phone and word symbol tables plus the side tables derived from them.
#[derive(Debug, Clone)]
pub struct SymbolRegistry {
    phones: SymbolTable,
    words: SymbolTable,
    /// `(phone id, category)` for every plain or position-tagged phone.
    word_boundary: Vec<(Label, WordBoundary)>,
    /// Phone ids of `#0..=#max_disambig`.
    disambig: Vec<Label>,
    max_disambig: u32,
}

impl SymbolRegistry {
    /// Allocate all ids.
    ///
    /// `max_disambig` is the highest disambiguation symbol in use, including
    /// the silence one; `#0` through `#max_disambig` all get phone ids.
    /// `nonterminals` is empty unless the grammar extension is enabled.
    pub fn build<'w, I>(
        phone_set: &PhoneSet,
        words: I,
        max_disambig: u32,
        nonterminals: &[String],
    ) -> Result<Self>
    where
        I: IntoIterator<Item = &'w str>,
    {
        let mut phones = SymbolTable::with_epsilon();
        let mut word_boundary = Vec::with_capacity(phone_set.len() * 5);

        for phone in phone_set.silence() {
            let id = phones.add_symbol(phone.as_str())?;
            word_boundary.push((id, WordBoundary::Nonword));
            for tag in PositionTag::ALL {
                let id = phones.add_symbol(tag.apply(phone))?;
                word_boundary.push((id, tag.boundary()));
            }
        }
        for phone in phone_set.nonsilence() {
            for tag in PositionTag::ALL {
                let id = phones.add_symbol(tag.apply(phone))?;
                word_boundary.push((id, tag.boundary()));
            }
        }

        let mut disambig = Vec::with_capacity(max_disambig as usize + 1);
        for n in 0..=max_disambig {
            disambig.push(phones.add_symbol(disambig_symbol(n))?);
        }

        let mut word_table = SymbolTable::with_epsilon();
        let sorted: BTreeSet<&str> = words.into_iter().collect();
        for word in &sorted {
            word_table.add_symbol(*word)?;
        }
        word_table.add_symbol(WORD_DISAMBIG_SYMBOL)?;
        word_table.add_symbol(SENTENCE_START)?;
        word_table.add_symbol(SENTENCE_END)?;

        if !nonterminals.is_empty() {
            for symbol in nonterm::PHONE_SYMBOLS {
                phones.add_symbol(symbol)?;
            }
            for symbol in nonterm::WORD_SYMBOLS {
                word_table.add_symbol(symbol)?;
            }
            for symbol in nonterminals {
                phones.add_symbol(symbol.as_str())?;
                word_table.add_symbol(symbol.as_str())?;
            }
        }

        debug!(
            phones = phones.len(),
            words = word_table.len(),
            max_disambig,
            "built symbol tables"
        );

        Ok(Self {
            phones,
            words: word_table,
            word_boundary,
            disambig,
            max_disambig,
        })
    }

    pub fn phones(&self) -> &SymbolTable {
        &self.phones
    }

    pub fn words(&self) -> &SymbolTable {
        &self.words
    }

    /// `(phone id, category)` pairs, starting at id 1.
    pub fn word_boundary(&self) -> &[(Label, WordBoundary)] {
        &self.word_boundary
    }

    /// Phone ids of the disambiguation symbols `#0..=#max`.
    pub fn disambig_labels(&self) -> &[Label] {
        &self.disambig
    }

    pub fn max_disambig(&self) -> u32 {
        self.max_disambig
    }

    pub fn phone_label(&self, symbol: &str) -> Result<Label> {
        self.phones
            .find(symbol)
            .ok_or_else(|| LexiconError::UnknownSymbol {
                table: "phone",
                symbol: symbol.to_string(),
            })
    }

    pub fn word_label(&self, symbol: &str) -> Result<Label> {
        self.words
            .find(symbol)
            .ok_or_else(|| LexiconError::UnknownSymbol {
                table: "word",
                symbol: symbol.to_string(),
            })
    }

    /// Resolve a tagged (and possibly disambiguated) entry to ids.
    pub fn encode(&self, entry: &LexiconEntry) -> Result<EncodedEntry> {
        let pronunciation = entry
            .pronunciation
            .iter()
            .map(|symbol| self.phone_label(symbol))
            .collect::<Result<Vec<_>>>()?;
        Ok(EncodedEntry {
            word: self.word_label(&entry.word)?,
            // -0.0 becomes 0.0
            weight: entry.weight + 0.0,
            pronunciation,
        })
    }
}
