// Lexicon compilation pipeline: validate, tag, disambiguate, register, emit.

use std::io::Write;

use hashbrown::HashSet;
use lexfst_core::{
    EPSILON_SYMBOL, LexiconEntry, PhoneSet, SENTENCE_END, SENTENCE_START, WORD_DISAMBIG_SYMBOL,
    disambig_symbol, nonterm,
};
use lexfst_fst::format::{self, TextFstWriter};
use lexfst_fst::{ArcSink, WeightedFst};
use tracing::{info, warn};

use crate::disambig::assign_disambig;
use crate::emitter::{EncodedEntry, LexiconFstEmitter, LexiconStates, SilenceModel};
use crate::nonterminal::NonterminalLabels;
use crate::options::CompileOptions;
use crate::registry::SymbolRegistry;
use crate::tagging::tag_lexicon;
use crate::{LexiconError, Result};

/// Compiles lexicons against a fixed phone inventory and option set.
#[derive(Debug, Clone)]
pub struct LexiconCompiler {
    phones: PhoneSet,
    options: CompileOptions,
}

/// Everything produced by one compilation.
#[derive(Debug, Clone)]
pub struct CompiledLexicon {
    pub registry: SymbolRegistry,
    /// Position-tagged entries, no disambiguation symbols.
    pub tagged: Vec<LexiconEntry>,
    /// Tagged entries with disambiguation symbols appended where needed.
    pub disambiguated: Vec<LexiconEntry>,
    /// Symbol number reserved for the optional-silence branch.
    pub silence_disambig: u32,
    /// Training transducer: tagged pronunciations, no disambiguation symbols.
    pub lexicon_fst: WeightedFst,
    pub lexicon_states: LexiconStates,
    /// Transducer over the disambiguated pronunciations, with the nonterminal
    /// extension when enabled.
    pub disambig_fst: WeightedFst,
    pub disambig_states: LexiconStates,
}

impl LexiconCompiler {
    /// Validates `options` against `phones` up front.
    pub fn new(phones: PhoneSet, options: CompileOptions) -> Result<Self> {
        options.validate(&phones)?;
        Ok(Self { phones, options })
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn phones(&self) -> &PhoneSet {
        &self.phones
    }

    /// Compile `lexicon` into symbol tables and both transducers.
    ///
    /// Every word, phone and weight is checked before anything is built; any error
    /// aborts the whole compilation.
    pub fn compile(&self, lexicon: &[LexiconEntry]) -> Result<CompiledLexicon> {
        self.validate_lexicon(lexicon)?;

        let tagged = tag_lexicon(lexicon);
        let disambig = assign_disambig(&tagged);

        let registry = SymbolRegistry::build(
            &self.phones,
            lexicon.iter().map(|e| e.word.as_str()),
            disambig.silence_disambig,
            &self.options.nonterminals,
        )?;

        let silence = SilenceModel::new(self.options.silence_prob)?;
        let silence_phone = registry.phone_label(&self.options.silence_phone)?;
        let nonterminals = if self.options.has_nonterminals() {
            Some(NonterminalLabels::resolve(
                &registry,
                &self.options.nonterminals,
                &self.options.left_context_phones,
            )?)
        } else {
            None
        };
        let silence_disambig = if self.options.silence_disambig {
            Some(registry.phone_label(&disambig_symbol(disambig.silence_disambig))?)
        } else {
            None
        };

        let plain_entries = encode_all(&registry, &tagged)?;
        let disambig_entries = encode_all(&registry, &disambig.entries)?;

        let mut lexicon_fst = WeightedFst::new();
        let lexicon_states =
            LexiconFstEmitter::new(silence, silence_phone).emit(&plain_entries, &mut lexicon_fst)?;

        let mut emitter = LexiconFstEmitter::new(silence, silence_phone);
        if let Some(label) = silence_disambig {
            emitter = emitter.with_silence_disambig(label);
        }
        if let Some(labels) = &nonterminals {
            emitter = emitter.with_nonterminals(labels);
        }
        let mut disambig_fst = WeightedFst::new();
        let disambig_states = emitter.emit(&disambig_entries, &mut disambig_fst)?;

        info!(
            entries = lexicon.len(),
            words = registry.words().len(),
            phones = registry.phones().len(),
            silence_disambig = disambig.silence_disambig,
            states = disambig_states.num_states,
            arcs = disambig_fst.num_arcs(),
            "compiled lexicon"
        );

        Ok(CompiledLexicon {
            registry,
            tagged,
            disambiguated: disambig.entries,
            silence_disambig: disambig.silence_disambig,
            lexicon_fst,
            lexicon_states,
            disambig_fst,
            disambig_states,
        })
    }

    fn validate_lexicon(&self, lexicon: &[LexiconEntry]) -> Result<()> {
        let reserved = self.reserved_words();
        let mut used = HashSet::new();
        for entry in lexicon {
            check_word(&entry.word)?;
            if reserved.contains(entry.word.as_str()) {
                return Err(LexiconError::InvalidWord {
                    word: entry.word.clone(),
                    reason: "reserved word symbol".to_string(),
                });
            }
            if !(entry.weight.is_finite() && entry.weight >= 0.0) {
                return Err(LexiconError::InvalidWeight {
                    word: entry.word.clone(),
                    weight: entry.weight,
                });
            }
            for phone in &entry.pronunciation {
                if !self.phones.contains(phone) {
                    return Err(LexiconError::InvalidPhone {
                        word: entry.word.clone(),
                        phone: phone.clone(),
                    });
                }
                used.insert(phone.as_str());
            }
        }

        if let Some(oov) = &self.options.oov {
            if !lexicon.iter().any(|e| &e.word == oov) {
                warn!(%oov, "out-of-vocabulary word has no pronunciation in the lexicon");
            }
        }
        let unused = self
            .phones
            .nonsilence()
            .iter()
            .filter(|p| !used.contains(p.as_str()))
            .count();
        if unused > 0 {
            warn!(unused, "declared non-silence phones never used by the lexicon");
        }
        Ok(())
    }

    /// Word symbols the registry adds on its own.
    fn reserved_words(&self) -> HashSet<&str> {
        let mut reserved: HashSet<&str> =
            [EPSILON_SYMBOL, WORD_DISAMBIG_SYMBOL, SENTENCE_START, SENTENCE_END]
                .into_iter()
                .collect();
        if self.options.has_nonterminals() {
            reserved.extend(nonterm::WORD_SYMBOLS);
            reserved.extend(self.options.nonterminals.iter().map(String::as_str));
        }
        reserved
    }
}

/// Reject words that cannot be written to the text tables: empty words and
/// words containing whitespace.
pub fn check_word(word: &str) -> Result<()> {
    let reason = if word.is_empty() {
        "word is empty"
    } else if word.chars().any(char::is_whitespace) {
        "word contains whitespace"
    } else {
        return Ok(());
    };
    Err(LexiconError::InvalidWord {
        word: word.to_string(),
        reason: reason.to_string(),
    })
}

fn encode_all(registry: &SymbolRegistry, entries: &[LexiconEntry]) -> Result<Vec<EncodedEntry>> {
    entries.iter().map(|e| registry.encode(e)).collect()
}

impl CompiledLexicon {
    /// Stream `fst` as text through the registry's symbol tables.
    pub fn write_fst_text<W: Write>(&self, fst: &WeightedFst, out: W) -> Result<()> {
        let mut writer =
            TextFstWriter::new(out, self.registry.phones(), self.registry.words());
        fst.write_to(&mut writer)?;
        writer.into_inner().flush()?;
        Ok(())
    }

    pub fn write_phones<W: Write>(&self, out: W) -> Result<()> {
        Ok(format::write_symbol_table(self.registry.phones(), out)?)
    }

    pub fn write_words<W: Write>(&self, out: W) -> Result<()> {
        Ok(format::write_symbol_table(self.registry.words(), out)?)
    }

    /// Phone ids of `#0..=#max`, one per line.
    pub fn write_disambig<W: Write>(&self, out: W) -> Result<()> {
        Ok(format::write_int_list(
            self.registry.disambig_labels().iter().copied(),
            out,
        )?)
    }

    pub fn write_word_boundary<W: Write>(&self, out: W) -> Result<()> {
        Ok(format::write_id_pairs(
            self.registry.word_boundary().iter().copied(),
            out,
        )?)
    }

    /// Re-emit the disambiguated transducer directly into another sink.
    pub fn replay_disambig<S: ArcSink>(&self, sink: &mut S) -> Result<()> {
        Ok(self.disambig_fst.write_to(sink)?)
    }
}
