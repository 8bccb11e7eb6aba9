// Lexicon transducer emission with optional silence between words.
//
// State layout:
//   0 start     -- eps:eps to loop (no silence) or to silence
//   1 loop      -- words leave and re-enter here; the only ordinary final state
//   2 silence   -- reached after a word followed by silence; silence phone back
//                  to loop
//   3.. optional silence-disambiguation state, word-internal states, and the
//       nonterminal states, in allocation order

use lexfst_fst::weight::prob_to_cost;
use lexfst_fst::{Arc, ArcSink, EPSILON, FstError, Label, StateId};
use tracing::debug;

use crate::nonterminal::{NonterminalLabels, NonterminalStates, emit_nonterminal_arcs};
use crate::{LexiconError, Result};

pub const START_STATE: StateId = 0;
pub const LOOP_STATE: StateId = 1;
pub const SILENCE_STATE: StateId = 2;

/// First state id handed out by the counter.
const FIRST_FREE_STATE: StateId = 3;

/// Costs of taking or skipping optional silence after a word.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SilenceModel {
    /// `-ln p`
    pub sil_cost: f64,
    /// `-ln (1 - p)`
    pub no_sil_cost: f64,
}

impl SilenceModel {
    /// Fails unless `0 < silence_prob < 1`.
    pub fn new(silence_prob: f64) -> Result<Self> {
        if !(silence_prob > 0.0 && silence_prob < 1.0) {
            return Err(LexiconError::InvalidConfiguration(format!(
                "silence probability must be strictly between 0 and 1, got {silence_prob}"
            )));
        }
        Ok(Self {
            sil_cost: prob_to_cost(silence_prob),
            no_sil_cost: prob_to_cost(1.0 - silence_prob),
        })
    }
}

/// A lexicon entry with every symbol resolved to its id.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedEntry {
    pub word: Label,
    pub weight: f64,
    pub pronunciation: Vec<Label>,
}

/// Monotonic state counter. Ids are never reused.
#[derive(Debug)]
pub struct StateAllocator {
    next: StateId,
}

impl StateAllocator {
    pub fn new(first: StateId) -> Self {
        Self { next: first }
    }

    pub fn allocate(&mut self) -> StateId {
        let state = self.next;
        self.next += 1;
        state
    }

    /// Number of states allocated so far, counting the fixed ones below
    /// `first`.
    pub fn count(&self) -> StateId {
        self.next
    }
}

/// Ids of the states with a fixed role, as emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconStates {
    pub start: StateId,
    pub loop_state: StateId,
    pub silence: StateId,
    pub silence_disambig: Option<StateId>,
    pub nonterminal: Option<NonterminalStates>,
    pub num_states: StateId,
}

/// Emits the lexicon transducer into an [`ArcSink`].
#[derive(Debug, Clone)]
pub struct LexiconFstEmitter<'a> {
    silence: SilenceModel,
    silence_phone: Label,
    silence_disambig: Option<Label>,
    nonterminals: Option<&'a NonterminalLabels>,
}

impl<'a> LexiconFstEmitter<'a> {
    /// `silence_phone` is the id of the undecorated optional-silence phone.
    pub fn new(silence: SilenceModel, silence_phone: Label) -> Self {
        Self {
            silence,
            silence_phone,
            silence_disambig: None,
            nonterminals: None,
        }
    }

    /// Follow the silence phone with this disambiguation symbol on the way
    /// back to the loop state.
    pub fn with_silence_disambig(mut self, label: Label) -> Self {
        self.silence_disambig = Some(label);
        self
    }

    /// Add grammar splicing arcs after the word arcs.
    pub fn with_nonterminals(mut self, labels: &'a NonterminalLabels) -> Self {
        self.nonterminals = Some(labels);
        self
    }

    /// Emit the whole transducer: silence sub-graph, one chain per entry,
    /// optional nonterminal arcs, then the final loop state.
    pub fn emit<S: ArcSink>(
        &self,
        entries: &[EncodedEntry],
        sink: &mut S,
    ) -> Result<LexiconStates, FstError> {
        let SilenceModel {
            sil_cost,
            no_sil_cost,
        } = self.silence;
        let mut states = StateAllocator::new(FIRST_FREE_STATE);

        sink.add_arc(Arc::epsilon(START_STATE, LOOP_STATE, no_sil_cost))?;
        sink.add_arc(Arc::epsilon(START_STATE, SILENCE_STATE, sil_cost))?;

        let silence_disambig = match self.silence_disambig {
            None => {
                sink.add_arc(Arc::new(
                    SILENCE_STATE,
                    LOOP_STATE,
                    self.silence_phone,
                    EPSILON,
                    0.0,
                ))?;
                None
            }
            Some(disambig) => {
                let state = states.allocate();
                sink.add_arc(Arc::new(
                    SILENCE_STATE,
                    state,
                    self.silence_phone,
                    EPSILON,
                    0.0,
                ))?;
                sink.add_arc(Arc::new(state, LOOP_STATE, disambig, EPSILON, 0.0))?;
                Some(state)
            }
        };

        for entry in entries {
            self.emit_entry(entry, &mut states, sink)?;
        }

        let nonterminal = match self.nonterminals {
            Some(labels) => Some(emit_nonterminal_arcs(
                START_STATE,
                LOOP_STATE,
                labels,
                &mut states,
                sink,
            )?),
            None => None,
        };

        sink.set_final(LOOP_STATE, 0.0)?;

        debug!(
            entries = entries.len(),
            states = states.count(),
            "emitted lexicon transducer"
        );

        Ok(LexiconStates {
            start: START_STATE,
            loop_state: LOOP_STATE,
            silence: SILENCE_STATE,
            silence_disambig,
            nonterminal,
            num_states: states.count(),
        })
    }

    /// One word: a chain out of the loop state whose last arc is doubled, once
    /// back into the loop state and once into the silence state.
    fn emit_entry<S: ArcSink>(
        &self,
        entry: &EncodedEntry,
        states: &mut StateAllocator,
        sink: &mut S,
    ) -> Result<(), FstError> {
        let pron = &entry.pronunciation;
        let mut current = LOOP_STATE;

        for (i, &phone) in pron.iter().enumerate().take(pron.len().saturating_sub(1)) {
            let next = states.allocate();
            let (olabel, cost) = if i == 0 {
                (entry.word, entry.weight)
            } else {
                (EPSILON, 0.0)
            };
            sink.add_arc(Arc::new(current, next, phone, olabel, cost))?;
            current = next;
        }

        // The word label and weight go on the last arc only when it is also
        // the first one.
        let (ilabel, olabel, weight) = match pron.last() {
            Some(&phone) if pron.len() > 1 => (phone, EPSILON, 0.0),
            Some(&phone) => (phone, entry.word, entry.weight),
            None => (EPSILON, entry.word, entry.weight),
        };
        sink.add_arc(Arc::new(
            current,
            LOOP_STATE,
            ilabel,
            olabel,
            self.silence.no_sil_cost + weight,
        ))?;
        sink.add_arc(Arc::new(
            current,
            SILENCE_STATE,
            ilabel,
            olabel,
            self.silence.sil_cost + weight,
        ))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexfst_fst::WeightedFst;

    const SIL: Label = 1;
    const SIL_DISAMBIG: Label = 20;

    fn emit(entries: &[EncodedEntry], emitter: &LexiconFstEmitter) -> (WeightedFst, LexiconStates) {
        let mut fst = WeightedFst::new();
        let states = emitter.emit(entries, &mut fst).unwrap();
        (fst, states)
    }

    fn half() -> SilenceModel {
        SilenceModel::new(0.5).unwrap()
    }

    fn entry(word: Label, weight: f64, pron: &[Label]) -> EncodedEntry {
        EncodedEntry {
            word,
            weight,
            pronunciation: pron.to_vec(),
        }
    }

    #[test]
    fn silence_probability_bounds() {
        for bad in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            assert!(matches!(
                SilenceModel::new(bad),
                Err(LexiconError::InvalidConfiguration(_))
            ));
        }
        let model = SilenceModel::new(0.2).unwrap();
        assert!((model.sil_cost - -(0.2f64.ln())).abs() < 1e-12);
        assert!((model.no_sil_cost - -(0.8f64.ln())).abs() < 1e-12);
    }

    #[test]
    fn empty_lexicon_skeleton() {
        let emitter = LexiconFstEmitter::new(half(), SIL);
        let (fst, states) = emit(&[], &emitter);
        assert_eq!(fst.num_arcs(), 3);
        assert_eq!(states.num_states, 3);
        assert_eq!(states.silence_disambig, None);
        let arc = fst.arcs()[2];
        assert_eq!((arc.src, arc.dst, arc.ilabel, arc.olabel), (2, 1, SIL, EPSILON));
        assert_eq!(fst.final_states(), &[LOOP_STATE]);
        assert!((fst.out_probability(START_STATE) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn silence_disambig_state() {
        let emitter = LexiconFstEmitter::new(half(), SIL).with_silence_disambig(SIL_DISAMBIG);
        let (fst, states) = emit(&[], &emitter);
        assert_eq!(states.silence_disambig, Some(3));
        let arcs = fst.arcs();
        assert_eq!((arcs[2].src, arcs[2].dst, arcs[2].ilabel), (2, 3, SIL));
        assert_eq!((arcs[3].src, arcs[3].dst, arcs[3].ilabel), (3, 1, SIL_DISAMBIG));
        assert_eq!(arcs[2].cost, 0.0);
        assert_eq!(arcs[3].cost, 0.0);
    }

    #[test]
    fn single_phone_word() {
        let emitter = LexiconFstEmitter::new(half(), SIL);
        let (fst, _) = emit(&[entry(7, 0.25, &[5])], &emitter);
        let word_arcs: Vec<_> = fst.arcs()[3..].to_vec();
        assert_eq!(word_arcs.len(), 2);
        let model = half();
        assert_eq!(word_arcs[0], Arc::new(1, 1, 5, 7, model.no_sil_cost + 0.25));
        assert_eq!(word_arcs[1], Arc::new(1, 2, 5, 7, model.sil_cost + 0.25));
    }

    #[test]
    fn multi_phone_chain() {
        let emitter = LexiconFstEmitter::new(half(), SIL);
        let (fst, states) = emit(&[entry(9, 1.5, &[4, 5, 6])], &emitter);
        let model = half();
        let arcs = &fst.arcs()[3..];
        assert_eq!(arcs[0], Arc::new(1, 3, 4, 9, 1.5));
        assert_eq!(arcs[1], Arc::new(3, 4, 5, EPSILON, 0.0));
        assert_eq!(arcs[2], Arc::new(4, 1, 6, EPSILON, model.no_sil_cost));
        assert_eq!(arcs[3], Arc::new(4, 2, 6, EPSILON, model.sil_cost));
        assert_eq!(states.num_states, 5);
    }

    #[test]
    fn empty_pronunciation_word() {
        let emitter = LexiconFstEmitter::new(half(), SIL);
        let (fst, _) = emit(&[entry(3, 2.0, &[])], &emitter);
        let model = half();
        let arcs = &fst.arcs()[3..];
        assert_eq!(arcs[0], Arc::new(1, 1, EPSILON, 3, model.no_sil_cost + 2.0));
        assert_eq!(arcs[1], Arc::new(1, 2, EPSILON, 3, model.sil_cost + 2.0));
    }

    #[test]
    fn parallel_final_arcs_differ_by_silence_cost() {
        let model = SilenceModel::new(0.3).unwrap();
        let emitter = LexiconFstEmitter::new(model, SIL);
        let entries = [entry(2, 0.0, &[4]), entry(3, 0.7, &[4, 5]), entry(4, 0.1, &[])];
        let (fst, _) = emit(&entries, &emitter);
        let into_loop: Vec<_> = fst.arcs()[3..]
            .iter()
            .filter(|a| a.dst == LOOP_STATE)
            .collect();
        let into_sil: Vec<_> = fst.arcs()[3..]
            .iter()
            .filter(|a| a.dst == SILENCE_STATE)
            .collect();
        assert_eq!(into_loop.len(), 3);
        assert_eq!(into_loop.len(), into_sil.len());
        for (a, b) in into_loop.iter().zip(&into_sil) {
            assert_eq!((a.src, a.ilabel, a.olabel), (b.src, b.ilabel, b.olabel));
            let diff = b.cost - a.cost;
            assert!((diff - (model.sil_cost - model.no_sil_cost)).abs() < 1e-12);
        }
    }

    #[test]
    fn state_ids_never_reused() {
        let emitter = LexiconFstEmitter::new(half(), SIL).with_silence_disambig(SIL_DISAMBIG);
        let entries = [entry(2, 0.0, &[4, 5]), entry(3, 0.0, &[6, 7, 8])];
        let (fst, states) = emit(&entries, &emitter);
        // 3 = silence disambig, 4 = first word, 5 and 6 = second word
        let srcs: Vec<_> = fst.arcs().iter().map(|a| a.src).collect();
        assert_eq!(srcs, vec![0, 0, 2, 3, 1, 4, 4, 1, 5, 6, 6]);
        assert_eq!(states.num_states, 7);
    }
}
