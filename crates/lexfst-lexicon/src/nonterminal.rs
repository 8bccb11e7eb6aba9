// Grammar-decoding extension arcs.
//
// Adds two states to the lexicon transducer:
//
//   start --#nonterm_begin:#nonterm_begin--> shared
//   loop  --#nonterm:X:#nonterm:X---------> shared      (per nonterminal)
//   shared --phone:<eps> / -ln(1/n)-------> loop        (per left-context phone)
//   loop  --#nonterm_end:#nonterm_end-----> final
//
// The left-context arcs split the mass leaving `shared` evenly so the state
// stays stochastic. The grammar splicing stage cancels that cost again.

use lexfst_core::nonterm;
use lexfst_fst::weight::uniform_cost;
use lexfst_fst::{Arc, ArcSink, EPSILON, FstError, Label, StateId};

use crate::emitter::StateAllocator;
use crate::registry::SymbolRegistry;
use crate::{LexiconError, Result};

/// A symbol present in both tables, with its id on each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelPair {
    pub phone: Label,
    pub word: Label,
}

/// Resolved ids for the nonterminal arcs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonterminalLabels {
    pub begin: LabelPair,
    pub end: LabelPair,
    pub nonterminals: Vec<LabelPair>,
    pub left_context: Vec<Label>,
}

impl NonterminalLabels {
    /// Look every symbol up in `registry`.
    ///
    /// Both lists must be non-empty, and every left-context phone must be a
    /// phone symbol (e.g. `a_E` or `#nonterm_bos`).
    pub fn resolve(
        registry: &SymbolRegistry,
        nonterminals: &[String],
        left_context_phones: &[String],
    ) -> Result<Self> {
        if nonterminals.is_empty() || left_context_phones.is_empty() {
            return Err(LexiconError::InvalidConfiguration(
                "nonterminal arcs need both nonterminals and left-context phones".to_string(),
            ));
        }
        let pair = |symbol: &str| -> Result<LabelPair> {
            Ok(LabelPair {
                phone: registry.phone_label(symbol)?,
                word: registry.word_label(symbol)?,
            })
        };
        let left_context = left_context_phones
            .iter()
            .map(|phone| {
                registry.phone_label(phone).map_err(|_| {
                    LexiconError::InvalidConfiguration(format!(
                        "left-context phone {phone:?} is not in the phone table"
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            begin: pair(nonterm::BEGIN)?,
            end: pair(nonterm::END)?,
            nonterminals: nonterminals
                .iter()
                .map(|s| pair(s))
                .collect::<Result<Vec<_>>>()?,
            left_context,
        })
    }
}

/// States added by [`emit_nonterminal_arcs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonterminalStates {
    pub shared: StateId,
    pub final_state: StateId,
}

/// Emit the nonterminal arcs, allocating `shared` and the nonterminal final
/// state from `states`. The new final state is marked final with cost 0.
pub fn emit_nonterminal_arcs<S: ArcSink>(
    start: StateId,
    loop_state: StateId,
    labels: &NonterminalLabels,
    states: &mut StateAllocator,
    sink: &mut S,
) -> Result<NonterminalStates, FstError> {
    let shared = states.allocate();
    let final_state = states.allocate();

    sink.add_arc(Arc::new(
        start,
        shared,
        labels.begin.phone,
        labels.begin.word,
        0.0,
    ))?;

    for nonterminal in &labels.nonterminals {
        sink.add_arc(Arc::new(
            loop_state,
            shared,
            nonterminal.phone,
            nonterminal.word,
            0.0,
        ))?;
    }

    let cost = uniform_cost(labels.left_context.len());
    for &phone in &labels.left_context {
        sink.add_arc(Arc::new(shared, loop_state, phone, EPSILON, cost))?;
    }

    sink.add_arc(Arc::new(
        loop_state,
        final_state,
        labels.end.phone,
        labels.end.word,
        0.0,
    ))?;
    sink.set_final(final_state, 0.0)?;

    Ok(NonterminalStates {
        shared,
        final_state,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexfst_core::PhoneSet;
    use lexfst_fst::WeightedFst;

    fn registry(nonterminals: &[String]) -> SymbolRegistry {
        let phones = PhoneSet::new(["sil"], ["a", "b"]).unwrap();
        SymbolRegistry::build(&phones, ["ab"], 1, nonterminals).unwrap()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resolve_labels() {
        let nts = strings(&["#nonterm:names", "#nonterm:places"]);
        let reg = registry(&nts);
        let labels =
            NonterminalLabels::resolve(&reg, &nts, &strings(&["a_E", "#nonterm_bos"])).unwrap();
        assert_eq!(reg.phones().symbol(labels.begin.phone), Some("#nonterm_begin"));
        assert_eq!(reg.words().symbol(labels.begin.word), Some("#nonterm_begin"));
        assert_eq!(reg.words().symbol(labels.end.word), Some("#nonterm_end"));
        assert_eq!(labels.nonterminals.len(), 2);
        assert_eq!(
            reg.words().symbol(labels.nonterminals[1].word),
            Some("#nonterm:places")
        );
        assert_eq!(labels.left_context, vec![7, reg.phone_label("#nonterm_bos").unwrap()]);
    }

    #[test]
    fn resolve_rejects_unknown_left_context() {
        let nts = strings(&["#nonterm:names"]);
        let reg = registry(&nts);
        let err = NonterminalLabels::resolve(&reg, &nts, &strings(&["zz"])).unwrap_err();
        assert!(matches!(err, LexiconError::InvalidConfiguration(_)));
    }

    #[test]
    fn resolve_requires_left_context() {
        let nts = strings(&["#nonterm:names"]);
        let reg = registry(&nts);
        let err = NonterminalLabels::resolve(&reg, &nts, &[]).unwrap_err();
        assert!(matches!(err, LexiconError::InvalidConfiguration(_)));
    }

    #[test]
    fn arcs_and_stochastic_shared_state() {
        let nts = strings(&["#nonterm:names"]);
        let reg = registry(&nts);
        let labels =
            NonterminalLabels::resolve(&reg, &nts, &strings(&["a_B", "a_E", "b_S"])).unwrap();

        let mut fst = WeightedFst::new();
        let mut states = StateAllocator::new(3);
        let added = emit_nonterminal_arcs(0, 1, &labels, &mut states, &mut fst).unwrap();
        assert_eq!(added, NonterminalStates { shared: 3, final_state: 4 });

        // begin + 1 nonterminal + 3 left-context + end
        assert_eq!(fst.num_arcs(), 6);
        assert_eq!(fst.arcs_from(3).count(), 3);
        assert!((fst.out_probability(3) - 1.0).abs() < 1e-12);
        assert_eq!(fst.final_cost(4), Some(0.0));

        let into_shared: Vec<_> = fst.arcs().iter().filter(|a| a.dst == 3).collect();
        assert_eq!(into_shared.len(), 2);
        assert_eq!(into_shared[0].src, 0);
        assert_eq!(into_shared[1].src, 1);
        assert!(into_shared.iter().all(|a| a.cost == 0.0));
    }

    #[test]
    fn single_left_context_is_free() {
        let nts = strings(&["#nonterm:x"]);
        let reg = registry(&nts);
        let labels = NonterminalLabels::resolve(&reg, &nts, &strings(&["a_S"])).unwrap();
        let mut fst = WeightedFst::new();
        let mut states = StateAllocator::new(3);
        emit_nonterminal_arcs(0, 1, &labels, &mut states, &mut fst).unwrap();
        let arc = fst.arcs_from(3).next().unwrap();
        assert_eq!(arc.cost, 0.0);
        assert!(arc.cost.is_sign_positive());
    }
}
