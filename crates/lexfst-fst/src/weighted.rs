// In-memory weighted transducer built through the ArcSink interface.

use crate::arc::{Arc, StateId};
use crate::weight::cost_to_prob;
use crate::{ArcSink, FstError};

/// Weighted transducer held in memory.
///
/// Arcs are kept in emission order, both globally and per source state, so a
/// graph built here lists arcs exactly as the text encoding would. The start
/// state is always 0.
#[derive(Default, Clone)]
pub struct WeightedFst {
    /// All arcs in emission order.
    arcs: Vec<Arc>,
    /// Indices into `arcs`, grouped by source state.
    out_arcs: Vec<Vec<usize>>,
    /// Final cost per state (`None` = not final).
    finals: Vec<Option<f64>>,
    /// Final states in the order they were marked.
    final_order: Vec<StateId>,
}

impl std::fmt::Debug for WeightedFst {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeightedFst")
            .field("state_count", &self.num_states())
            .field("arc_count", &self.arcs.len())
            .field("final_count", &self.final_order.len())
            .finish()
    }
}

impl WeightedFst {
    pub fn new() -> Self {
        Self::default()
    }

    /// The start state.
    pub fn start(&self) -> StateId {
        0
    }

    /// Number of states, i.e. one past the highest state id seen.
    pub fn num_states(&self) -> usize {
        self.finals.len()
    }

    pub fn num_arcs(&self) -> usize {
        self.arcs.len()
    }

    /// All arcs in emission order.
    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    /// Outgoing arcs of `state`, in emission order.
    pub fn arcs_from(&self, state: StateId) -> impl Iterator<Item = &Arc> {
        self.out_arcs
            .get(state as usize)
            .into_iter()
            .flatten()
            .map(|&i| &self.arcs[i])
    }

    /// Final cost of `state`, or `None` if it is not final.
    pub fn final_cost(&self, state: StateId) -> Option<f64> {
        self.finals.get(state as usize).copied().flatten()
    }

    pub fn is_final(&self, state: StateId) -> bool {
        self.final_cost(state).is_some()
    }

    /// Final states in the order they were marked.
    pub fn final_states(&self) -> &[StateId] {
        &self.final_order
    }

    /// Total probability leaving `state`: `Σ exp(-cost)` over its outgoing
    /// arcs plus its final mass. A stochastic state yields 1.
    pub fn out_probability(&self, state: StateId) -> f64 {
        let arc_mass: f64 = self.arcs_from(state).map(|a| cost_to_prob(a.cost)).sum();
        arc_mass + self.final_cost(state).map_or(0.0, cost_to_prob)
    }

    /// Replay the graph into another sink: arcs in emission order, then final
    /// states in marking order.
    pub fn write_to<S: ArcSink>(&self, sink: &mut S) -> Result<(), FstError> {
        for arc in &self.arcs {
            sink.add_arc(*arc)?;
        }
        for &state in &self.final_order {
            if let Some(cost) = self.final_cost(state) {
                sink.set_final(state, cost)?;
            }
        }
        Ok(())
    }

    fn ensure_state(&mut self, state: StateId) {
        let needed = state as usize + 1;
        if self.finals.len() < needed {
            self.finals.resize(needed, None);
            self.out_arcs.resize_with(needed, Vec::new);
        }
    }
}

impl ArcSink for WeightedFst {
    fn add_arc(&mut self, arc: Arc) -> Result<(), FstError> {
        self.ensure_state(arc.src.max(arc.dst));
        self.out_arcs[arc.src as usize].push(self.arcs.len());
        self.arcs.push(arc);
        Ok(())
    }

    fn set_final(&mut self, state: StateId, cost: f64) -> Result<(), FstError> {
        self.ensure_state(state);
        if self.finals[state as usize].replace(cost).is_none() {
            self.final_order.push(state);
        }
        Ok(())
    }
}
