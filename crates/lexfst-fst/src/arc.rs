// Arc struct and id aliases

/// State identifier. States are allocated from a monotonic counter.
pub type StateId = u32;

/// Symbol-table id of an input or output label.
pub type Label = u32;

/// The epsilon label (id 0 in every symbol table).
pub const EPSILON: Label = 0;

/// A weighted transition.
///
/// `cost` is a negative log probability; `0.0` is free.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub src: StateId,
    pub dst: StateId,
    pub ilabel: Label,
    pub olabel: Label,
    pub cost: f64,
}

impl Arc {
    pub fn new(src: StateId, dst: StateId, ilabel: Label, olabel: Label, cost: f64) -> Self {
        Self {
            src,
            dst,
            ilabel,
            olabel,
            cost,
        }
    }

    /// Arc with epsilon on both sides.
    pub fn epsilon(src: StateId, dst: StateId, cost: f64) -> Self {
        Self::new(src, dst, EPSILON, EPSILON, cost)
    }

    /// Whether the arc consumes no input symbol.
    #[inline]
    pub fn is_input_epsilon(&self) -> bool {
        self.ilabel == EPSILON
    }
}
