//! Pluggable source/sink/intra-module classification.

use crate::features::taint_analysis::domain::Node;

/// Classifies a taint-graph node view. Any embedding may substitute a
/// richer catalog without touching the solver or switcher.
pub trait RuleOracle: Send + Sync {
    fn is_intra(&self, canonical: &str) -> bool;
    fn is_source(&self, node: &NodeView<'_>) -> bool;
    fn is_sink(&self, node: &NodeView<'_>) -> bool;
}

/// The information the oracle sees about a call-resolution target; kept
/// narrow so the oracle does not need to know about the SSA domain model.
pub struct NodeView<'a> {
    pub canonical: &'a str,
    pub param_types: &'a [String],
    pub receiver_embeds: &'a [String],
}

pub(crate) fn decide(oracle: &dyn RuleOracle, view: &NodeView<'_>) -> (bool, bool, bool) {
    (
        oracle.is_intra(view.canonical),
        oracle.is_source(view),
        oracle.is_sink(view),
    )
}

impl Node {
    pub fn apply_classification(&mut self, oracle: &dyn RuleOracle, view: &NodeView<'_>) {
        let (intra, source, sink) = decide(oracle, view);
        self.is_intra = intra;
        self.is_source = source;
        self.is_sink = sink;
    }
}
