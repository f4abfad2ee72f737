mod call_graph;
mod rule_oracle;
mod summary_store;

pub use call_graph::{CallGraphProvider, CallGraphTarget, NoCallGraph};
pub use rule_oracle::{NodeView, RuleOracle};
pub use summary_store::SummaryStore;
