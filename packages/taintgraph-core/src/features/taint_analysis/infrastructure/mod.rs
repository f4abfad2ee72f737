//! Mechanism that is reusable independently of the taint-specific
//! orchestration in `application`: the worklist solver, dynamic-dispatch
//! resolution, the default rule catalog, and the LRU summary cache.

mod default_rule_oracle;
mod interface_hierarchy;
mod lru_summary_store;
pub mod node_index;
mod persistence;
mod unit_graph_adapter;
mod worklist_solver;

pub use default_rule_oracle::DefaultRuleOracle;
pub use interface_hierarchy::InterfaceHierarchy;
pub use lru_summary_store::LruSummaryStore;
pub use node_index::register_function_nodes;
pub use persistence::{load_pass_through, persist_pass_through, persist_taint_graph};
pub use unit_graph_adapter::UnitGraphView;
pub use worklist_solver::{FlowAnalysis, WorklistSolver};
