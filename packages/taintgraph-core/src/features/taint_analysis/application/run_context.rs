//! Shared, run-scoped state threaded through every recursive [`super::analysis::run`]
//! call: the summary cache, recursion history, call stack, init map and
//! taint graph. Grounded on `TaintConfig` (runner.go), re-expressed with
//! interior mutability since the analysis is single-threaded and re-entrant
//! by ordinary recursion rather than by a shared config struct passed by
//! pointer.

use std::cell::RefCell;

use rustc_hash::FxHashMap;

use crate::config::RunConfig;
use crate::features::ssa::domain::Program;
use crate::features::taint_analysis::domain::{PassThroughCache, TaintGraph};
use crate::features::taint_analysis::infrastructure::InterfaceHierarchy;
use crate::features::taint_analysis::ports::{CallGraphProvider, RuleOracle, SummaryStore};
use crate::shared::FuncId;

pub struct RunContext<'p> {
    pub program: &'p Program,
    pub interface_hierarchy: InterfaceHierarchy,
    pub call_graph: Box<dyn CallGraphProvider>,
    pub rule_oracle: Box<dyn RuleOracle>,
    pub use_pointer_analysis: bool,
    pub pass_through_only: bool,
    pub target_func: Option<String>,
    summaries: RefCell<Box<dyn SummaryStore>>,
    history: RefCell<rustc_hash::FxHashSet<String>>,
    call_stack: RefCell<Vec<String>>,
    init_map: RefCell<FxHashMap<String, FuncId>>,
    pub taint_graph: RefCell<TaintGraph>,
}

impl<'p> RunContext<'p> {
    pub fn new(
        program: &'p Program,
        config: &RunConfig,
        interface_hierarchy: InterfaceHierarchy,
        call_graph: Box<dyn CallGraphProvider>,
        rule_oracle: Box<dyn RuleOracle>,
        summaries: Box<dyn SummaryStore>,
    ) -> Self {
        RunContext {
            program,
            interface_hierarchy,
            call_graph,
            rule_oracle,
            use_pointer_analysis: config.use_pointer_analysis,
            pass_through_only: config.pass_through_only,
            target_func: config.target_func.clone(),
            summaries: RefCell::new(summaries),
            history: RefCell::new(rustc_hash::FxHashSet::default()),
            call_stack: RefCell::new(Vec::new()),
            init_map: RefCell::new(FxHashMap::default()),
            taint_graph: RefCell::new(TaintGraph::new()),
        }
    }

    pub fn contains_summary(&self, canonical: &str) -> bool {
        self.summaries.borrow().contains(canonical)
    }

    pub fn get_summary(&self, canonical: &str) -> Option<PassThroughCache> {
        self.summaries.borrow_mut().get(canonical)
    }

    pub fn put_summary(&self, canonical: &str, summary: PassThroughCache) {
        self.summaries.borrow_mut().put(canonical, summary);
    }

    pub fn is_recorded(&self, canonical: &str) -> bool {
        self.history.borrow().contains(canonical)
    }

    pub fn current_caller(&self) -> Option<String> {
        self.call_stack.borrow().last().cloned()
    }

    pub fn record_call(&self, canonical: &str) {
        self.history.borrow_mut().insert(canonical.to_string());
        self.call_stack.borrow_mut().push(canonical.to_string());
    }

    pub fn pop_call(&self) {
        self.call_stack.borrow_mut().pop();
    }

    pub fn resolve_global(&self, name: &str) -> Option<FuncId> {
        self.init_map.borrow().get(name).copied()
    }

    pub fn record_global(&self, name: &str, id: FuncId) {
        self.init_map.borrow_mut().insert(name.to_string(), id);
    }
}
