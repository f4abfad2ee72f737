//! Orchestrates one full analysis run, grounded field-for-field on the
//! reference `Runner`/`Runner.Run` (runner.go): seed `init` functions first,
//! then every other function (honoring `target_func`/`init_only`), then
//! persist whatever output paths were configured.

use rustc_hash::FxHashMap;
use tracing::info;

use crate::config::RunConfig;
use crate::errors::{Result, TaintError};
use crate::features::ssa::domain::Program;
use crate::features::ssa::ports::ProgramSource;
use crate::features::taint_analysis::application::{run, RunContext};
use crate::features::taint_analysis::domain::{PassThroughCache, TaintGraph};
use crate::features::taint_analysis::infrastructure::{
    load_pass_through, persist_pass_through, persist_taint_graph, register_function_nodes, DefaultRuleOracle,
    InterfaceHierarchy, LruSummaryStore,
};
use crate::features::taint_analysis::ports::{CallGraphProvider, NoCallGraph, RuleOracle, SummaryStore};

/// The summary catalog and taint graph produced by one [`Runner::run`] call.
#[derive(Debug)]
pub struct RunOutput {
    pub summaries: FxHashMap<String, PassThroughCache>,
    pub taint_graph: TaintGraph,
}

/// Builder for one analysis run. Mirrors `NewRunner`'s all-fields-optional
/// construction, plus two collaborator slots (`rule_oracle`, `call_graph`)
/// the reference wires through global constructors (`NewDummyRuler`,
/// `cha.CallGraph`) that this crate leaves to the embedding host instead.
pub struct Runner {
    config: RunConfig,
    rule_oracle: Option<Box<dyn RuleOracle>>,
    call_graph: Option<Box<dyn CallGraphProvider>>,
}

impl Runner {
    pub fn new(config: RunConfig) -> Self {
        Runner { config, rule_oracle: None, call_graph: None }
    }

    /// Supplies a non-default rule oracle (the reference's `Runner.Ruler`
    /// field); falls back to [`DefaultRuleOracle`] scoped to `module_name`.
    pub fn with_rule_oracle(mut self, oracle: Box<dyn RuleOracle>) -> Self {
        self.rule_oracle = Some(oracle);
        self
    }

    /// Supplies an auxiliary call-graph for dynamic-dispatch resolution when
    /// `use_pointer_analysis` is set; falls back to [`NoCallGraph`]
    /// (CHA/pointer-analysis construction is out of scope for this crate).
    pub fn with_call_graph(mut self, call_graph: Box<dyn CallGraphProvider>) -> Self {
        self.call_graph = Some(call_graph);
        self
    }

    pub fn run(self, source: impl ProgramSource) -> Result<RunOutput> {
        self.config.warn_if_neo4j_requested();
        let program = source.build();

        if self.config.use_pointer_analysis && !has_main_function(&program) {
            return Err(TaintError::NoMainPkg);
        }

        let interface_hierarchy = InterfaceHierarchy::build(&program);
        let rule_oracle = self
            .rule_oracle
            .unwrap_or_else(|| Box::new(DefaultRuleOracle::new(vec![self.config.module_name.clone()])));
        let call_graph: Box<dyn CallGraphProvider> = self.call_graph.unwrap_or_else(|| Box::new(NoCallGraph));

        let mut summaries = LruSummaryStore::with_default_size();
        if !self.config.pass_through_src_paths.is_empty() {
            let mut loaded = FxHashMap::default();
            load_pass_through(&mut loaded, &self.config.pass_through_src_paths)?;
            info!(count = loaded.len(), "loaded precomputed summaries");
            for (canonical, summary) in loaded {
                summaries.put(&canonical, summary);
            }
        }

        let ctx = RunContext::new(&program, &self.config, interface_hierarchy, call_graph, rule_oracle, Box::new(summaries));

        for (_, f) in program.iter() {
            register_function_nodes(&mut ctx.taint_graph.borrow_mut(), ctx.rule_oracle.as_ref(), f);
        }

        for (id, f) in program.iter() {
            if f.is_init() {
                run(&ctx, id);
            }
        }

        if !self.config.init_only {
            for (id, f) in program.iter() {
                if f.is_init() {
                    continue;
                }
                if let Some(target) = &self.config.target_func {
                    if &f.canonical != target {
                        continue;
                    }
                }
                run(&ctx, id);
            }
        }

        let mut summary_catalog = FxHashMap::default();
        for (_, f) in program.iter() {
            if let Some(summary) = ctx.get_summary(&f.canonical) {
                summary_catalog.insert(f.canonical.clone(), summary);
            }
        }

        if let Some(path) = &self.config.pass_through_dst_path {
            persist_pass_through(&summary_catalog, path)?;
        }
        let taint_graph = ctx.taint_graph.into_inner();
        if let Some(path) = &self.config.taint_graph_dst_path {
            let edges: Vec<_> = taint_graph.edges.values().cloned().collect();
            persist_taint_graph(&edges, path)?;
        }

        Ok(RunOutput { summaries: summary_catalog, taint_graph })
    }
}

fn has_main_function(program: &Program) -> bool {
    program.iter().any(|(_, f)| f.package == "main" && f.canonical == "main.main")
}
