//! Per-function run orchestration, grounded on `Run`/`doRun`/`needNull`
//! (analysis.go). Recursion through [`super::switcher::TaintSwitcher`]'s
//! `Call` handling re-enters [`run`] for any callee whose summary is not
//! yet cached.

use tracing::{debug, warn};

use crate::features::ssa::domain::Function;
use crate::features::ssa::infrastructure::UnitGraph;
use crate::features::taint_analysis::domain::PassThroughCache;
use crate::features::taint_analysis::infrastructure::WorklistSolver;
use crate::shared::FuncId;

use super::run_context::RunContext;
use super::switcher::TaintSwitcher;

/// Computes and caches the passthrough summary for `id`, recursing into
/// every callee it needs along the way. A no-op if a summary is already
/// cached. Safe to call for every function in the program up front — callees
/// reached only through `Call` handling short-circuit here once cached.
pub fn run(ctx: &RunContext, id: FuncId) {
    let func = ctx.program.get(id);

    if ctx.contains_summary(&func.canonical) {
        return;
    }

    if !func.has_body {
        ctx.put_summary(&func.canonical, null_summary(func));
        return;
    }

    if needs_null(ctx, func) {
        warn!(function = %func.canonical, "recursive re-entry; recording null summary to break the cycle");
        ctx.put_summary(&func.canonical, null_summary(func));
        return;
    }

    ctx.record_call(&func.canonical);
    do_run(ctx, id, func);
    ctx.pop_call();
}

fn do_run(ctx: &RunContext, id: FuncId, func: &Function) {
    debug!(function = %func.canonical, "analyzing function");
    let graph = UnitGraph::build(func);
    let mut switcher = TaintSwitcher::new(ctx, func, id);
    let solver = WorklistSolver::new(func, &graph);

    match solver.solve(&mut switcher) {
        Ok(_) => ctx.put_summary(&func.canonical, switcher.into_summary()),
        Err(err) => {
            warn!(function = %func.canonical, error = %err, "solver failed; recording null summary");
            ctx.put_summary(&func.canonical, null_summary(func));
        }
    }
}

/// `needNull`: once a function is already on the call stack (directly or
/// through mutual recursion), its in-progress summary cannot be trusted —
/// unless the current caller is an exported function calling an unexported
/// callee in the same package, which the reference treats as safe to
/// re-enter rather than null out (unexported helpers are assumed acyclic
/// relative to their exported entry points within one package).
pub fn needs_null(ctx: &RunContext, target: &Function) -> bool {
    if !ctx.is_recorded(&target.canonical) {
        return false;
    }
    if let Some(caller) = ctx.current_caller() {
        if let Some(caller_id) = ctx.program.lookup(&caller) {
            let caller_func = ctx.program.get(caller_id);
            if caller_func.exported && !target.exported && caller_func.package == target.package {
                return false;
            }
        }
    }
    true
}

fn null_summary(func: &Function) -> PassThroughCache {
    PassThroughCache::null(func.receiver.is_some(), func.num_results, func.params.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;
    use crate::features::ssa::domain::{Callee, Instruction, Program};
    use crate::features::ssa::infrastructure::FunctionBuilder;
    use crate::features::taint_analysis::infrastructure::{DefaultRuleOracle, InterfaceHierarchy, LruSummaryStore};
    use crate::features::taint_analysis::ports::NoCallGraph;

    fn context(program: &Program) -> RunContext<'_> {
        let config = RunConfig::default();
        let hierarchy = InterfaceHierarchy::build(program);
        RunContext::new(
            program,
            &config,
            hierarchy,
            Box::new(NoCallGraph),
            Box::new(DefaultRuleOracle::new(vec!["pkg".into()])),
            Box::new(LruSummaryStore::with_default_size()),
        )
    }

    #[test]
    fn identity_function_summary_passes_its_only_param_to_its_result() {
        let mut program = Program::new();
        let id = program.push(
            FunctionBuilder::new("pkg.Identity", "pkg")
                .param("x")
                .results(1)
                .instr(Instruction::Return { results: vec!["x".into()] })
                .build_single_block(),
        );
        let ctx = context(&program);
        run(&ctx, id);
        let summary = ctx.get_summary("pkg.Identity").expect("summary recorded");
        assert_eq!(summary.results[0], vec![0]);
    }

    #[test]
    fn recursive_call_resolves_to_a_null_summary_without_looping() {
        let mut program = Program::new();
        let placeholder = FuncId(0);
        let recursive = FunctionBuilder::new("pkg.Recurse", "pkg")
            .param("x")
            .results(1)
            .instr(Instruction::Call {
                result: "t0".into(),
                callee: Callee::Static(placeholder),
                receiver: None,
                args: vec!["x".into()],
                num_results: 1,
            })
            .instr(Instruction::Return { results: vec!["t0".into()] })
            .build_single_block();
        let id = program.push(recursive);
        assert_eq!(id, placeholder);

        let ctx = context(&program);
        run(&ctx, id);
        assert!(ctx.get_summary("pkg.Recurse").is_some());
    }
}
