//! The position-index convention shared by [`PassThroughCache`] and the
//! taint graph: index 0 is the receiver when the function has one,
//! otherwise indices start at the first ordinary parameter.

use crate::features::ssa::domain::Function;
use crate::features::taint_analysis::domain::{Node, TaintGraph};
use crate::features::taint_analysis::ports::{NodeView, RuleOracle};

pub fn indexed_param_names(func: &Function) -> Vec<String> {
    let mut names = Vec::with_capacity(func.params.len() + 1);
    if let Some(recv) = &func.receiver {
        names.push(recv.name.clone());
    }
    names.extend(func.params.iter().map(|p| p.name.clone()));
    names
}

/// Maps an SSA value name to its position index for the enclosing function,
/// if it names the receiver or one of the parameters.
pub fn input_index_for(func: &Function, label: &str) -> Option<usize> {
    indexed_param_names(func).iter().position(|n| n == label)
}

/// Registers one node per indexed position of `func` in the taint graph,
/// classified by `oracle`. Run once per function ahead of the solver so the
/// switcher's edge-emission helpers can test `is_intra` on the caller side
/// without creating nodes on the fly.
pub fn register_function_nodes(graph: &mut TaintGraph, oracle: &dyn RuleOracle, func: &Function) {
    let is_method = func.receiver.is_some();
    let param_types = func.param_types();
    let receiver_embeds = func.receiver_embeds.clone();
    let view = NodeView {
        canonical: &func.canonical,
        param_types: &param_types,
        receiver_embeds: &receiver_embeds,
    };
    for idx in 0..indexed_param_names(func).len() {
        let mut node = Node {
            canonical: func.canonical.clone(),
            index: idx as i64,
            is_method,
            is_static: true,
            is_signature: false,
            is_source: false,
            is_sink: false,
            is_intra: false,
        };
        node.apply_classification(oracle, &view);
        graph.upsert_node(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::ssa::infrastructure::FunctionBuilder;
    use crate::features::taint_analysis::infrastructure::DefaultRuleOracle;

    #[test]
    fn receiver_takes_index_zero() {
        let f = FunctionBuilder::new("(pkg.T).M", "pkg")
            .receiver("t")
            .param("x")
            .build_single_block();
        assert_eq!(input_index_for(&f, "t"), Some(0));
        assert_eq!(input_index_for(&f, "x"), Some(1));
    }

    #[test]
    fn no_receiver_params_start_at_zero() {
        let f = FunctionBuilder::new("pkg.F", "pkg").param("x").build_single_block();
        assert_eq!(input_index_for(&f, "x"), Some(0));
    }

    #[test]
    fn registers_one_node_per_position() {
        let f = FunctionBuilder::new("pkg.F", "pkg")
            .param("x")
            .param("y")
            .build_single_block();
        let oracle = DefaultRuleOracle::new(vec!["pkg".into()]);
        let mut graph = TaintGraph::new();
        register_function_nodes(&mut graph, &oracle, &f);
        assert!(graph.node("pkg.F#0").is_some());
        assert!(graph.node("pkg.F#1").is_some());
    }
}
