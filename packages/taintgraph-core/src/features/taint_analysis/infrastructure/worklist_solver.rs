//! The monotone dataflow solver: worklist fixed-point iteration with SCC
//! detection, grounded on `solver.go`'s `DoAnalysis`/`newUniverse`/`flowThrougth`.
//!
//! Deviates from the reference in one place, recorded in `DESIGN.md`: change
//! detection is equality-based uniformly (SCC and non-SCC nodes alike)
//! rather than "non-SCC nodes are always changed", which is strictly more
//! precise under the same monotonicity argument.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use crate::errors::{Result, TaintError};
use crate::features::ssa::domain::{Function, Instruction};
use crate::features::taint_analysis::domain::FlowMap;
use crate::shared::InstrId;

use super::unit_graph_adapter::UnitGraphView;

/// The transfer-function contract the solver drives. One implementation
/// (`TaintSwitcher`, wired up in `application::TaintAnalysis`) exists in
/// this crate; the trait exists so the solver stays decoupled from the
/// taint-specific transfer logic.
pub trait FlowAnalysis {
    fn new_initial_flow(&self) -> FlowMap;
    fn entry_initial_flow(&self) -> FlowMap;
    fn is_forward(&self) -> bool {
        true
    }
    fn flow_through(&mut self, in_flow: &FlowMap, inst: &Instruction, out_flow: &mut FlowMap);
    /// Merge `from` into `into`, mutating `into` (first predecessor is
    /// aliased directly by the solver and never passed here).
    fn merge(&self, into: &mut FlowMap, from: &FlowMap);
    /// Dequeue budget; the reference default for taint analysis is 3000.
    fn computation_budget(&self) -> usize {
        3000
    }
    fn end(&mut self, entries: &[InstrId]);
}

pub struct WorklistSolver<'g> {
    graph: UnitGraphView<'g>,
}

impl<'g> WorklistSolver<'g> {
    pub fn new(func: &'g Function, graph: &'g crate::features::ssa::infrastructure::UnitGraph) -> Self {
        WorklistSolver {
            graph: UnitGraphView::new(func, graph),
        }
    }

    /// Runs `analysis` to a fixed point (or until the computation budget is
    /// exhausted) and returns the final out-flow for every instruction.
    pub fn solve<A: FlowAnalysis>(&self, analysis: &mut A) -> Result<FxHashMap<InstrId, FlowMap>> {
        let entries = self.select_entries(analysis.is_forward())?;
        let universe = self.graph.chain().to_vec();
        let strongly_connected = strongly_connected_set(&self.graph, &universe);

        let mut in_flow: FxHashMap<InstrId, FlowMap> = FxHashMap::default();
        let mut out_flow: FxHashMap<InstrId, FlowMap> = FxHashMap::default();
        for &node in &universe {
            out_flow.insert(node, analysis.new_initial_flow());
        }
        let entry_flow = analysis.entry_initial_flow();
        for &e in &entries {
            in_flow.insert(e, entry_flow.clone());
        }

        let mut queue: VecDeque<InstrId> = universe.iter().copied().collect();
        let mut queued: FxHashSet<InstrId> = universe.iter().copied().collect();
        let budget = analysis.computation_budget();
        let mut computations = 0usize;

        #[cfg(feature = "trace")]
        eprintln!(
            "[worklist] {}: {} nodes, {} entries, budget {budget}",
            self.graph.func_name(),
            universe.len(),
            entries.len()
        );

        while let Some(node) = queue.pop_front() {
            queued.remove(&node);
            self.meet_flows(node, &entries, &entry_flow, &out_flow, &mut in_flow, analysis);

            let changed = self.flow_through(
                analysis,
                node,
                strongly_connected.contains(&node),
                &in_flow,
                &mut out_flow,
            );

            #[cfg(feature = "trace")]
            if changed {
                eprintln!("[worklist] {}: node {node:?} changed, requeuing successors", self.graph.func_name());
            }

            if changed {
                for &succ in self.graph.succs(node) {
                    if queued.insert(succ) {
                        queue.push_back(succ);
                    }
                }
            }

            computations += 1;
            if computations > budget {
                #[cfg(feature = "trace")]
                eprintln!("[worklist] {}: budget exceeded after {computations} computations", self.graph.func_name());
                warn!(
                    function = %self.graph.func_name(),
                    budget,
                    "computation budget exceeded; treating current state as fixed point"
                );
                break;
            }
        }
        debug!(function = %self.graph.func_name(), computations, "solver finished");

        analysis.end(&entries);
        Ok(out_flow)
    }

    fn meet_flows<A: FlowAnalysis>(
        &self,
        node: InstrId,
        entries: &[InstrId],
        entry_flow: &FlowMap,
        out_flow: &FxHashMap<InstrId, FlowMap>,
        in_flow: &mut FxHashMap<InstrId, FlowMap>,
        analysis: &A,
    ) {
        let preds = self.graph.preds(node);
        if entries.contains(&node) && preds.is_empty() {
            in_flow.insert(node, entry_flow.clone());
            return;
        }
        if preds.len() <= 1 {
            if let Some(&pred) = preds.first() {
                let pred_out = out_flow.get(&pred).cloned().unwrap_or_default();
                in_flow.insert(node, pred_out);
            } else {
                in_flow.entry(node).or_insert_with(|| analysis.new_initial_flow());
            }
            return;
        }
        let mut merged = out_flow.get(&preds[0]).cloned().unwrap_or_default();
        for &pred in &preds[1..] {
            if let Some(pred_out) = out_flow.get(&pred) {
                analysis.merge(&mut merged, pred_out);
            }
        }
        in_flow.insert(node, merged);
    }

    fn flow_through<A: FlowAnalysis>(
        &self,
        analysis: &mut A,
        node: InstrId,
        is_scc: bool,
        in_flow: &FxHashMap<InstrId, FlowMap>,
        out_flow: &mut FxHashMap<InstrId, FlowMap>,
    ) -> bool {
        let empty = FlowMap::new();
        let node_in = in_flow.get(&node).unwrap_or(&empty);
        let inst = self.graph.instr(node);

        if is_scc {
            let mut scratch = analysis.new_initial_flow();
            analysis.flow_through(node_in, inst, &mut scratch);
            let existing = out_flow.get(&node).unwrap_or(&empty);
            if scratch == *existing {
                return false;
            }
            out_flow.insert(node, scratch);
            true
        } else {
            let mut scratch = out_flow.get(&node).cloned().unwrap_or_default();
            analysis.flow_through(node_in, inst, &mut scratch);
            let existing = out_flow.get(&node).unwrap_or(&empty);
            let changed = scratch != *existing;
            out_flow.insert(node, scratch);
            changed
        }
    }

    fn select_entries(&self, forward: bool) -> Result<Vec<InstrId>> {
        let actual = if forward { self.graph.heads() } else { self.graph.tails() };
        if !actual.is_empty() {
            return Ok(actual.to_vec());
        }
        if forward {
            return Ok(Vec::new());
        }
        // Backward analysis with no tails: synthesize entries by BFS from
        // the head, collecting unconditional-jump instructions.
        let Some(&head) = self.graph.heads().first() else {
            return Err(TaintError::EmptyEntrySet(self.graph.func_name().to_string()));
        };
        let mut visited = FxHashSet::default();
        let mut worklist = VecDeque::from([head]);
        let mut entries = Vec::new();
        while let Some(cur) = worklist.pop_front() {
            if !visited.insert(cur) {
                continue;
            }
            if self.graph.is_unconditional_jump(cur) {
                entries.push(cur);
            }
            for &next in self.graph.succs(cur) {
                if !visited.contains(&next) {
                    worklist.push_back(next);
                }
            }
        }
        if entries.is_empty() {
            return Err(TaintError::EmptyEntrySet(self.graph.func_name().to_string()));
        }
        Ok(entries)
    }
}

/// Tarjan SCC over the instruction graph's successor edges; returns the set
/// of nodes in a non-trivial component or with a self-loop.
fn strongly_connected_set(graph: &UnitGraphView<'_>, universe: &[InstrId]) -> FxHashSet<InstrId> {
    let mut index = 0usize;
    let mut indices: FxHashMap<InstrId, usize> = FxHashMap::default();
    let mut lowlink: FxHashMap<InstrId, usize> = FxHashMap::default();
    let mut on_stack: FxHashSet<InstrId> = FxHashSet::default();
    let mut stack: Vec<InstrId> = Vec::new();
    let mut result: FxHashSet<InstrId> = FxHashSet::default();

    struct Frame {
        node: InstrId,
        succ_idx: usize,
    }

    for &start in universe {
        if indices.contains_key(&start) {
            continue;
        }
        let mut call_stack = vec![Frame { node: start, succ_idx: 0 }];
        indices.insert(start, index);
        lowlink.insert(start, index);
        index += 1;
        stack.push(start);
        on_stack.insert(start);

        while let Some(frame) = call_stack.last_mut() {
            let node = frame.node;
            let succs = graph.succs(node);
            if frame.succ_idx < succs.len() {
                let next = succs[frame.succ_idx];
                frame.succ_idx += 1;
                if next == node {
                    result.insert(node);
                }
                if !indices.contains_key(&next) {
                    indices.insert(next, index);
                    lowlink.insert(next, index);
                    index += 1;
                    stack.push(next);
                    on_stack.insert(next);
                    call_stack.push(Frame { node: next, succ_idx: 0 });
                } else if on_stack.contains(&next) {
                    let next_idx = indices[&next];
                    let entry = lowlink.get_mut(&node).unwrap();
                    *entry = (*entry).min(next_idx);
                }
            } else {
                call_stack.pop();
                if let Some(parent_frame) = call_stack.last() {
                    let node_low = lowlink[&node];
                    let parent = parent_frame.node;
                    let parent_low = lowlink.get_mut(&parent).unwrap();
                    *parent_low = (*parent_low).min(node_low);
                }
                if lowlink[&node] == indices[&node] {
                    let mut component = Vec::new();
                    loop {
                        let w = stack.pop().unwrap();
                        on_stack.remove(&w);
                        component.push(w);
                        if w == node {
                            break;
                        }
                    }
                    if component.len() > 1 {
                        result.extend(component);
                    }
                }
            }
        }
    }
    result
}
