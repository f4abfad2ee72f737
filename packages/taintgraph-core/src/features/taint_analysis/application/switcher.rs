//! The taint transfer function, grounded on `TaintSwitcher` (switcher.go).
//! Implements [`FlowAnalysis`] so the worklist solver can drive it; recursive
//! calls into [`super::analysis::run`] resolve callee summaries on demand.
//!
//! The reference dispatches a `Call`'s callee shape through a long,
//! type-introspecting `switch` (field load, free var, map lookup, type
//! assert, make-interface, phi, make-closure, extract, parameter, and
//! pointer-chain-through-alloc/field-addr/index-addr cases) because Go's
//! `go/ssa` exposes no pre-resolved notion of "this call targets a known
//! function". This crate's SSA input port asks the embedding host (which
//! already has that type information) to resolve the callee ahead of time
//! into [`Callee`], collapsing that whole dispatch into five cases.

use crate::features::ssa::domain::{Builtin, Callee, Function, Instruction};
use crate::features::taint_analysis::domain::{Edge, FlowMap, Node, PassThroughCache, TaintWrapper};
use crate::features::taint_analysis::infrastructure::node_index::{indexed_param_names, input_index_for};
use crate::features::taint_analysis::infrastructure::FlowAnalysis;
use crate::features::taint_analysis::ports::NodeView;
use crate::shared::{canonical_position_key, FuncId, InstrId};

use super::analysis::{needs_null, run};
use super::run_context::RunContext;

pub struct TaintSwitcher<'ctx, 'p> {
    ctx: &'ctx RunContext<'p>,
    func: &'p Function,
    func_id: FuncId,
    summary: PassThroughCache,
}

impl<'ctx, 'p> TaintSwitcher<'ctx, 'p> {
    pub fn new(ctx: &'ctx RunContext<'p>, func: &'p Function, func_id: FuncId) -> Self {
        let summary = PassThroughCache::new(func.receiver.is_some(), func.num_results, func.params.len());
        TaintSwitcher { ctx, func, func_id, summary }
    }

    pub fn into_summary(self) -> PassThroughCache {
        self.summary
    }

    fn handle_call(
        &mut self,
        site: InstrId,
        result: &str,
        callee: &Callee,
        receiver: Option<&str>,
        args: &[String],
        num_results: usize,
        out_flow: &mut FlowMap,
    ) {
        if self.ctx.use_pointer_analysis {
            let targets = self.ctx.call_graph.resolve_call_site(self.func_id, site);
            if let Some(target) = targets.first() {
                self.dispatch_known(target.callee, receiver, args, result, num_results, out_flow);
                return;
            }
        }

        match callee {
            Callee::Static(id) => {
                let target = self.ctx.program.get(*id);
                let param_types = target.param_types();
                self.record_edges(&target.canonical, false, true, false, &param_types, &target.receiver_embeds, receiver, args, out_flow);
                self.dispatch_known(*id, receiver, args, result, num_results, out_flow);
            }
            Callee::GlobalVar(name) => {
                if let Some(id) = self.ctx.resolve_global(name) {
                    let target = self.ctx.program.get(id);
                    let param_types = target.param_types();
                    self.record_edges(&target.canonical, false, true, false, &param_types, &target.receiver_embeds, receiver, args, out_flow);
                    self.dispatch_known(id, receiver, args, result, num_results, out_flow);
                } else {
                    materialize_results(num_results, result, out_flow);
                }
            }
            Callee::Method { interface, method_id, .. } => {
                self.record_edges(method_id, true, false, false, &[], &[], receiver, args, out_flow);
                let methods = self.ctx.interface_hierarchy.lookup_methods(interface, method_id);
                if let Some(&id) = methods.first() {
                    self.dispatch_known(id, receiver, args, result, num_results, out_flow);
                } else {
                    #[cfg(feature = "trace")]
                    eprintln!("[switcher] {interface}.{method_id}: no implementations, null summary");
                    materialize_results(num_results, result, out_flow);
                }
            }
            Callee::BySignature(sig) => {
                self.record_edges(sig, false, false, true, &[], &[], receiver, args, out_flow);
                let funcs = self.ctx.interface_hierarchy.lookup_funcs(sig);
                if let Some(&id) = funcs.first() {
                    self.dispatch_known(id, receiver, args, result, num_results, out_flow);
                } else {
                    #[cfg(feature = "trace")]
                    eprintln!("[switcher] {sig}: no matching funcs by signature, null summary");
                    materialize_results(num_results, result, out_flow);
                }
            }
            Callee::Builtin(b) => self.apply_builtin(*b, result, args, out_flow),
        }
    }

    fn dispatch_known(
        &mut self,
        id: FuncId,
        receiver: Option<&str>,
        args: &[String],
        result: &str,
        num_results: usize,
        out_flow: &mut FlowMap,
    ) {
        let target = self.ctx.program.get(id);
        if !target.has_body {
            materialize_results(num_results, result, out_flow);
            return;
        }
        if !self.ctx.contains_summary(&target.canonical) {
            if needs_null(self.ctx, target) {
                #[cfg(feature = "trace")]
                eprintln!("[switcher] {}: recursive/unresolved call, null summary", target.canonical);
                materialize_results(num_results, result, out_flow);
                return;
            }
            run(self.ctx, id);
        }
        let summary = self
            .ctx
            .get_summary(&target.canonical)
            .unwrap_or_else(|| PassThroughCache::null(target.receiver.is_some(), target.num_results, target.params.len()));
        self.apply_summary(&summary, receiver, args, result, out_flow);
    }

    /// Applies a resolved callee's summary at this call site: gathers each
    /// output position's input labels into the matching argument wrapper,
    /// writes the result(s), and back-propagates through the receiver and
    /// parameters (never results — a summary only reports what flows out).
    fn apply_summary(&mut self, summary: &PassThroughCache, receiver: Option<&str>, args: &[String], result: &str, out_flow: &mut FlowMap) {
        let has_recv = summary.has_recv();

        if has_recv {
            let new_recv = PassThroughCache::gather(&summary.recv, |p| {
                position_arg_name(true, receiver, args, p)
                    .and_then(|name| out_flow.get(name))
                    .cloned()
                    .unwrap_or_default()
            });
            if let Some(r) = receiver {
                out_flow.set(r.to_string(), new_recv);
                self.pass_point_taint(r, out_flow);
            }
        }

        for i in 0..summary.result_num() {
            let new_result = PassThroughCache::gather(&summary.results[i], |p| {
                position_arg_name(has_recv, receiver, args, p)
                    .and_then(|name| out_flow.get(name))
                    .cloned()
                    .unwrap_or_default()
            });
            let name = if summary.result_num() == 1 { result.to_string() } else { format!("{result}.{i}") };
            out_flow.set(name, new_result);
        }

        for i in 0..summary.param_num() {
            let new_param = PassThroughCache::gather(&summary.params[i], |p| {
                position_arg_name(has_recv, receiver, args, p)
                    .and_then(|name| out_flow.get(name))
                    .cloned()
                    .unwrap_or_default()
            });
            if let Some(arg) = args.get(i) {
                out_flow.set(arg.clone(), new_param);
                self.pass_point_taint(arg, out_flow);
            }
        }
    }

    fn apply_builtin(&mut self, b: Builtin, result: &str, args: &[String], out_flow: &mut FlowMap) {
        match b {
            Builtin::Append => {
                let mut merged = TaintWrapper::new();
                for a in args {
                    if let Some(w) = out_flow.get(a) {
                        merged.merge(w);
                    }
                }
                out_flow.set(result.to_string(), merged);
                for a in args {
                    out_flow.pass_taint(a, &[result]);
                }
            }
            Builtin::Copy => {
                if args.len() >= 2 {
                    out_flow.pass_taint(args[0].as_str(), &[args[1].as_str()]);
                }
                out_flow.get_or_create(result);
            }
            Builtin::NoOp => {
                out_flow.get_or_create(result);
            }
        }
    }

    /// Walks backward through address-taking SSA chains, grounded on
    /// `passPointTaint`/`passBackCallTaint`: when a written-through pointer
    /// was itself derived from a conversion/assertion/field/index chain,
    /// replay the taint one step further back so a later read through the
    /// same chain still observes it.
    fn pass_point_taint(&mut self, name: &str, out_flow: &mut FlowMap) {
        let func = self.func;
        let Some(&def) = func.def_site.get(name) else { return };
        match &func.instrs[def.0 as usize] {
            Instruction::Convert { x, .. }
            | Instruction::TypeAssert { x, .. }
            | Instruction::ChangeType { x, .. }
            | Instruction::ChangeInterface { x, .. }
            | Instruction::MakeInterface { x, .. }
            | Instruction::UnOp { x, .. }
            | Instruction::FieldAddr { x, .. }
            | Instruction::IndexAddr { x, .. } => {
                let x = x.clone();
                out_flow.pass_taint(&x, &[name]);
                self.pass_point_taint(&x, out_flow);
            }
            Instruction::Slice { x, .. } => {
                out_flow.pass_taint(x, &[name]);
            }
            Instruction::Alloc { .. } => {
                let target = name.to_string();
                let stores: Vec<String> = func
                    .instrs
                    .iter()
                    .filter_map(|inst| match inst {
                        Instruction::Store { addr, val, .. } if *addr == target => Some(val.clone()),
                        _ => None,
                    })
                    .collect();
                for val in stores {
                    out_flow.pass_taint(name, &[val.as_str()]);
                    self.pass_back_call_taint(&val, out_flow);
                }
            }
            _ => {}
        }
    }

    /// Replays a call result's taint back into the call's own parameter
    /// arguments, so writing a call result through a pointer parameter is
    /// visible to the caller's summary at `Return`.
    fn pass_back_call_taint(&mut self, value_name: &str, out_flow: &mut FlowMap) {
        let func = self.func;
        let Some(&def) = func.def_site.get(value_name) else { return };
        if let Instruction::Call { result, args, .. } = &func.instrs[def.0 as usize] {
            for arg in args {
                if func.param_index_by_name(arg).is_some() {
                    out_flow.pass_taint(arg, &[result.as_str()]);
                }
            }
        }
    }

    /// Records edges into the taint graph from every caller parameter whose
    /// label reaches one of this call's input positions, grounded on
    /// `collectCallEdges`/`collectMethodEdges`/`collectSignatureEdges`
    /// (collapsed into one function here since this domain model always
    /// keeps the receiver separate from `args`, unlike `go/ssa`'s call
    /// shape where a value-receiver static call packs it into `Args[0]`).
    #[allow(clippy::too_many_arguments)]
    fn record_edges(
        &mut self,
        target_canonical: &str,
        is_method: bool,
        is_static: bool,
        is_signature: bool,
        target_param_types: &[String],
        target_receiver_embeds: &[String],
        receiver: Option<&str>,
        args: &[String],
        out_flow: &FlowMap,
    ) {
        if self.func.is_init() || self.ctx.pass_through_only {
            return;
        }
        let has_recv = receiver.is_some();
        let position_count = if has_recv { 1 + args.len() } else { args.len() };
        let caller_names = indexed_param_names(self.func);

        for p in 0..position_count {
            let Some(name) = position_arg_name(has_recv, receiver, args, p) else { continue };
            let Some(wrapper) = out_flow.get(name) else { continue };
            for label in wrapper.iter() {
                let Some(k) = caller_names.iter().position(|n| n == label) else { continue };
                let caller_key = canonical_position_key(&self.func.canonical, k as i64);
                let mut graph = self.ctx.taint_graph.borrow_mut();
                if !graph.is_intra(&caller_key) {
                    continue;
                }
                let callee_key = canonical_position_key(target_canonical, p as i64);
                if graph.node(&callee_key).is_none() {
                    let mut node = Node {
                        canonical: target_canonical.to_string(),
                        index: p as i64,
                        is_method,
                        is_static,
                        is_signature,
                        is_source: false,
                        is_sink: false,
                        is_intra: false,
                    };
                    let view = NodeView {
                        canonical: target_canonical,
                        param_types: target_param_types,
                        receiver_embeds: target_receiver_embeds,
                    };
                    node.apply_classification(self.ctx.rule_oracle.as_ref(), &view);
                    graph.upsert_node(node);
                }
                let to_is_sink = graph.node(&callee_key).map(|n| n.is_sink).unwrap_or(false);
                graph.add_edge(Edge {
                    from: self.func.canonical.clone(),
                    from_index: k as i64,
                    to: target_canonical.to_string(),
                    to_index: p as i64,
                    to_is_method: is_method,
                    to_is_static: is_static,
                    to_is_signature: is_signature,
                    to_is_sink,
                });
            }
        }
    }
}

fn position_arg_name<'a>(has_recv: bool, receiver: Option<&'a str>, args: &'a [String], p: usize) -> Option<&'a str> {
    if has_recv {
        if p == 0 {
            receiver
        } else {
            args.get(p - 1).map(String::as_str)
        }
    } else {
        args.get(p).map(String::as_str)
    }
}

fn materialize_results(num_results: usize, result: &str, out_flow: &mut FlowMap) {
    if num_results <= 1 {
        out_flow.get_or_create(result);
    } else {
        for i in 0..num_results {
            out_flow.get_or_create(&format!("{result}.{i}"));
        }
    }
}

impl FlowAnalysis for TaintSwitcher<'_, '_> {
    fn new_initial_flow(&self) -> FlowMap {
        FlowMap::new()
    }

    fn entry_initial_flow(&self) -> FlowMap {
        let mut m = FlowMap::new();
        for name in indexed_param_names(self.func) {
            m.get_or_create(&name).add_taint(name.clone());
        }
        m
    }

    fn flow_through(&mut self, in_flow: &FlowMap, inst: &Instruction, out_flow: &mut FlowMap) {
        *out_flow = in_flow.clone();
        match inst {
            Instruction::Alloc { result }
            | Instruction::MakeChan { result }
            | Instruction::MakeMap { result }
            | Instruction::MakeSlice { result }
            | Instruction::MakeClosure { result } => {
                out_flow.get_or_create(result);
            }

            Instruction::ChangeInterface { result, x }
            | Instruction::ChangeType { result, x }
            | Instruction::Convert { result, x }
            | Instruction::Field { result, x }
            | Instruction::FieldAddr { result, x }
            | Instruction::Index { result, x }
            | Instruction::IndexAddr { result, x }
            | Instruction::MakeInterface { result, x }
            | Instruction::Slice { result, x }
            | Instruction::Range { result, x } => {
                out_flow.pass_taint(result, &[x.as_str()]);
            }

            Instruction::UnOp { result, x, comma_ok } => {
                if *comma_ok {
                    out_flow.pass_taint(&format!("{result}.0"), &[x.as_str()]);
                    out_flow.get_or_create(&format!("{result}.1"));
                } else {
                    out_flow.pass_taint(result, &[x.as_str()]);
                }
            }

            Instruction::BinOp { result, x, y } => {
                out_flow.pass_taint(result, &[x.as_str(), y.as_str()]);
            }

            Instruction::Phi { result, edges } => {
                for e in edges {
                    out_flow.pass_taint(result, &[e.as_str()]);
                }
            }

            Instruction::Extract { result, tuple, index } => {
                let mark = format!("{tuple}.{index}");
                out_flow.pass_taint(result, &[mark.as_str()]);
            }

            Instruction::Lookup { result, index, map, comma_ok } => {
                if *comma_ok {
                    out_flow.pass_taint(&format!("{result}.0"), &[index.as_str(), map.as_str()]);
                    out_flow.get_or_create(&format!("{result}.1"));
                } else {
                    out_flow.pass_taint(result, &[index.as_str(), map.as_str()]);
                }
            }

            Instruction::TypeAssert { result, x, comma_ok } => {
                if *comma_ok {
                    out_flow.pass_taint(&format!("{result}.0"), &[x.as_str()]);
                    out_flow.get_or_create(&format!("{result}.1"));
                } else {
                    out_flow.pass_taint(result, &[x.as_str()]);
                }
            }

            Instruction::Next { result, iter } => {
                out_flow.get_or_create(&format!("{result}.0"));
                out_flow.pass_taint(&format!("{result}.1"), &[iter.as_str()]);
                out_flow.pass_taint(&format!("{result}.2"), &[iter.as_str()]);
            }

            Instruction::MapUpdate { map, key, value } => {
                out_flow.pass_taint(map, &[key.as_str(), value.as_str()]);
            }

            Instruction::Send { chan, x } => {
                out_flow.pass_taint(chan, &[x.as_str()]);
            }

            Instruction::Select { result, num_states } => {
                out_flow.get_or_create(&format!("{result}.0"));
                out_flow.get_or_create(&format!("{result}.1"));
                for k in 0..*num_states {
                    out_flow.get_or_create(&format!("{result}.{}", k + 2));
                }
            }

            Instruction::Store { addr, val, addr_is_global, stored_func } => {
                out_flow.pass_taint(addr, &[val.as_str()]);
                if *addr_is_global {
                    if let Some(fid) = stored_func {
                        self.ctx.record_global(addr, *fid);
                    }
                }
                self.pass_point_taint(addr, out_flow);
            }

            Instruction::Return { results } => {
                if let Some(recv) = &self.func.receiver {
                    let self_idx = input_index_for(self.func, &recv.name);
                    if let Some(w) = out_flow.get(&recv.name) {
                        let labels: Vec<String> = w.iter().cloned().collect();
                        for label in labels {
                            if let Some(idx) = input_index_for(self.func, &label) {
                                if Some(idx) != self_idx {
                                    self.summary.record_recv_taint(idx);
                                }
                            }
                        }
                    }
                }
                for (i, name) in results.iter().enumerate() {
                    if let Some(w) = out_flow.get(name) {
                        let labels: Vec<String> = w.iter().cloned().collect();
                        for label in labels {
                            if let Some(idx) = input_index_for(self.func, &label) {
                                self.summary.record_result_taint(i, idx);
                            }
                        }
                    }
                }
                for (i, p) in self.func.params.iter().enumerate() {
                    let self_idx = input_index_for(self.func, &p.name);
                    if let Some(w) = out_flow.get(&p.name) {
                        let labels: Vec<String> = w.iter().cloned().collect();
                        for label in labels {
                            if let Some(idx) = input_index_for(self.func, &label) {
                                if Some(idx) != self_idx {
                                    self.summary.record_param_taint(i, idx);
                                }
                            }
                        }
                    }
                }
            }

            Instruction::Call { result, callee, receiver, args, num_results } => {
                let site = *self.func.def_site.get(result).unwrap_or(&InstrId(u32::MAX));
                self.handle_call(site, result, callee, receiver.as_deref(), args, *num_results, out_flow);
            }
        }
    }

    fn merge(&self, into: &mut FlowMap, from: &FlowMap) {
        for name in from.names() {
            let incoming = from.get(name).cloned().unwrap_or_default();
            into.get_or_create(name).merge(&incoming);
        }
    }

    fn end(&mut self, _entries: &[InstrId]) {
        // A value receiver's taint is never reset here: `Return` already
        // recorded whatever labels reached it, and the reference's own
        // reset branch is permanently disabled (`... && false`), so there
        // is nothing to port.
        if let Some(name) = self.ctx.target_func.as_deref() {
            if name == self.func.canonical {
                tracing::debug!(function = %self.func.canonical, summary = ?self.summary, "target function analysis complete");
            }
        }
    }
}

