//! Borrows a [`Function`] and its [`UnitGraph`] together so the solver can
//! look up instructions by id without threading two references everywhere.

use crate::features::ssa::domain::{Function, Instruction};
use crate::features::ssa::infrastructure::UnitGraph;
use crate::shared::InstrId;

pub struct UnitGraphView<'a> {
    func: &'a Function,
    graph: &'a UnitGraph,
}

impl<'a> UnitGraphView<'a> {
    pub fn new(func: &'a Function, graph: &'a UnitGraph) -> Self {
        UnitGraphView { func, graph }
    }

    pub fn func_name(&self) -> &str {
        &self.func.canonical
    }

    pub fn chain(&self) -> &[InstrId] {
        &self.graph.chain
    }

    pub fn heads(&self) -> &[InstrId] {
        &self.graph.heads
    }

    pub fn tails(&self) -> &[InstrId] {
        &self.graph.tails
    }

    pub fn succs(&self, inst: InstrId) -> &[InstrId] {
        self.graph.succs(inst)
    }

    pub fn preds(&self, inst: InstrId) -> &[InstrId] {
        self.graph.preds(inst)
    }

    pub fn instr(&self, id: InstrId) -> &Instruction {
        &self.func.instrs[id.0 as usize]
    }

    /// Backward-entry synthesis only looks for `Jump`-shaped instructions;
    /// this domain model has no explicit jump opcode (control flow lives in
    /// block successor lists), so an instruction qualifies when it is the
    /// last instruction of a block with exactly one successor block — the
    /// SSA-level analogue of an unconditional jump.
    pub fn is_unconditional_jump(&self, id: InstrId) -> bool {
        self.func.blocks.iter().any(|b| {
            b.succs.len() == 1 && b.instrs.last() == Some(&id)
        })
    }
}
