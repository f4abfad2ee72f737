//! Per-function instruction graph, grounded on the block-linking algorithm
//! of a classic SSA unit graph: instructions within a block chain linearly;
//! a block's last instruction links to the first instruction of each
//! successor block, skipping over empty blocks transitively.

use rustc_hash::FxHashMap;

use crate::shared::InstrId;

use super::super::domain::Function;

#[derive(Debug, Clone, Default)]
pub struct UnitGraph {
    pub chain: Vec<InstrId>,
    succs: FxHashMap<InstrId, Vec<InstrId>>,
    preds: FxHashMap<InstrId, Vec<InstrId>>,
    pub heads: Vec<InstrId>,
    pub tails: Vec<InstrId>,
}

impl UnitGraph {
    pub fn build(f: &Function) -> Self {
        let mut g = UnitGraph::default();
        if let Some(first) = f.blocks.first().and_then(|b| b.instrs.first()) {
            g.heads.push(*first);
        }

        for block in &f.blocks {
            if block.instrs.is_empty() {
                continue;
            }
            for w in block.instrs.windows(2) {
                let (cur, next) = (w[0], w[1]);
                g.chain.push(cur);
                g.succs.entry(cur).or_default().push(next);
                g.preds.entry(next).or_default().push(cur);
            }
            let last = *block.instrs.last().unwrap();
            g.chain.push(last);

            if block.succs.is_empty() {
                g.tails.push(last);
                continue;
            }
            for succ_block in &block.succs {
                if let Some(target) = first_instr_transitive(f, *succ_block) {
                    g.succs.entry(last).or_default().push(target);
                    g.preds.entry(target).or_default().push(last);
                }
            }
        }
        g
    }

    pub fn size(&self) -> usize {
        self.chain.len()
    }

    pub fn succs(&self, inst: InstrId) -> &[InstrId] {
        self.succs.get(&inst).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn preds(&self, inst: InstrId) -> &[InstrId] {
        self.preds.get(&inst).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Walks successor blocks transitively until one with instructions is
/// found, matching the reference's "skip empty successor blocks" behavior.
fn first_instr_transitive(f: &Function, start: crate::shared::BlockId) -> Option<InstrId> {
    let mut block = start;
    loop {
        let b = &f.blocks[block.0 as usize];
        if let Some(first) = b.instrs.first() {
            return Some(*first);
        }
        block = *b.succs.first()?;
    }
}
