use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::shared::{BlockId, InstrId};

use super::instruction::Instruction;

/// A single formal parameter (or the receiver, stored separately).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    /// Static type string (e.g. `*net/http.Request`), used only by the rule
    /// oracle's structural handler detection; empty when unknown.
    pub type_name: String,
}

/// A basic block: a straight-line run of instructions with explicit
/// successor blocks. Matches the shape `UnitGraph` construction expects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Block {
    pub instrs: Vec<InstrId>,
    pub succs: Vec<BlockId>,
}

/// One analyzed function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Function {
    /// Fully-qualified name used as the summary-cache key and taint-graph
    /// node identity, e.g. `pkg.F` or `(pkg.T).M`.
    pub canonical: String,
    pub package: String,
    pub exported: bool,
    pub receiver: Option<Param>,
    pub params: Vec<Param>,
    pub num_results: usize,
    pub signature: String,
    /// Flat instruction arena for this function; [`Block::instrs`] index
    /// into this.
    pub instrs: Vec<Instruction>,
    pub blocks: Vec<Block>,
    /// `None` for external/body-less functions (C stubs, declared-only).
    pub has_body: bool,
    /// Maps an SSA value name to the instruction that defines it, used by
    /// pointer back-propagation to classify `addr`'s producer without a
    /// separate use-def index.
    pub def_site: FxHashMap<String, InstrId>,
    /// `(interface-name, method-id)` pairs this method satisfies. Computing
    /// `types.Implements`-style structural satisfaction is outside the
    /// scope of this crate's SSA domain model; embeddings that already run
    /// a type checker populate this directly instead of re-deriving it.
    pub implements: Vec<(String, String)>,
    /// Type strings of interfaces/structs embedded in the receiver's type,
    /// used only by the rule oracle's Beego-controller-embedding detection.
    pub receiver_embeds: Vec<String>,
}

impl Function {
    pub fn is_init(&self) -> bool {
        self.canonical.ends_with(".init") || self.canonical == "init"
    }

    pub fn param_index_by_name(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name == name)
    }

    pub fn param_types(&self) -> Vec<String> {
        self.params.iter().map(|p| p.type_name.clone()).collect()
    }
}
