use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::shared::FuncId;

use super::function::Function;

/// The full set of functions under analysis, addressed by [`FuncId`].
///
/// Serializes as a flat function list; `by_canonical` is an index rebuilt on
/// load rather than carried in the wire format, so a hand-authored JSON
/// program (the shape the `taintgraph` binary reads) only ever lists functions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Function>", into = "Vec<Function>")]
pub struct Program {
    functions: Vec<Function>,
    by_canonical: FxHashMap<String, FuncId>,
}

impl From<Vec<Function>> for Program {
    fn from(functions: Vec<Function>) -> Self {
        let mut program = Program::new();
        for f in functions {
            program.push(f);
        }
        program
    }
}

impl From<Program> for Vec<Function> {
    fn from(program: Program) -> Self {
        program.functions
    }
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, f: Function) -> FuncId {
        let id = FuncId(self.functions.len() as u32);
        self.by_canonical.insert(f.canonical.clone(), id);
        self.functions.push(f);
        id
    }

    pub fn get(&self, id: FuncId) -> &Function {
        &self.functions[id.0 as usize]
    }

    pub fn lookup(&self, canonical: &str) -> Option<FuncId> {
        self.by_canonical.get(canonical).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FuncId, &Function)> {
        self.functions
            .iter()
            .enumerate()
            .map(|(i, f)| (FuncId(i as u32), f))
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
