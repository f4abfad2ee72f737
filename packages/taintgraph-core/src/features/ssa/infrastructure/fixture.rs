//! A minimal builder for hand-written SSA fixtures, used by this crate's
//! own tests. Not a general SSA construction pipeline — building SSA from
//! source is explicitly out of scope.

use rustc_hash::FxHashMap;

use crate::features::ssa::domain::{Block, Function, Instruction, Param, Program};
use crate::shared::{BlockId, InstrId};

pub struct FunctionBuilder {
    canonical: String,
    package: String,
    exported: bool,
    receiver: Option<Param>,
    params: Vec<Param>,
    num_results: usize,
    signature: String,
    instrs: Vec<Instruction>,
    has_body: bool,
    implements: Vec<(String, String)>,
    receiver_embeds: Vec<String>,
}

impl FunctionBuilder {
    pub fn new(canonical: impl Into<String>, package: impl Into<String>) -> Self {
        let canonical = canonical.into();
        let exported = canonical
            .rsplit(['.', ')'])
            .next()
            .and_then(|s| s.chars().next())
            .is_some_and(|c| c.is_uppercase());
        FunctionBuilder {
            canonical,
            package: package.into(),
            exported,
            receiver: None,
            params: Vec::new(),
            num_results: 0,
            signature: String::new(),
            instrs: Vec::new(),
            has_body: true,
            implements: Vec::new(),
            receiver_embeds: Vec::new(),
        }
    }

    pub fn receiver(mut self, name: impl Into<String>) -> Self {
        self.receiver = Some(Param { name: name.into(), type_name: String::new() });
        self
    }

    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.params.push(Param { name: name.into(), type_name: String::new() });
        self
    }

    pub fn param_typed(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.params.push(Param { name: name.into(), type_name: type_name.into() });
        self
    }

    pub fn receiver_embeds(mut self, embed: impl Into<String>) -> Self {
        self.receiver_embeds.push(embed.into());
        self
    }

    pub fn results(mut self, n: usize) -> Self {
        self.num_results = n;
        self
    }

    pub fn signature(mut self, sig: impl Into<String>) -> Self {
        self.signature = sig.into();
        self
    }

    pub fn no_body(mut self) -> Self {
        self.has_body = false;
        self
    }

    pub fn implements(mut self, interface: impl Into<String>, method_id: impl Into<String>) -> Self {
        self.implements.push((interface.into(), method_id.into()));
        self
    }

    pub fn instr(mut self, inst: Instruction) -> Self {
        self.instrs.push(inst);
        self
    }

    /// Builds a single-block function chaining all pushed instructions in
    /// order. Tests needing branches/loops construct `Function` directly.
    pub fn build_single_block(self) -> Function {
        let n = self.instrs.len();
        let block = Block {
            instrs: (0..n).map(|i| InstrId(i as u32)).collect(),
            succs: vec![],
        };
        let mut def_site = FxHashMap::default();
        for (i, inst) in self.instrs.iter().enumerate() {
            if let Some(name) = result_name(inst) {
                def_site.insert(name, InstrId(i as u32));
            }
        }
        Function {
            canonical: self.canonical,
            package: self.package,
            exported: self.exported,
            receiver: self.receiver,
            params: self.params,
            num_results: self.num_results,
            signature: self.signature,
            instrs: self.instrs,
            blocks: if n == 0 { vec![] } else { vec![block] },
            has_body: self.has_body,
            def_site,
            implements: self.implements,
            receiver_embeds: self.receiver_embeds,
        }
    }
}

fn result_name(inst: &Instruction) -> Option<String> {
    use Instruction::*;
    match inst {
        Alloc { result }
        | MakeChan { result }
        | MakeMap { result }
        | MakeSlice { result }
        | MakeClosure { result }
        | ChangeInterface { result, .. }
        | ChangeType { result, .. }
        | Convert { result, .. }
        | Field { result, .. }
        | FieldAddr { result, .. }
        | Index { result, .. }
        | IndexAddr { result, .. }
        | MakeInterface { result, .. }
        | Slice { result, .. }
        | Range { result, .. }
        | UnOp { result, .. }
        | BinOp { result, .. }
        | Phi { result, .. }
        | Extract { result, .. }
        | Lookup { result, .. }
        | TypeAssert { result, .. }
        | Next { result, .. }
        | Select { result, .. }
        | Call { result, .. } => Some(result.clone()),
        MapUpdate { .. } | Send { .. } | Store { .. } | Return { .. } => None,
    }
}

/// Convenience: a `Program` holding exactly the given functions, keyed by
/// their canonical names.
pub fn program_of(functions: Vec<Function>) -> Program {
    let mut p = Program::new();
    for f in functions {
        p.push(f);
    }
    p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_single_block_with_def_site_index() {
        let f = FunctionBuilder::new("pkg.Id", "pkg")
            .param("x")
            .results(1)
            .instr(Instruction::Return { results: vec!["x".into()] })
            .build_single_block();
        assert_eq!(f.blocks.len(), 1);
        assert!(f.exported);
    }
}
