//! Dynamic-dispatch resolution: interface-method and by-signature lookup.
//!
//! Grounded on `InterfaceHierarchy` (funcsBySig / methodsByName / methodsMemo),
//! re-expressed without a type-checker: `Function::implements` carries the
//! `(interface, method-id)` pairs an embedding's own type information
//! already determined to be satisfied, replacing `types.Implements`.

use std::cell::RefCell;

use rustc_hash::FxHashMap;

use crate::features::ssa::domain::Program;
use crate::shared::FuncId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Imethod {
    interface: u64,
    method_id: u64,
}

fn hash_str(s: &str) -> u64 {
    use std::hash::{Hash, Hasher};
    let mut h = rustc_hash::FxHasher::default();
    s.hash(&mut h);
    h.finish()
}

pub struct InterfaceHierarchy {
    funcs_by_sig: FxHashMap<String, Vec<FuncId>>,
    methods_by_name: FxHashMap<String, Vec<FuncId>>,
    implements: FxHashMap<FuncId, Vec<(String, String)>>,
    memo: RefCell<FxHashMap<Imethod, Vec<FuncId>>>,
}

impl InterfaceHierarchy {
    /// Builds the hierarchy over every function in `program`. Skips
    /// synthetic package initializers (functions literally named `init`
    /// with no receiver), since they can never be address-taken.
    pub fn build(program: &Program) -> Self {
        let mut funcs_by_sig: FxHashMap<String, Vec<FuncId>> = FxHashMap::default();
        let mut methods_by_name: FxHashMap<String, Vec<FuncId>> = FxHashMap::default();
        let mut implements: FxHashMap<FuncId, Vec<(String, String)>> = FxHashMap::default();

        for (id, f) in program.iter() {
            if f.receiver.is_none() {
                if f.canonical.ends_with(".init") || f.canonical == "init" {
                    continue;
                }
                funcs_by_sig.entry(f.signature.clone()).or_default().push(id);
            } else {
                let method_name = method_name(&f.canonical);
                methods_by_name.entry(method_name).or_default().push(id);
                if !f.implements.is_empty() {
                    implements.insert(id, f.implements.clone());
                }
            }
        }

        InterfaceHierarchy {
            funcs_by_sig,
            methods_by_name,
            implements,
            memo: RefCell::new(FxHashMap::default()),
        }
    }

    /// Returns implementations of interface method `(interface, method_id)`,
    /// memoized per `(interface, method_id)` pair.
    pub fn lookup_methods(&self, interface: &str, method_id: &str) -> Vec<FuncId> {
        let key = Imethod {
            interface: hash_str(interface),
            method_id: hash_str(method_id),
        };
        if let Some(cached) = self.memo.borrow().get(&key) {
            return cached.clone();
        }
        let method_name = method_id.rsplit('.').next().unwrap_or(method_id);
        let mut found = Vec::new();
        if let Some(candidates) = self.methods_by_name.get(method_name) {
            for &f in candidates {
                if let Some(impls) = self.implements.get(&f) {
                    if impls.iter().any(|(i, m)| i == interface && m == method_id) {
                        found.push(f);
                    }
                }
            }
        }
        self.memo.borrow_mut().insert(key, found.clone());
        found
    }

    pub fn lookup_funcs(&self, signature: &str) -> Vec<FuncId> {
        self.funcs_by_sig.get(signature).cloned().unwrap_or_default()
    }
}

fn method_name(canonical: &str) -> String {
    canonical.rsplit('.').next().unwrap_or(canonical).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::ssa::infrastructure::{program_of, FunctionBuilder};

    #[test]
    fn resolves_implementations_by_interface_and_method_id() {
        let program = program_of(vec![
            FunctionBuilder::new("(pkg.T).String", "pkg")
                .receiver("t")
                .results(1)
                .implements("fmt.Stringer", "String")
                .build_single_block(),
            FunctionBuilder::new("(pkg.U).String", "pkg")
                .receiver("u")
                .results(1)
                .build_single_block(),
        ]);
        let hierarchy = InterfaceHierarchy::build(&program);
        let methods = hierarchy.lookup_methods("fmt.Stringer", "String");
        assert_eq!(methods.len(), 1);
        assert_eq!(program.get(methods[0]).canonical, "(pkg.T).String");
    }

    #[test]
    fn memoizes_repeat_lookups() {
        let program = program_of(vec![FunctionBuilder::new("(pkg.T).String", "pkg")
            .receiver("t")
            .results(1)
            .implements("fmt.Stringer", "String")
            .build_single_block()]);
        let hierarchy = InterfaceHierarchy::build(&program);
        let a = hierarchy.lookup_methods("fmt.Stringer", "String");
        let b = hierarchy.lookup_methods("fmt.Stringer", "String");
        assert_eq!(a.len(), b.len());
    }

    #[test]
    fn lookup_funcs_by_signature() {
        let program = program_of(vec![FunctionBuilder::new("pkg.F", "pkg")
            .signature("func(int) int")
            .param("x")
            .results(1)
            .build_single_block()]);
        let hierarchy = InterfaceHierarchy::build(&program);
        let funcs = hierarchy.lookup_funcs("func(int) int");
        assert_eq!(funcs.len(), 1);
    }
}
