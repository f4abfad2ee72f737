//! Auxiliary call-graph provider consulted for dynamic dispatch when
//! pointer analysis is enabled and a call has no statically known callee.
//!
//! Grounded on the teacher's `CallGraphProvider` trait (default methods
//! layered over a single required lookup).

use crate::shared::{FuncId, InstrId};

#[derive(Debug, Clone, Copy)]
pub struct CallGraphTarget {
    pub callee: FuncId,
    pub has_receiver: bool,
}

pub trait CallGraphProvider {
    /// Resolved targets for the call site `inst` in function `caller`.
    /// Empty if pointer analysis found no edge (the switcher falls back to
    /// the CHA-based case dispatch).
    fn resolve_call_site(&self, caller: FuncId, site: InstrId) -> Vec<CallGraphTarget>;

    fn contains_function(&self, f: FuncId) -> bool {
        let _ = f;
        true
    }
}

/// No-op provider used when `use_pointer_analysis` is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCallGraph;

impl CallGraphProvider for NoCallGraph {
    fn resolve_call_site(&self, _caller: FuncId, _site: InstrId) -> Vec<CallGraphTarget> {
        Vec::new()
    }
}
