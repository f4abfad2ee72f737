//! SSA instruction shapes.
//!
//! Operand and result references are SSA value names (strings); the switcher
//! never looks them up in anything but the current flow map, so there is no
//! need for a separate value-id space.

use serde::{Deserialize, Serialize};

use crate::shared::FuncId;

/// One SSA instruction. Variants mirror the opcode set a taint transfer
/// function must distinguish; instructions that the switcher treats
/// identically (e.g. `Field`/`FieldAddr`/`Convert`) are still kept distinct
/// here because pointer back-propagation (see [`Callee`] and the switcher)
/// cares which one produced a given value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Instruction {
    Alloc { result: String },
    MakeChan { result: String },
    MakeMap { result: String },
    MakeSlice { result: String },
    MakeClosure { result: String },

    ChangeInterface { result: String, x: String },
    ChangeType { result: String, x: String },
    Convert { result: String, x: String },
    Field { result: String, x: String },
    FieldAddr { result: String, x: String },
    Index { result: String, x: String },
    IndexAddr { result: String, x: String },
    MakeInterface { result: String, x: String },
    Slice { result: String, x: String },
    Range { result: String, x: String },

    /// Channel receive / comma-ok variants share this shape; `comma_ok`
    /// distinguishes `x := <-c` from `x, ok := <-c`.
    UnOp { result: String, x: String, comma_ok: bool },

    BinOp { result: String, x: String, y: String },

    Phi { result: String, edges: Vec<String> },

    /// `result = tuple.index`, addressed downstream as `tuple.index`.
    Extract { result: String, tuple: String, index: usize },

    Lookup { result: String, index: String, map: String, comma_ok: bool },

    TypeAssert { result: String, x: String, comma_ok: bool },

    Next { result: String, iter: String },

    MapUpdate { map: String, key: String, value: String },

    Send { chan: String, x: String },

    /// `result.0`, `result.1` are materialized always; one slot per state.
    Select { result: String, num_states: usize },

    /// `*addr = val`. `addr_is_global` and `stored_func` together let the
    /// switcher populate the init map when a known function literal is
    /// stored into a package-level global (see [`crate::features::ssa::domain::Function`]
    /// for how `addr`'s producing instruction is looked up for
    /// back-propagation).
    Store { addr: String, val: String, addr_is_global: bool, stored_func: Option<FuncId> },

    /// `return results...`; indices line up with the enclosing function's
    /// result list. `results[i]` is the SSA name read at the return point.
    Return { results: Vec<String> },

    /// `receiver` is `Some` whenever the resolved callee has a receiver
    /// (method invocation, or a static call to a value-receiver function
    /// taken as a method expression); it is always kept separate from
    /// `args`, which holds only the ordinary parameter arguments.
    Call { result: String, callee: Callee, receiver: Option<String>, args: Vec<String>, num_results: usize },
}

/// The callee expression of a `Call` instruction, distinguishing the shapes
/// the transfer function must resolve differently. `Static`/`Method` are the
/// common cases; the rest mirror the anonymous-function-value resolution
/// cases (field load, free var, map lookup, type assert, make-interface,
/// phi, make-closure, extract, parameter, pointer chains through alloc /
/// field-addr / index-addr, and call results).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Callee {
    /// Statically known function (including global function literals).
    Static(FuncId),
    /// Interface method invocation: `(interface-name, method-id)`.
    Method { interface: String, method_id: String, signature: String },
    /// Builtin: `append`, `copy`, or a no-op builtin (`len`, `cap`, ...).
    Builtin(Builtin),
    /// Global variable holding a function value, resolved via the init map
    /// by canonical global name.
    GlobalVar(String),
    /// Any other anonymous-function-value shape (field/free-var/lookup/
    /// type-assert/make-interface/phi/make-closure/extract/parameter/
    /// alloc-referrer/field-addr/index-addr/call-result) reduced to its
    /// static signature string for `funcs_by_sig` lookup.
    BySignature(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Builtin {
    Append,
    Copy,
    NoOp,
}
