//! The SSA input model: value types, the per-function instruction graph,
//! and the boundary trait a host program implements to feed in its own SSA.

pub mod domain;
pub mod infrastructure;
pub mod ports;
