//! Identifiers and small helpers shared across features.

mod ids;
mod names;

pub use ids::{BlockId, FuncId, InstrId};
pub use names::canonical_position_key;
