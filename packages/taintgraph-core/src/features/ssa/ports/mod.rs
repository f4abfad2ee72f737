//! Boundary between this crate's SSA domain model and a host's real SSA
//! representation.
//!
//! Production embeddings do not construct [`crate::features::ssa::domain::Program`]
//! by hand; they implement [`ProgramSource`] over whatever SSA form their
//! frontend already builds (untyped IR, a compiler's own SSA, etc.) and
//! adapt it once at the start of a run. Constructing SSA from source text is
//! out of scope for this crate.

use crate::features::ssa::domain::Program;

/// Produces the [`Program`] to analyze. The in-crate test fixture builder
/// (`infrastructure::fixture`) is the only implementor inside this crate;
/// real embeddings adapt their own SSA builder to this trait.
pub trait ProgramSource {
    fn build(self) -> Program;
}

impl ProgramSource for Program {
    fn build(self) -> Program {
        self
    }
}
