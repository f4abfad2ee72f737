pub mod ssa;
pub mod taint_analysis;
