//! Interprocedural taint analysis over SSA form: a monotone dataflow solver,
//! per-function passthrough summaries, and a cross-function taint graph.
//!
//! Embeddings implement [`features::ssa::ports::ProgramSource`] to feed in
//! their own SSA representation, then drive [`pipeline::Runner`] to produce
//! summaries and a [`features::taint_analysis::domain::TaintGraph`].

pub mod config;
pub mod errors;
pub mod features;
pub mod pipeline;
pub mod shared;

pub use errors::{Result, TaintError};
