//! End-to-end orchestration over the `taint_analysis` feature.

mod runner;

pub use runner::{RunOutput, Runner};
