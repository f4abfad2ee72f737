//! Interprocedural taint analysis: the dataflow domain, the pluggable
//! boundaries (`ports`), the reusable mechanism (`infrastructure`), and the
//! per-function orchestration (`application`).

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;
