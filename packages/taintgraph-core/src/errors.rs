//! Error types for taintgraph-core.

use thiserror::Error;

/// Fatal error taxonomy for a taint analysis run.
///
/// Non-fatal conditions (budget exhaustion, unresolved call sites) are not
/// represented here — they are logged via `tracing` and the run continues.
#[derive(Debug, Error)]
pub enum TaintError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("pointer analysis requested but no main package with a main function was found")]
    NoMainPkg,

    #[error("backward analysis of {0} produced an empty entry set")]
    EmptyEntrySet(String),

    #[error("analysis error: {0}")]
    Analysis(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl TaintError {
    pub fn analysis(msg: impl Into<String>) -> Self {
        TaintError::Analysis(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        TaintError::Config(msg.into())
    }
}

/// Result type alias for taintgraph-core operations.
pub type Result<T> = std::result::Result<T, TaintError>;
