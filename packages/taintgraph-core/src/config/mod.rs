//! Run configuration.
//!
//! Mirrors the command-line surface of the analysis one field at a time;
//! kept separate from [`crate::pipeline::Runner`] so embeddings that build
//! their own CLI can construct a [`RunConfig`] directly.

use tracing::warn;

/// Configuration for one analysis run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub module_name: String,
    pub pkg_paths: Vec<String>,
    pub use_pointer_analysis: bool,
    pub debug: bool,
    pub init_only: bool,
    pub pass_through_only: bool,
    pub pass_through_src_paths: Vec<String>,
    pub pass_through_dst_path: Option<String>,
    pub taint_graph_dst_path: Option<String>,
    pub persist_to_neo4j: bool,
    pub neo4j_uri: Option<String>,
    pub neo4j_username: Option<String>,
    pub neo4j_password: Option<String>,
    pub target_func: Option<String>,
    pub pass_back: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            module_name: String::new(),
            pkg_paths: Vec::new(),
            use_pointer_analysis: false,
            debug: false,
            init_only: false,
            pass_through_only: false,
            pass_through_src_paths: Vec::new(),
            pass_through_dst_path: None,
            taint_graph_dst_path: None,
            persist_to_neo4j: false,
            neo4j_uri: None,
            neo4j_username: None,
            neo4j_password: None,
            target_func: None,
            pass_back: false,
        }
    }
}

impl RunConfig {
    pub fn new(pkg_paths: Vec<String>) -> Self {
        RunConfig {
            pkg_paths,
            ..Default::default()
        }
    }

    /// Graph-database persistence is out of scope for this crate's core; the
    /// knob is accepted so embeddings can carry it through, but acting on it
    /// is the embedder's responsibility. Warn loudly rather than silently
    /// drop it.
    pub fn warn_if_neo4j_requested(&self) {
        if self.persist_to_neo4j {
            warn!("persist_to_neo4j is set but taintgraph-core does not persist to a graph database; this flag is inert in the core run");
        }
    }
}
