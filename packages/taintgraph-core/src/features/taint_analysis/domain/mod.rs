mod summary;
mod taint_graph;
mod taint_wrapper;

pub use summary::PassThroughCache;
pub use taint_graph::{Edge, Node, TaintGraph};
pub use taint_wrapper::{FlowMap, TaintWrapper};
