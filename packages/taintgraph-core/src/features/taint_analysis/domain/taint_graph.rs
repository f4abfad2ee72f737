//! The cross-function taint graph: nodes are `<canonical>#<index>` function
//! positions, edges are directed and deduplicated.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::shared::canonical_position_key;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub canonical: String,
    pub index: i64,
    pub is_method: bool,
    pub is_static: bool,
    pub is_signature: bool,
    pub is_source: bool,
    pub is_sink: bool,
    pub is_intra: bool,
}

impl Node {
    pub fn key(&self) -> String {
        canonical_position_key(&self.canonical, self.index)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub from: String,
    pub from_index: i64,
    pub to: String,
    pub to_index: i64,
    /// Flags mirrored from the target node at emission time, so consumers
    /// can filter edges without a second node lookup.
    pub to_is_method: bool,
    pub to_is_static: bool,
    pub to_is_signature: bool,
    pub to_is_sink: bool,
}

impl Edge {
    pub fn dedup_key(&self) -> String {
        format!(
            "{}#{}#{}#{}",
            self.from, self.from_index, self.to, self.to_index
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaintGraph {
    pub nodes: FxHashMap<String, Node>,
    pub edges: FxHashMap<String, Edge>,
}

impl TaintGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, key: &str) -> Option<&Node> {
        self.nodes.get(key)
    }

    pub fn upsert_node(&mut self, node: Node) -> &Node {
        let key = node.key();
        self.nodes.entry(key.clone()).or_insert(node);
        &self.nodes[&key]
    }

    pub fn is_intra(&self, key: &str) -> bool {
        self.nodes.get(key).map(|n| n.is_intra).unwrap_or(false)
    }

    /// Adds an edge if not already present. Returns `true` if it was new.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        let key = edge.dedup_key();
        if self.edges.contains_key(&key) {
            return false;
        }
        self.edges.insert(key, edge);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(canonical: &str, index: i64) -> Node {
        Node {
            canonical: canonical.into(),
            index,
            is_method: false,
            is_static: true,
            is_signature: false,
            is_source: false,
            is_sink: false,
            is_intra: true,
        }
    }

    #[test]
    fn edges_are_deduplicated() {
        let mut g = TaintGraph::new();
        g.upsert_node(node("pkg.F", 0));
        g.upsert_node(node("pkg.G", 0));
        let e = Edge {
            from: "pkg.F".into(),
            from_index: 0,
            to: "pkg.G".into(),
            to_index: 0,
            to_is_method: false,
            to_is_static: true,
            to_is_signature: false,
            to_is_sink: false,
        };
        assert!(g.add_edge(e.clone()));
        assert!(!g.add_edge(e));
        assert_eq!(g.edges.len(), 1);
    }
}
