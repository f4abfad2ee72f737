//! Persistence-agnostic summary cache boundary.

use crate::features::taint_analysis::domain::PassThroughCache;

pub trait SummaryStore {
    /// Takes `&mut self` so LRU implementations can bump recency on read.
    fn get(&mut self, canonical: &str) -> Option<PassThroughCache>;
    fn put(&mut self, canonical: &str, summary: PassThroughCache);
    fn contains(&self, canonical: &str) -> bool;
}
