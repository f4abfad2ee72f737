//! The taint lattice: powerset-of-parameter-labels, ⊔ = union, ⊥ = ∅.

use ahash::AHashSet;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A lattice element: the set of parameter labels known to flow into one
/// SSA value. Monotone under union; equality is set equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaintWrapper(AHashSet<String>);

impl TaintWrapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_labels<I: IntoIterator<Item = String>>(labels: I) -> Self {
        TaintWrapper(labels.into_iter().collect())
    }

    pub fn add_taint(&mut self, label: impl Into<String>) {
        self.0.insert(label.into());
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.contains(label)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    /// Union `other` into `self`; returns whether `self` changed.
    pub fn merge(&mut self, other: &TaintWrapper) -> bool {
        let before = self.0.len();
        self.0.extend(other.0.iter().cloned());
        self.0.len() != before
    }
}

/// One program point's mapping from SSA value name to its taint wrapper.
/// Values absent from the map are treated as ⊥ (empty wrapper) by the
/// accessor helpers below, never as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowMap(FxHashMap<String, TaintWrapper>);

impl FlowMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the wrapper for `name`, inserting an empty one if absent —
    /// the read-or-create accessor used throughout the switcher.
    pub fn get_or_create(&mut self, name: &str) -> &mut TaintWrapper {
        self.0.entry(name.to_string()).or_default()
    }

    pub fn get(&self, name: &str) -> Option<&TaintWrapper> {
        self.0.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, wrapper: TaintWrapper) {
        self.0.insert(name.into(), wrapper);
    }

    /// `PassTaint`: union the wrappers of every `src` into `dst`, creating
    /// empty wrappers for any name not yet present.
    pub fn pass_taint(&mut self, dst: &str, srcs: &[&str]) {
        let mut merged = self.0.get(dst).cloned().unwrap_or_default();
        for src in srcs {
            let w = self.0.entry((*src).to_string()).or_default();
            merged.merge(w);
        }
        self.0.insert(dst.to_string(), merged);
    }

    /// `InheritTaint`: union `flow[name]` into `wrapper` in place.
    pub fn inherit_taint(&mut self, wrapper: &mut TaintWrapper, name: &str) {
        let w = self.0.entry(name.to_string()).or_default();
        wrapper.merge(w);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every SSA value name currently tracked at this program point, in
    /// arbitrary order — used by the solver's merge step to union two maps.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_taint_unions_sources_into_destination() {
        let mut flow = FlowMap::new();
        flow.get_or_create("x").add_taint("a");
        flow.get_or_create("y").add_taint("b");
        flow.pass_taint("z", &["x", "y"]);
        let z = flow.get("z").unwrap();
        assert!(z.contains("a"));
        assert!(z.contains("b"));
    }

    #[test]
    fn merge_is_idempotent() {
        let mut a = TaintWrapper::from_labels(["p".to_string()]);
        let b = a.clone();
        assert!(!a.merge(&b));
    }

    #[test]
    fn missing_names_behave_as_bottom() {
        let flow = FlowMap::new();
        assert!(flow.get("never-seen").is_none());
    }
}
