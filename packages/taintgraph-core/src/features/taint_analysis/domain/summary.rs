//! Per-function passthrough summaries.

use serde::{Deserialize, Serialize};

use super::taint_wrapper::TaintWrapper;

/// Which input positions taint which output positions of one function.
/// Index 0 is the receiver, indices 1..=n are parameters 0..n-1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassThroughCache {
    /// Input positions that taint the receiver after the call. Empty if the
    /// function has no receiver.
    pub recv: Vec<usize>,
    /// One entry per result; input positions that taint that result.
    pub results: Vec<Vec<usize>>,
    /// One entry per parameter; input positions that taint that parameter
    /// after the call (back-propagation).
    pub params: Vec<Vec<usize>>,
    has_recv: bool,
}

impl PassThroughCache {
    pub fn new(has_recv: bool, num_results: usize, num_params: usize) -> Self {
        PassThroughCache {
            recv: Vec::new(),
            results: vec![Vec::new(); num_results],
            params: vec![Vec::new(); num_params],
            has_recv,
        }
    }

    pub fn has_recv(&self) -> bool {
        self.has_recv
    }

    pub fn result_num(&self) -> usize {
        self.results.len()
    }

    pub fn param_num(&self) -> usize {
        self.params.len()
    }

    /// The null summary: correct arity, no input position taints anything.
    pub fn null(has_recv: bool, num_results: usize, num_params: usize) -> Self {
        Self::new(has_recv, num_results, num_params)
    }

    pub fn is_null(&self) -> bool {
        self.recv.is_empty()
            && self.results.iter().all(Vec::is_empty)
            && self.params.iter().all(Vec::is_empty)
    }

    /// Merges taint labels discovered at a `Return` instruction for the
    /// receiver/results/params, looking up each input's taint wrapper by
    /// the function's own parameter names to find its position index.
    pub fn record_recv_taint(&mut self, input_index: usize) {
        if !self.recv.contains(&input_index) {
            self.recv.push(input_index);
        }
    }

    pub fn record_result_taint(&mut self, result_index: usize, input_index: usize) {
        let slot = &mut self.results[result_index];
        if !slot.contains(&input_index) {
            slot.push(input_index);
        }
    }

    pub fn record_param_taint(&mut self, param_index: usize, input_index: usize) {
        let slot = &mut self.params[param_index];
        if !slot.contains(&input_index) {
            slot.push(input_index);
        }
    }

    /// Collects the union of taint wrappers for every input position named
    /// in `indices`, given a resolver mapping position index to its
    /// argument's taint wrapper. Used at call sites to build the
    /// result/param/recv wrapper to write back.
    pub fn gather(indices: &[usize], mut wrapper_for_position: impl FnMut(usize) -> TaintWrapper) -> TaintWrapper {
        let mut out = TaintWrapper::new();
        for &p in indices {
            out.merge(&wrapper_for_position(p));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_summary_has_correct_arity_and_no_taint() {
        let s = PassThroughCache::null(true, 2, 3);
        assert!(s.has_recv());
        assert_eq!(s.result_num(), 2);
        assert_eq!(s.param_num(), 3);
        assert!(s.is_null());
    }

    #[test]
    fn recording_is_idempotent() {
        let mut s = PassThroughCache::new(false, 1, 1);
        s.record_result_taint(0, 0);
        s.record_result_taint(0, 0);
        assert_eq!(s.results[0], vec![0]);
    }
}
