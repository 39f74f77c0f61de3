use crate::core::types::{FnId, NetId};
use indexmap::IndexSet;
use std::collections::HashMap;

/// Mapping from each canonical net to the combinational functions that read it
///
/// Insertion order is preserved per net; registering the same function
/// against the same net twice is a no-op.
#[derive(Debug, Default)]
pub struct SensitivityRegistry {
    dependents: HashMap<NetId, IndexSet<FnId>>,
}

impl SensitivityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `function` must re-run when `net` is written
    ///
    /// Returns false if the pair was already registered.
    pub fn add(&mut self, net: NetId, function: FnId) -> bool {
        self.dependents.entry(net).or_default().insert(function)
    }

    /// Functions triggered by a write to `net`, in registration order
    pub fn dependents(&self, net: NetId) -> impl Iterator<Item = FnId> + '_ {
        self.dependents
            .get(&net)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn is_sensitive(&self, net: NetId, function: FnId) -> bool {
        self.dependents
            .get(&net)
            .map_or(false, |set| set.contains(&function))
    }

    /// Number of nets with at least one dependent
    pub fn net_count(&self) -> usize {
        self.dependents.len()
    }

    /// Total number of (net, function) pairs
    pub fn len(&self) -> usize {
        self.dependents.values().map(IndexSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.dependents.is_empty()
    }
}
