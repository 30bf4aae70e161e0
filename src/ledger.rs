//! Pickup/restore bookkeeping for a single simulation run.

use std::collections::{HashMap, HashSet};

use crate::traits::FleetStore;

/// Bins emptied during the current run and their fill levels before it.
#[derive(Debug, Clone, Default)]
pub struct PickupLedger {
    picked_up: HashSet<String>,
    originals: HashMap<String, f64>,
}

impl PickupLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a bin's pre-run fill level. Only the first call per bin counts.
    ///
    /// Returns `true` when the value was recorded.
    pub fn record_original(&mut self, bin_id: &str, fill_level: f64) -> bool {
        if self.originals.contains_key(bin_id) {
            return false;
        }
        self.originals.insert(bin_id.to_string(), fill_level);
        true
    }

    /// Marks a bin as picked up. Returns `true` the first time only.
    pub fn mark_picked_up(&mut self, bin_id: &str) -> bool {
        self.picked_up.insert(bin_id.to_string())
    }

    pub fn is_picked_up(&self, bin_id: &str) -> bool {
        self.picked_up.contains(bin_id)
    }

    pub fn original(&self, bin_id: &str) -> Option<f64> {
        self.originals.get(bin_id).copied()
    }

    pub fn picked_up_count(&self) -> usize {
        self.picked_up.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picked_up.is_empty() && self.originals.is_empty()
    }

    /// Clears all state without touching the store.
    pub fn clear(&mut self) {
        self.picked_up.clear();
        self.originals.clear();
    }

    /// Restores every recorded fill level, then clears the ledger.
    ///
    /// Returns the number of bins restored. A second call restores nothing.
    pub fn finalize<S: FleetStore + ?Sized>(&mut self, store: &mut S) -> usize {
        let restored = self.originals.len();
        for (bin_id, fill_level) in self.originals.drain() {
            store.set_fill_level(&bin_id, fill_level);
        }
        self.picked_up.clear();
        restored
    }
}
