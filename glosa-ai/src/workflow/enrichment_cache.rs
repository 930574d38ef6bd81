//! Per-key enrichment state machine
//!
//! Each key moves `Absent → InFlight → Resolved`, or back to `Absent` when
//! the task is abandoned. A key may only be claimed from `Absent`, which is
//! what keeps at most one task in flight per key.

use std::collections::HashMap;
use std::hash::Hash;

/// Observable state of one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Absent,
    InFlight,
    Resolved,
}

#[derive(Debug, Clone)]
enum Slot<V> {
    InFlight,
    Resolved(V),
}

/// Tracks in-flight markers and resolved values per key
#[derive(Debug, Clone)]
pub struct EnrichmentCache<K, V> {
    slots: HashMap<K, Slot<V>>,
}

impl<K: Eq + Hash + Clone, V: Clone> EnrichmentCache<K, V> {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    pub fn state(&self, key: &K) -> CacheState {
        match self.slots.get(key) {
            None => CacheState::Absent,
            Some(Slot::InFlight) => CacheState::InFlight,
            Some(Slot::Resolved(_)) => CacheState::Resolved,
        }
    }

    /// Claim a key for generation
    ///
    /// Returns `false` without changing anything unless the key is `Absent`.
    pub fn begin(&mut self, key: K) -> bool {
        if self.slots.contains_key(&key) {
            return false;
        }
        self.slots.insert(key, Slot::InFlight);
        true
    }

    /// Store the generated value, moving the key to `Resolved`
    pub fn resolve(&mut self, key: K, value: V) {
        self.slots.insert(key, Slot::Resolved(value));
    }

    /// Release an in-flight claim after a failure
    ///
    /// Resolved values are left alone.
    pub fn abandon(&mut self, key: &K) {
        if matches!(self.slots.get(key), Some(Slot::InFlight)) {
            self.slots.remove(key);
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        match self.slots.get(key) {
            Some(Slot::Resolved(value)) => Some(value),
            _ => None,
        }
    }

    pub fn in_flight_keys(&self) -> impl Iterator<Item = &K> {
        self.slots
            .iter()
            .filter(|(_, slot)| matches!(slot, Slot::InFlight))
            .map(|(key, _)| key)
    }

    pub fn in_flight_count(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| matches!(slot, Slot::InFlight))
            .count()
    }

    pub fn resolved_count(&self) -> usize {
        self.slots.len() - self.in_flight_count()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Drop resolved values; outstanding claims stay in flight
    pub fn clear_resolved(&mut self) {
        self.slots.retain(|_, slot| matches!(slot, Slot::InFlight));
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Default for EnrichmentCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
