//! Registry of in-flight sleeps.
//!
//! A map from connection id to [`ConnectionEntry`] behind a single gate.
//! Every operation takes the gate for the map access only and releases it
//! before returning, so nothing ever waits while holding it.

pub mod entry;

pub use entry::{ConnectionEntry, Preemption};

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Arc<Mutex<HashMap<String, ConnectionEntry>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `entry` unless its id is already registered.
    ///
    /// Returns whether the entry was inserted; an existing entry is left
    /// untouched.
    pub fn try_register(&self, entry: ConnectionEntry) -> bool {
        match self.lock().entry(entry.id().to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
        }
    }

    /// Removes and returns the entry registered under `id`.
    pub fn remove(&self, id: &str) -> Option<ConnectionEntry> {
        self.lock().remove(id)
    }

    /// Removes the entry under `id` only if it is the registration with the
    /// given serial.
    pub fn complete(&self, id: &str, serial: u64) -> Option<ConnectionEntry> {
        let mut entries = self.lock();
        match entries.get(id) {
            Some(entry) if entry.serial() == serial => entries.remove(id),
            _ => None,
        }
    }

    /// Remaining milliseconds of every registered entry, keyed by id.
    pub fn snapshot(&self) -> BTreeMap<String, i64> {
        let entries = self.lock();
        let now = Instant::now();

        entries
            .iter()
            .map(|(id, entry)| (id.clone(), entry.remaining_ms_at(now)))
            .collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic elsewhere cannot leave the map half-updated: every operation
    // is a single HashMap call.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, ConnectionEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
