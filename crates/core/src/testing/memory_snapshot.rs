//! In-memory snapshot slot for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::snapshot::{SnapshotError, SnapshotStore};

/// Snapshot store backed by a map, with switchable failure mode.
///
/// While failing, both `load` and `save` return a storage error and the map is
/// left untouched.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    slots: RwLock<HashMap<String, String>>,
    failing: AtomicBool,
    saves: AtomicUsize,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a slot directly, bypassing failure mode.
    pub fn insert(&self, key: &str, value: &str) {
        self.slots
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    /// Read a slot directly, bypassing failure mode.
    pub fn get(&self, key: &str) -> Option<String> {
        self.slots.read().unwrap().get(key).cloned()
    }

    /// Make subsequent operations fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), SnapshotError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(SnapshotError::Storage("simulated storage failure".to_string()))
        } else {
            Ok(())
        }
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self, key: &str) -> Result<Option<String>, SnapshotError> {
        self.check()?;
        Ok(self.get(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), SnapshotError> {
        self.check()?;
        self.insert(key, value);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
