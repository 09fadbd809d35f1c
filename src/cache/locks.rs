//! Per-path generation locks
//!
//! Process-local. A key's entry lives only while some task holds or awaits
//! its lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Slot = Arc<AsyncMutex<()>>;

/// Map of lock key to async mutex
#[derive(Debug, Default)]
pub struct LockMap {
    slots: Mutex<HashMap<String, Slot>>,
}

impl LockMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lock for `key` if no other task holds it
    pub fn try_acquire(&self, key: &str) -> Option<LockGuard<'_>> {
        let slot = self.slot(key);
        match slot.try_lock_owned() {
            Ok(guard) => Some(self.guard(key, guard)),
            Err(_) => {
                self.release(key);
                None
            }
        }
    }

    /// Wait for the lock for `key`
    pub async fn acquire(&self, key: &str) -> LockGuard<'_> {
        let slot = self.slot(key);
        let guard = slot.lock_owned().await;
        self.guard(key, guard)
    }

    /// Number of keys currently held or awaited
    pub fn len(&self) -> usize {
        self.slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slots(&self) -> std::sync::MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn slot(&self, key: &str) -> Slot {
        self.slots()
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    fn guard(&self, key: &str, guard: OwnedMutexGuard<()>) -> LockGuard<'_> {
        LockGuard {
            map: self,
            key: key.to_string(),
            guard: Some(guard),
        }
    }

    /// Drop the entry for `key` once only the map references it
    fn release(&self, key: &str) {
        let mut slots = self.slots();
        if slots.get(key).is_some_and(|slot| Arc::strong_count(slot) == 1) {
            slots.remove(key);
        }
    }
}

/// Held generation lock; released on drop
#[derive(Debug)]
pub struct LockGuard<'a> {
    map: &'a LockMap,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.map.release(&self.key);
    }
}
