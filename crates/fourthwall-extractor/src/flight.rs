//! Per-key async locks so one book is extracted at a time

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type KeyLock = Arc<AsyncMutex<()>>;

/// A key's lock and the number of callers holding or awaiting it
#[derive(Debug, Default)]
struct Entry {
    lock: KeyLock,
    users: usize,
}

/// Map of book key to the lock serializing its extraction
///
/// Entries are created on first use and removed when the last holder or
/// waiter lets go, so the map only ever holds keys in flight.
#[derive(Debug, Default)]
pub(crate) struct KeyedLocks {
    locks: Mutex<HashMap<String, Entry>>,
}

impl KeyedLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`
    ///
    /// The caller is registered before waiting; dropping the returned future
    /// mid-wait still unregisters it.
    pub(crate) async fn acquire(&self, key: &str) -> FlightGuard<'_> {
        let lock = {
            let mut map = self.map();
            let entry = map.entry(key.to_string()).or_default();
            entry.users += 1;
            entry.lock.clone()
        };

        let mut flight = FlightGuard {
            owner: self,
            key: key.to_string(),
            guard: None,
        };
        flight.guard = Some(lock.lock_owned().await);
        flight
    }

    /// Keys currently locked or awaited
    pub(crate) fn in_flight(&self) -> usize {
        self.map().len()
    }

    fn map(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Registration for one caller, held while waiting and during extraction
pub(crate) struct FlightGuard<'a> {
    owner: &'a KeyedLocks,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());

        let mut map = self.owner.map();
        if let Some(entry) = map.get_mut(&self.key) {
            entry.users = entry.users.saturating_sub(1);
            if entry.users == 0 {
                map.remove(&self.key);
            }
        }
    }
}
