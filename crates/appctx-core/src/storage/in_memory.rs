use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::errors::Result;
use crate::storage::ContextStorage;
use crate::value::ContextValue;

/// Backend holding a single map shared by every caller
///
/// `run` is a pass-through: it neither creates nor clears a record, so values
/// written inside a scope are still visible after it ends and are visible to
/// any other scope using the same instance. The mutex only keeps the map
/// memory-safe; it does not isolate requests. Do not install this backend
/// where requests are handled concurrently and must not see each other's
/// data.
///
/// Distinct instances never share data.
#[derive(Debug, Default)]
pub struct InMemoryContextStorage {
    entries: Mutex<HashMap<String, ContextValue>>,
}

impl InMemoryContextStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently holding a value
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Drop every stored value
    pub fn clear(&self) {
        self.entries().clear();
    }

    // A panic while the lock was held cannot leave the map half-updated:
    // every mutation is a single insert or remove.
    fn entries(&self) -> MutexGuard<'_, HashMap<String, ContextValue>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ContextStorage for InMemoryContextStorage {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn get(&self, key: &str) -> Result<Option<ContextValue>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: Option<ContextValue>) -> Result<()> {
        let mut entries = self.entries();
        match value {
            Some(value) => {
                entries.insert(key.to_string(), value);
            }
            None => {
                entries.remove(key);
            }
        }
        Ok(())
    }

    fn run(&self, f: &mut dyn FnMut()) -> Result<()> {
        f();
        Ok(())
    }
}
