use std::cell::RefCell;
use std::collections::HashMap;

use futures::future::BoxFuture;

use crate::errors::{ContextError, Result};
use crate::storage::ContextStorage;
use crate::value::ContextValue;

type Record = RefCell<HashMap<String, ContextValue>>;

tokio::task_local! {
    static RECORD: Record;
}

/// Backend giving each scope its own record, bound to the running task
///
/// Built on `tokio::task_local!`. `run_future` attaches a fresh record to
/// the wrapped future, and tokio re-enters it on every poll, so values
/// written before an `.await` are still there after it, while concurrently
/// running scopes never see each other's values. `run` does the same for
/// the dynamic extent of a synchronous closure.
///
/// Outside any scope reads are absent and writes fail with
/// [`ContextError::NoActiveScope`]. Nested scopes start empty; the outer
/// record is back in effect once the inner scope returns.
///
/// Spawned tasks do not inherit the record. Wrap the spawned future in its
/// own scope and copy across whatever it needs.
///
/// All instances share the same task-local slot: the record belongs to the
/// scope, not to the backend value.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskLocalContextStorage;

impl TaskLocalContextStorage {
    pub fn new() -> Self {
        Self
    }

    /// True when called from inside a scope established by this backend
    pub fn in_scope() -> bool {
        RECORD.try_with(|_| ()).is_ok()
    }
}

fn fresh_record() -> Record {
    RefCell::new(HashMap::new())
}

impl ContextStorage for TaskLocalContextStorage {
    fn name(&self) -> &str {
        "task_local"
    }

    fn get(&self, key: &str) -> Result<Option<ContextValue>> {
        Ok(RECORD
            .try_with(|record| record.borrow().get(key).cloned())
            .unwrap_or(None))
    }

    fn set(&self, key: &str, value: Option<ContextValue>) -> Result<()> {
        RECORD
            .try_with(|record| {
                let mut record = record.borrow_mut();
                match value {
                    Some(value) => {
                        record.insert(key.to_string(), value);
                    }
                    None => {
                        record.remove(key);
                    }
                }
            })
            .map_err(|_| ContextError::NoActiveScope {
                key: key.to_string(),
            })
    }

    fn run(&self, f: &mut dyn FnMut()) -> Result<()> {
        RECORD.sync_scope(fresh_record(), f);
        Ok(())
    }

    fn run_future<'a>(&'a self, fut: BoxFuture<'a, ()>) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            RECORD.scope(fresh_record(), fut).await;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: Option<ContextValue>) -> Option<String> {
        value.and_then(|v| v.downcast_ref::<String>().cloned())
    }

    #[test]
    fn test_outside_scope_reads_absent_and_writes_fail() {
        let storage = TaskLocalContextStorage::new();

        assert!(!TaskLocalContextStorage::in_scope());
        assert!(storage.get("correlationId").unwrap().is_none());

        let err = storage
            .set("correlationId", Some(ContextValue::new(String::from("x"))))
            .unwrap_err();
        assert_eq!(
            err,
            ContextError::NoActiveScope {
                key: "correlationId".to_string()
            }
        );
    }

    #[test]
    fn test_sync_scope_is_discarded_on_exit() {
        let storage = TaskLocalContextStorage::new();
        let mut seen = None;

        storage
            .run(&mut || {
                assert!(TaskLocalContextStorage::in_scope());
                storage
                    .set("sourceIP", Some(ContextValue::new(String::from("10.0.0.1"))))
                    .unwrap();
                seen = text(storage.get("sourceIP").unwrap());
            })
            .unwrap();

        assert_eq!(seen, Some("10.0.0.1".to_string()));
        assert!(storage.get("sourceIP").unwrap().is_none());
    }

    #[test]
    fn test_nested_sync_scope_starts_empty() {
        let storage = TaskLocalContextStorage::new();
        let mut inner_seen = Some(String::new());
        let mut outer_after = None;

        storage
            .run(&mut || {
                storage
                    .set("correlationId", Some(ContextValue::new(String::from("outer"))))
                    .unwrap();
                storage
                    .run(&mut || {
                        inner_seen = text(storage.get("correlationId").unwrap());
                    })
                    .unwrap();
                outer_after = text(storage.get("correlationId").unwrap());
            })
            .unwrap();

        assert_eq!(inner_seen, None);
        assert_eq!(outer_after, Some("outer".to_string()));
    }
}
