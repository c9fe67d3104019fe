use crate::errors::Result;
use crate::storage::ContextStorage;
use crate::value::ContextValue;

/// Backend that stores nothing
///
/// Every read is absent and every write is dropped. `run` simply calls the
/// function. Installed by default so the typed accessors are safe to call
/// before any backend has been configured.
///
/// # Example
/// ```
/// use appctx_core::storage::{ContextStorage, NullContextStorage};
/// use appctx_core::ContextValue;
///
/// let storage = NullContextStorage;
/// storage.set("correlationId", Some(ContextValue::new(String::from("abc")))).unwrap();
/// assert!(storage.get("correlationId").unwrap().is_none());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NullContextStorage;

impl ContextStorage for NullContextStorage {
    fn name(&self) -> &str {
        "null"
    }

    fn get(&self, _key: &str) -> Result<Option<ContextValue>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: Option<ContextValue>) -> Result<()> {
        Ok(())
    }

    fn run(&self, f: &mut dyn FnMut()) -> Result<()> {
        f();
        Ok(())
    }
}
