//! Application context facade and typed accessors
//!
//! [`ApplicationContext`] holds the active storage backend and exposes the
//! request fields under fixed key names. Request entry points construct or
//! receive one, install a backend once, then wrap each unit of work in
//! [`ApplicationContext::run_in_context`] (or its async form) and call the
//! setters near the start of the scope. Code further down the call graph
//! reads the same values back through the getters.

use std::any::{type_name, Any};
use std::fmt;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use appctx_core_types::schema::{
    EVENT_SCOPE_ENTER, EVENT_SNAPSHOT_FAILED, EVENT_STORAGE_INSTALLED, KEY_AUTHENTICATION_TOKEN,
    KEY_CORRELATION_ID, KEY_SOURCE_IP, KEY_TRANSACTION_CONNECTION,
};
use appctx_core_types::{ContextSnapshot, Sensitive};

use crate::errors::{ContextError, Result};
use crate::storage::{ContextStorage, NullContextStorage};
use crate::transaction::TransactionConnection;
use crate::value::ContextValue;

/// Entry point for reading and writing request-scoped values
///
/// Starts out with [`NullContextStorage`]: until a real backend is
/// installed, setters are dropped, string getters return `""` and the
/// transaction getter returns `None`.
pub struct ApplicationContext {
    storage: RwLock<Arc<dyn ContextStorage>>,
}

impl ApplicationContext {
    pub fn new() -> Self {
        Self::with_shared_storage(Arc::new(NullContextStorage))
    }

    pub fn with_storage<S: ContextStorage + 'static>(storage: S) -> Self {
        Self::with_shared_storage(Arc::new(storage))
    }

    pub fn with_shared_storage(storage: Arc<dyn ContextStorage>) -> Self {
        Self {
            storage: RwLock::new(storage),
        }
    }

    // ========== Storage selection ==========

    /// Replace the active backend
    ///
    /// A full replacement: nothing stored in the previous backend carries
    /// over. Install once at startup, before requests are served; swapping
    /// while requests are in flight leaves those requests reading from
    /// whichever backend is active at each call.
    pub fn use_storage<S: ContextStorage + 'static>(&self, storage: S) {
        self.use_shared_storage(Arc::new(storage));
    }

    /// Replace the active backend with an already shared instance
    pub fn use_shared_storage(&self, storage: Arc<dyn ContextStorage>) {
        let mut slot = self.storage.write().unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::replace(&mut *slot, storage);
        tracing::debug!(
            component = module_path!(),
            event = EVENT_STORAGE_INSTALLED,
            backend = slot.name(),
            previous_backend = previous.name(),
        );
    }

    /// Name of the active backend
    pub fn storage_name(&self) -> String {
        self.storage().name().to_string()
    }

    // The slot lock is released before any backend call, so a backend's
    // scope may itself call use_storage without deadlocking.
    fn storage(&self) -> Arc<dyn ContextStorage> {
        let slot = self.storage.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&slot)
    }

    // ========== Scopes ==========

    /// Run `f` inside a scope of the active backend and return its result
    ///
    /// Whether values written inside `f` are isolated from other scopes, and
    /// whether they survive after `f` returns, depends on the backend.
    ///
    /// # Errors
    ///
    /// Propagates backend faults, and returns `ScopeNotEntered` if the
    /// backend returned without calling `f`.
    pub fn run_in_context<R>(&self, f: impl FnOnce() -> R) -> Result<R> {
        let storage = self.storage();
        tracing::trace!(
            component = module_path!(),
            event = EVENT_SCOPE_ENTER,
            backend = storage.name(),
        );

        let mut f = Some(f);
        let mut output = None;
        storage.run(&mut || {
            if let Some(f) = f.take() {
                output = Some(f());
            }
        })?;

        output.ok_or_else(|| ContextError::ScopeNotEntered {
            backend: storage.name().to_string(),
        })
    }

    /// Drive `fut` inside a scope of the active backend
    ///
    /// With an isolating backend the scope stays attached to `fut` across
    /// all of its `.await` points.
    ///
    /// # Errors
    ///
    /// Propagates backend faults, and returns `ScopeNotEntered` if the
    /// backend completed without driving `fut`.
    pub async fn run_in_context_async<F>(&self, fut: F) -> Result<F::Output>
    where
        F: Future + Send,
        F::Output: Send,
    {
        let storage = self.storage();
        tracing::trace!(
            component = module_path!(),
            event = EVENT_SCOPE_ENTER,
            backend = storage.name(),
        );

        let mut output = None;
        storage
            .run_future(Box::pin(async {
                output = Some(fut.await);
            }))
            .await?;

        output.ok_or_else(|| ContextError::ScopeNotEntered {
            backend: storage.name().to_string(),
        })
    }

    // ========== Raw access ==========

    /// Read the untyped value under `key`
    ///
    /// # Errors
    ///
    /// Propagates backend faults.
    pub fn get_value(&self, key: &str) -> Result<Option<ContextValue>> {
        self.storage().get(key)
    }

    /// Read the value under `key` as `T`
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if a value is present but is not a `T`, and
    /// propagates backend faults.
    pub fn get<T: Any + Send + Sync + Clone>(&self, key: &str) -> Result<Option<T>> {
        match self.get_value(key)? {
            None => Ok(None),
            Some(value) => value
                .downcast_ref::<T>()
                .cloned()
                .map(Some)
                .ok_or_else(|| ContextError::TypeMismatch {
                    key: key.to_string(),
                    expected: type_name::<T>(),
                }),
        }
    }

    /// Store `value` under `key`; `None` clears the key
    ///
    /// # Errors
    ///
    /// Propagates backend faults.
    pub fn set(&self, key: &str, value: Option<ContextValue>) -> Result<()> {
        self.storage().set(key, value)
    }

    /// # Errors
    ///
    /// Propagates backend faults.
    pub fn set_value<T: Any + Send + Sync>(&self, key: &str, value: T) -> Result<()> {
        self.set(key, Some(ContextValue::new(value)))
    }

    // ========== Typed fields ==========

    /// Record the caller's authentication token
    ///
    /// Stored as [`Sensitive`], so it never shows up in formatted output.
    /// There is intentionally no getter on this facade.
    ///
    /// # Errors
    ///
    /// Propagates backend faults.
    pub fn set_authentication_token(&self, token: impl Into<String>) -> Result<()> {
        self.set_value(KEY_AUTHENTICATION_TOKEN, Sensitive::new(token.into()))
    }

    /// # Errors
    ///
    /// Propagates backend faults.
    pub fn set_correlation_id(&self, correlation_id: impl Into<String>) -> Result<()> {
        self.set_value(KEY_CORRELATION_ID, correlation_id.into())
    }

    /// # Errors
    ///
    /// Propagates backend faults.
    pub fn set_source_ip(&self, source_ip: impl Into<String>) -> Result<()> {
        self.set_value(KEY_SOURCE_IP, source_ip.into())
    }

    /// Correlation ID of the current request, or `""` if none was set
    ///
    /// # Errors
    ///
    /// Propagates backend faults and type mismatches.
    pub fn correlation_id(&self) -> Result<String> {
        Ok(self.get::<String>(KEY_CORRELATION_ID)?.unwrap_or_default())
    }

    /// Source IP of the current request, or `""` if none was set
    ///
    /// # Errors
    ///
    /// Propagates backend faults and type mismatches.
    pub fn source_ip(&self) -> Result<String> {
        Ok(self.get::<String>(KEY_SOURCE_IP)?.unwrap_or_default())
    }

    /// The active transaction connection; `None` means no transaction is open
    ///
    /// # Errors
    ///
    /// Propagates backend faults and type mismatches.
    pub fn transaction_connection(&self) -> Result<Option<TransactionConnection>> {
        self.get::<TransactionConnection>(KEY_TRANSACTION_CONNECTION)
    }

    /// Publish a transaction connection, or clear it with `None`
    ///
    /// # Errors
    ///
    /// Propagates backend faults.
    pub fn set_transaction_connection(&self, connection: Option<TransactionConnection>) -> Result<()> {
        self.set(KEY_TRANSACTION_CONNECTION, connection.map(ContextValue::new))
    }

    /// Forget the transaction connection once its transaction has finished
    ///
    /// Only the context's reference is dropped; the connection is not closed.
    ///
    /// # Errors
    ///
    /// Propagates backend faults.
    pub fn clean_transaction_connection(&self) -> Result<()> {
        self.set(KEY_TRANSACTION_CONNECTION, None)
    }

    /// Loggable view of the current request
    ///
    /// # Errors
    ///
    /// Propagates backend faults and type mismatches.
    pub fn snapshot(&self) -> Result<ContextSnapshot> {
        Ok(ContextSnapshot {
            correlation_id: self.correlation_id()?,
            source_ip: self.source_ip()?,
            transaction_active: self.get_value(KEY_TRANSACTION_CONNECTION)?.is_some(),
        })
    }

    /// Snapshot for log enrichment, empty if the backend faults
    ///
    /// A log line must not fail because its context could not be read; the
    /// fault is reported as a `warn` event instead.
    pub fn snapshot_or_empty(&self) -> ContextSnapshot {
        self.snapshot().unwrap_or_else(|err| {
            tracing::warn!(
                component = module_path!(),
                event = EVENT_SNAPSHOT_FAILED,
                code = err.code(),
                error = %err,
            );
            ContextSnapshot::default()
        })
    }
}

impl Default for ApplicationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ApplicationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationContext")
            .field("storage", &self.storage())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryContextStorage;

    #[test]
    fn test_defaults_to_null_storage() {
        let context = ApplicationContext::new();
        assert_eq!(context.storage_name(), "null");
        assert_eq!(context.correlation_id().unwrap(), "");
        assert!(context.transaction_connection().unwrap().is_none());
    }

    #[test]
    fn test_use_storage_switches_backend() {
        let context = ApplicationContext::new();
        context.use_storage(InMemoryContextStorage::new());
        assert_eq!(context.storage_name(), "in_memory");
    }

    #[test]
    fn test_run_in_context_returns_closure_output() {
        let context = ApplicationContext::with_storage(InMemoryContextStorage::new());
        let answer = context.run_in_context(|| 6 * 7).unwrap();
        assert_eq!(answer, 42);
    }

    #[test]
    fn test_backend_that_skips_scope_is_reported() {
        #[derive(Debug)]
        struct Skipping;

        impl ContextStorage for Skipping {
            fn name(&self) -> &str {
                "skipping"
            }
            fn get(&self, _key: &str) -> Result<Option<ContextValue>> {
                Ok(None)
            }
            fn set(&self, _key: &str, _value: Option<ContextValue>) -> Result<()> {
                Ok(())
            }
            fn run(&self, _f: &mut dyn FnMut()) -> Result<()> {
                Ok(())
            }
        }

        let context = ApplicationContext::with_storage(Skipping);
        let err = context.run_in_context(|| ()).unwrap_err();
        assert_eq!(
            err,
            ContextError::ScopeNotEntered {
                backend: "skipping".to_string()
            }
        );
    }

    #[test]
    fn test_get_with_wrong_type_is_mismatch() {
        let context = ApplicationContext::with_storage(InMemoryContextStorage::new());
        context.set_value(KEY_CORRELATION_ID, 17_u64).unwrap();

        let err = context.correlation_id().unwrap_err();
        assert_eq!(err.key(), Some(KEY_CORRELATION_ID));
        assert_eq!(err.code(), "ERR_TYPE_MISMATCH");
    }

    #[test]
    fn test_debug_names_backend() {
        let context = ApplicationContext::with_storage(InMemoryContextStorage::new());
        let debug_str = format!("{:?}", context);
        assert!(debug_str.contains("InMemoryContextStorage"));
    }
}
