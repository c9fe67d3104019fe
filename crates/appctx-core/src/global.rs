//! Process-wide convenience wrapper
//!
//! Every function here forwards to one lazily created [`ApplicationContext`].
//! Until [`use_storage`] is called it runs on the null backend, so calls made
//! before bootstrap return empty values instead of failing.
//!
//! Prefer passing an `ApplicationContext` explicitly where that is practical;
//! these functions exist for code that cannot be reached by injection, such
//! as logging macros.
//!
//! # Usage
//!
//! ```rust
//! use appctx_core::global;
//! use appctx_core::storage::TaskLocalContextStorage;
//!
//! global::use_storage(TaskLocalContextStorage::new());
//!
//! let seen = global::run_in_context(|| {
//!     global::set_correlation_id("abc-123").unwrap();
//!     global::correlation_id().unwrap()
//! })
//! .unwrap();
//! assert_eq!(seen, "abc-123");
//! ```

use std::future::Future;
use std::sync::{Arc, OnceLock};

use appctx_core_types::ContextSnapshot;

use crate::context::ApplicationContext;
use crate::errors::Result;
use crate::storage::ContextStorage;
use crate::transaction::TransactionConnection;

static GLOBAL_CONTEXT: OnceLock<ApplicationContext> = OnceLock::new();

/// The process-wide context
pub fn global() -> &'static ApplicationContext {
    GLOBAL_CONTEXT.get_or_init(ApplicationContext::new)
}

pub fn use_storage<S: ContextStorage + 'static>(storage: S) {
    global().use_storage(storage);
}

pub fn use_shared_storage(storage: Arc<dyn ContextStorage>) {
    global().use_shared_storage(storage);
}

pub fn storage_name() -> String {
    global().storage_name()
}

/// # Errors
///
/// See [`ApplicationContext::run_in_context`].
pub fn run_in_context<R>(f: impl FnOnce() -> R) -> Result<R> {
    global().run_in_context(f)
}

/// # Errors
///
/// See [`ApplicationContext::run_in_context_async`].
pub async fn run_in_context_async<F>(fut: F) -> Result<F::Output>
where
    F: Future + Send,
    F::Output: Send,
{
    global().run_in_context_async(fut).await
}

/// # Errors
///
/// Propagates backend faults.
pub fn set_authentication_token(token: impl Into<String>) -> Result<()> {
    global().set_authentication_token(token)
}

/// # Errors
///
/// Propagates backend faults.
pub fn set_correlation_id(correlation_id: impl Into<String>) -> Result<()> {
    global().set_correlation_id(correlation_id)
}

/// # Errors
///
/// Propagates backend faults.
pub fn set_source_ip(source_ip: impl Into<String>) -> Result<()> {
    global().set_source_ip(source_ip)
}

/// # Errors
///
/// Propagates backend faults and type mismatches.
pub fn correlation_id() -> Result<String> {
    global().correlation_id()
}

/// # Errors
///
/// Propagates backend faults and type mismatches.
pub fn source_ip() -> Result<String> {
    global().source_ip()
}

/// # Errors
///
/// Propagates backend faults and type mismatches.
pub fn transaction_connection() -> Result<Option<TransactionConnection>> {
    global().transaction_connection()
}

/// # Errors
///
/// Propagates backend faults.
pub fn set_transaction_connection(connection: Option<TransactionConnection>) -> Result<()> {
    global().set_transaction_connection(connection)
}

/// # Errors
///
/// Propagates backend faults.
pub fn clean_transaction_connection() -> Result<()> {
    global().clean_transaction_connection()
}

/// Snapshot of the current request for log enrichment
///
/// Falls back to an empty snapshot, with a `warn` event, if the backend
/// faults.
pub fn snapshot() -> ContextSnapshot {
    global().snapshot_or_empty()
}
