//! Contract for the database transaction handle carried in the context
//!
//! The context only stores and returns the handle. Running statements,
//! retrying, and closing the underlying connection stay with whoever
//! implements [`DatabaseTransactionConnection`].

use std::future::Future;
use std::sync::Arc;

use appctx_core_types::schema::EVENT_RESTORE_FAILED;
use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;

use crate::context::ApplicationContext;
use crate::errors::Result;

/// Shared handle to an open transaction, as stored in the context
pub type TransactionConnection = Arc<dyn DatabaseTransactionConnection>;

/// Work to run inside a (possibly nested) transaction
///
/// The handler receives the connection bound to that transaction.
pub type TransactionHandler =
    Box<dyn FnOnce(TransactionConnection) -> BoxFuture<'static, anyhow::Result<Value>> + Send>;

/// A connection that is currently inside a database transaction
#[async_trait]
pub trait DatabaseTransactionConnection: Send + Sync {
    /// Execute `sql` with positional `values`
    ///
    /// # Errors
    ///
    /// Whatever the database driver reports.
    async fn query(&self, sql: &str, values: &[Value]) -> anyhow::Result<Value>;

    /// Run `handler` in a nested transaction, retrying up to `retry_limit` times
    ///
    /// # Errors
    ///
    /// The handler's error once retries are exhausted, or a driver error.
    async fn transaction(
        &self,
        handler: TransactionHandler,
        retry_limit: Option<u32>,
    ) -> anyhow::Result<Value>;
}

/// Box an async closure as a [`TransactionHandler`]
///
/// # Example
///
/// ```
/// use appctx_core::transaction::transaction_handler;
///
/// let handler = transaction_handler(|connection| async move {
///     connection.query("UPDATE accounts SET balance = balance - 10", &[]).await
/// });
/// # drop(handler);
/// ```
pub fn transaction_handler<F, Fut>(f: F) -> TransactionHandler
where
    F: FnOnce(TransactionConnection) -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    Box::new(move |connection| -> BoxFuture<'static, anyhow::Result<Value>> {
        Box::pin(f(connection))
    })
}

/// Publish `connection` in the context while `work` runs, then restore
/// whatever handle was published before
///
/// The previous handle is put back once `work` completes, panics, or is
/// dropped before completion, so later code in the same scope never picks
/// up a finished transaction. Nested calls hand the outer connection back
/// to the outer work. The connection itself is left open.
///
/// # Errors
///
/// Returns the backend's error if the previous handle cannot be read, or
/// the connection cannot be stored or restored. The output of `work` is
/// returned untouched on success.
pub async fn with_transaction_connection<F, Fut>(
    context: &ApplicationContext,
    connection: TransactionConnection,
    work: F,
) -> Result<Fut::Output>
where
    F: FnOnce() -> Fut,
    Fut: Future,
{
    let previous = context.transaction_connection()?;
    context.set_transaction_connection(Some(connection))?;
    let guard = RestoreConnection {
        context,
        previous: Some(previous),
    };
    let output = work().await;
    guard.restore()?;
    Ok(output)
}

// Puts the previously published handle back when dropped. `restore` does
// the same on the normal path so its error reaches the caller.
struct RestoreConnection<'a> {
    context: &'a ApplicationContext,
    previous: Option<Option<TransactionConnection>>,
}

impl RestoreConnection<'_> {
    fn restore(mut self) -> Result<()> {
        match self.previous.take() {
            Some(previous) => self.context.set_transaction_connection(previous),
            None => Ok(()),
        }
    }
}

impl Drop for RestoreConnection<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            if let Err(err) = self.context.set_transaction_connection(previous) {
                tracing::warn!(
                    component = module_path!(),
                    event = EVENT_RESTORE_FAILED,
                    code = err.code(),
                    error = %err,
                );
            }
        }
    }
}
