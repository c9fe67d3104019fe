//! Pluggable context storage backends
//!
//! A backend decides where a request's key-value record lives and how far a
//! scope reaches:
//!
//! - [`NullContextStorage`] stores nothing. It is the default so that code
//!   running before configuration gets empty results instead of failures.
//! - [`InMemoryContextStorage`] keeps one map for the lifetime of the
//!   instance. Scopes are pass-through, so it offers no isolation between
//!   requests and is meant for single-threaded programs and tests.
//! - [`TaskLocalContextStorage`] gives every scope its own record, carried
//!   by the tokio task across `.await` points. Use it whenever requests are
//!   served concurrently.
//!
//! New strategies are added by implementing [`ContextStorage`]; the facade
//! never inspects which backend it holds.

use std::fmt;

use futures::future::BoxFuture;

use crate::errors::Result;
use crate::value::ContextValue;

pub mod in_memory;
pub mod null;
pub mod task_local;

pub use in_memory::InMemoryContextStorage;
pub use null::NullContextStorage;
pub use task_local::TaskLocalContextStorage;

/// Storage strategy behind the application context
///
/// Implementations must be shareable across threads; the facade hands the
/// same instance to every caller.
pub trait ContextStorage: Send + Sync + fmt::Debug {
    /// Short backend name used in log events
    fn name(&self) -> &str;

    /// Read the value under `key` in the current scope
    ///
    /// Absence is `Ok(None)`, never an error.
    ///
    /// # Errors
    ///
    /// Returns an error only for backend-internal faults.
    fn get(&self, key: &str) -> Result<Option<ContextValue>>;

    /// Store `value` under `key` in the current scope; `None` clears the key
    ///
    /// # Errors
    ///
    /// Returns an error only for backend-internal faults, such as writing
    /// outside any scope of an isolating backend.
    fn set(&self, key: &str, value: Option<ContextValue>) -> Result<()>;

    /// Execute `f` inside a scope established by this backend
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot establish the scope.
    fn run(&self, f: &mut dyn FnMut()) -> Result<()>;

    /// Drive `fut` to completion inside a scope established by this backend
    ///
    /// The default awaits `fut` with no scope setup, which is what the
    /// non-isolating backends need. Isolating backends override it so the
    /// scope stays attached across every suspension point of `fut`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot establish the scope.
    fn run_future<'a>(&'a self, fut: BoxFuture<'a, ()>) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            fut.await;
            Ok(())
        })
    }
}
