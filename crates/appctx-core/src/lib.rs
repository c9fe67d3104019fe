//! AppCtx Core - request-scoped context propagation
//!
//! Lets request metadata set once at an entry point be read anywhere down
//! the call graph without passing it through every signature:
//! - Pluggable storage backends (null, in-memory, tokio task-local)
//! - `ApplicationContext` facade with typed accessors for the authentication
//!   token, correlation ID, source IP and active transaction connection
//! - A process-wide convenience wrapper over one shared facade
//! - Bootstrap configuration and a context-aware logging facility
//!
//! ```rust
//! use appctx_core::{ApplicationContext, storage::TaskLocalContextStorage};
//!
//! let context = ApplicationContext::with_storage(TaskLocalContextStorage::new());
//! let ip = context
//!     .run_in_context(|| {
//!         context.set_source_ip("10.0.0.1").unwrap();
//!         context.source_ip().unwrap()
//!     })
//!     .unwrap();
//! assert_eq!(ip, "10.0.0.1");
//! ```

pub mod config;
pub mod context;
pub mod errors;
pub mod global;
pub mod logging_facility;
pub mod storage;
pub mod transaction;
pub mod value;

// Re-export commonly used types
pub use config::{ContextConfig, StorageKind};
pub use context::ApplicationContext;
pub use errors::{ContextError, ContextErrorKind, Result};
pub use storage::{
    ContextStorage, InMemoryContextStorage, NullContextStorage, TaskLocalContextStorage,
};
pub use transaction::{
    transaction_handler, with_transaction_connection, DatabaseTransactionConnection,
    TransactionConnection, TransactionHandler,
};
pub use value::ContextValue;
