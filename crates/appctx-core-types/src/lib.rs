//! Core types shared across AppCtx facilities
//!
//! This crate provides the vocabulary used by the context store and by the
//! loggers that read from it:
//!
//! - **Correlation types**: CorrelationId, ContextSnapshot
//! - **Sensitive data**: Sensitive<T> marker for automatic redaction
//! - **Schema constants**: Context record keys, structured log fields and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::{ContextSnapshot, CorrelationId};
pub use sensitive::Sensitive;
