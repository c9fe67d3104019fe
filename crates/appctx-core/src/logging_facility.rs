//! Structured logging facility for AppCtx
//!
//! This module provides:
//! - Single initialization point via `init(profile)`
//! - A request span stamped with the current correlation ID and source IP
//! - The `log_ctx_event!` macro for context-enriched events
//! - Test capture mode for deterministic assertions
//!
//! The context store itself is silent on its data path; only backend
//! installation (debug) and scope entry (trace) are logged.
//!
//! # Usage
//!
//! ```rust
//! use appctx_core::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod span;
pub mod test_capture;

pub use init::{init, Profile};
pub use span::request_span;
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
