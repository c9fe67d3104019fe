//! Request span carrying context fields
//!
//! Entering the span inside a request scope makes every event emitted
//! beneath it carry the request's correlation ID and source IP, without the
//! emitting code reading the context itself.

use tracing::Span;

use crate::context::ApplicationContext;

/// Open an `info` span named `request` for the current context
///
/// The fields are copied when the span is created; set the correlation ID
/// and source IP first. If the context cannot be read the span is created
/// with empty fields and the fault is logged at `warn`.
pub fn request_span(context: &ApplicationContext) -> Span {
    let snapshot = context.snapshot_or_empty();
    tracing::info_span!(
        "request",
        correlation_id = %snapshot.correlation_id,
        source_ip = %snapshot.source_ip,
    )
}
