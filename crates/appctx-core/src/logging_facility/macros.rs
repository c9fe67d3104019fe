//! Context-enriched logging macros

/// Log an event stamped with the current request's correlation ID and source IP
///
/// Reads from the process-wide context (see [`crate::global`]). Extra
/// fields are passed through to `tracing::info!`.
///
/// # Example
///
/// ```
/// # use appctx_core::log_ctx_event;
/// log_ctx_event!("load_invoice");
/// log_ctx_event!("load_invoice", invoice_id = "inv-42");
/// ```
#[macro_export]
macro_rules! log_ctx_event {
    ($op:expr) => {{
        let snapshot = $crate::global::snapshot();
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = appctx_core_types::schema::EVENT_CONTEXT,
            correlation_id = %snapshot.correlation_id,
            source_ip = %snapshot.source_ip,
            transaction_active = snapshot.transaction_active,
        );
    }};
    ($op:expr, $($field:tt)*) => {{
        let snapshot = $crate::global::snapshot();
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = appctx_core_types::schema::EVENT_CONTEXT,
            correlation_id = %snapshot.correlation_id,
            source_ip = %snapshot.source_ip,
            transaction_active = snapshot.transaction_active,
            $($field)*
        );
    }};
}
