//! Canonical schema constants
//!
//! Context record keys are shared by every storage backend; the log field
//! keys and event names keep the logging facility consistent.

// Context record keys
pub const KEY_AUTHENTICATION_TOKEN: &str = "authenticationToken";
pub const KEY_CORRELATION_ID: &str = "correlationId";
pub const KEY_SOURCE_IP: &str = "sourceIP";
pub const KEY_TRANSACTION_CONNECTION: &str = "transactionConnection";

/// Every key written by the typed context API
pub const CONTEXT_KEYS: [&str; 4] = [
    KEY_AUTHENTICATION_TOKEN,
    KEY_CORRELATION_ID,
    KEY_SOURCE_IP,
    KEY_TRANSACTION_CONNECTION,
];

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_CORRELATION_ID: &str = "correlation_id";
pub const FIELD_SOURCE_IP: &str = "source_ip";
pub const FIELD_TRANSACTION_ACTIVE: &str = "transaction_active";
pub const FIELD_BACKEND: &str = "backend";
pub const FIELD_PREVIOUS_BACKEND: &str = "previous_backend";

// Canonical event names
pub const EVENT_STORAGE_INSTALLED: &str = "storage_installed";
pub const EVENT_SCOPE_ENTER: &str = "scope_enter";
pub const EVENT_CONTEXT: &str = "context";
pub const EVENT_SNAPSHOT_FAILED: &str = "snapshot_failed";
pub const EVENT_RESTORE_FAILED: &str = "transaction_restore_failed";

/// Name of the span opened around one request
pub const SPAN_REQUEST: &str = "request";
