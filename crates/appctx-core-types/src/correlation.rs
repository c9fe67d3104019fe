//! Correlation types for request tracking
//!
//! A correlation ID ties together every log line and audit record produced
//! while one logical request is being served.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier attached to one logical request for its whole lifetime
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generate a fresh, time-ordered CorrelationId (UUIDv7)
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Adopt an ID received from an upstream caller (e.g. an `X-Correlation-Id` header)
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CorrelationId> for String {
    fn from(id: CorrelationId) -> Self {
        id.0
    }
}

/// Point-in-time copy of the loggable part of a request context
///
/// Readers that only want to stamp log lines or audit rows take a snapshot
/// instead of issuing one lookup per field. Empty strings mean "not set".
/// The authentication token is deliberately not part of the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSnapshot {
    pub correlation_id: String,
    pub source_ip: String,
    pub transaction_active: bool,
}

impl ContextSnapshot {
    /// True when nothing loggable has been recorded for the request
    pub fn is_empty(&self) -> bool {
        self.correlation_id.is_empty() && self.source_ip.is_empty() && !self.transaction_active
    }
}
