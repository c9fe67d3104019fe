use thiserror::Error;

/// Result type alias using ContextError
pub type Result<T> = std::result::Result<T, ContextError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code suitable for programmatic handling
/// and for the `err_code` field of structured log events.
///
/// A missing key is never an error: it surfaces as `None` (or as an empty
/// string from the display-oriented getters).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextErrorKind {
    /// A write happened outside any scope of an isolating backend
    NoActiveScope,
    /// A stored value was read back as a different type
    TypeMismatch,
    /// A backend's `run` returned without executing the scoped function
    ScopeNotEntered,
    /// Configuration could not be parsed or named an unknown option
    InvalidConfig,
}

impl ContextErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ContextErrorKind::NoActiveScope => "ERR_NO_ACTIVE_SCOPE",
            ContextErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ContextErrorKind::ScopeNotEntered => "ERR_SCOPE_NOT_ENTERED",
            ContextErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
        }
    }
}

// ========== End Error Facility ==========

/// Errors raised by storage backends and the context facade
///
/// Backend faults are returned to the immediate caller unchanged. Nothing
/// in this crate retries or swallows them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// Isolating backend asked to store a value with no scope active
    #[error("No active context scope: cannot set key {key}")]
    NoActiveScope { key: String },

    /// The value under `key` exists but is not of the requested type
    #[error("Context value for key {key} is not of type {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    /// Backend returned from `run` without calling the wrapped function
    #[error("Storage backend '{backend}' did not enter the context scope")]
    ScopeNotEntered { backend: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl ContextError {
    /// Classify this error
    pub fn kind(&self) -> ContextErrorKind {
        match self {
            ContextError::NoActiveScope { .. } => ContextErrorKind::NoActiveScope,
            ContextError::TypeMismatch { .. } => ContextErrorKind::TypeMismatch,
            ContextError::ScopeNotEntered { .. } => ContextErrorKind::ScopeNotEntered,
            ContextError::InvalidConfig { .. } => ContextErrorKind::InvalidConfig,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// The context key involved, if the error concerns one
    pub fn key(&self) -> Option<&str> {
        match self {
            ContextError::NoActiveScope { key } | ContextError::TypeMismatch { key, .. } => {
                Some(key)
            }
            _ => None,
        }
    }
}

impl From<toml::de::Error> for ContextError {
    fn from(err: toml::de::Error) -> Self {
        ContextError::InvalidConfig {
            reason: err.message().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes_are_stable() {
        let kinds = [
            (ContextErrorKind::NoActiveScope, "ERR_NO_ACTIVE_SCOPE"),
            (ContextErrorKind::TypeMismatch, "ERR_TYPE_MISMATCH"),
            (ContextErrorKind::ScopeNotEntered, "ERR_SCOPE_NOT_ENTERED"),
            (ContextErrorKind::InvalidConfig, "ERR_INVALID_CONFIG"),
        ];

        for (kind, expected_code) in kinds {
            assert_eq!(kind.code(), expected_code);
        }
    }

    #[test]
    fn test_error_carries_key() {
        let err = ContextError::NoActiveScope {
            key: "correlationId".to_string(),
        };
        assert_eq!(err.kind(), ContextErrorKind::NoActiveScope);
        assert_eq!(err.code(), "ERR_NO_ACTIVE_SCOPE");
        assert_eq!(err.key(), Some("correlationId"));
        assert!(err.to_string().contains("correlationId"));
    }

    #[test]
    fn test_config_error_has_no_key() {
        let err = ContextError::InvalidConfig {
            reason: "unknown storage".to_string(),
        };
        assert_eq!(err.key(), None);
        assert_eq!(err.code(), "ERR_INVALID_CONFIG");
    }
}
