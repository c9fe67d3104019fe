//! Sensitive data marker for automatic redaction
//!
//! Authentication tokens travel through the context store next to values
//! that are routinely logged. `Sensitive<T>` keeps them out of any
//! formatted or serialized output.

use serde::{Serialize, Serializer};
use std::fmt;

/// Placeholder written wherever a sensitive value would otherwise appear
pub const REDACTED: &str = "***REDACTED***";

/// Wrapper that redacts itself in Debug, Display and Serialize
///
/// # Example
///
/// ```
/// use appctx_core_types::Sensitive;
///
/// let token = Sensitive::new("Bearer eyJhbGciOi");
/// assert_eq!(format!("{:?}", token), "***REDACTED***");
/// assert_eq!(token.to_string(), "***REDACTED***");
///
/// // The real value is only reachable on purpose
/// assert_eq!(token.expose(), &"Bearer eyJhbGciOi");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrow the underlying value
    ///
    /// Call sites of this method are the places a secret leaves the wrapper;
    /// keep them few and obvious.
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> Serialize for Sensitive<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}
