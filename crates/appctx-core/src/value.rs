//! Type-erased values held by a context record

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// A shared, type-erased value stored under a context key
///
/// Cloning is a reference-count bump, so the same value can be handed to
/// every reader in a request without copying. `Debug` prints only the type
/// name: context records routinely hold credentials and connection handles.
#[derive(Clone)]
pub struct ContextValue {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl ContextValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_name: type_name::<T>(),
        }
    }

    /// Borrow the value as `T`, or `None` if it holds another type
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Share the value as `Arc<T>`, or `None` if it holds another type
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner).downcast::<T>().ok()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Name of the type that was stored
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// True if both cells point at the same stored value
    pub fn ptr_eq(&self, other: &ContextValue) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContextValue<{}>", self.type_name)
    }
}
