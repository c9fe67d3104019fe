//! Bootstrap configuration
//!
//! Selects the storage backend and logging profile, from TOML or from the
//! environment, and installs them.
//!
//! ```toml
//! storage = "task_local"
//! log_profile = "production"
//! ```

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::context::ApplicationContext;
use crate::errors::{ContextError, Result};
use crate::logging_facility::{self, Profile};
use crate::storage::{
    ContextStorage, InMemoryContextStorage, NullContextStorage, TaskLocalContextStorage,
};

pub const ENV_STORAGE: &str = "APPCTX_STORAGE";
pub const ENV_LOG_PROFILE: &str = "APPCTX_LOG_PROFILE";

/// Which storage backend to install
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    #[default]
    Null,
    InMemory,
    TaskLocal,
}

impl FromStr for StorageKind {
    type Err = ContextError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "null" => Ok(StorageKind::Null),
            "in_memory" | "in-memory" => Ok(StorageKind::InMemory),
            "task_local" | "task-local" => Ok(StorageKind::TaskLocal),
            other => Err(ContextError::InvalidConfig {
                reason: format!("unknown storage kind '{}'", other),
            }),
        }
    }
}

/// Settings applied once at process start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContextConfig {
    pub storage: StorageKind,
    pub log_profile: Profile,
}

impl ContextConfig {
    /// Parse a TOML document; missing keys take their defaults
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for malformed TOML, unknown keys or unknown
    /// values.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Read `APPCTX_STORAGE` and `APPCTX_LOG_PROFILE`
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a variable is set to an unknown value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ContextConfig::from_env`], reading variables through `lookup`
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a variable is set to an unknown value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(storage) = lookup(ENV_STORAGE) {
            config.storage = storage.parse()?;
        }
        if let Some(profile) = lookup(ENV_LOG_PROFILE) {
            config.log_profile = profile.parse()?;
        }
        Ok(config)
    }

    pub fn build_storage(&self) -> Arc<dyn ContextStorage> {
        match self.storage {
            StorageKind::Null => Arc::new(NullContextStorage),
            StorageKind::InMemory => Arc::new(InMemoryContextStorage::new()),
            StorageKind::TaskLocal => Arc::new(TaskLocalContextStorage::new()),
        }
    }

    /// Install a freshly built backend into `context`
    pub fn install(&self, context: &ApplicationContext) {
        context.use_shared_storage(self.build_storage());
    }

    /// Initialize logging with the configured profile
    pub fn init_logging(&self) {
        logging_facility::init(self.log_profile);
    }
}
