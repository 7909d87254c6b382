//! Parsing and validation for regex-kit TOML configuration files
//!
//! ```toml
//! [registry]
//! group_fallback = "strict"
//! security_enabled = true
//!
//! [chain]
//! max_operations = 50
//! throw_on_error = true
//! enable_logging = false
//! ```
//!
//! Every section and key is optional.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How to resolve a grouped type with several groups and no default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupFallback {
    /// Fail with `PatternError::AmbiguousGroup`
    #[default]
    Strict,
    /// Use the first-inserted group
    First,
}

/// Main configuration struct
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KitConfig {
    #[serde(default)]
    pub registry: RegistrySettings,

    #[serde(default)]
    pub chain: ChainOptions,
}

impl KitConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: KitConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError> {
        self.chain.validate()
    }
}

/// Registry behaviour section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySettings {
    #[serde(default)]
    pub group_fallback: GroupFallback,

    /// Run the safety gate on `add`, `inject` and `use`
    #[serde(default = "default_true")]
    pub security_enabled: bool,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            group_fallback: GroupFallback::Strict,
            security_enabled: true,
        }
    }
}

impl RegistrySettings {
    /// Applies a partial update; absent fields are left untouched
    pub fn apply(&mut self, options: ConfigOptions) {
        if let Some(group_fallback) = options.group_fallback {
            self.group_fallback = group_fallback;
        }
        if let Some(security_enabled) = options.security_enabled {
            self.security_enabled = security_enabled;
        }
    }
}

/// Partial update accepted by `RegexKit::config`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfigOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_fallback: Option<GroupFallback>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_enabled: Option<bool>,
}

impl ConfigOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group_fallback(mut self, group_fallback: GroupFallback) -> Self {
        self.group_fallback = Some(group_fallback);
        self
    }

    pub fn security_enabled(mut self, enabled: bool) -> Self {
        self.security_enabled = Some(enabled);
        self
    }
}

/// Chain builder options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainOptions {
    /// Operation ceiling per chain
    #[serde(default = "default_max_operations")]
    pub max_operations: usize,

    /// Propagate failures instead of logging them and continuing
    #[serde(default = "default_true")]
    pub throw_on_error: bool,

    /// Emit a debug event for every recorded operation
    #[serde(default)]
    pub enable_logging: bool,
}

impl Default for ChainOptions {
    fn default() -> Self {
        Self {
            max_operations: default_max_operations(),
            throw_on_error: true,
            enable_logging: false,
        }
    }
}

impl ChainOptions {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.max_operations == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chain.max_operations".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_max_operations() -> usize {
    50
}
