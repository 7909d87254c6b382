#![forbid(unsafe_code)]

//! RegexKit: a registry of named, groupable regex matchers
//!
//! Matchers are registered under a type name, optionally split into named
//! groups (`phone:CN`, `phone:US`), and looked up by a `type` or `type:group`
//! spec. Every mutation passes through a ReDoS safety gate. On top of lookup
//! the kit offers text operations (extract, replace, find, highlight), batch
//! variants and a fluent chain builder.

pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod patterns;
pub mod safety;
pub mod types;

// Re-export error types for convenient access
pub use error::{CatalogError, ChainError, ConfigError, KitError, PatternError};

// Re-export the facade and core domain types
pub use config::{ChainOptions, ConfigOptions, GroupFallback, KitConfig};
pub use engine::{RegexChain, RegexKit, shared};
pub use patterns::{
    EnhancedPattern, GroupDescriptor, MatchOptions, Matcher, PatternInput, PatternSet,
};
pub use safety::{RiskLevel, SafetyReport, check_safety};
pub use types::{Examples, TextMatch, TypeInfo, TypeRef, TypeSpec};
