//! Error types for RegexKit
//!
//! This module defines the error types used throughout RegexKit, following
//! a hierarchical structure with specific error variants for different
//! error categories. Lookup and mutation paths surface these directly; text
//! operations convert them into their no-op value at the public boundary.

use crate::safety::RiskLevel;
use std::path::PathBuf;

/// Registry lookup and mutation errors
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    /// Empty type spec, empty type name, or a malformed argument
    #[error("{0}")]
    InvalidArgument(String),

    /// Type has never been added to the registry
    #[error("Unknown type \"{0}\"")]
    UnknownType(String),

    /// Explicitly requested group is not defined for the type
    #[error("Unknown group \"{group}\" for type \"{type_name}\", available: [{}]", .available.join(", "))]
    UnknownGroup {
        type_name: String,
        group: String,
        available: Vec<String>,
    },

    /// Several groups, no default, strict fallback
    #[error("Multiple groups available for type \"{type_name}\", please specify one: [{}]", .groups.join(", "))]
    AmbiguousGroup {
        type_name: String,
        groups: Vec<String>,
    },

    /// Vetoed by the safety gate
    #[error("Unsafe regex pattern for type \"{target}\": potential ReDoS risk ({risk})")]
    UnsafePattern { target: String, risk: RiskLevel },

    /// Pattern source failed to compile
    #[error("Invalid regex pattern for \"{target}\": {message}")]
    InvalidRegex { target: String, message: String },
}

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid configuration syntax
    #[error("Invalid configuration syntax: {0}")]
    InvalidSyntax(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// I/O error reading a configuration file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Pattern catalog loading errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Catalog file is not valid TOML
    #[error("Invalid catalog syntax in {source_name}: {message}")]
    InvalidSyntax {
        source_name: String,
        message: String,
    },

    /// Catalog is well-formed TOML but cannot be used
    #[error("Invalid catalog entry: {0}")]
    InvalidEntry(String),

    /// A pattern inside the catalog was rejected
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// I/O error reading a catalog file or directory
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Chain builder errors
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// Operation ceiling reached
    #[error("Maximum operations limit ({limit}) exceeded")]
    OperationLimit { limit: usize },

    /// A facade call inside the chain failed
    #[error("Operation {operation} failed: {source}")]
    Operation {
        operation: String,
        #[source]
        source: PatternError,
    },
}

/// Top-level error type for RegexKit
#[derive(Debug, thiserror::Error)]
pub enum KitError {
    /// Pattern error
    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog error
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Chain error
    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),
}
