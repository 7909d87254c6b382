#![forbid(unsafe_code)]

//! Fluent chains of text operations over one piece of text
//!
//! A chain pairs a text value with a [`RegexKit`] and records every operation
//! it runs. Text-producing operations consume the chain and hand it back, so
//! they compose with `?`:
//!
//! ```ignore
//! let cleaned = kit
//!     .chain("mail a@b.com or call 13800138000")
//!     .replace_all("email", "[email]")?
//!     .replace_all("phone:CN", "[phone]")?
//!     .to_string();
//! ```
//!
//! Value-producing operations (`test`, `count`, `find`, `find_all`) borrow the
//! chain and return the raw value. When `throw_on_error` is off, failures are
//! logged and the chain carries on with its text unchanged.

use super::kit::{DEFAULT_HIGHLIGHT, RegexKit, operation_name};
use crate::config::ChainOptions;
use crate::error::{ChainError, PatternError};
use crate::types::{TextMatch, TypeRef};
use regex::Replacer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Summary numbers for a chain; lengths are in characters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainMetadata {
    pub original_length: usize,
    pub current_length: usize,
    pub operation_count: usize,
    /// Name of the most recent operation, or `"none"`
    pub last_operation: String,
}

/// Snapshot of a chain's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainResult {
    pub text: String,
    pub operations: Vec<String>,
    pub metadata: ChainMetadata,
}

/// A sequence of operations against one piece of text
#[derive(Debug, Clone)]
pub struct RegexChain<'k> {
    kit: &'k RegexKit,
    text: String,
    original_length: usize,
    operations: Vec<String>,
    options: ChainOptions,
}

impl<'k> RegexChain<'k> {
    pub fn new(kit: &'k RegexKit, text: impl Into<String>, options: ChainOptions) -> Self {
        let text = text.into();
        let original_length = text.chars().count();
        if options.enable_logging {
            tracing::debug!(length = original_length, "chain started");
        }
        Self {
            kit,
            text,
            original_length,
            operations: Vec::new(),
            options,
        }
    }

    /// Current text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Names of the operations run so far
    pub fn operations(&self) -> &[String] {
        &self.operations
    }

    pub fn options(&self) -> &ChainOptions {
        &self.options
    }

    pub fn metadata(&self) -> ChainMetadata {
        ChainMetadata {
            original_length: self.original_length,
            current_length: self.text.chars().count(),
            operation_count: self.operations.len(),
            last_operation: self
                .operations
                .last()
                .cloned()
                .unwrap_or_else(|| "none".to_string()),
        }
    }

    // ============= Internal execution =============

    /// Checks the ceiling and runs one facade call against the current text
    fn step<T, F>(&self, operation: &str, f: F) -> Result<T, ChainError>
    where
        F: FnOnce(&'k RegexKit, &str) -> Result<T, PatternError>,
    {
        if self.operations.len() >= self.options.max_operations {
            return Err(ChainError::OperationLimit {
                limit: self.options.max_operations,
            });
        }
        f(self.kit, &self.text).map_err(|source| ChainError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    fn record(&mut self, operation: String) {
        if self.options.enable_logging {
            tracing::debug!(
                operation = operation.as_str(),
                length = self.text.chars().count(),
                "chain operation"
            );
        }
        self.operations.push(operation);
    }

    /// Propagates or logs a failure depending on `throw_on_error`
    fn recover(&self, err: ChainError) -> Result<(), ChainError> {
        if self.options.throw_on_error {
            return Err(err);
        }
        tracing::warn!(error = %err, "chain operation failed");
        Ok(())
    }

    /// Runs a text-producing step and replaces the current text with its output
    fn apply<F>(mut self, operation: String, f: F) -> Result<Self, ChainError>
    where
        F: FnOnce(&'k RegexKit, &str) -> Result<String, PatternError>,
    {
        match self.step(&operation, f) {
            Ok(text) => {
                self.text = text;
                self.record(operation);
            }
            Err(err) => self.recover(err)?,
        }
        Ok(self)
    }

    /// Runs a value-producing step; the text is left alone
    fn value<T, F>(&mut self, operation: String, fallback: T, f: F) -> Result<T, ChainError>
    where
        F: FnOnce(&'k RegexKit, &str) -> Result<T, PatternError>,
    {
        match self.step(&operation, f) {
            Ok(value) => {
                self.record(operation);
                Ok(value)
            }
            Err(err) => {
                self.recover(err)?;
                Ok(fallback)
            }
        }
    }

    // ============= Text operations =============

    /// Replaces the text with its first match; keeps it when nothing matches
    pub fn extract<'a>(self, target: impl Into<TypeRef<'a>>) -> Result<Self, ChainError> {
        let target = target.into();
        self.apply(operation_name("extract", target), move |kit, text| {
            Ok(kit
                .try_extract(target, text)?
                .unwrap_or_else(|| text.to_string()))
        })
    }

    /// Appends every match to the text, each prefixed by `separator`
    pub fn extract_all<'a>(
        self,
        target: impl Into<TypeRef<'a>>,
        separator: &str,
    ) -> Result<Self, ChainError> {
        let target = target.into();
        self.apply(operation_name("extractAll", target), move |kit, text| {
            let mut result = text.to_string();
            for found in kit.try_extract_all(target, text)? {
                result.push_str(separator);
                result.push_str(&found);
            }
            Ok(result)
        })
    }

    pub fn replace<'a, R: Replacer>(
        self,
        target: impl Into<TypeRef<'a>>,
        replacement: R,
    ) -> Result<Self, ChainError> {
        let target = target.into();
        self.apply(operation_name("replace", target), move |kit, text| {
            kit.try_replace(target, text, replacement)
        })
    }

    pub fn replace_all<'a, R: Replacer>(
        self,
        target: impl Into<TypeRef<'a>>,
        replacement: R,
    ) -> Result<Self, ChainError> {
        let target = target.into();
        self.apply(operation_name("replaceAll", target), move |kit, text| {
            kit.try_replace_all(target, text, replacement)
        })
    }

    pub fn remove<'a>(self, target: impl Into<TypeRef<'a>>) -> Result<Self, ChainError> {
        let target = target.into();
        self.apply(operation_name("remove", target), move |kit, text| {
            kit.try_replace(target, text, "")
        })
    }

    pub fn remove_all<'a>(self, target: impl Into<TypeRef<'a>>) -> Result<Self, ChainError> {
        let target = target.into();
        self.apply(operation_name("removeAll", target), move |kit, text| {
            kit.try_replace_all(target, text, "")
        })
    }

    /// Wraps every match in `<mark>` tags
    pub fn highlight<'a>(self, target: impl Into<TypeRef<'a>>) -> Result<Self, ChainError> {
        self.highlight_with(target, DEFAULT_HIGHLIGHT)
    }

    pub fn highlight_with<'a, R: Replacer>(
        self,
        target: impl Into<TypeRef<'a>>,
        wrapper: R,
    ) -> Result<Self, ChainError> {
        let target = target.into();
        self.apply(operation_name("highlight", target), move |kit, text| {
            kit.try_replace_all(target, text, wrapper)
        })
    }

    /// Applies an arbitrary text transformation, logged under `name`
    pub fn transform<F>(self, transformer: F, name: Option<&str>) -> Result<Self, ChainError>
    where
        F: FnOnce(&str) -> String,
    {
        let operation = name.unwrap_or("transform").to_string();
        self.apply(operation, move |_, text| Ok(transformer(text)))
    }

    // ============= Value operations =============

    pub fn test<'a>(&mut self, target: impl Into<TypeRef<'a>>) -> Result<bool, ChainError> {
        let target = target.into();
        self.value(operation_name("test", target), false, move |kit, text| {
            kit.test(target, text)
        })
    }

    pub fn count<'a>(&mut self, target: impl Into<TypeRef<'a>>) -> Result<usize, ChainError> {
        let target = target.into();
        self.value(operation_name("count", target), 0, move |kit, text| {
            Ok(kit.try_extract_all(target, text)?.len())
        })
    }

    pub fn find<'a>(
        &mut self,
        target: impl Into<TypeRef<'a>>,
    ) -> Result<Option<TextMatch>, ChainError> {
        let target = target.into();
        self.value(operation_name("find", target), None, move |kit, text| {
            kit.try_find(target, text)
        })
    }

    pub fn find_all<'a>(
        &mut self,
        target: impl Into<TypeRef<'a>>,
    ) -> Result<Vec<TextMatch>, ChainError> {
        let target = target.into();
        self.value(operation_name("findAll", target), Vec::new(), move |kit, text| {
            kit.try_find_all(target, text)
        })
    }

    // ============= Control flow =============

    /// Runs `operation` only if `condition` holds
    pub fn when<F>(self, condition: bool, operation: F) -> Result<Self, ChainError>
    where
        F: FnOnce(Self) -> Result<Self, ChainError>,
    {
        if condition { operation(self) } else { Ok(self) }
    }

    /// Runs `operation` only if `predicate` accepts the current text
    pub fn when_with<P, F>(self, predicate: P, operation: F) -> Result<Self, ChainError>
    where
        P: FnOnce(&str) -> bool,
        F: FnOnce(Self) -> Result<Self, ChainError>,
    {
        let condition = predicate(&self.text);
        self.when(condition, operation)
    }

    /// Runs one of two operations depending on `condition`
    pub fn branch<T, E>(self, condition: bool, then: T, otherwise: E) -> Result<Self, ChainError>
    where
        T: FnOnce(Self) -> Result<Self, ChainError>,
        E: FnOnce(Self) -> Result<Self, ChainError>,
    {
        if condition { then(self) } else { otherwise(self) }
    }

    // ============= Inspection =============

    /// Emits the current text, operation log and metadata as a debug event
    pub fn debug(self, label: Option<&str>) -> Self {
        let label = label
            .map(str::to_string)
            .unwrap_or_else(|| format!("Debug[{}]", self.operations.len()));
        let operations = self.operations.join(" -> ");
        let metadata = self.metadata();
        tracing::debug!(
            label = label.as_str(),
            text = self.text.as_str(),
            operations = operations.as_str(),
            metadata = ?metadata,
            "chain state"
        );
        self
    }

    /// Clears the text and the operation log
    pub fn reset(mut self) -> Self {
        self.text.clear();
        self.operations.clear();
        self
    }

    pub fn result(&self) -> ChainResult {
        ChainResult {
            text: self.text.clone(),
            operations: self.operations.clone(),
            metadata: self.metadata(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.result())
    }

    /// One-line summary, e.g. `Operations: 2, length change: -5 (20 -> 15)`
    pub fn summary(&self) -> String {
        let metadata = self.metadata();
        let change = metadata.current_length as i64 - metadata.original_length as i64;
        let sign = if change > 0 { "+" } else { "" };
        format!(
            "Operations: {}, length change: {}{} ({} -> {})",
            metadata.operation_count,
            sign,
            change,
            metadata.original_length,
            metadata.current_length
        )
    }

    /// Consumes the chain and returns its text
    pub fn into_text(self) -> String {
        self.text
    }
}

impl fmt::Display for RegexChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
