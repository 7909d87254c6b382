#![forbid(unsafe_code)]

//! TOML pattern catalogs
//!
//! A catalog maps type names to one of the three registration shapes. Each
//! top-level value is classified by an ordered list of shape predicates:
//!
//! 1. a string, or a table holding only `pattern`, is a bare matcher
//! 2. a table with `pattern`, `description` and `examples.valid` /
//!    `examples.invalid` string arrays is an enhanced descriptor
//! 3. any other table is a group descriptor; its groups come from a `groups`
//!    subtable when present, otherwise from its own keys minus the reserved
//!    `default` and `description`
//!
//! Group values that match neither of the first two shapes are skipped.
//!
//! ```toml
//! zip = '^\d{5}$'
//!
//! [phone]
//! default = "CN"
//!
//! [phone.groups.CN]
//! pattern = '^1[3-9]\d{9}$'
//! description = "Mainland China mobile number"
//! examples.valid = ["13800138000"]
//! examples.invalid = ["12345"]
//! ```

use super::input::{EnhancedPattern, GroupDescriptor, GroupValue, PatternInput, PatternSet};
use super::matcher::Matcher;
use crate::error::{CatalogError, PatternError};
use crate::types::Examples;
use std::fs;
use std::path::Path;
use toml::{Table, Value};

const RESERVED_KEYS: &[&str] = &["default", "description", "groups"];

/// A single matcher parsed from a catalog value
enum ParsedValue {
    Bare(Matcher),
    Enhanced(EnhancedPattern),
}

impl From<ParsedValue> for PatternInput {
    fn from(value: ParsedValue) -> Self {
        match value {
            ParsedValue::Bare(matcher) => PatternInput::Bare(matcher),
            ParsedValue::Enhanced(enhanced) => PatternInput::Enhanced(enhanced),
        }
    }
}

impl From<ParsedValue> for GroupValue {
    fn from(value: ParsedValue) -> Self {
        match value {
            ParsedValue::Bare(matcher) => GroupValue::Bare(matcher),
            ParsedValue::Enhanced(enhanced) => GroupValue::Enhanced(enhanced),
        }
    }
}

/// Loader for TOML pattern catalogs
pub struct Catalog;

impl Catalog {
    /// Parse a catalog from a TOML string
    ///
    /// `source_name` is used in error messages only.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidSyntax` for malformed TOML and
    /// `CatalogError::Pattern` if a pattern string does not compile.
    pub fn parse(content: &str, source_name: &str) -> Result<PatternSet, CatalogError> {
        let table: Table = content
            .parse()
            .map_err(|e: toml::de::Error| CatalogError::InvalidSyntax {
                source_name: source_name.to_string(),
                message: e.to_string(),
            })?;

        let mut set = PatternSet::new();
        for (type_name, value) in &table {
            match parse_type(type_name, value)? {
                Some(input) => set.insert(type_name.as_str(), input),
                None => tracing::debug!(
                    catalog = source_name,
                    type_name = type_name.as_str(),
                    "skipping catalog value that is neither a pattern nor a table"
                ),
            }
        }

        Ok(set)
    }

    /// Load a catalog from a TOML file
    pub fn load(path: &Path) -> Result<PatternSet, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Load every `.toml` catalog in a directory
    ///
    /// Files are read in name order and subdirectories are not visited. A
    /// missing directory yields an empty set.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidEntry` if two files define the same type,
    /// or if `dir` exists but is not a directory.
    pub fn load_dir(dir: &Path) -> Result<PatternSet, CatalogError> {
        // Check if directory exists
        if !dir.exists() {
            tracing::warn!(dir = %dir.display(), "catalog directory does not exist");
            return Ok(PatternSet::new());
        }

        if !dir.is_dir() {
            return Err(CatalogError::InvalidEntry(format!(
                "Path is not a directory: {}",
                dir.display()
            )));
        }

        let io_error = |source| CatalogError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("toml") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut combined = PatternSet::new();
        for path in paths {
            for (type_name, input) in Self::load(&path)? {
                if combined.contains(&type_name) {
                    return Err(CatalogError::InvalidEntry(format!(
                        "Duplicate type '{}' in file {}",
                        type_name,
                        path.display()
                    )));
                }
                combined.insert(type_name, input);
            }
        }

        Ok(combined)
    }
}

fn parse_type(type_name: &str, value: &Value) -> Result<Option<PatternInput>, PatternError> {
    if let Some(parsed) = parse_matcher(type_name, value)? {
        return Ok(Some(parsed.into()));
    }

    let Value::Table(table) = value else {
        return Ok(None);
    };

    let mut descriptor = GroupDescriptor::new();
    descriptor.default = table.get("default").and_then(Value::as_str).map(str::to_string);
    descriptor.description = table
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string);

    let groups: Box<dyn Iterator<Item = (&String, &Value)>> = match table.get("groups") {
        Some(Value::Table(groups)) => Box::new(groups.iter()),
        _ => Box::new(
            table
                .iter()
                .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str())),
        ),
    };

    for (group, value) in groups {
        let target = format!("{type_name}:{group}");
        match parse_matcher(&target, value)? {
            Some(parsed) => {
                descriptor.groups.insert(group.clone(), parsed.into());
            }
            None => tracing::debug!(group = target.as_str(), "skipping malformed group value"),
        }
    }

    Ok(Some(descriptor.into()))
}

fn parse_matcher(target: &str, value: &Value) -> Result<Option<ParsedValue>, PatternError> {
    match value {
        Value::String(source) => Ok(Some(ParsedValue::Bare(compile(target, source)?))),
        Value::Table(table) => {
            if let Some((source, description, examples)) = enhanced_parts(table) {
                let pattern = compile(target, source)?;
                return Ok(Some(ParsedValue::Enhanced(EnhancedPattern::new(
                    pattern,
                    description,
                    examples,
                ))));
            }
            match (table.len(), table.get("pattern")) {
                (1, Some(Value::String(source))) => {
                    Ok(Some(ParsedValue::Bare(compile(target, source)?)))
                }
                _ => Ok(None),
            }
        }
        _ => Ok(None),
    }
}

fn enhanced_parts(table: &Table) -> Option<(&str, &str, Examples)> {
    let source = table.get("pattern")?.as_str()?;
    let description = table.get("description")?.as_str()?;
    let examples = table.get("examples")?.as_table()?;
    Some((
        source,
        description,
        Examples {
            valid: string_array(examples.get("valid")?)?,
            invalid: string_array(examples.get("invalid")?)?,
        },
    ))
}

fn string_array(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

fn compile(target: &str, source: &str) -> Result<Matcher, PatternError> {
    Matcher::new(source).map_err(|e| PatternError::InvalidRegex {
        target: target.to_string(),
        message: e.to_string(),
    })
}
