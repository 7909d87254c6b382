#![forbid(unsafe_code)]

//! Core domain types for RegexKit
//!
//! This module defines the values passed across the public surface: type
//! specs, the name-or-matcher argument, introspection records and match records.

use crate::error::PatternError;
use crate::patterns::Matcher;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed `type` or `type:group` reference
///
/// The spec is split on the first colon only, so group names may themselves
/// contain colons. An empty group part (`"phone:"`) is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeSpec {
    type_name: String,
    group: Option<String>,
}

impl TypeSpec {
    /// Parses a type spec string
    ///
    /// # Errors
    ///
    /// Returns `PatternError::InvalidArgument` if the spec or its type part is empty.
    pub fn parse(spec: &str) -> Result<Self, PatternError> {
        if spec.is_empty() {
            return Err(PatternError::InvalidArgument(
                "Type must be a non-empty string".to_string(),
            ));
        }

        let (type_name, group) = match spec.split_once(':') {
            Some((type_name, group)) => (type_name, Some(group).filter(|g| !g.is_empty())),
            None => (spec, None),
        };

        if type_name.is_empty() {
            return Err(PatternError::InvalidArgument(format!(
                "Type must be a non-empty string (got \"{spec}\")"
            )));
        }

        Ok(Self {
            type_name: type_name.to_string(),
            group: group.map(str::to_string),
        })
    }

    /// Returns the type name part
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the group part, if one was given
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.group {
            Some(group) => write!(f, "{}:{}", self.type_name, group),
            None => write!(f, "{}", self.type_name),
        }
    }
}

/// Either a registry name or a matcher supplied directly
///
/// Resolved once at the top of every operation. Literal matchers bypass the
/// registry and are never passed through the safety gate. A literal `Regex`
/// is scanned as if built with default options; a `Matcher` keeps its flags.
#[derive(Debug, Clone, Copy)]
pub enum TypeRef<'a> {
    ByName(&'a str),
    Literal(&'a Regex),
    Matcher(&'a Matcher),
}

impl<'a> From<&'a str> for TypeRef<'a> {
    fn from(name: &'a str) -> Self {
        TypeRef::ByName(name)
    }
}

impl<'a> From<&'a String> for TypeRef<'a> {
    fn from(name: &'a String) -> Self {
        TypeRef::ByName(name.as_str())
    }
}

impl<'a> From<&'a Regex> for TypeRef<'a> {
    fn from(regex: &'a Regex) -> Self {
        TypeRef::Literal(regex)
    }
}

impl<'a> From<&'a Matcher> for TypeRef<'a> {
    fn from(matcher: &'a Matcher) -> Self {
        TypeRef::Matcher(matcher)
    }
}

impl fmt::Display for TypeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::ByName(name) => write!(f, "{name}"),
            TypeRef::Literal(regex) => write!(f, "/{}/", regex.as_str()),
            TypeRef::Matcher(matcher) => write!(f, "/{}/", matcher.as_str()),
        }
    }
}

/// Sample inputs documenting what a pattern accepts and rejects
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Examples {
    #[serde(default)]
    pub valid: Vec<String>,
    #[serde(default)]
    pub invalid: Vec<String>,
}

impl Examples {
    pub fn is_empty(&self) -> bool {
        self.valid.is_empty() && self.invalid.is_empty()
    }
}

/// Introspection record for one registered type
///
/// `groups` is empty for simple entries (a single matcher with no named groups).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    #[serde(rename = "type")]
    pub type_name: String,
    pub groups: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Examples>,
}

/// A single match located in a piece of text
///
/// `index` and `length` are byte offsets into the searched text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextMatch {
    #[serde(rename = "match")]
    pub matched: String,
    pub index: usize,
    pub length: usize,
}

impl TextMatch {
    pub(crate) fn from_regex_match(m: regex::Match<'_>) -> Self {
        Self {
            matched: m.as_str().to_string(),
            index: m.start(),
            length: m.len(),
        }
    }

    /// Byte offset one past the end of the match
    pub fn end(&self) -> usize {
        self.index + self.length
    }
}
