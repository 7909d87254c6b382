#![forbid(unsafe_code)]

//! Accepted input shapes for registering patterns
//!
//! A type can be registered as a bare matcher, an enhanced single descriptor
//! (matcher plus description and examples), or a group descriptor holding
//! several named variants. All three normalize into one [`Entry`].
//!
//! [`Entry`]: crate::patterns::Entry

use super::matcher::Matcher;
use crate::types::Examples;
use indexmap::IndexMap;
use regex::Regex;

/// A single matcher carrying its own documentation
#[derive(Debug, Clone)]
pub struct EnhancedPattern {
    pub pattern: Matcher,
    pub description: String,
    pub examples: Examples,
}

impl EnhancedPattern {
    pub fn new(
        pattern: impl Into<Matcher>,
        description: impl Into<String>,
        examples: Examples,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            description: description.into(),
            examples,
        }
    }
}

/// Value stored under one group name of a group descriptor
#[derive(Debug, Clone)]
pub enum GroupValue {
    Bare(Matcher),
    Enhanced(EnhancedPattern),
}

impl GroupValue {
    pub fn matcher(&self) -> &Matcher {
        match self {
            GroupValue::Bare(matcher) => matcher,
            GroupValue::Enhanced(enhanced) => &enhanced.pattern,
        }
    }
}

impl From<Matcher> for GroupValue {
    fn from(matcher: Matcher) -> Self {
        GroupValue::Bare(matcher)
    }
}

impl From<Regex> for GroupValue {
    fn from(regex: Regex) -> Self {
        GroupValue::Bare(regex.into())
    }
}

impl From<EnhancedPattern> for GroupValue {
    fn from(enhanced: EnhancedPattern) -> Self {
        GroupValue::Enhanced(enhanced)
    }
}

/// Several named variants of one type
///
/// Group order is insertion order; it decides the `first` fallback.
#[derive(Debug, Clone, Default)]
pub struct GroupDescriptor {
    pub groups: IndexMap<String, GroupValue>,
    pub default: Option<String>,
    pub description: Option<String>,
}

impl GroupDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a group
    pub fn group(mut self, name: impl Into<String>, value: impl Into<GroupValue>) -> Self {
        self.groups.insert(name.into(), value.into());
        self
    }

    pub fn default_group(mut self, name: impl Into<String>) -> Self {
        self.default = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One of the three accepted registration shapes
#[derive(Debug, Clone)]
pub enum PatternInput {
    Bare(Matcher),
    Enhanced(EnhancedPattern),
    Grouped(GroupDescriptor),
}

impl PatternInput {
    /// Every matcher reachable from this input, paired with its `type` or
    /// `type:group` name
    pub fn matchers<'a>(&'a self, type_name: &str) -> Vec<(String, &'a Matcher)> {
        match self {
            PatternInput::Bare(matcher) => vec![(type_name.to_string(), matcher)],
            PatternInput::Enhanced(enhanced) => vec![(type_name.to_string(), &enhanced.pattern)],
            PatternInput::Grouped(descriptor) => descriptor
                .groups
                .iter()
                .map(|(group, value)| (format!("{type_name}:{group}"), value.matcher()))
                .collect(),
        }
    }
}

impl From<Matcher> for PatternInput {
    fn from(matcher: Matcher) -> Self {
        PatternInput::Bare(matcher)
    }
}

impl From<Regex> for PatternInput {
    fn from(regex: Regex) -> Self {
        PatternInput::Bare(regex.into())
    }
}

impl From<EnhancedPattern> for PatternInput {
    fn from(enhanced: EnhancedPattern) -> Self {
        PatternInput::Enhanced(enhanced)
    }
}

impl From<GroupDescriptor> for PatternInput {
    fn from(descriptor: GroupDescriptor) -> Self {
        PatternInput::Grouped(descriptor)
    }
}

/// A bulk mapping of type names to inputs, used by `inject`, `use` and loads
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    entries: IndexMap<String, PatternInput>,
}

impl PatternSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a type, replacing any previous input under the same name
    pub fn insert(&mut self, type_name: impl Into<String>, input: impl Into<PatternInput>) {
        self.entries.insert(type_name.into(), input.into());
    }

    /// Builder form of [`PatternSet::insert`]
    pub fn with(mut self, type_name: impl Into<String>, input: impl Into<PatternInput>) -> Self {
        self.insert(type_name, input);
        self
    }

    pub fn get(&self, type_name: &str) -> Option<&PatternInput> {
        self.entries.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.entries.contains_key(type_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PatternInput)> {
        self.entries.iter().map(|(name, input)| (name.as_str(), input))
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for PatternSet {
    type Item = (String, PatternInput);
    type IntoIter = indexmap::map::IntoIter<String, PatternInput>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<PatternInput>> FromIterator<(K, V)> for PatternSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = PatternSet::new();
        for (type_name, input) in iter {
            set.insert(type_name, input);
        }
        set
    }
}

impl<K: Into<String>, V: Into<PatternInput>> Extend<(K, V)> for PatternSet {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (type_name, input) in iter {
            self.insert(type_name, input);
        }
    }
}
