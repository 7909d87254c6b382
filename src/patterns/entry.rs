#![forbid(unsafe_code)]

//! Canonical stored form of a registered type

use super::input::{GroupValue, PatternInput};
use super::matcher::Matcher;
use crate::error::PatternError;
use crate::types::{Examples, TypeInfo};
use indexmap::IndexMap;

/// Group name used when an enhanced single descriptor is normalized
pub const DEFAULT_GROUP: &str = "default";

/// Storage shape of an entry
#[derive(Debug, Clone)]
pub enum EntryShape {
    /// One matcher with no named groups; lookups ignore any requested group
    Simple(Matcher),
    /// One or more named groups, each mapping to exactly one matcher
    Grouped {
        groups: IndexMap<String, Matcher>,
        default: Option<String>,
    },
}

/// One registered type
#[derive(Debug, Clone)]
pub struct Entry {
    shape: EntryShape,
    description: Option<String>,
    examples: Option<Examples>,
}

impl Entry {
    /// Converts any accepted input shape into a fresh entry
    ///
    /// Bare matchers become simple entries. Enhanced descriptors become a
    /// single `default` group. Group descriptors keep their groups in order
    /// and inherit description and examples from the first group carrying them.
    pub fn normalize(input: PatternInput) -> Self {
        match input {
            PatternInput::Bare(matcher) => Self {
                shape: EntryShape::Simple(matcher),
                description: None,
                examples: None,
            },
            PatternInput::Enhanced(enhanced) => {
                let mut groups = IndexMap::new();
                groups.insert(DEFAULT_GROUP.to_string(), enhanced.pattern);
                Self {
                    shape: EntryShape::Grouped {
                        groups,
                        default: Some(DEFAULT_GROUP.to_string()),
                    },
                    description: Some(enhanced.description),
                    examples: Some(enhanced.examples),
                }
            }
            PatternInput::Grouped(descriptor) => {
                let mut description = descriptor.description;
                let mut examples = None;
                let mut groups = IndexMap::with_capacity(descriptor.groups.len());

                for (name, value) in descriptor.groups {
                    let matcher = match value {
                        GroupValue::Bare(matcher) => matcher,
                        GroupValue::Enhanced(enhanced) => {
                            description.get_or_insert(enhanced.description);
                            examples.get_or_insert(enhanced.examples);
                            enhanced.pattern
                        }
                    };
                    groups.insert(name, matcher);
                }

                Self {
                    shape: EntryShape::Grouped {
                        groups,
                        default: descriptor.default,
                    },
                    description,
                    examples,
                }
            }
        }
    }

    /// Merges an incoming entry into this one
    ///
    /// Grouped into grouped unions the groups key by key with incoming winning
    /// on collisions; the incoming default wins when present. Any other
    /// combination is a wholesale replacement. A union keeps the metadata
    /// already present and only fills gaps from the incoming entry.
    pub fn merge(self, incoming: Entry) -> Entry {
        match (self.shape, incoming.shape) {
            (
                EntryShape::Grouped {
                    mut groups,
                    default,
                },
                EntryShape::Grouped {
                    groups: incoming_groups,
                    default: incoming_default,
                },
            ) => {
                groups.extend(incoming_groups);
                Entry {
                    shape: EntryShape::Grouped {
                        groups,
                        default: incoming_default.or(default),
                    },
                    description: self.description.or(incoming.description),
                    examples: self.examples.or(incoming.examples),
                }
            }
            (_, shape) => Entry {
                shape,
                description: incoming.description,
                examples: incoming.examples,
            },
        }
    }

    /// Checks that a declared default names one of the entry's own groups
    pub fn validate(&self, type_name: &str) -> Result<(), PatternError> {
        if let EntryShape::Grouped {
            groups,
            default: Some(default),
        } = &self.shape
            && !groups.contains_key(default)
        {
            return Err(PatternError::InvalidArgument(format!(
                "Default group \"{default}\" for type \"{type_name}\" is not one of its groups: [{}]",
                groups.keys().cloned().collect::<Vec<_>>().join(", ")
            )));
        }
        Ok(())
    }

    pub fn shape(&self) -> &EntryShape {
        &self.shape
    }

    pub fn is_grouped(&self) -> bool {
        matches!(self.shape, EntryShape::Grouped { .. })
    }

    /// Group names in insertion order; empty for simple entries
    pub fn group_names(&self) -> Vec<String> {
        match &self.shape {
            EntryShape::Simple(_) => Vec::new(),
            EntryShape::Grouped { groups, .. } => groups.keys().cloned().collect(),
        }
    }

    pub fn default_group(&self) -> Option<&str> {
        match &self.shape {
            EntryShape::Simple(_) => None,
            EntryShape::Grouped { default, .. } => default.as_deref(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn examples(&self) -> Option<&Examples> {
        self.examples.as_ref()
    }

    /// Introspection record for this entry
    pub fn info(&self, type_name: &str) -> TypeInfo {
        TypeInfo {
            type_name: type_name.to_string(),
            groups: self.group_names(),
            default: self.default_group().map(str::to_string),
            description: self.description.clone(),
            examples: self.examples.clone(),
        }
    }
}
