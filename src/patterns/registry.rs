#![forbid(unsafe_code)]

//! Pattern registry for storing and resolving named matchers
//!
//! The Registry is responsible for:
//! - Normalizing inputs into entries on `add`
//! - Merging (`inject`) and replacing (`use_registry`) in bulk
//! - Resolving a type and optional group to exactly one matcher
//!
//! The registry does not run the safety gate; the facade gates every input
//! before it reaches these methods.

use super::entry::{Entry, EntryShape};
use super::input::{PatternInput, PatternSet};
use super::matcher::Matcher;
use crate::config::{ConfigOptions, GroupFallback};
use crate::error::PatternError;
use crate::types::TypeInfo;
use indexmap::IndexMap;

/// Resolves the matcher for one entry
///
/// Pure function of its arguments. Simple entries ignore `requested`. For
/// grouped entries the explicit group wins, then the entry's default, then a
/// sole group, and finally `fallback` decides between the first-inserted group
/// and an ambiguity error. Returns `Ok(None)` only for a grouped entry with no
/// groups under the `first` fallback.
///
/// # Errors
///
/// - `PatternError::UnknownGroup` if `requested` is not one of the entry's groups
/// - `PatternError::AmbiguousGroup` if several groups exist, none is selected,
///   and `fallback` is `Strict`
pub fn resolve_group<'e>(
    type_name: &str,
    entry: &'e Entry,
    requested: Option<&str>,
    fallback: GroupFallback,
) -> Result<Option<&'e Matcher>, PatternError> {
    let (groups, default) = match entry.shape() {
        EntryShape::Simple(matcher) => return Ok(Some(matcher)),
        EntryShape::Grouped { groups, default } => (groups, default),
    };

    if let Some(group) = requested {
        return groups
            .get(group)
            .map(Some)
            .ok_or_else(|| PatternError::UnknownGroup {
                type_name: type_name.to_string(),
                group: group.to_string(),
                available: groups.keys().cloned().collect(),
            });
    }

    // Default is validated on write, but a missing key still falls through
    if let Some(matcher) = default.as_deref().and_then(|name| groups.get(name)) {
        return Ok(Some(matcher));
    }

    if groups.len() == 1 {
        return Ok(groups.values().next());
    }

    match fallback {
        GroupFallback::First => Ok(groups.values().next()),
        GroupFallback::Strict => Err(PatternError::AmbiguousGroup {
            type_name: type_name.to_string(),
            groups: groups.keys().cloned().collect(),
        }),
    }
}

/// Registry mapping type names to entries
///
/// Entries keep their insertion order, which is the order `list` reports.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: IndexMap<String, Entry>,
    group_fallback: GroupFallback,
}

impl Registry {
    /// Create a new empty Registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry using the given fallback strategy
    pub fn with_fallback(group_fallback: GroupFallback) -> Self {
        Self {
            entries: IndexMap::new(),
            group_fallback,
        }
    }

    /// Adds a type, overwriting any existing entry wholesale
    ///
    /// # Errors
    ///
    /// Returns `PatternError::InvalidArgument` if the type name is empty or the
    /// input declares a default group it does not define.
    pub fn add(
        &mut self,
        type_name: &str,
        input: impl Into<PatternInput>,
    ) -> Result<(), PatternError> {
        let entry = prepare(type_name, input.into())?;
        if self.entries.insert(type_name.to_string(), entry).is_some() {
            tracing::debug!(type_name, "replaced existing entry");
        }
        Ok(())
    }

    /// Adds every type in the set as if by repeated `add` calls
    ///
    /// Either every entry is written or none is.
    pub fn load(&mut self, set: PatternSet) -> Result<(), PatternError> {
        let staged = stage(set)?;
        self.entries.extend(staged);
        Ok(())
    }

    /// Merges a set of types into the registry
    ///
    /// New types are added. Existing grouped types gain the incoming groups,
    /// with incoming matchers winning on collisions and the incoming default
    /// replacing the existing one when given. Anything else is overwritten.
    /// Either every entry is written or none is.
    pub fn inject(&mut self, set: PatternSet) -> Result<(), PatternError> {
        let mut staged = Vec::with_capacity(set.len());
        for (type_name, input) in set {
            let incoming = prepare(&type_name, input)?;
            let entry = match self.entries.get(&type_name) {
                Some(existing) => existing.clone().merge(incoming),
                None => incoming,
            };
            entry.validate(&type_name)?;
            staged.push((type_name, entry));
        }

        self.entries.extend(staged);
        Ok(())
    }

    /// Replaces the whole registry with the given set
    ///
    /// The current contents are discarded only if the whole set is valid.
    pub fn use_registry(&mut self, set: PatternSet) -> Result<(), PatternError> {
        self.entries = stage(set)?;
        Ok(())
    }

    /// Resolves a type and optional group to one matcher
    ///
    /// Returns `Ok(None)` if the type is unknown.
    pub fn get(
        &self,
        type_name: &str,
        group: Option<&str>,
    ) -> Result<Option<&Matcher>, PatternError> {
        match self.entries.get(type_name) {
            Some(entry) => resolve_group(type_name, entry, group, self.group_fallback),
            None => Ok(None),
        }
    }

    /// Get an entry by its type name
    pub fn entry(&self, type_name: &str) -> Option<&Entry> {
        self.entries.get(type_name)
    }

    /// One record per type, in insertion order
    pub fn list(&self) -> Vec<TypeInfo> {
        self.entries
            .iter()
            .map(|(type_name, entry)| entry.info(type_name))
            .collect()
    }

    /// Introspection record for one type
    pub fn info(&self, type_name: &str) -> Option<TypeInfo> {
        self.entries.get(type_name).map(|entry| entry.info(type_name))
    }

    /// Updates the fallback strategy if given; other options are ignored here
    pub fn set_config(&mut self, options: ConfigOptions) {
        if let Some(group_fallback) = options.group_fallback {
            self.group_fallback = group_fallback;
        }
    }

    pub fn group_fallback(&self) -> GroupFallback {
        self.group_fallback
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.entries.contains_key(type_name)
    }

    /// Iterate over type names in insertion order
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Get the number of types in the registry
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn prepare(type_name: &str, input: PatternInput) -> Result<Entry, PatternError> {
    if type_name.is_empty() {
        return Err(PatternError::InvalidArgument(
            "Type must be a non-empty string".to_string(),
        ));
    }
    let entry = Entry::normalize(input);
    entry.validate(type_name)?;
    Ok(entry)
}

fn stage(set: PatternSet) -> Result<IndexMap<String, Entry>, PatternError> {
    let mut staged = IndexMap::with_capacity(set.len());
    for (type_name, input) in set {
        let entry = prepare(&type_name, input)?;
        staged.insert(type_name, entry);
    }
    Ok(staged)
}
