#![forbid(unsafe_code)]

//! The RegexKit facade
//!
//! `RegexKit` wraps a [`Registry`] with type-spec parsing, the safety gate on
//! every mutation, and text operations derived from resolved matchers.
//!
//! Lookup and mutation paths (`get`, `test`, `add`, `inject`, `use_registry`)
//! return errors. Text operations never fail: each has a `try_*` form that
//! returns a `Result`, and the plain form logs the error and returns its
//! no-op value (`None`, an empty vector, `0`, or the input text).

use super::chain::RegexChain;
use super::search::SearchCache;
use crate::config::{ChainOptions, ConfigOptions, KitConfig, RegistrySettings};
use crate::error::{KitError, PatternError};
use crate::patterns::{Catalog, Matcher, PatternInput, PatternSet, Registry, builtin_patterns};
use crate::safety::ensure_safe;
use crate::types::{TextMatch, TypeInfo, TypeRef, TypeSpec};
use regex::{Regex, Replacer};
use std::fmt::Display;
use std::path::Path;
use std::sync::{OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Default replacement used by `highlight`
pub const DEFAULT_HIGHLIGHT: &str = "<mark>${0}</mark>";

#[derive(Debug)]
struct KitState {
    registry: Registry,
    settings: RegistrySettings,
    chain: ChainOptions,
}

/// Registry of named regex matchers with text operations
///
/// All state sits behind one reader-writer lock: lookups and text operations
/// take the read side, `add`, `inject`, `use_registry`, `config` and loads take
/// the write side. `RegexKit` is `Send + Sync` and can be shared freely.
#[derive(Debug)]
pub struct RegexKit {
    state: RwLock<KitState>,
    search: SearchCache,
}

impl RegexKit {
    /// Create an empty kit with default configuration
    pub fn new() -> Self {
        Self::with_config(KitConfig::default())
    }

    /// Create an empty kit from a loaded configuration
    pub fn with_config(config: KitConfig) -> Self {
        Self {
            state: RwLock::new(KitState {
                registry: Registry::with_fallback(config.registry.group_fallback),
                settings: config.registry,
                chain: config.chain,
            }),
            search: SearchCache::new(),
        }
    }

    /// Create a kit pre-loaded with the built-in catalog
    pub fn with_builtins() -> Result<Self, KitError> {
        let kit = Self::new();
        kit.load_builtins(builtin_patterns()?)?;
        Ok(kit)
    }

    fn read(&self) -> RwLockReadGuard<'_, KitState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, KitState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ============= Registry operations =============

    /// Resolves a `type` or `type:group` spec to its stored matcher
    ///
    /// # Errors
    ///
    /// - `PatternError::InvalidArgument` for an empty spec
    /// - `PatternError::UnknownType` if the type was never added
    /// - `PatternError::UnknownGroup` if the requested group does not exist
    /// - `PatternError::AmbiguousGroup` under the strict fallback
    pub fn get(&self, spec: &str) -> Result<Regex, PatternError> {
        self.lookup(spec, |matcher| matcher.regex().clone())
    }

    /// Like [`RegexKit::get`], returning the matcher with its options and
    /// search variant
    pub fn matcher(&self, spec: &str) -> Result<Matcher, PatternError> {
        self.lookup(spec, Matcher::clone)
    }

    fn lookup<T>(&self, spec: &str, f: impl FnOnce(&Matcher) -> T) -> Result<T, PatternError> {
        let spec = TypeSpec::parse(spec)?;
        let state = self.read();
        state
            .registry
            .get(spec.type_name(), spec.group())?
            .map(f)
            .ok_or_else(|| PatternError::UnknownType(spec.type_name().to_string()))
    }

    /// Tests a value against a named type or a literal matcher
    ///
    /// Literal matchers are used as given and are not passed through the
    /// safety gate.
    pub fn test<'a>(
        &self,
        target: impl Into<TypeRef<'a>>,
        value: &str,
    ) -> Result<bool, PatternError> {
        let regex = self.resolve(target.into())?;
        Ok(regex.is_match(value))
    }

    /// Tests any displayable value; `None` is `false` without matching
    pub fn test_value<'a, V: Display>(
        &self,
        target: impl Into<TypeRef<'a>>,
        value: Option<V>,
    ) -> Result<bool, PatternError> {
        match value {
            Some(value) => self.test(target, &value.to_string()),
            None => Ok(false),
        }
    }

    /// Adds a type, replacing any existing entry wholesale
    ///
    /// # Errors
    ///
    /// - `PatternError::InvalidArgument` for an empty type name
    /// - `PatternError::UnsafePattern` naming the type (or `type:group`) if the
    ///   safety gate rejects any matcher; the registry is unchanged
    pub fn add(&self, type_name: &str, input: impl Into<PatternInput>) -> Result<(), PatternError> {
        if type_name.is_empty() {
            return Err(PatternError::InvalidArgument(
                "Type must be a non-empty string".to_string(),
            ));
        }
        let input = input.into();
        let mut state = self.write();
        if state.settings.security_enabled {
            gate(type_name, &input)?;
        }
        state.registry.add(type_name, input)
    }

    /// Every registered type, in insertion order
    pub fn list(&self) -> Vec<TypeInfo> {
        self.read().registry.list()
    }

    /// Introspection for one type; any group part of the spec is ignored
    pub fn info(&self, spec: &str) -> Option<TypeInfo> {
        let spec = TypeSpec::parse(spec).ok()?;
        self.read().registry.info(spec.type_name())
    }

    /// Applies a partial configuration update
    pub fn config(&self, options: ConfigOptions) {
        let mut state = self.write();
        state.settings.apply(options);
        state.registry.set_config(options);
    }

    /// Current registry settings
    pub fn settings(&self) -> RegistrySettings {
        self.read().settings
    }

    /// Options given to chains created by [`RegexKit::chain`]
    pub fn chain_options(&self) -> ChainOptions {
        self.read().chain
    }

    /// Merges a set of types into the registry
    ///
    /// Every matcher in the set is gated before anything is written; a single
    /// rejection aborts the whole call.
    pub fn inject(&self, set: PatternSet) -> Result<(), PatternError> {
        let mut state = self.write();
        if state.settings.security_enabled {
            gate_set(&set)?;
        }
        state.registry.inject(set)
    }

    /// Replaces the whole registry with the given set
    ///
    /// Every matcher in the set is gated before the registry is cleared.
    pub fn use_registry(&self, set: PatternSet) -> Result<(), PatternError> {
        let mut state = self.write();
        if state.settings.security_enabled {
            gate_set(&set)?;
        }
        state.registry.use_registry(set)
    }

    /// Bulk-loads trusted pattern data without the safety gate
    pub fn load_builtins(&self, set: PatternSet) -> Result<(), PatternError> {
        let count = set.len();
        self.write().registry.load(set)?;
        tracing::debug!(count, "loaded built-in patterns");
        Ok(())
    }

    /// Merges a TOML catalog file into the registry, through the safety gate
    pub fn load_catalog(&self, path: &Path) -> Result<(), KitError> {
        let set = Catalog::load(path)?;
        self.inject(set)?;
        Ok(())
    }

    /// Merges every `.toml` catalog in a directory, through the safety gate
    pub fn load_catalog_dir(&self, dir: &Path) -> Result<(), KitError> {
        let set = Catalog::load_dir(dir)?;
        self.inject(set)?;
        Ok(())
    }

    /// Start a chain over `text` using the configured chain options
    pub fn chain(&self, text: impl Into<String>) -> RegexChain<'_> {
        RegexChain::new(self, text, self.chain_options())
    }

    /// Start a chain with explicit options
    pub fn chain_with(&self, text: impl Into<String>, options: ChainOptions) -> RegexChain<'_> {
        RegexChain::new(self, text, options)
    }

    // ============= Text operations =============

    fn resolve(&self, target: TypeRef<'_>) -> Result<Regex, PatternError> {
        match target {
            TypeRef::ByName(spec) => self.get(spec),
            TypeRef::Literal(regex) => Ok(regex.clone()),
            TypeRef::Matcher(matcher) => Ok(matcher.regex().clone()),
        }
    }

    /// Search variant of the target, with anchors stripped
    ///
    /// Registered and `Matcher` targets use the variant compiled alongside
    /// them. Only literal `Regex` targets go through the search cache.
    pub(super) fn search_regex(&self, target: TypeRef<'_>) -> Result<Regex, PatternError> {
        match target {
            TypeRef::ByName(spec) => self.lookup(spec, |matcher| matcher.search().clone()),
            TypeRef::Matcher(matcher) => Ok(matcher.search().clone()),
            TypeRef::Literal(regex) => {
                self.search
                    .variant(regex)
                    .map_err(|e| PatternError::InvalidRegex {
                        target: target.to_string(),
                        message: e.to_string(),
                    })
            }
        }
    }

    /// First match in `text`
    pub fn try_extract<'a>(
        &self,
        target: impl Into<TypeRef<'a>>,
        text: &str,
    ) -> Result<Option<String>, PatternError> {
        Ok(self.try_find(target, text)?.map(|m| m.matched))
    }

    /// Every match in `text`
    pub fn try_extract_all<'a>(
        &self,
        target: impl Into<TypeRef<'a>>,
        text: &str,
    ) -> Result<Vec<String>, PatternError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let regex = self.search_regex(target.into())?;
        Ok(regex.find_iter(text).map(|m| m.as_str().to_string()).collect())
    }

    /// Replaces the first match
    pub fn try_replace<'a, R: Replacer>(
        &self,
        target: impl Into<TypeRef<'a>>,
        text: &str,
        replacement: R,
    ) -> Result<String, PatternError> {
        if text.is_empty() {
            return Ok(String::new());
        }
        let regex = self.search_regex(target.into())?;
        Ok(regex.replace(text, replacement).into_owned())
    }

    /// Replaces every match
    pub fn try_replace_all<'a, R: Replacer>(
        &self,
        target: impl Into<TypeRef<'a>>,
        text: &str,
        replacement: R,
    ) -> Result<String, PatternError> {
        if text.is_empty() {
            return Ok(String::new());
        }
        let regex = self.search_regex(target.into())?;
        Ok(regex.replace_all(text, replacement).into_owned())
    }

    /// First match with its byte offset
    pub fn try_find<'a>(
        &self,
        target: impl Into<TypeRef<'a>>,
        text: &str,
    ) -> Result<Option<TextMatch>, PatternError> {
        if text.is_empty() {
            return Ok(None);
        }
        let regex = self.search_regex(target.into())?;
        Ok(regex.find(text).map(TextMatch::from_regex_match))
    }

    /// Every match with its byte offset
    ///
    /// The scan always moves forward past an empty match, so patterns that
    /// can match the empty string terminate.
    pub fn try_find_all<'a>(
        &self,
        target: impl Into<TypeRef<'a>>,
        text: &str,
    ) -> Result<Vec<TextMatch>, PatternError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let regex = self.search_regex(target.into())?;
        Ok(regex.find_iter(text).map(TextMatch::from_regex_match).collect())
    }

    /// First match in `text`, or `None`
    pub fn extract<'a>(&self, target: impl Into<TypeRef<'a>>, text: &str) -> Option<String> {
        let target = target.into();
        or_noop("extract", target, self.try_extract(target, text), None)
    }

    /// First match passed through `processor`
    pub fn extract_with<'a, F>(
        &self,
        target: impl Into<TypeRef<'a>>,
        text: &str,
        processor: F,
    ) -> Option<String>
    where
        F: FnOnce(&TextMatch) -> String,
    {
        let target = target.into();
        let found = or_noop("extract", target, self.try_find(target, text), None);
        found.map(|m| processor(&m))
    }

    /// Every match in `text`, or an empty vector
    pub fn extract_all<'a>(&self, target: impl Into<TypeRef<'a>>, text: &str) -> Vec<String> {
        let target = target.into();
        or_noop("extractAll", target, self.try_extract_all(target, text), Vec::new())
    }

    /// Every match passed through `processor`
    pub fn extract_all_with<'a, F>(
        &self,
        target: impl Into<TypeRef<'a>>,
        text: &str,
        processor: F,
    ) -> Vec<String>
    where
        F: FnMut(&TextMatch) -> String,
    {
        self.find_all(target, text).iter().map(processor).collect()
    }

    /// Replaces the first match; returns `text` unchanged on failure
    ///
    /// `replacement` follows `regex` replacement syntax (`$0`, `${name}`), or
    /// can be a closure over the match captures.
    pub fn replace<'a, R: Replacer>(
        &self,
        target: impl Into<TypeRef<'a>>,
        text: &str,
        replacement: R,
    ) -> String {
        let target = target.into();
        let result = self.try_replace(target, text, replacement);
        or_noop("replace", target, result, text.to_string())
    }

    /// Replaces every match; returns `text` unchanged on failure
    pub fn replace_all<'a, R: Replacer>(
        &self,
        target: impl Into<TypeRef<'a>>,
        text: &str,
        replacement: R,
    ) -> String {
        let target = target.into();
        let result = self.try_replace_all(target, text, replacement);
        or_noop("replaceAll", target, result, text.to_string())
    }

    /// Number of matches in `text`
    pub fn count<'a>(&self, target: impl Into<TypeRef<'a>>, text: &str) -> usize {
        self.extract_all(target, text).len()
    }

    /// First match with its position, or `None`
    pub fn find<'a>(&self, target: impl Into<TypeRef<'a>>, text: &str) -> Option<TextMatch> {
        let target = target.into();
        or_noop("find", target, self.try_find(target, text), None)
    }

    /// Every match with its position
    pub fn find_all<'a>(&self, target: impl Into<TypeRef<'a>>, text: &str) -> Vec<TextMatch> {
        let target = target.into();
        or_noop("findAll", target, self.try_find_all(target, text), Vec::new())
    }

    /// Removes the first match
    pub fn remove<'a>(&self, target: impl Into<TypeRef<'a>>, text: &str) -> String {
        self.replace(target, text, "")
    }

    /// Removes every match
    pub fn remove_all<'a>(&self, target: impl Into<TypeRef<'a>>, text: &str) -> String {
        self.replace_all(target, text, "")
    }

    /// Wraps every match in `<mark>` tags
    pub fn highlight<'a>(&self, target: impl Into<TypeRef<'a>>, text: &str) -> String {
        self.replace_all(target, text, DEFAULT_HIGHLIGHT)
    }

    /// Wraps every match using a custom replacement template
    pub fn highlight_with<'a, R: Replacer>(
        &self,
        target: impl Into<TypeRef<'a>>,
        text: &str,
        wrapper: R,
    ) -> String {
        self.replace_all(target, text, wrapper)
    }
}

impl Default for RegexKit {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide kit pre-loaded with the built-in catalog
///
/// A failed built-in load is logged and leaves the shared kit empty.
pub fn shared() -> &'static RegexKit {
    static SHARED: OnceLock<RegexKit> = OnceLock::new();
    SHARED.get_or_init(|| {
        RegexKit::with_builtins().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "failed to load built-in patterns");
            RegexKit::new()
        })
    })
}

/// Runs the safety gate over every matcher in one input
fn gate(type_name: &str, input: &PatternInput) -> Result<(), PatternError> {
    for (target, matcher) in input.matchers(type_name) {
        ensure_safe(matcher.regex(), &target)?;
    }
    Ok(())
}

fn gate_set(set: &PatternSet) -> Result<(), PatternError> {
    for (type_name, input) in set.iter() {
        gate(type_name, input)?;
    }
    Ok(())
}

/// Converts a failed text operation into its no-op value
fn or_noop<T>(
    operation: &str,
    target: TypeRef<'_>,
    result: Result<T, PatternError>,
    fallback: T,
) -> T {
    result.unwrap_or_else(|err| {
        tracing::warn!(operation, type_ref = %target, error = %err, "text operation failed");
        fallback
    })
}

/// Renders an operation name for logs, e.g. `extract(email)`
pub(crate) fn operation_name(operation: &str, target: TypeRef<'_>) -> String {
    format!("{operation}({target})")
}
