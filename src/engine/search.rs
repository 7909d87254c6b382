#![forbid(unsafe_code)]

//! Search variants of literal regexes
//!
//! Registered matchers carry their own search variant. A plain `Regex` passed
//! straight to a text operation has no recorded options, so its variant is
//! compiled here with default options and cached by source.

use crate::patterns::strip_anchors;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Upper bound on cached variants before the cache is cleared
const MAX_CACHED_VARIANTS: usize = 512;

/// Thread-safe cache of compiled search variants, keyed by pattern source
///
/// Only suitable for regexes built with default options; flags set through
/// `RegexBuilder` are not visible on a `Regex` and are lost here. Pass a
/// [`Matcher`](crate::patterns::Matcher) to keep them.
#[derive(Debug, Default)]
pub struct SearchCache {
    variants: RwLock<HashMap<String, Regex>>,
}

impl SearchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the search variant of `regex`, compiling it on first use
    ///
    /// Patterns without anchors are returned as-is.
    pub fn variant(&self, regex: &Regex) -> Result<Regex, regex::Error> {
        let source = regex.as_str();

        if let Some(cached) = self
            .variants
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(source)
        {
            return Ok(cached.clone());
        }

        let Some(stripped) = strip_anchors(source) else {
            return Ok(regex.clone());
        };
        let compiled = Regex::new(&stripped)?;

        let mut variants = self.variants.write().unwrap_or_else(PoisonError::into_inner);
        if variants.len() >= MAX_CACHED_VARIANTS {
            variants.clear();
        }
        variants.insert(source.to_string(), compiled.clone());
        Ok(compiled)
    }

    pub fn len(&self) -> usize {
        self.variants.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
