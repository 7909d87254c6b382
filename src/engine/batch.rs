#![forbid(unsafe_code)]

//! Multi-type operations over a single text
//!
//! Batch lookups run one type per rayon task and collect back into insertion
//! order, so results line up with the requested types.

use super::kit::RegexKit;
use crate::types::TypeRef;
use indexmap::IndexMap;
use rayon::prelude::*;

impl RegexKit {
    /// Every match for each listed type, keyed by type spec
    ///
    /// Unknown types map to an empty vector.
    ///
    /// # Arguments
    ///
    /// * `text` - Text to scan
    /// * `types` - Type specs (`type` or `type:group`)
    pub fn extract_batch(&self, text: &str, types: &[&str]) -> IndexMap<String, Vec<String>> {
        types
            .par_iter()
            .map(|spec| (spec.to_string(), self.extract_all(*spec, text)))
            .collect::<Vec<_>>()
            .into_iter()
            .collect()
    }

    /// Match count for each listed type, keyed by type spec
    pub fn count_batch(&self, text: &str, types: &[&str]) -> IndexMap<String, usize> {
        types
            .par_iter()
            .map(|spec| (spec.to_string(), self.count(*spec, text)))
            .collect::<Vec<_>>()
            .into_iter()
            .collect()
    }

    /// Like [`RegexKit::extract_batch`] with an explicit group per type,
    /// keyed by type name
    pub fn extract_batch_grouped(
        &self,
        text: &str,
        types: &[(&str, &str)],
    ) -> IndexMap<String, Vec<String>> {
        types
            .par_iter()
            .map(|(type_name, group)| {
                let spec = format!("{type_name}:{group}");
                (type_name.to_string(), self.extract_all(spec.as_str(), text))
            })
            .collect::<Vec<_>>()
            .into_iter()
            .collect()
    }

    pub fn count_batch_grouped(&self, text: &str, types: &[(&str, &str)]) -> IndexMap<String, usize> {
        types
            .par_iter()
            .map(|(type_name, group)| {
                let spec = format!("{type_name}:{group}");
                (type_name.to_string(), self.count(spec.as_str(), text))
            })
            .collect::<Vec<_>>()
            .into_iter()
            .collect()
    }

    /// Applies `replace_all` for each `(type, replacement)` pair in order
    pub fn replace_batch(&self, text: &str, replacements: &[(&str, &str)]) -> String {
        replacements
            .iter()
            .fold(text.to_string(), |current, (spec, replacement)| {
                self.replace_all(*spec, &current, *replacement)
            })
    }

    /// Splits `text` on every match of `target`
    ///
    /// Parts are trimmed; empty parts are dropped. If the target cannot be
    /// resolved the whole text comes back as a single part.
    pub fn split<'a>(&self, target: impl Into<TypeRef<'a>>, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        let target = target.into();
        match self.search_regex(target) {
            Ok(regex) => regex
                .split(text)
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect(),
            Err(err) => {
                tracing::warn!(type_ref = %target, error = %err, "split failed");
                vec![text.to_string()]
            }
        }
    }

    /// Splits `text` on matches of any of the listed types
    pub fn split_by(&self, text: &str, types: &[&str]) -> Vec<String> {
        types.iter().fold(vec![text.to_string()], |parts, spec| {
            parts
                .iter()
                .flat_map(|part| self.split(*spec, part))
                .collect()
        })
    }

    /// Keeps only the matches of the listed types, joined by a space
    pub fn keep(&self, text: &str, types: &[&str]) -> String {
        types
            .iter()
            .flat_map(|spec| self.extract_all(*spec, text))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
