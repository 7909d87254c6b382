#![forbid(unsafe_code)]

//! Stored matchers and their search variants
//!
//! Patterns are usually authored for whole-string validation (`^\d+$`). Text
//! operations scan inside larger text, so every [`Matcher`] carries a second
//! regex with the leading `^` and trailing `$` stripped. Both are compiled
//! with the same [`MatchOptions`], once, when the matcher is built.
//!
//! A compiled `Regex` does not expose the builder flags it was made with. A
//! `Matcher` converted from a plain `Regex` therefore assumes default options;
//! use [`Matcher::builder`] (or inline flags such as `(?i)`) for anything else.

use regex::{Regex, RegexBuilder};
use std::fmt;

/// Compile flags applied to a matcher and to its search variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    pub case_insensitive: bool,
    pub multi_line: bool,
    pub dot_matches_new_line: bool,
    pub ignore_whitespace: bool,
    pub swap_greed: bool,
    pub crlf: bool,
    pub unicode: bool,
    pub size_limit: Option<usize>,
    pub dfa_size_limit: Option<usize>,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            multi_line: false,
            dot_matches_new_line: false,
            ignore_whitespace: false,
            swap_greed: false,
            crlf: false,
            unicode: true,
            size_limit: None,
            dfa_size_limit: None,
        }
    }
}

impl MatchOptions {
    /// Compiles `source` with these options
    pub fn compile(&self, source: &str) -> Result<Regex, regex::Error> {
        let mut builder = RegexBuilder::new(source);
        builder
            .case_insensitive(self.case_insensitive)
            .multi_line(self.multi_line)
            .dot_matches_new_line(self.dot_matches_new_line)
            .ignore_whitespace(self.ignore_whitespace)
            .swap_greed(self.swap_greed)
            .crlf(self.crlf)
            .unicode(self.unicode);
        if let Some(limit) = self.size_limit {
            builder.size_limit(limit);
        }
        if let Some(limit) = self.dfa_size_limit {
            builder.dfa_size_limit(limit);
        }
        builder.build()
    }
}

/// A compiled matcher paired with its anchor-free search variant
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: Regex,
    search: Regex,
    options: MatchOptions,
}

impl Matcher {
    /// Compiles `source` with default options
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Self::with_options(source, MatchOptions::default())
    }

    pub fn with_options(source: &str, options: MatchOptions) -> Result<Self, regex::Error> {
        let regex = options.compile(source)?;
        Ok(Self::from_parts(regex, options))
    }

    /// Starts a builder for a matcher with non-default flags
    ///
    /// ```
    /// use regex_kit::patterns::Matcher;
    ///
    /// let word = Matcher::builder("^abc$").case_insensitive(true).build().unwrap();
    /// assert!(word.is_match("ABC"));
    /// assert!(word.search().is_match("xx ABC yy"));
    /// ```
    pub fn builder(source: impl Into<String>) -> MatcherBuilder {
        MatcherBuilder {
            source: source.into(),
            options: MatchOptions::default(),
        }
    }

    fn from_parts(regex: Regex, options: MatchOptions) -> Self {
        let search = search_variant(&regex, &options);
        Self {
            regex,
            search,
            options,
        }
    }

    /// The matcher as registered, anchors included
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// The form used for scanning inside larger text
    pub fn search(&self) -> &Regex {
        &self.search
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl From<Regex> for Matcher {
    fn from(regex: Regex) -> Self {
        Self::from_parts(regex, MatchOptions::default())
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builder for [`Matcher`] values with explicit compile flags
#[derive(Debug, Clone)]
pub struct MatcherBuilder {
    source: String,
    options: MatchOptions,
}

impl MatcherBuilder {
    pub fn case_insensitive(mut self, yes: bool) -> Self {
        self.options.case_insensitive = yes;
        self
    }

    pub fn multi_line(mut self, yes: bool) -> Self {
        self.options.multi_line = yes;
        self
    }

    pub fn dot_matches_new_line(mut self, yes: bool) -> Self {
        self.options.dot_matches_new_line = yes;
        self
    }

    pub fn ignore_whitespace(mut self, yes: bool) -> Self {
        self.options.ignore_whitespace = yes;
        self
    }

    pub fn swap_greed(mut self, yes: bool) -> Self {
        self.options.swap_greed = yes;
        self
    }

    pub fn crlf(mut self, yes: bool) -> Self {
        self.options.crlf = yes;
        self
    }

    pub fn unicode(mut self, yes: bool) -> Self {
        self.options.unicode = yes;
        self
    }

    pub fn size_limit(mut self, bytes: usize) -> Self {
        self.options.size_limit = Some(bytes);
        self
    }

    pub fn dfa_size_limit(mut self, bytes: usize) -> Self {
        self.options.dfa_size_limit = Some(bytes);
        self
    }

    /// Replaces every flag at once
    pub fn options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> Result<Matcher, regex::Error> {
        Matcher::with_options(&self.source, self.options)
    }
}

/// Compiles the anchor-free form of `regex` with the same options
///
/// Falls back to the anchored regex if the stripped source does not compile.
fn search_variant(regex: &Regex, options: &MatchOptions) -> Regex {
    let Some(stripped) = strip_anchors(regex.as_str()) else {
        return regex.clone();
    };
    options.compile(&stripped).unwrap_or_else(|err| {
        tracing::debug!(
            source = regex.as_str(),
            error = %err,
            "search variant did not compile, scanning with the anchored matcher"
        );
        regex.clone()
    })
}

/// Returns the search form of a pattern source, or `None` if it has no anchors
///
/// A leading inline flag group such as `(?i)` is kept in front of the result,
/// and an escaped `\$` at the end is a literal, not an anchor.
pub fn strip_anchors(source: &str) -> Option<String> {
    let flags_len = inline_flags_len(source);
    let (flags, body) = source.split_at(flags_len);

    let mut stripped = body.strip_prefix('^').unwrap_or(body);
    if let Some(rest) = stripped.strip_suffix('$')
        && !ends_with_escape(rest)
    {
        stripped = rest;
    }

    (stripped.len() != body.len()).then(|| format!("{flags}{stripped}"))
}

/// Length of a leading `(?flags)` group, or 0
fn inline_flags_len(source: &str) -> usize {
    let Some(rest) = source.strip_prefix("(?") else {
        return 0;
    };
    match rest.find(')') {
        Some(end)
            if end > 0
                && rest[..end]
                    .chars()
                    .all(|c| matches!(c, 'i' | 'm' | 's' | 'x' | 'u' | 'U' | 'R' | '-')) =>
        {
            end + 3
        }
        _ => 0,
    }
}

/// True if `s` ends in an odd number of backslashes
fn ends_with_escape(s: &str) -> bool {
    s.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_both_anchors() {
        assert_eq!(strip_anchors(r"^\d+$").as_deref(), Some(r"\d+"));
    }

    #[test]
    fn test_strip_single_anchor() {
        assert_eq!(strip_anchors(r"^abc").as_deref(), Some("abc"));
        assert_eq!(strip_anchors(r"abc$").as_deref(), Some("abc"));
    }

    #[test]
    fn test_unanchored_is_none() {
        assert_eq!(strip_anchors(r"\d+"), None);
    }

    #[test]
    fn test_keeps_inline_flags() {
        assert_eq!(strip_anchors(r"(?i)^[a-f]+$").as_deref(), Some(r"(?i)[a-f]+"));
        assert_eq!(strip_anchors(r"(?i)abc"), None);
    }

    #[test]
    fn test_non_flag_group_is_not_a_prefix() {
        // Non-capturing group, not a flag group
        assert_eq!(strip_anchors(r"(?:a)$").as_deref(), Some(r"(?:a)"));
    }

    #[test]
    fn test_escaped_dollar_is_literal() {
        assert_eq!(strip_anchors(r"^cost\$"), Some(r"cost\$".to_string()));
        assert_eq!(strip_anchors(r"a\\$").as_deref(), Some(r"a\\"));
    }

    #[test]
    fn test_search_variant_keeps_builder_flags() {
        let matcher = Matcher::builder("^abc$").case_insensitive(true).build().unwrap();
        assert!(matcher.is_match("ABC"));
        assert!(!matcher.is_match("xx ABC"));
        assert_eq!(matcher.search().as_str(), "abc");
        assert_eq!(matcher.search().find_iter("ABC abc").count(), 2);
        assert!(matcher.options().case_insensitive);
    }

    #[test]
    fn test_search_variant_of_unanchored_is_same_source() {
        let matcher = Matcher::new(r"\d+").unwrap();
        assert_eq!(matcher.search().as_str(), r"\d+");
    }

    #[test]
    fn test_from_regex_uses_default_options() {
        let matcher = Matcher::from(Regex::new(r"^\d+$").unwrap());
        assert_eq!(matcher.options(), &MatchOptions::default());
        assert_eq!(matcher.search().as_str(), r"\d+");
        assert_eq!(matcher.to_string(), r"^\d+$");
    }

    #[test]
    fn test_options_reach_both_regexes() {
        let options = MatchOptions {
            multi_line: true,
            dot_matches_new_line: true,
            ..MatchOptions::default()
        };
        let matcher = Matcher::with_options("^a.b$", options).unwrap();
        assert!(matcher.is_match("x\na\nb"));
        assert!(matcher.search().is_match("a\nb"));
    }

    #[test]
    fn test_invalid_source_is_an_error() {
        assert!(Matcher::new("(unclosed").is_err());
        assert!(Matcher::builder("[").case_insensitive(true).build().is_err());
    }
}
