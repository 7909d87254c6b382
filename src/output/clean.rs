#![forbid(unsafe_code)]

//! Whitespace normalization rules

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern should compile"));
static CRLF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n").expect("line break pattern should compile"));
static LINEBREAK_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+").expect("line break run pattern should compile"));
static TABS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\t+").expect("tab pattern should compile"));
static EXTRA_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" {2,}").expect("space run pattern should compile"));

/// A single cleanup pass applied by [`clean`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CleanRule {
    /// Collapse any whitespace run to one space and trim the ends
    Whitespace,
    /// Normalize `\r\n` to `\n` and collapse blank lines
    Linebreaks,
    /// Replace tab runs with one space
    Tabs,
    /// Collapse runs of spaces
    ExtraSpaces,
}

impl CleanRule {
    fn apply(self, text: &str) -> String {
        match self {
            CleanRule::Whitespace => WHITESPACE.replace_all(text, " ").trim().to_string(),
            CleanRule::Linebreaks => {
                let normalized = CRLF.replace_all(text, "\n");
                LINEBREAK_RUNS.replace_all(&normalized, "\n").into_owned()
            }
            CleanRule::Tabs => TABS.replace_all(text, " ").into_owned(),
            CleanRule::ExtraSpaces => EXTRA_SPACES.replace_all(text, " ").into_owned(),
        }
    }
}

/// Applies each rule in order
pub fn clean(text: &str, rules: &[CleanRule]) -> String {
    rules
        .iter()
        .fold(text.to_string(), |current, rule| rule.apply(&current))
}
