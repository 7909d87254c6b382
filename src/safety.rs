#![forbid(unsafe_code)]

//! Static safety analysis for regex patterns
//!
//! Scores a pattern's source text for catastrophic-backtracking risk without
//! executing it. The score is additive:
//!
//! - nested quantifiers such as `(a+)+` add 30
//! - quantified alternation groups such as `(a|b)+` add 20
//! - any general backtracking shape (`(.*)+`, `(.+)+`, nested quantifiers, or
//!   two quantified alternation groups in sequence) adds 40
//! - a weighted token count: quantifiers x2, groups x3, alternations x5,
//!   character classes x2, plus length/10 for sources over 100 characters
//!
//! Scores of 60 and above are `high` or `critical` and are rejected by every
//! registry mutation while the gate is enabled.

use crate::error::PatternError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static NESTED_QUANTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\([^)]*[+*?][^)]*\)[+*?]").expect("nested quantifier detector should compile")
});

static REPEATING_GROUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\([^)]*\|[^)]*\)[+*]").expect("repeating group detector should compile")
});

static BACKTRACKING_SHAPES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\([^)]*\.\*[^)]*\)[+*?]",
        r"\([^)]*\.\+[^)]*\)[+*?]",
        r"\([^)]*[+*?][^)]*\)[+*?]",
        r"\([^)]*\|[^)]*\)[+*?].*\([^)]*\|[^)]*\)[+*?]",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("backtracking detector should compile"))
    .collect()
});

static CHARACTER_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[^\]]*\]").expect("character class detector should compile")
});

/// Shapes that are rejected outright by [`create_safe_regex`]
static BLACKLIST: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\(\.\*\)\*",
        r"\(\.\*\)\+",
        r"\(\.\+\)\*",
        r"\(\.\+\)\+",
        r"\([^)]*\|[^)]*\)\*",
        r"\([^)]*\|[^)]*\)\+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("blacklist pattern should compile"))
    .collect()
});

const NESTED_QUANTIFIER_PENALTY: u32 = 30;
const REPEATING_GROUP_PENALTY: u32 = 20;
const BACKTRACKING_PENALTY: u32 = 40;
const LENGTH_PENALTY_THRESHOLD: usize = 100;

/// Risk classification derived from the total score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Maps a total score onto a risk level
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => RiskLevel::Critical,
            60..=79 => RiskLevel::High,
            40..=59 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    /// Whether the gate admits patterns at this level
    pub fn is_acceptable(&self) -> bool {
        matches!(self, RiskLevel::Low | RiskLevel::Medium)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which checks fired and the total score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyDetails {
    pub has_nested_quantifiers: bool,
    pub has_repeating_groups: bool,
    pub has_backtracking_risk: bool,
    pub complexity_score: u32,
}

/// Result of analysing one pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyReport {
    pub is_safe: bool,
    pub risk_level: RiskLevel,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
    pub details: SafetyDetails,
}

/// Analyses a pattern source and produces a safety report
///
/// Deterministic: the same source always yields the same report.
pub fn check_safety(source: &str) -> SafetyReport {
    let mut warnings = Vec::new();
    let mut recommendations = Vec::new();
    let mut score = 0;

    let has_nested_quantifiers = NESTED_QUANTIFIER.is_match(source);
    if has_nested_quantifiers {
        warnings.push(
            "Detected nested quantifiers which may cause exponential backtracking".to_string(),
        );
        recommendations.push("Consider using atomic groups or possessive quantifiers".to_string());
        score += NESTED_QUANTIFIER_PENALTY;
    }

    let has_repeating_groups = REPEATING_GROUP.is_match(source);
    if has_repeating_groups {
        warnings.push("Detected repeating groups that may cause performance issues".to_string());
        recommendations.push("Consider optimizing group patterns".to_string());
        score += REPEATING_GROUP_PENALTY;
    }

    let has_backtracking_risk = BACKTRACKING_SHAPES.iter().any(|re| re.is_match(source));
    if has_backtracking_risk {
        warnings.push("Pattern may cause catastrophic backtracking".to_string());
        recommendations.push("Use more specific patterns or atomic groups".to_string());
        score += BACKTRACKING_PENALTY;
    }

    score += complexity_score(source);
    let risk_level = RiskLevel::from_score(score);

    SafetyReport {
        is_safe: risk_level.is_acceptable(),
        risk_level,
        warnings,
        recommendations,
        details: SafetyDetails {
            has_nested_quantifiers,
            has_repeating_groups,
            has_backtracking_risk,
            complexity_score: score,
        },
    }
}

/// Weighted token count of a pattern source, excluding the shape penalties
pub fn complexity_score(source: &str) -> u32 {
    let mut quantifiers = 0u32;
    let mut groups = 0u32;
    let mut alternations = 0u32;
    for c in source.chars() {
        match c {
            '+' | '*' | '?' | '{' | '}' => quantifiers += 1,
            '(' => groups += 1,
            '|' => alternations += 1,
            _ => {}
        }
    }
    let classes = CHARACTER_CLASS.find_iter(source).count() as u32;

    let mut score = quantifiers * 2 + groups * 3 + alternations * 5 + classes * 2;

    let length = source.chars().count();
    if length > LENGTH_PENALTY_THRESHOLD {
        score += (length / 10) as u32;
    }

    score
}

/// Returns true if the source contains a known-dangerous shape such as `(.*)*`
pub fn is_blacklisted(source: &str) -> bool {
    BLACKLIST.iter().any(|re| re.is_match(source))
}

/// Suggests a narrower rewrite of a pattern
///
/// Replaces `(.*)` / `(.+)` with non-whitespace runs and adds missing anchors.
/// Returns `None` when nothing would change.
pub fn generate_safe_suggestion(source: &str) -> Option<String> {
    let mut suggestion = source.replace("(.*)", r"([^\s]*)").replace("(.+)", r"([^\s]+)");

    if !suggestion.starts_with('^') && !suggestion.starts_with(r"\b") {
        suggestion.insert(0, '^');
    }
    if !suggestion.ends_with('$') && !suggestion.ends_with(r"\b") {
        suggestion.push('$');
    }

    (suggestion != source).then_some(suggestion)
}

/// Compiles a pattern, refusing critical or blacklisted sources
///
/// # Errors
///
/// Returns `PatternError::InvalidRegex` if the source does not compile, or
/// `PatternError::UnsafePattern` if it is critical or blacklisted.
pub fn create_safe_regex(source: &str) -> Result<Regex, PatternError> {
    let regex = Regex::new(source).map_err(|e| PatternError::InvalidRegex {
        target: source.to_string(),
        message: e.to_string(),
    })?;

    let report = check_safety(source);
    if report.risk_level == RiskLevel::Critical || is_blacklisted(source) {
        return Err(PatternError::UnsafePattern {
            target: source.to_string(),
            risk: report.risk_level,
        });
    }

    Ok(regex)
}

/// Gate check applied by registry mutations
///
/// `target` names the type or `type:group` being written.
pub(crate) fn ensure_safe(regex: &Regex, target: &str) -> Result<(), PatternError> {
    let report = check_safety(regex.as_str());

    if !report.warnings.is_empty() {
        tracing::warn!(
            target_type = target,
            pattern = regex.as_str(),
            risk = %report.risk_level,
            warnings = ?report.warnings,
            "regex safety warning"
        );
    }

    if !report.is_safe {
        tracing::warn!(
            target_type = target,
            pattern = regex.as_str(),
            risk = %report.risk_level,
            recommendations = ?report.recommendations,
            "rejecting unsafe regex"
        );
        return Err(PatternError::UnsafePattern {
            target: target.to_string(),
            risk: report.risk_level,
        });
    }

    Ok(())
}
