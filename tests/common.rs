//! Shared helpers for the regex-kit integration tests
//!
//! Each test binary compiles its own copy of this module, so not every helper
//! is used everywhere.

#![allow(dead_code)]

use regex::Regex;
use regex_kit::RegexKit;
use std::path::PathBuf;

/// Result type alias for tests
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Compiles a pattern known to be valid
pub fn re(source: &str) -> Regex {
    match Regex::new(source) {
        Ok(regex) => regex,
        Err(e) => panic!("test pattern {source:?} should compile: {e}"),
    }
}

/// A kit loaded with the embedded catalog
pub fn builtin_kit() -> RegexKit {
    match RegexKit::with_builtins() {
        Ok(kit) => kit,
        Err(e) => panic!("built-in catalog should load: {e:?}"),
    }
}

/// Path to a file under `tests/fixtures/<kind>/`
pub fn fixture_path(kind: &str, filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(kind)
        .join(filename)
}

/// Registered type names in listing order
pub fn type_names(kit: &RegexKit) -> Vec<String> {
    kit.list().into_iter().map(|info| info.type_name).collect()
}

/// Unwraps `Ok` or panics with the error
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("expected Ok, got Err({:?})", e),
        }
    };
    ($expr:expr, $msg:literal) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("{}: {:?}", $msg, e),
        }
    };
}

/// Unwraps `Some` or panics
#[macro_export]
macro_rules! assert_some {
    ($expr:expr) => {
        match $expr {
            Some(v) => v,
            None => panic!("expected Some, got None"),
        }
    };
    ($expr:expr, $msg:literal) => {
        match $expr {
            Some(v) => v,
            None => panic!("{}: got None", $msg),
        }
    };
}

/// Asserts that a lookup or mutation failed with the given `PatternError` shape
#[macro_export]
macro_rules! assert_pattern_err {
    ($expr:expr, $pattern:pat) => {
        match $expr {
            Err($pattern) => {}
            Err(other) => panic!("wrong pattern error: {other:?}"),
            Ok(_) => panic!("expected a pattern error, got Ok"),
        }
    };
}
