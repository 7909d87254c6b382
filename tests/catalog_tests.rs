#![forbid(unsafe_code)]

//! Integration tests for TOML catalogs and the built-in pattern set
//!
//! This module verifies:
//! - every built-in group accepts its valid examples and rejects its invalid ones
//! - catalog files and directories load through the safety gate
//! - malformed catalogs are reported with their source

#[macro_use]
mod common;

use common::{TestResult, type_names};
use regex_kit::patterns::{Catalog, builtin_catalog_names, builtin_patterns};
use regex_kit::{CatalogError, KitError, PatternError, RegexKit};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture_path(filename: &str) -> PathBuf {
    common::fixture_path("catalogs", filename)
}

// Helper to write a catalog file into a temp directory
fn create_test_catalog_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

// ============================================================================
// Built-in catalog
// ============================================================================

#[test]
fn test_builtin_examples_validate() -> TestResult {
    let kit = RegexKit::with_builtins()?;
    let mut checked = 0;

    for info in kit.list() {
        for group in &info.groups {
            let spec = format!("{}:{}", info.type_name, group);
            let regex = kit.get(&spec)?;
            let entry_examples = builtin_group_examples(&info.type_name, group);

            for valid in &entry_examples.valid {
                assert!(regex.is_match(valid), "{spec} should accept {valid:?}");
            }
            for invalid in &entry_examples.invalid {
                assert!(!regex.is_match(invalid), "{spec} should reject {invalid:?}");
            }
            checked += 1;
        }
    }

    assert!(checked > 60, "expected every built-in group to be checked, got {checked}");
    Ok(())
}

/// Reads a group's examples straight from the embedded catalog sources
fn builtin_group_examples(type_name: &str, group: &str) -> regex_kit::Examples {
    for name in builtin_catalog_names() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("builtin-patterns")
            .join(format!("{name}.toml"));
        let table: toml::Table = fs::read_to_string(&path).unwrap().parse().unwrap();
        if let Some(entry) = table.get(type_name) {
            let examples = &entry["groups"][group]["examples"];
            let strings = |key: &str| -> Vec<String> {
                examples[key]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|v| v.as_str().unwrap().to_string())
                    .collect()
            };
            return regex_kit::Examples {
                valid: strings("valid"),
                invalid: strings("invalid"),
            };
        }
    }
    panic!("type {type_name} not found in built-in catalogs");
}

#[test]
fn test_builtin_types_are_grouped_with_metadata() -> TestResult {
    let set = builtin_patterns()?;
    assert!(set.contains("email"));
    assert!(set.contains("idCard"));

    let kit = RegexKit::with_builtins()?;
    let phone = assert_some!(kit.info("phone"));
    assert_eq!(phone.default.as_deref(), Some("CN"));
    assert!(phone.groups.iter().any(|g| g == "US"));
    assert!(phone.description.is_some());
    Ok(())
}

#[test]
fn test_builtin_defaults_resolve() -> TestResult {
    let kit = RegexKit::with_builtins()?;
    assert!(kit.test("email", "user@example.com")?);
    assert!(kit.test("phone", "13800138000")?);
    assert!(kit.test("phone:US", "+14155552671")?);
    assert!(kit.test("uuid", "550e8400-e29b-41d4-a716-446655440000")?);
    Ok(())
}

// ============================================================================
// Catalog files
// ============================================================================

#[test]
fn test_load_catalog_fixture() -> TestResult {
    let kit = RegexKit::new();
    kit.load_catalog(&fixture_path("contacts.toml"))?;

    assert_eq!(type_names(&kit), ["ticket", "sku", "postcode"]);

    assert!(kit.test("ticket", "TK-123456")?);
    assert!(kit.test("sku", "ABC-1234")?);
    assert!(kit.test("postcode", "90210")?);
    assert!(kit.test("postcode:NL", "1012 AB")?);

    let sku = assert_some!(kit.info("sku"));
    assert_eq!(sku.description.as_deref(), Some("Stock keeping unit"));

    let postcode = assert_some!(kit.info("postcode"));
    assert_eq!(postcode.description.as_deref(), Some("Postal codes"));
    assert_eq!(postcode.groups, ["US", "NL"]);
    Ok(())
}

#[test]
fn test_load_catalog_is_gated() {
    let kit = RegexKit::new();
    let err = kit.load_catalog(&fixture_path("unsafe.toml")).unwrap_err();
    assert!(matches!(
        err,
        KitError::Pattern(PatternError::UnsafePattern { ref target, .. }) if target == "dangerous"
    ));
    assert!(kit.list().is_empty());
}

#[test]
fn test_load_catalog_missing_file_is_catalog_io() {
    let kit = RegexKit::new();
    let err = kit.load_catalog(&fixture_path("does_not_exist.toml")).unwrap_err();
    match err {
        KitError::Catalog(CatalogError::Io { path, .. }) => {
            assert!(path.ends_with("does_not_exist.toml"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_load_builtins_bypasses_gate() -> TestResult {
    let kit = RegexKit::new();
    let set = Catalog::load(&fixture_path("unsafe.toml"))?;
    kit.load_builtins(set)?;
    assert!(kit.test("dangerous", "aaa")?);
    Ok(())
}

#[test]
fn test_load_catalog_dir() -> TestResult {
    let temp_dir = TempDir::new()?;
    create_test_catalog_file(&temp_dir, "b.toml", "beta = '^b+$'\n");
    create_test_catalog_file(&temp_dir, "a.toml", "alpha = '^a+$'\n");
    create_test_catalog_file(&temp_dir, "notes.txt", "ignored = '^x$'\n");

    let kit = RegexKit::new();
    kit.load_catalog_dir(temp_dir.path())?;

    assert_eq!(type_names(&kit), ["alpha", "beta"]);
    Ok(())
}

#[test]
fn test_load_catalog_dir_duplicate_type() {
    let temp_dir = TempDir::new().unwrap();
    create_test_catalog_file(&temp_dir, "a.toml", "same = '^a$'\n");
    create_test_catalog_file(&temp_dir, "b.toml", "same = '^b$'\n");

    let err = Catalog::load_dir(temp_dir.path()).unwrap_err();
    match err {
        CatalogError::InvalidEntry(message) => assert!(message.contains("Duplicate type 'same'")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_load_catalog_dir_missing_is_empty() -> TestResult {
    let temp_dir = TempDir::new()?;
    let set = Catalog::load_dir(&temp_dir.path().join("missing"))?;
    assert!(set.is_empty());
    Ok(())
}

#[test]
fn test_catalog_syntax_error_names_source() {
    let err = Catalog::parse("this is = = not toml", "broken.toml").unwrap_err();
    match err {
        CatalogError::InvalidSyntax { source_name, .. } => assert_eq!(source_name, "broken.toml"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_catalog_invalid_regex_names_group() {
    let err = Catalog::parse("[t.groups.g]\npattern = '('\n", "bad.toml").unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Pattern(PatternError::InvalidRegex { ref target, .. }) if target == "t:g"
    ));
}

#[test]
fn test_catalog_groups_without_groups_table() -> TestResult {
    let set = Catalog::parse(
        "[code]\ndefault = \"b\"\na = '^A\\d$'\nb = '^B\\d$'\n",
        "inline.toml",
    )?;
    let kit = RegexKit::new();
    kit.inject(set)?;

    let info = assert_some!(kit.info("code"));
    assert_eq!(info.groups, ["a", "b"]);
    assert!(kit.test("code", "B1")?);
    Ok(())
}
