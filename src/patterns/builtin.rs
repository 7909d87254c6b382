#![forbid(unsafe_code)]

//! Built-in pattern catalog embedded at compile time
//!
//! The catalog files under `builtin-patterns/` are compiled into the library
//! with `include_str!`, so no external files are needed at runtime.

use super::catalog::Catalog;
use super::input::PatternSet;
use crate::error::CatalogError;

/// Embedded built-in catalog files
const BUILTIN_CATALOGS: &[(&str, &str)] = &[
    ("basic", include_str!("../../builtin-patterns/basic.toml")),
    ("tech", include_str!("../../builtin-patterns/tech.toml")),
    ("format", include_str!("../../builtin-patterns/format.toml")),
    (
        "financial",
        include_str!("../../builtin-patterns/financial.toml"),
    ),
    (
        "identity",
        include_str!("../../builtin-patterns/identity.toml"),
    ),
];

/// Names of the embedded catalogs, in load order
pub fn builtin_catalog_names() -> impl Iterator<Item = &'static str> {
    BUILTIN_CATALOGS.iter().map(|(name, _)| *name)
}

/// Parses one embedded catalog by name
///
/// Returns `Ok(None)` if no catalog has that name.
pub fn builtin_catalog(name: &str) -> Result<Option<PatternSet>, CatalogError> {
    BUILTIN_CATALOGS
        .iter()
        .find(|(catalog, _)| *catalog == name)
        .map(|(catalog, content)| Catalog::parse(content, catalog))
        .transpose()
}

/// Parses every embedded catalog into one set
///
/// # Errors
///
/// Returns `CatalogError::InvalidEntry` if two catalogs define the same type.
pub fn builtin_patterns() -> Result<PatternSet, CatalogError> {
    let mut combined = PatternSet::new();
    for (catalog, content) in BUILTIN_CATALOGS {
        for (type_name, input) in Catalog::parse(content, catalog)? {
            if combined.contains(&type_name) {
                return Err(CatalogError::InvalidEntry(format!(
                    "Duplicate built-in type '{type_name}' in catalog {catalog}"
                )));
            }
            combined.insert(type_name, input);
        }
    }
    Ok(combined)
}
