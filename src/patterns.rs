#![forbid(unsafe_code)]

//! Pattern inputs, canonical entries and the registry

pub mod builtin;
pub mod catalog;
pub mod entry;
pub mod input;
pub mod matcher;
pub mod registry;

pub use builtin::{builtin_catalog, builtin_catalog_names, builtin_patterns};
pub use catalog::Catalog;
pub use entry::{DEFAULT_GROUP, Entry, EntryShape};
pub use input::{EnhancedPattern, GroupDescriptor, GroupValue, PatternInput, PatternSet};
pub use matcher::{MatchOptions, Matcher, MatcherBuilder, strip_anchors};
pub use registry::{Registry, resolve_group};
