//! Matcher resolution and text operations

mod batch;
pub mod chain;
pub mod kit;
pub mod search;

pub use chain::{ChainMetadata, ChainResult, RegexChain};
pub use kit::{DEFAULT_HIGHLIGHT, RegexKit, shared};
pub use search::SearchCache;
