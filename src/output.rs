//! Presentation helpers built on the text operations

pub mod clean;
pub mod highlight;

pub use clean::{CleanRule, clean};
pub use highlight::{HighlightColor, HighlightOptions, highlight_console, highlight_html};
