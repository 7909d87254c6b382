#![forbid(unsafe_code)]

//! Highlighting matches for HTML and terminal output

use crate::engine::{DEFAULT_HIGHLIGHT, RegexKit};
use crate::types::TypeRef;
use regex::Captures;
use std::io::{self, Write};
use termcolor::{Ansi, Color, ColorSpec, WriteColor};

/// How matches are wrapped by [`highlight_html`]
///
/// `style` takes precedence over `class_name`, which takes precedence over
/// `wrapper`. With nothing set, matches are wrapped in `<mark>` tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightOptions {
    /// Replacement template, e.g. `<b>${0}</b>`
    pub wrapper: Option<String>,
    pub class_name: Option<String>,
    pub style: Option<String>,
}

impl HighlightOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wrapper(mut self, wrapper: impl Into<String>) -> Self {
        self.wrapper = Some(wrapper.into());
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }
}

/// Wraps every match of `target` in HTML markup
///
/// `style` and `class_name` are escaped before they are placed in the
/// attribute. The `wrapper` template and the matched text are inserted as-is.
pub fn highlight_html<'a>(
    kit: &RegexKit,
    target: impl Into<TypeRef<'a>>,
    text: &str,
    options: &HighlightOptions,
) -> String {
    let attribute = match (&options.style, &options.class_name) {
        (Some(style), _) => Some(format!("style=\"{}\"", escape_attribute(style))),
        (None, Some(class_name)) => {
            Some(format!("class=\"{}\"", escape_attribute(class_name)))
        }
        (None, None) => None,
    };

    match attribute {
        Some(attribute) => kit.replace_all(target, text, |caps: &Captures<'_>| {
            format!("<span {attribute}>{}</span>", &caps[0])
        }),
        None => {
            let wrapper = options.wrapper.as_deref().unwrap_or(DEFAULT_HIGHLIGHT);
            kit.replace_all(target, text, wrapper)
        }
    }
}

/// Escapes a value for use inside a double-quoted HTML attribute
fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Foreground colours available to [`highlight_console`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HighlightColor {
    Red,
    Green,
    #[default]
    Yellow,
    Blue,
    Magenta,
    Cyan,
}

impl HighlightColor {
    fn as_termcolor(self) -> Color {
        match self {
            HighlightColor::Red => Color::Red,
            HighlightColor::Green => Color::Green,
            HighlightColor::Yellow => Color::Yellow,
            HighlightColor::Blue => Color::Blue,
            HighlightColor::Magenta => Color::Magenta,
            HighlightColor::Cyan => Color::Cyan,
        }
    }
}

/// Wraps every match of `target` in ANSI colour codes
pub fn highlight_console<'a>(
    kit: &RegexKit,
    target: impl Into<TypeRef<'a>>,
    text: &str,
    color: HighlightColor,
) -> String {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(color.as_termcolor())).set_reset(false);

    kit.replace_all(target, text, |caps: &Captures<'_>| {
        paint(&caps[0], &spec).unwrap_or_else(|_| caps[0].to_string())
    })
}

fn paint(text: &str, spec: &ColorSpec) -> io::Result<String> {
    let mut out = Ansi::new(Vec::new());
    out.set_color(spec)?;
    out.write_all(text.as_bytes())?;
    out.reset()?;
    String::from_utf8(out.into_inner()).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn kit() -> RegexKit {
        let kit = RegexKit::new();
        kit.add("digits", Regex::new(r"^\d+$").unwrap()).unwrap();
        kit
    }

    #[test]
    fn test_html_default_mark() {
        let kit = kit();
        let out = highlight_html(&kit, "digits", "a 12 b", &HighlightOptions::new());
        assert_eq!(out, "a <mark>12</mark> b");
    }

    #[test]
    fn test_html_style_beats_class() {
        let kit = kit();
        let options = HighlightOptions::new()
            .wrapper("<b>${0}</b>")
            .class_name("hit")
            .style("color: red");
        assert_eq!(
            highlight_html(&kit, "digits", "a 12", &options),
            "a <span style=\"color: red\">12</span>"
        );

        let options = HighlightOptions::new().wrapper("<b>${0}</b>").class_name("hit");
        assert_eq!(
            highlight_html(&kit, "digits", "a 12", &options),
            "a <span class=\"hit\">12</span>"
        );

        let options = HighlightOptions::new().wrapper("<b>${0}</b>");
        assert_eq!(highlight_html(&kit, "digits", "a 12", &options), "a <b>12</b>");
    }

    #[test]
    fn test_html_attribute_values_are_escaped() {
        let kit = kit();
        let options = HighlightOptions::new().class_name("a\"b<c&");
        assert_eq!(
            highlight_html(&kit, "digits", "x 7", &options),
            "x <span class=\"a&quot;b&lt;c&amp;\">7</span>"
        );

        let options = HighlightOptions::new().style("\" onmouseover=\"alert(1)");
        assert_eq!(
            highlight_html(&kit, "digits", "7", &options),
            "<span style=\"&quot; onmouseover=&quot;alert(1)\">7</span>"
        );
    }

    #[test]
    fn test_escape_attribute_leaves_plain_text() {
        assert_eq!(escape_attribute("color: red; font-weight: bold"), "color: red; font-weight: bold");
        assert_eq!(escape_attribute("it's <b>"), "it&#39;s &lt;b&gt;");
    }

    #[test]
    fn test_console_wraps_in_ansi_codes() {
        let kit = kit();
        let out = highlight_console(&kit, "digits", "a 12", HighlightColor::default());
        assert!(out.starts_with("a "));
        assert!(out.contains("\x1b[33m12"));
        assert!(out.ends_with("\x1b[0m"));
    }

    #[test]
    fn test_console_unknown_type_keeps_text() {
        let kit = kit();
        assert_eq!(highlight_console(&kit, "missing", "a 12", HighlightColor::Red), "a 12");
    }
}
