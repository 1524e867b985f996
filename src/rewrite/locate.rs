//! Marker-based span location.
//!
//! A marker is either a literal token or a structured regex shape. Locating
//! a marker yields a [`Span`] and, for structured markers, the text of the
//! first capture group.

use std::fmt;

use regex::Regex;

use super::patterns;
use super::source::{SourceBuffer, Span};

/// A textual anchor used to find a region without parsing.
#[derive(Debug, Clone, Copy)]
pub enum Marker {
    /// Matches from the first occurrence of the literal to end of buffer.
    Literal(&'static str),
    /// Matches exactly the regex match; capture group 1 is exposed.
    Pattern {
        name: &'static str,
        regex: &'static Regex,
    },
}

impl Marker {
    /// `#ifdef __cplusplus`, the start of the trailing `extern "C"` block.
    pub fn cplusplus_guard() -> Self {
        Marker::Literal(patterns::CPLUSPLUS_GUARD)
    }

    /// `extern const TSLanguage *tree_sitter_<name>(void)`.
    pub fn factory_signature() -> Self {
        Marker::Pattern {
            name: "extern const TSLanguage *tree_sitter_<name>(void)",
            regex: patterns::factory_signature(),
        }
    }

    /// `return &language;` then `}` on the following line.
    pub fn factory_end() -> Self {
        Marker::Pattern {
            name: "return &language;\\n}",
            regex: patterns::factory_end(),
        }
    }

    /// Human-readable description used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Marker::Literal(literal) => literal,
            Marker::Pattern { name, .. } => name,
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`", self.describe())
    }
}

/// Where a marker matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located<'a> {
    pub span: Span,
    /// Text of capture group 1 for pattern markers.
    pub capture: Option<&'a str>,
    /// The exact matched text (not the extended literal span).
    pub matched: &'a str,
}

/// Find `marker` anywhere in `buffer`.
pub fn locate<'a>(buffer: &'a SourceBuffer, marker: Marker) -> Option<Located<'a>> {
    locate_from(buffer, marker, 0)
}

/// Find `marker` at or after byte offset `from`.
///
/// Returned spans are relative to the start of `buffer`, not to `from`.
pub fn locate_from<'a>(buffer: &'a SourceBuffer, marker: Marker, from: usize) -> Option<Located<'a>> {
    let text = buffer.text();
    if from > text.len() {
        return None;
    }

    match marker {
        Marker::Literal(literal) => {
            let start = text[from..].find(literal)? + from;
            Some(Located {
                span: Span::new(start, text.len()),
                capture: None,
                matched: &text[start..start + literal.len()],
            })
        }
        Marker::Pattern { regex, .. } => {
            let caps = regex.captures_at(text, from)?;
            let whole = caps.get(0)?;
            Some(Located {
                span: Span::new(whole.start(), whole.end()),
                capture: caps.get(1).map(|m| m.as_str()),
                matched: whole.as_str(),
            })
        }
    }
}
