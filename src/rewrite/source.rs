//! Source buffers and line-ending handling.
//!
//! Every rewrite pass reads a whole file into a [`SourceBuffer`], produces a
//! new string, and writes it back. Lines inserted by a pass always use the
//! line ending detected from the original buffer.

use std::fmt;
use std::ops::Range;

/// The newline convention of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// `"\n"`
    #[default]
    Lf,
    /// `"\r\n"`
    CrLf,
}

impl LineEnding {
    /// Detect the line ending from the first newline character in `text`.
    ///
    /// A `'\r'` seen first means CRLF. Text without any newline uses LF.
    pub fn detect(text: &str) -> Self {
        match text.chars().find(|c| *c == '\r' || *c == '\n') {
            Some('\r') => LineEnding::CrLf,
            _ => LineEnding::Lf,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open byte range into a [`SourceBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Create a span. `start` must not exceed `end`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {} after end {}", start, end);
        Span { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Shift both ends forward by `offset`.
    pub fn offset(self, offset: usize) -> Self {
        Span::new(self.start + offset, self.end + offset)
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

/// An immutable text blob plus its detected line ending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBuffer {
    text: String,
    line_ending: LineEnding,
}

impl SourceBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let line_ending = LineEnding::detect(&text);
        SourceBuffer { text, line_ending }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn newline(&self) -> &'static str {
        self.line_ending.as_str()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The text covered by `span`.
    pub fn slice(&self, span: Span) -> &str {
        &self.text[span.range()]
    }

    /// A new buffer holding only the text in `span`.
    ///
    /// Keeps the parent's line ending even if the slice has no newline.
    pub fn sub_buffer(&self, span: Span) -> SourceBuffer {
        SourceBuffer {
            text: self.slice(span).to_string(),
            line_ending: self.line_ending,
        }
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// One line of a buffer split into its content and its terminator.
///
/// The terminator is `""` for a final line with no newline, otherwise
/// `"\n"` or `"\r\n"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub content: &'a str,
    pub terminator: &'a str,
}

/// Split `text` into lines, keeping each line's own terminator.
///
/// Concatenating `content + terminator` for every line reproduces `text`.
pub fn lines_with_endings(text: &str) -> impl Iterator<Item = Line<'_>> {
    text.split_inclusive('\n').map(|raw| {
        let body_len = if raw.ends_with("\r\n") {
            raw.len() - 2
        } else if raw.ends_with('\n') {
            raw.len() - 1
        } else {
            raw.len()
        };
        Line {
            content: &raw[..body_len],
            terminator: &raw[body_len..],
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_line_endings() {
        assert_eq!(LineEnding::detect("a\r\nb\n"), LineEnding::CrLf);
        assert_eq!(LineEnding::detect("a\nb\r\n"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("no newline"), LineEnding::Lf);
        assert_eq!(LineEnding::detect(""), LineEnding::Lf);
    }

    #[test]
    fn test_lines_with_endings_reassemble() {
        let text = "one\r\ntwo\nthree";
        let lines: Vec<_> = lines_with_endings(text).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].content, "one");
        assert_eq!(lines[0].terminator, "\r\n");
        assert_eq!(lines[1].terminator, "\n");
        assert_eq!(lines[2].content, "three");
        assert_eq!(lines[2].terminator, "");

        let rebuilt: String = lines
            .iter()
            .map(|l| format!("{}{}", l.content, l.terminator))
            .collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_sub_buffer_keeps_parent_line_ending() {
        let buffer = SourceBuffer::new("head\r\ntail");
        let tail = buffer.sub_buffer(Span::new(6, 10));
        assert_eq!(tail.text(), "tail");
        assert_eq!(tail.line_ending(), LineEnding::CrLf);
    }
}
