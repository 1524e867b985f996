//! Declaration excision and reassembly.
//!
//! The tail of a generated `parser.c` declares the external scanner hooks and
//! then defines the language factory. Turning that tail into a header means
//! cutting the factory body out and leaving its signature behind as a
//! forward declaration.

use std::path::Path;

use super::locate::{locate, locate_from, Marker};
use super::patterns::{LANGUAGE_FORWARD_DECLARATION, LEXER_FORWARD_DECLARATION};
use super::source::{SourceBuffer, Span};
use crate::core::errors::PatternError;

/// The located language factory function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryFunction {
    /// Function name captured from the signature, e.g. `tree_sitter_python`.
    pub name: String,
    /// The signature line without a trailing `;`.
    pub signature: String,
    /// From the start of the signature through the closing brace.
    pub span: Span,
}

/// Whether a captured factory name that differs from the expected one is
/// fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameCheck {
    #[default]
    Strict,
    /// Log a warning and keep the name found in the source.
    Warn,
}

/// Locate the `extern "C"` tail of a parser source.
pub fn locate_extern_block(buffer: &SourceBuffer, file: &Path) -> Result<Span, PatternError> {
    let marker = Marker::cplusplus_guard();
    locate(buffer, marker)
        .map(|found| found.span)
        .ok_or_else(|| PatternError::MarkerNotFound {
            marker: marker.to_string(),
            file: file.to_path_buf(),
        })
}

/// Locate the factory function in `buffer` and check its name.
pub fn locate_factory(
    buffer: &SourceBuffer,
    expected_name: &str,
    check: NameCheck,
    file: &Path,
) -> Result<FactoryFunction, PatternError> {
    let start = locate(buffer, Marker::factory_signature()).ok_or_else(|| {
        PatternError::FactoryNotFound {
            expected: expected_name.to_string(),
            file: file.to_path_buf(),
        }
    })?;

    let end = locate_from(buffer, Marker::factory_end(), start.span.end).ok_or_else(|| {
        PatternError::FactoryEndNotFound {
            expected: expected_name.to_string(),
            file: file.to_path_buf(),
        }
    })?;

    let name = start.capture.unwrap_or_default().to_string();
    if name != expected_name {
        match check {
            NameCheck::Strict => {
                return Err(PatternError::FactoryNameMismatch {
                    expected: expected_name.to_string(),
                    found: name,
                    file: file.to_path_buf(),
                });
            }
            NameCheck::Warn => {
                tracing::warn!(
                    "expected `{}` in {} but found `{}`; keeping `{}`",
                    expected_name,
                    file.display(),
                    name,
                    name
                );
            }
        }
    }

    Ok(FactoryFunction {
        name,
        signature: start.matched.to_string(),
        span: Span::new(start.span.start, end.span.end),
    })
}

/// Replace `function_span` with `declaration;` plus the buffer's newline.
///
/// Every byte outside the span is copied through untouched.
pub fn excise(buffer: &SourceBuffer, function_span: Span, declaration: &str) -> String {
    let text = buffer.text();
    let newline = buffer.newline();

    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..function_span.start]);
    out.push_str(declaration);
    out.push(';');
    out.push_str(newline);
    out.push_str(&text[function_span.end..]);
    out
}

/// The two opaque-type forward declarations the retained signatures need.
pub fn forward_declarations(newline: &str) -> String {
    format!(
        "{}{}{}{}",
        LEXER_FORWARD_DECLARATION, newline, LANGUAGE_FORWARD_DECLARATION, newline
    )
}

/// Cut the factory out of a full parser source and return declaration-only
/// text: forward declarations, a blank line, then the `extern "C"` tail with
/// the factory body replaced by its declaration.
pub fn extract_declarations(
    source: &SourceBuffer,
    expected_name: &str,
    check: NameCheck,
    file: &Path,
) -> Result<String, PatternError> {
    let tail_span = locate_extern_block(source, file)?;
    let tail = source.sub_buffer(tail_span);

    let factory = locate_factory(&tail, expected_name, check, file)?;
    tracing::debug!(
        "found `{}` at bytes {}..{} of {}",
        factory.name,
        factory.span.start + tail_span.start,
        factory.span.end + tail_span.start,
        file.display()
    );

    let excised = excise(&tail, factory.span, &factory.signature);

    let newline = source.newline();
    Ok(format!(
        "{}{}{}",
        forward_declarations(newline),
        newline,
        excised
    ))
}
