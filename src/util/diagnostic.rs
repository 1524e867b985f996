//! User-friendly diagnostic messages.
//!
//! Every failure the CLI reports names what went wrong, where, and what to
//! try next.

use std::fmt;
use std::path::PathBuf;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when a repository path does not exist.
    pub const CHECK_PATHS: &str = "Check that the repository paths passed on the command line exist";

    /// Suggestion when a grammar has no C sources.
    pub const NO_SOURCES: &str =
        "A grammar repository needs src/parser.c; run `tree-sitter generate` in it first";

    /// Suggestion when the tree-sitter checkout has no headers.
    pub const NO_HEADERS: &str =
        "Point --root at a tree-sitter checkout that contains lib/include/tree_sitter";

    /// Suggestion when the parser does not have the expected shape.
    pub const REGENERATE_GRAMMAR: &str =
        "Regenerate the parser with `tree-sitter generate` and try again";

    /// Suggestion when the factory function name differs from the repository name.
    pub const RENAME_REPO: &str =
        "Rename the grammar directory to match the grammar name (e.g. tree-sitter-python)";

    /// Suggestion to accept a mismatched factory name.
    pub const ALLOW_MISMATCH: &str =
        "Pass --allow-name-mismatch to keep the name found in parser.c";

    /// Suggestion when the external binding generator fails.
    pub const CHECK_GENERATOR: &str =
        "Run the binding generator by hand with --verbose to see its output";

    /// Suggestion when no grammar repositories were passed.
    pub const ADD_GRAMMAR: &str = "Pass at least one grammar repository with --grammar <dir>";
}

/// An error report: message, where it happened, and what to try next.
#[derive(Debug, Clone, Default)]
pub struct Diagnostic {
    pub message: String,
    pub location: Option<PathBuf>,
    /// Lines printed under the location, each prefixed with `=`
    pub context: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            ..Diagnostic::default()
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Render for the terminal, with ANSI colors when `color` is set.
    pub fn format(&self, color: bool) -> String {
        let paint = |text: &str, code: &str| {
            if color {
                format!("\x1b[{}m{}\x1b[0m", code, text)
            } else {
                text.to_string()
            }
        };

        let mut output = format!("{}: {}\n", paint("error", "1;31"), self.message);
        if let Some(path) = &self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }
        for line in &self.context {
            output.push_str(&format!("  = {}\n", line));
        }
        if !self.suggestions.is_empty() {
            output.push_str(&format!("\n{}: consider:\n", paint("help", "1;32")));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }
        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_formatting() {
        let diag = Diagnostic::error("could not find `tree_sitter_json` in `src/parser.c`")
            .with_location("grammars/tree-sitter-json/src/parser.c")
            .with_context("the parser was not emitted in the shape this tool understands")
            .with_suggestion(suggestions::REGENERATE_GRAMMAR);

        let output = diag.format(false);
        assert!(output.starts_with("error: could not find `tree_sitter_json`"));
        assert!(output.contains("--> grammars/tree-sitter-json/src/parser.c"));
        assert!(output.contains("= the parser was not emitted"));
        assert!(output.contains("help: consider:"));
        assert!(output.contains("1. Regenerate the parser"));
    }

    #[test]
    fn test_plain_error_has_no_help_block() {
        let output = Diagnostic::error("no grammar repositories were given").format(false);
        assert_eq!(output, "error: no grammar repositories were given\n");
    }

    #[test]
    fn test_color_wraps_labels_only() {
        let output = Diagnostic::error("boom")
            .with_suggestion(suggestions::CHECK_PATHS)
            .format(true);
        assert!(output.starts_with("\x1b[1;31merror\x1b[0m: boom\n"));
        assert!(output.contains("\x1b[1;32mhelp\x1b[0m: consider:"));
    }
}
