//! Named shape predicates for the C and C# text the rewriter touches.
//!
//! None of this is a parser. Each pattern encodes one assumption about the
//! exact shape the tree-sitter generator (or the C# binding generator)
//! emits, so when that shape drifts the failure names the assumption that
//! broke.

use std::sync::LazyLock;

use regex::Regex;

/// Start of the trailing `extern "C"` block in a generated `parser.c`.
pub const CPLUSPLUS_GUARD: &str = "#ifdef __cplusplus";

/// Forward declaration for the lexer handle used by external scanners.
pub const LEXER_FORWARD_DECLARATION: &str = "typedef struct TSLexer TSLexer;";

/// Forward declaration for the language description returned by the factory.
pub const LANGUAGE_FORWARD_DECLARATION: &str = "typedef struct TSLanguage TSLanguage;";

/// Prefix shared by every grammar-generated function.
pub const GRAMMAR_FUNCTION_PREFIX: &str = "tree_sitter_";

/// `extern const TSLanguage *tree_sitter_<name>(void)`, capturing the full
/// function name.
static FACTORY_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"extern const TSLanguage \*(tree_sitter_\w+)\(void\)").unwrap()
});

/// `return &language;` followed by `}` on the next line.
static FACTORY_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"return &language;\r?\n\}").unwrap());

/// `#include ...`, case-insensitive, allowing whitespace around the `#`.
static INCLUDE_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[ \t]*#[ \t]*include\b").unwrap());

/// `return ((__Internal*)__Instance)->field_names;` or `symbol_names`.
static ACCESSOR_RETURN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^([ \t]*)return \(\(__Internal\*\)__Instance\)->(symbol_names|field_names);(.*)$",
    )
    .unwrap()
});

pub fn factory_signature() -> &'static Regex {
    &FACTORY_SIGNATURE
}

pub fn factory_end() -> &'static Regex {
    &FACTORY_END
}

/// True for a line holding an `#include` directive.
pub fn is_include_line(line: &str) -> bool {
    INCLUDE_DIRECTIVE.is_match(line)
}

/// True for a line that already starts with `macro_name` followed by a space.
pub fn has_export_prefix(line: &str, macro_name: &str) -> bool {
    line.strip_prefix(macro_name)
        .is_some_and(|rest| rest.starts_with(' '))
}

/// True for a `#define <macro_name>` line.
pub fn defines_macro(line: &str, macro_name: &str) -> bool {
    let Some(rest) = line.trim_start().strip_prefix('#') else {
        return false;
    };
    let Some(rest) = rest.trim_start().strip_prefix("define") else {
        return false;
    };
    if !rest.starts_with(is_blank) {
        return false;
    }
    let rest = rest.trim_start();
    rest.strip_prefix(macro_name).is_some_and(|tail| {
        tail.is_empty() || tail.starts_with(is_blank) || tail.starts_with('(')
    })
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// A C# accessor line that needs an explicit `(sbyte**)` cast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorReturn<'a> {
    pub indent: &'a str,
    pub field: &'a str,
    pub trailing: &'a str,
}

/// Match a C# `return ((__Internal*)__Instance)->field_names;` line.
pub fn accessor_return(line: &str) -> Option<AccessorReturn<'_>> {
    let caps = ACCESSOR_RETURN.captures(line)?;
    Some(AccessorReturn {
        indent: caps.get(1).map_or("", |m| m.as_str()),
        field: caps.get(2).map_or("", |m| m.as_str()),
        trailing: caps.get(3).map_or("", |m| m.as_str()),
    })
}

/// Line rule for exported function declarations.
///
/// A declaration line is one or more return-type words, an optional
/// pointer marker, then a function name starting with the rule's prefix,
/// then either `(...);` or a bare `(` that continues on the next line.
/// The match is anchored at both ends of the line so it never fires
/// inside a parameter list, a comment, or an indented body.
#[derive(Debug, Clone)]
pub struct DeclarationRule {
    prefix: String,
    declaration: Regex,
}

impl DeclarationRule {
    /// Build the rule for functions named `<prefix>...`.
    pub fn for_prefix(prefix: &str) -> Result<Self, regex::Error> {
        let pattern = format!(
            r"^(?:\w+[ \t]+)*\w+(?:[ \t]*\*+[ \t]*|[ \t]+){}\w*\((?:.*\);)?[ \t]*\r?$",
            regex::escape(prefix)
        );
        Ok(DeclarationRule {
            prefix: prefix.to_string(),
            declaration: Regex::new(&pattern)?,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// True when `line` is the first line of a matching declaration.
    pub fn is_declaration(&self, line: &str) -> bool {
        if line.split_whitespace().next() == Some("return") {
            return false;
        }
        self.declaration.is_match(line)
    }

    /// True for the line the export macro block goes in front of.
    pub fn is_anchor(&self, line: &str) -> bool {
        is_include_line(line)
    }
}
