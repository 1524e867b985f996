//! Fix-up pass for generated C# bindings.
//!
//! The binding generator emits `sbyte** FieldNames` and `SymbolNames`
//! getters as `return ((__Internal*)__Instance)->field_names;`, which does
//! not compile (CS0266: cannot implicitly convert `IntPtr` to `sbyte**`).
//! This pass adds the explicit cast.

use super::patterns::accessor_return;
use super::source::{lines_with_endings, LineEnding};

/// Comment written above every patched line.
pub const FIX_COMMENT: &str = "//UNTESTED FIX: Automatically added explicit cast to (sbyte**), \
otherwise \"Error CS0266 Cannot implicitly convert type 'System.IntPtr' to 'sbyte**'.\"";

/// Cast inserted right after `return`.
pub const POINTER_CAST: &str = "(sbyte**)";

/// Result of patching one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patched {
    pub text: String,
    pub patched_lines: usize,
}

/// Patch every accessor line in `text`.
///
/// A patched line carries the cast between `return` and the accessor, so it
/// no longer matches and a second pass leaves the text alone.
pub fn patch_bindings(text: &str) -> Patched {
    let newline = LineEnding::detect(text).as_str();
    let mut out = String::with_capacity(text.len());
    let mut patched_lines = 0;

    for line in lines_with_endings(text) {
        match accessor_return(line.content) {
            Some(accessor) => {
                out.push_str(accessor.indent);
                out.push_str(FIX_COMMENT);
                out.push_str(newline);
                out.push_str(&format!(
                    "{}return {}((__Internal*)__Instance)->{};{}",
                    accessor.indent, POINTER_CAST, accessor.field, accessor.trailing
                ));
                out.push_str(line.terminator);
                patched_lines += 1;
            }
            None => {
                out.push_str(line.content);
                out.push_str(line.terminator);
            }
        }
    }

    Patched {
        text: out,
        patched_lines,
    }
}

/// Patch several buffers independently.
pub fn patch_all<'a, I>(texts: I) -> Vec<Patched>
where
    I: IntoIterator<Item = &'a str>,
{
    texts.into_iter().map(patch_bindings).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GETTERS: &str = "\
            public sbyte** FieldNames
            {
                get
                {
                    return ((__Internal*)__Instance)->field_names;
                }
            }

            public uint FieldCount
            {
                get
                {
                    return ((__Internal*)__Instance)->field_count;
                }
            }
";

    #[test]
    fn test_field_names_getter_is_cast() {
        let result = patch_bindings(GETTERS);
        assert_eq!(result.patched_lines, 1);

        let indent = " ".repeat(20);
        let expected = format!(
            "{indent}{FIX_COMMENT}\n{indent}return (sbyte**)((__Internal*)__Instance)->field_names;\n"
        );
        assert!(result.text.contains(&expected));
        assert!(result
            .text
            .contains("return ((__Internal*)__Instance)->field_count;"));
    }

    #[test]
    fn test_symbol_names_case_insensitive() {
        let result = patch_bindings("return ((__INTERNAL*)__instance)->Symbol_Names;\n");
        assert_eq!(result.patched_lines, 1);
        assert_eq!(
            result.text,
            format!("{FIX_COMMENT}\nreturn (sbyte**)((__Internal*)__Instance)->Symbol_Names;\n")
        );
    }

    #[test]
    fn test_patch_is_idempotent() {
        let once = patch_bindings(GETTERS);
        let twice = patch_bindings(&once.text);
        assert_eq!(twice.patched_lines, 0);
        assert_eq!(twice.text, once.text);
        assert_eq!(twice.text.matches("UNTESTED FIX").count(), 1);
    }

    #[test]
    fn test_crlf_is_preserved() {
        let text = GETTERS.replace('\n', "\r\n");
        let result = patch_bindings(&text);
        assert_eq!(result.patched_lines, 1);
        assert!(!result.text.replace("\r\n", "").contains('\n'));
        assert!(result.text.contains("to 'sbyte**'.\"\r\n"));
    }

    #[test]
    fn test_similar_fields_are_untouched() {
        let text = "return ((__Internal*)__Instance)->field_names_count;\n\
                    return ((__Internal*)__Instance)->my_field_names;\n";
        let result = patch_bindings(text);
        assert_eq!(result.patched_lines, 0);
        assert_eq!(result.text, text);
    }

    #[test]
    fn test_patch_all_handles_each_buffer() {
        let a = "return ((__Internal*)__Instance)->field_names;\n";
        let b = "return ((__Internal*)__Instance)->symbol_names;\r\n";
        let results = patch_all([a, b, "// nothing\n"]);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].patched_lines, 1);
        assert!(results[1].text.ends_with("symbol_names;\r\n"));
        assert!(results[1].text.contains(".\"\r\n"));
        assert_eq!(results[2].patched_lines, 0);
    }
}
