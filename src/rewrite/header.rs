//! Header synthesis.

use std::path::{Path, PathBuf};

use super::source::LineEnding;
use crate::core::errors::GenerateError;
use crate::util::fs::{ensure_dir_for_module, write_text};

/// A header produced from a grammar's parser source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedHeader {
    pub module_name: String,
    pub source_path: PathBuf,
    pub text: String,
}

impl ExtractedHeader {
    /// `<output_root>/<module>/<module>.h`
    pub fn output_path(&self, output_root: &Path) -> PathBuf {
        header_output_path(output_root, &self.module_name)
    }

    /// Write the header, creating its module directory.
    pub fn write(&self, output_root: &Path) -> Result<PathBuf, GenerateError> {
        let dir = ensure_dir_for_module(output_root, &self.module_name)?;
        let path = dir.join(format!("{}.h", self.module_name));
        write_text(&path, &self.text)?;
        Ok(path)
    }
}

/// `<output_root>/<module>/<module>.h`
pub fn header_output_path(output_root: &Path, module_name: &str) -> PathBuf {
    output_root
        .join(module_name)
        .join(format!("{}.h", module_name))
}

/// The provenance comment, with `\` turned into `/` on every platform.
pub fn provenance_comment(source_path: &Path) -> String {
    format!(
        "//Generated from {}",
        source_path.to_string_lossy().replace('\\', "/")
    )
}

/// Prefix declaration-only text with a provenance comment and blank line.
pub fn synthesize(
    module_name: &str,
    source_path: &Path,
    declarations: &str,
    line_ending: LineEnding,
) -> ExtractedHeader {
    let newline = line_ending.as_str();
    let text = format!(
        "{}{}{}{}",
        provenance_comment(source_path),
        newline,
        newline,
        declarations
    );

    ExtractedHeader {
        module_name: module_name.to_string(),
        source_path: source_path.to_path_buf(),
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::module::expected_factory_name;
    use crate::rewrite::excise::{excise, forward_declarations, locate_factory, NameCheck};
    use crate::rewrite::source::SourceBuffer;
    use tempfile::TempDir;

    #[test]
    fn test_factory_with_brace_on_next_line() {
        let parser = "extern const TSLanguage *tree_sitter_python(void)\n{\n  static const TSLanguage language = {};\n  return &language;\n}\n";
        let buffer = SourceBuffer::new(parser);
        let file = Path::new("tree-sitter-python/src/parser.c");

        let factory = locate_factory(
            &buffer,
            &expected_factory_name("python"),
            NameCheck::Strict,
            file,
        )
        .unwrap();
        assert_eq!(factory.name, "tree_sitter_python");

        let declarations = format!(
            "{}{}{}",
            forward_declarations(buffer.newline()),
            buffer.newline(),
            excise(&buffer, factory.span, &factory.signature)
        );
        let header = synthesize("tree_sitter_python", file, &declarations, buffer.line_ending());

        assert_eq!(
            header.text,
            "//Generated from tree-sitter-python/src/parser.c\n\n\
typedef struct TSLexer TSLexer;\n\
typedef struct TSLanguage TSLanguage;\n\n\
extern const TSLanguage *tree_sitter_python(void);\n\n"
        );
    }

    #[test]
    fn test_provenance_uses_forward_slashes() {
        let comment = provenance_comment(Path::new(r"C:\repos\tree-sitter-python\src\parser.c"));
        assert_eq!(
            comment,
            "//Generated from C:/repos/tree-sitter-python/src/parser.c"
        );
    }

    #[test]
    fn test_synthesize_layout() {
        let header = synthesize(
            "tree_sitter_json",
            Path::new("grammars/tree-sitter-json/src/parser.c"),
            "typedef struct TSLexer TSLexer;\r\n",
            LineEnding::CrLf,
        );
        assert_eq!(
            header.text,
            "//Generated from grammars/tree-sitter-json/src/parser.c\r\n\r\ntypedef struct TSLexer TSLexer;\r\n"
        );
    }

    #[test]
    fn test_write_creates_module_directory() {
        let tmp = TempDir::new().unwrap();
        let header = synthesize("tree_sitter_json", Path::new("parser.c"), "x\n", LineEnding::Lf);

        let path = header.write(tmp.path()).unwrap();
        assert_eq!(path, tmp.path().join("tree_sitter_json/tree_sitter_json.h"));
        assert_eq!(path, header.output_path(tmp.path()));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "//Generated from parser.c\n\nx\n"
        );
    }
}
