//! Headers for grammar modules.
//!
//! A grammar ships `src/parser.c` and no header. The declarations at the
//! tail of the parser are cut out, written as `<module>/<module>.h` and
//! marked for export.

use std::path::{Path, PathBuf};

use crate::core::errors::{GenerateError, PatternError};
use crate::core::module::LanguageModule;
use crate::rewrite::excise::{extract_declarations, NameCheck};
use crate::rewrite::export::{Annotator, ExportMacro, MissingAnchor};
use crate::rewrite::header::{synthesize, ExtractedHeader};
use crate::rewrite::patterns::GRAMMAR_FUNCTION_PREFIX;
use crate::rewrite::source::SourceBuffer;
use crate::util::config::Config;
use crate::util::fs::{read_text, rewrite_in_place};

/// Output of the language stage for one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageHeader {
    pub module_name: String,
    pub header_path: PathBuf,
    pub exported: usize,
}

/// Annotator for grammar headers.
///
/// Synthesized headers carry no `#include`, so the macro block goes in
/// front of the first exported declaration instead.
pub fn language_annotator(config: &Config) -> Result<Annotator, PatternError> {
    Ok(
        Annotator::new(ExportMacro::from(&config.export), GRAMMAR_FUNCTION_PREFIX)?
            .with_missing_anchor(MissingAnchor::BeforeFirstDeclaration),
    )
}

/// Provenance path: the repository directory name followed by the parser's
/// path inside the repository.
fn provenance_path(module: &LanguageModule, parser_file: &Path) -> PathBuf {
    let relative = parser_file
        .strip_prefix(module.repo_path())
        .unwrap_or(parser_file);
    match module.repo_path().file_name() {
        Some(repo_name) => Path::new(repo_name).join(relative),
        None => relative.to_path_buf(),
    }
}

/// Build the header text for a module without touching the output tree.
pub fn extract_header(module: &LanguageModule, config: &Config) -> Result<ExtractedHeader, GenerateError> {
    let parser_file = module.parser_file(&config.layout)?;
    let source = SourceBuffer::new(read_text(parser_file)?);

    let check = if config.generate.allow_name_mismatch {
        NameCheck::Warn
    } else {
        NameCheck::Strict
    };

    let declarations = extract_declarations(&source, &module.factory_name(), check, parser_file)?;

    Ok(synthesize(
        module.module_name(),
        &provenance_path(module, parser_file),
        &declarations,
        source.line_ending(),
    ))
}

/// Write the header as extracted, without the export macro.
///
/// Returns the path of `<headers_out>/<module>/<module>.h`.
pub fn write_language_header(
    module: &LanguageModule,
    headers_out: &Path,
    config: &Config,
) -> Result<PathBuf, GenerateError> {
    extract_header(module, config)?.write(headers_out)
}

/// Add the export macro to a header written by [`write_language_header`].
pub fn annotate_language_header(
    module: &LanguageModule,
    header_path: PathBuf,
    annotator: &Annotator,
) -> Result<LanguageHeader, GenerateError> {
    let mut exported = 0;
    rewrite_in_place(&header_path, |text| {
        let annotated = annotator.annotate(text);
        exported = annotated.prefixed;
        annotated.text
    })?;

    tracing::info!(
        "generated {} ({} exported declaration(s))",
        header_path.display(),
        exported
    );

    Ok(LanguageHeader {
        module_name: module.module_name().to_string(),
        header_path,
        exported,
    })
}

/// Write and annotate the header for a discovered module.
pub fn generate_language_header(
    module: &LanguageModule,
    headers_out: &Path,
    config: &Config,
) -> Result<LanguageHeader, GenerateError> {
    let annotator = language_annotator(config)?;
    let header_path = write_language_header(module, headers_out, config)?;
    annotate_language_header(module, header_path, &annotator)
}

/// Discover a grammar repository and generate its header.
pub fn process_grammar(
    repo: &Path,
    headers_out: &Path,
    config: &Config,
) -> Result<LanguageHeader, GenerateError> {
    let module = LanguageModule::discover(repo).map_err(|e| GenerateError::layout(repo, e))?;
    tracing::debug!(
        "{}: {} source file(s) in {}",
        module.module_name(),
        module.source_files().len(),
        module.source_path().display()
    );
    generate_language_header(&module, headers_out, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn parser_c(name: &str, newline: &str) -> String {
        [
            "#include \"tree_sitter/parser.h\"",
            "",
            "static const char * const ts_symbol_names[] = {",
            "  [ts_builtin_sym_end] = \"end\",",
            "};",
            "",
            "#ifdef __cplusplus",
            "extern \"C\" {",
            "#endif",
            &format!("void *tree_sitter_{}_external_scanner_create(void);", name),
            "",
            &format!("extern const TSLanguage *tree_sitter_{}(void) {{", name),
            "  static const TSLanguage language = {",
            "    .version = LANGUAGE_VERSION,",
            "  };",
            "  return &language;",
            "}",
            "#ifdef __cplusplus",
            "}",
            "#endif",
            "",
        ]
        .join(newline)
    }

    fn grammar_repo(tmp: &TempDir, dir: &str, name: &str, newline: &str) -> PathBuf {
        let repo = tmp.path().join(dir);
        fs::create_dir_all(repo.join("src")).unwrap();
        fs::write(repo.join("src/parser.c"), parser_c(name, newline)).unwrap();
        repo
    }

    #[test]
    fn test_process_grammar() {
        let tmp = TempDir::new().unwrap();
        let repo = grammar_repo(&tmp, "tree-sitter-json-src", "json", "\n");
        let out = tmp.path().join("headers");

        let header = process_grammar(&repo, &out, &Config::default()).unwrap();
        assert_eq!(header.module_name, "tree_sitter_json");
        assert_eq!(header.header_path, out.join("tree_sitter_json/tree_sitter_json.h"));
        assert_eq!(header.exported, 2);

        let text = fs::read_to_string(&header.header_path).unwrap();
        assert!(text.starts_with("//Generated from tree-sitter-json-src/src/parser.c\n\n"));
        assert!(text.contains("typedef struct TSLexer TSLexer;\ntypedef struct TSLanguage TSLanguage;\n"));
        assert!(text.contains("#if defined(TREE_SITTER_EXPORTS) && !defined(TREE_SITTER_NO_EXPORT)"));
        assert!(text.contains("DllExport extern const TSLanguage *tree_sitter_json(void);\n"));
        assert!(text.contains("DllExport void *tree_sitter_json_external_scanner_create(void);"));
        assert!(!text.contains("return &language;"));
        assert!(!text.contains("ts_symbol_names"));

        let block = text.find("#if defined(TREE_SITTER_EXPORTS)").unwrap();
        let first_decl = text.find("DllExport void").unwrap();
        assert!(block < first_decl);
    }

    #[test]
    fn test_crlf_parser_gives_crlf_header() {
        let tmp = TempDir::new().unwrap();
        let repo = grammar_repo(&tmp, "tree-sitter-json", "json", "\r\n");
        let out = tmp.path().join("headers");

        let header = process_grammar(&repo, &out, &Config::default()).unwrap();
        let text = fs::read_to_string(&header.header_path).unwrap();
        assert!(text.contains("extern const TSLanguage *tree_sitter_json(void);\r\n"));
        assert_eq!(text.matches('\n').count(), text.matches("\r\n").count());
    }

    #[test]
    fn test_rerun_is_stable() {
        let tmp = TempDir::new().unwrap();
        let repo = grammar_repo(&tmp, "tree-sitter-json", "json", "\n");
        let out = tmp.path().join("headers");

        let first = process_grammar(&repo, &out, &Config::default()).unwrap();
        let text = fs::read_to_string(&first.header_path).unwrap();
        process_grammar(&repo, &out, &Config::default()).unwrap();
        assert_eq!(fs::read_to_string(&first.header_path).unwrap(), text);
        assert_eq!(text.matches("#if defined(TREE_SITTER_EXPORTS)").count(), 1);
    }

    #[test]
    fn test_name_mismatch() {
        let tmp = TempDir::new().unwrap();
        let repo = grammar_repo(&tmp, "tree-sitter-json", "yaml", "\n");
        let out = tmp.path().join("headers");

        let err = process_grammar(&repo, &out, &Config::default()).unwrap_err();
        assert_eq!(err.exit_code(), 12);
        assert!(!out.join("tree_sitter_json").exists());

        let mut config = Config::default();
        config.generate.allow_name_mismatch = true;
        let header = process_grammar(&repo, &out, &config).unwrap();
        let text = fs::read_to_string(header.header_path).unwrap();
        assert!(text.contains("DllExport extern const TSLanguage *tree_sitter_yaml(void);"));
    }

    #[test]
    fn test_written_header_is_unannotated() {
        let tmp = TempDir::new().unwrap();
        let repo = grammar_repo(&tmp, "tree-sitter-json", "json", "\n");
        let out = tmp.path().join("headers");
        let module = LanguageModule::discover(&repo).unwrap();
        let config = Config::default();

        let path = write_language_header(&module, &out, &config).unwrap();
        let plain = fs::read_to_string(&path).unwrap();
        assert!(!plain.contains("DllExport"));
        assert!(plain.contains("\nextern const TSLanguage *tree_sitter_json(void);\n"));

        let header =
            annotate_language_header(&module, path, &language_annotator(&config).unwrap()).unwrap();
        assert_eq!(header.exported, 2);
        let annotated = fs::read_to_string(&header.header_path).unwrap();
        assert!(annotated.contains("DllExport extern const TSLanguage *tree_sitter_json(void);"));
    }

    #[test]
    fn test_missing_marker() {
        let tmp = TempDir::new().unwrap();
        let repo = tmp.path().join("tree-sitter-json");
        fs::create_dir_all(repo.join("src")).unwrap();
        fs::write(repo.join("src/parser.c"), "int main(void) { return 0; }\n").unwrap();

        let err = process_grammar(&repo, &tmp.path().join("headers"), &Config::default()).unwrap_err();
        assert_eq!(err.exit_code(), 10);
        assert!(err.to_string().contains("#ifdef __cplusplus"));
    }

    #[test]
    fn test_missing_repository() {
        let tmp = TempDir::new().unwrap();
        let err = process_grammar(
            &tmp.path().join("tree-sitter-gone"),
            &tmp.path().join("headers"),
            &Config::default(),
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
