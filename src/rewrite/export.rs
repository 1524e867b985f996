//! Export annotation for C headers.
//!
//! Two rewrites run over the same buffer: a conditional definition of the
//! export macro goes in front of the first `#include`, and every line that
//! starts a matching function declaration gets the macro as a prefix. Both
//! are no-ops on a header that was already annotated.

use super::patterns::{defines_macro, has_export_prefix, DeclarationRule};
use super::source::{lines_with_endings, LineEnding};
use crate::core::errors::PatternError;
use crate::util::config::ExportConfig;

/// The export macro and the defines that switch it on and off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportMacro {
    pub name: String,
    pub enable_define: String,
    pub disable_define: String,
    pub windows_attribute: String,
    pub unix_attribute: String,
}

impl Default for ExportMacro {
    fn default() -> Self {
        ExportMacro::from(&ExportConfig::default())
    }
}

impl From<&ExportConfig> for ExportMacro {
    fn from(config: &ExportConfig) -> Self {
        ExportMacro {
            name: config.macro_name.clone(),
            enable_define: config.enable_define.clone(),
            disable_define: config.disable_define.clone(),
            windows_attribute: config.windows_attribute.clone(),
            unix_attribute: config.unix_attribute.clone(),
        }
    }
}

impl ExportMacro {
    /// The preprocessor block defining the macro, one line per `newline`.
    pub fn definition_block(&self, newline: &str) -> String {
        let lines = [
            format!(
                "#if defined({}) && !defined({})",
                self.enable_define, self.disable_define
            ),
            "#  if defined(_WIN32)".to_string(),
            format!("#    define {} {}", self.name, self.windows_attribute),
            "#  else".to_string(),
            format!("#    define {} {}", self.name, self.unix_attribute),
            "#  endif".to_string(),
            "#else".to_string(),
            format!("#  define {}", self.name),
            "#endif".to_string(),
        ];

        let mut block = String::new();
        for line in lines {
            block.push_str(&line);
            block.push_str(newline);
        }
        block
    }
}

/// Where the macro block goes when the header has no `#include`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingAnchor {
    /// Leave the header without a macro definition.
    #[default]
    Skip,
    /// Insert the block before the first declaration that gets prefixed.
    BeforeFirstDeclaration,
}

/// Result of annotating one header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotated {
    pub text: String,
    pub macro_inserted: bool,
    pub prefixed: usize,
}

impl Annotated {
    pub fn changed(&self) -> bool {
        self.macro_inserted || self.prefixed > 0
    }
}

/// Export annotator for one function prefix.
#[derive(Debug, Clone)]
pub struct Annotator {
    export: ExportMacro,
    rule: DeclarationRule,
    missing_anchor: MissingAnchor,
}

impl Annotator {
    pub fn new(export: ExportMacro, function_prefix: &str) -> Result<Self, PatternError> {
        let rule =
            DeclarationRule::for_prefix(function_prefix).map_err(|e| PatternError::InvalidPrefix {
                prefix: function_prefix.to_string(),
                message: e.to_string(),
            })?;
        Ok(Annotator {
            export,
            rule,
            missing_anchor: MissingAnchor::Skip,
        })
    }

    pub fn with_missing_anchor(mut self, policy: MissingAnchor) -> Self {
        self.missing_anchor = policy;
        self
    }

    pub fn export_macro(&self) -> &ExportMacro {
        &self.export
    }

    fn needs_prefix(&self, line: &str) -> bool {
        !has_export_prefix(line, &self.export.name) && self.rule.is_declaration(line)
    }

    /// Annotate a whole header.
    pub fn annotate(&self, text: &str) -> Annotated {
        let newline = LineEnding::detect(text).as_str();
        let lines: Vec<_> = lines_with_endings(text).collect();

        let already_defined = lines
            .iter()
            .any(|line| defines_macro(line.content, &self.export.name));

        let anchor = if already_defined {
            None
        } else {
            lines
                .iter()
                .position(|line| self.rule.is_anchor(line.content))
                .or_else(|| match self.missing_anchor {
                    MissingAnchor::Skip => None,
                    MissingAnchor::BeforeFirstDeclaration => lines
                        .iter()
                        .position(|line| self.needs_prefix(line.content)),
                })
        };

        let block = self.export.definition_block(newline);
        let mut out = String::with_capacity(text.len() + block.len());
        let mut prefixed = 0;

        for (i, line) in lines.iter().enumerate() {
            if anchor == Some(i) {
                out.push_str(&block);
            }
            if self.needs_prefix(line.content) {
                out.push_str(&self.export.name);
                out.push(' ');
                prefixed += 1;
            }
            out.push_str(line.content);
            out.push_str(line.terminator);
        }

        Annotated {
            text: out,
            macro_inserted: anchor.is_some(),
            prefixed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const API_HEADER: &str = "\
#ifndef TREE_SITTER_API_H_
#define TREE_SITTER_API_H_

#include <stdbool.h>
#include <stdint.h>

typedef struct TSLanguage TSLanguage;
typedef struct TSParser TSParser;

// Create a new parser.
TSParser *ts_parser_new(void);

const char *ts_language_field_name_for_id(const TSLanguage *, TSFieldId);

TSTree *ts_parser_parse(
  TSParser *self,
  const TSTree *old_tree,
  TSInput input
);

#endif  // TREE_SITTER_API_H_
";

    fn annotator() -> Annotator {
        Annotator::new(ExportMacro::default(), "ts_").unwrap()
    }

    #[test]
    fn test_prefixes_every_declaration() {
        let result = annotator().annotate(API_HEADER);
        assert_eq!(result.prefixed, 3);
        assert!(result.text.contains("\nDllExport TSParser *ts_parser_new(void);\n"));
        assert!(result.text.contains(
            "\nDllExport const char *ts_language_field_name_for_id(const TSLanguage *, TSFieldId);\n"
        ));
        assert!(result.text.contains("\nDllExport TSTree *ts_parser_parse(\n  TSParser *self,\n"));
        assert!(result.text.contains("\ntypedef struct TSLanguage TSLanguage;\n"));
        assert!(result.text.contains("\n// Create a new parser.\n"));
    }

    #[test]
    fn test_macro_block_before_first_include() {
        let result = annotator().annotate(API_HEADER);
        assert!(result.macro_inserted);

        let block = ExportMacro::default().definition_block("\n");
        let expected = format!(
            "#define TREE_SITTER_API_H_\n\n{}#include <stdbool.h>\n#include <stdint.h>\n",
            block
        );
        assert!(result.text.contains(&expected));
        assert_eq!(result.text.matches("#  define DllExport\n").count(), 1);
    }

    #[test]
    fn test_definition_block_shape() {
        let block = ExportMacro::default().definition_block("\n");
        assert!(block.starts_with(
            "#if defined(TREE_SITTER_EXPORTS) && !defined(TREE_SITTER_NO_EXPORT)\n"
        ));
        assert!(block.contains("#    define DllExport __declspec(dllexport)\n"));
        assert!(block.contains("#    define DllExport __attribute__((visibility(\"default\")))\n"));
        assert!(block.ends_with("#else\n#  define DllExport\n#endif\n"));
    }

    #[test]
    fn test_annotate_is_idempotent() {
        let once = annotator().annotate(API_HEADER);
        let twice = annotator().annotate(&once.text);
        assert_eq!(twice.text, once.text);
        assert!(!twice.changed());
        assert!(!twice.text.contains("DllExport DllExport"));
    }

    #[test]
    fn test_header_without_includes_or_declarations_is_unchanged() {
        let text = "// nothing here\ntypedef int TSSymbol;\n";
        let result = annotator().annotate(text);
        assert_eq!(result.text, text);
        assert!(!result.changed());
    }

    #[test]
    fn test_header_without_include_still_prefixes() {
        let text = "typedef struct TSParser TSParser;\nvoid ts_parser_reset(TSParser *self);\n";
        let result = annotator().annotate(text);
        assert!(!result.macro_inserted);
        assert_eq!(
            result.text,
            "typedef struct TSParser TSParser;\nDllExport void ts_parser_reset(TSParser *self);\n"
        );
    }

    #[test]
    fn test_missing_anchor_falls_back_to_first_declaration() {
        let text = "\
typedef struct TSLanguage TSLanguage;
#ifdef __cplusplus
extern \"C\" {
#endif
extern const TSLanguage *tree_sitter_json(void);
";
        let result = Annotator::new(ExportMacro::default(), "tree_sitter_")
            .unwrap()
            .with_missing_anchor(MissingAnchor::BeforeFirstDeclaration)
            .annotate(text);

        assert!(result.macro_inserted);
        let block = ExportMacro::default().definition_block("\n");
        assert!(result.text.contains(&format!(
            "#endif\n{}DllExport extern const TSLanguage *tree_sitter_json(void);\n",
            block
        )));
    }

    #[test]
    fn test_crlf_header_gets_crlf_insertions() {
        let text = API_HEADER.replace('\n', "\r\n");
        let result = annotator().annotate(&text);
        assert!(result.macro_inserted);
        assert!(result.text.contains("#  define DllExport\r\n#endif\r\n#include <stdbool.h>\r\n"));
        assert!(result.text.contains("DllExport TSParser *ts_parser_new(void);\r\n"));
        assert!(!result.text.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn test_custom_macro_name() {
        let export = ExportMacro {
            name: "TS_API".to_string(),
            ..ExportMacro::default()
        };
        let result = Annotator::new(export, "ts_")
            .unwrap()
            .annotate("#include <stdint.h>\nvoid ts_tree_delete(TSTree *self);\n");
        assert!(result.text.contains("#    define TS_API __declspec(dllexport)\n"));
        assert!(result.text.ends_with("TS_API void ts_tree_delete(TSTree *self);\n"));
    }
}
