//! Error types for header generation.
//!
//! Two families of failure exist: the repository layout does not look like
//! a tree-sitter checkout ([`PathError`]), or a file does not have the shape
//! the generator emits ([`PatternError`]). Neither is transient, so nothing
//! here is retried.

use std::io;
use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// The repository layout is not what discovery expects.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("could not find directory `{}`", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("could not find file `{}`", .0.display())]
    FileNotFound(PathBuf),

    #[error("could not find any C headers in `{}`", .0.display())]
    HeadersNotFound(PathBuf),

    #[error("could not find any C source files in `{}`", .0.display())]
    SourceFilesNotFound(PathBuf),

    #[error("could not find any libraries in `{}`", .0.display())]
    LibrariesNotFound(PathBuf),

    #[error("`{}` does not give a C identifier as module name", .0.display())]
    InvalidModuleName(PathBuf),
}

impl PathError {
    /// The path the error is about.
    pub fn path(&self) -> &PathBuf {
        match self {
            PathError::DirectoryNotFound(p)
            | PathError::FileNotFound(p)
            | PathError::HeadersNotFound(p)
            | PathError::SourceFilesNotFound(p)
            | PathError::LibrariesNotFound(p)
            | PathError::InvalidModuleName(p) => p,
        }
    }
}

/// A source file does not have the shape the scanner relies on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("marker {marker} not found in `{}`", file.display())]
    MarkerNotFound { marker: String, file: PathBuf },

    #[error("could not find `{expected}` in `{}`", file.display())]
    FactoryNotFound { expected: String, file: PathBuf },

    #[error("could not find the end of `{expected}` in `{}`", file.display())]
    FactoryEndNotFound { expected: String, file: PathBuf },

    #[error("expected `{expected}` in `{}` but found `{found}`", file.display())]
    FactoryNameMismatch {
        expected: String,
        found: String,
        file: PathBuf,
    },

    #[error("`{prefix}` is not a usable function prefix: {message}")]
    InvalidPrefix { prefix: String, message: String },
}

impl PatternError {
    pub fn file(&self) -> Option<&PathBuf> {
        match self {
            PatternError::MarkerNotFound { file, .. }
            | PatternError::FactoryNotFound { file, .. }
            | PatternError::FactoryEndNotFound { file, .. }
            | PatternError::FactoryNameMismatch { file, .. } => Some(file),
            PatternError::InvalidPrefix { .. } => None,
        }
    }
}

/// Any failure of a generation stage.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum GenerateError {
    #[error("problem with the layout of `{}`: {source}", repo.display())]
    #[diagnostic(code(tsheader::path::layout))]
    Layout {
        repo: PathBuf,
        #[source]
        source: PathError,
    },

    #[error("could not find {file_name} in `{}`", dir.display())]
    #[diagnostic(
        code(tsheader::path::parser_missing),
        help("tree-sitter grammars keep their generated parser in src/; run `tree-sitter generate` first")
    )]
    ParserFileNotFound { file_name: String, dir: PathBuf },

    #[error(transparent)]
    #[diagnostic(code(tsheader::pattern::shape))]
    Pattern(#[from] PatternError),

    #[error("failed to create output directory `{}`", path.display())]
    #[diagnostic(code(tsheader::io::create_dir))]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create smoke-test directory `{}`", path.display())]
    #[diagnostic(code(tsheader::io::create_smoke_dir))]
    CreateSmokeTestDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to {action} `{}`", path.display())]
    #[diagnostic(code(tsheader::io))]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("binding generation failed for `{module}`: {message}")]
    #[diagnostic(code(tsheader::bindings))]
    BindingGeneration { module: String, message: String },

    #[error("failed to find the tree-sitter repository at `{}`", .0.display())]
    #[diagnostic(code(tsheader::path::root_missing))]
    RootRepoNotFound(PathBuf),

    #[error("no grammar repositories were given")]
    #[diagnostic(
        code(tsheader::path::no_grammars),
        help("pass at least one --grammar <dir>, e.g. a tree-sitter-python checkout")
    )]
    MissingGrammars,

    #[error("`{}` gives module name `{module}`, already taken by `{}`", repo.display(), first.display())]
    #[diagnostic(code(tsheader::path::duplicate_module))]
    DuplicateModule {
        module: String,
        repo: PathBuf,
        first: PathBuf,
    },

    #[error("{failed} of {total} grammar modules failed")]
    #[diagnostic(code(tsheader::modules_failed))]
    ModulesFailed {
        failed: usize,
        total: usize,
        exit_code: i32,
    },
}

impl GenerateError {
    pub fn layout(repo: impl Into<PathBuf>, source: PathError) -> Self {
        GenerateError::Layout {
            repo: repo.into(),
            source,
        }
    }

    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        GenerateError::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Process exit status for this failure category.
    pub fn exit_code(&self) -> i32 {
        match self {
            GenerateError::Layout { .. } | GenerateError::DuplicateModule { .. } => 2,
            GenerateError::CreateDirectory { .. } => 3,
            GenerateError::BindingGeneration { .. } => 5,
            GenerateError::RootRepoNotFound(_) => 7,
            GenerateError::MissingGrammars => 8,
            GenerateError::ParserFileNotFound { .. } => 9,
            GenerateError::Pattern(PatternError::FactoryNameMismatch { .. }) => 12,
            GenerateError::Pattern(_) => 10,
            GenerateError::CreateSmokeTestDirectory { .. } => 11,
            GenerateError::Io { .. } => 1,
            GenerateError::ModulesFailed { exit_code, .. } => *exit_code,
        }
    }

    /// Convert to a user-facing diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self {
            GenerateError::Layout { source, .. } => {
                let diag = diag.with_location(source.path());
                match source {
                    PathError::SourceFilesNotFound(_) => diag.with_suggestion(suggestions::NO_SOURCES),
                    PathError::HeadersNotFound(_) => diag.with_suggestion(suggestions::NO_HEADERS),
                    PathError::InvalidModuleName(_) => diag.with_suggestion(suggestions::RENAME_REPO),
                    _ => diag.with_suggestion(suggestions::CHECK_PATHS),
                }
            }
            GenerateError::ParserFileNotFound { dir, .. } => diag
                .with_location(dir)
                .with_suggestion(suggestions::REGENERATE_GRAMMAR),
            GenerateError::Pattern(err) => {
                let diag = match err.file() {
                    Some(file) => diag.with_location(file),
                    None => diag,
                };
                match err {
                    PatternError::FactoryNameMismatch { .. } => diag
                        .with_context("the repository directory name decides the expected factory name")
                        .with_suggestion(suggestions::RENAME_REPO)
                        .with_suggestion(suggestions::ALLOW_MISMATCH),
                    PatternError::InvalidPrefix { .. } => diag,
                    _ => diag
                        .with_context("the parser was not emitted in the shape this tool understands")
                        .with_suggestion(suggestions::REGENERATE_GRAMMAR),
                }
            }
            GenerateError::CreateDirectory { path, source }
            | GenerateError::CreateSmokeTestDirectory { path, source } => diag
                .with_location(path)
                .with_context(source.to_string()),
            GenerateError::Io { path, source, .. } => {
                diag.with_location(path).with_context(source.to_string())
            }
            GenerateError::BindingGeneration { .. } => {
                diag.with_suggestion(suggestions::CHECK_GENERATOR)
            }
            GenerateError::RootRepoNotFound(path) => diag
                .with_location(path)
                .with_suggestion(suggestions::CHECK_PATHS),
            GenerateError::MissingGrammars => diag.with_suggestion(suggestions::ADD_GRAMMAR),
            GenerateError::DuplicateModule { repo, .. } => diag
                .with_location(repo)
                .with_context("each module is written to its own <headers>/<module>/ directory")
                .with_suggestion(suggestions::RENAME_REPO),
            GenerateError::ModulesFailed { .. } => diag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_per_category() {
        let errors = [
            GenerateError::layout("repo", PathError::DirectoryNotFound("repo".into())),
            GenerateError::CreateDirectory {
                path: "out".into(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            },
            GenerateError::BindingGeneration {
                module: "tree_sitter".into(),
                message: "boom".into(),
            },
            GenerateError::RootRepoNotFound("ts".into()),
            GenerateError::MissingGrammars,
            GenerateError::ParserFileNotFound {
                file_name: "parser.c".into(),
                dir: "src".into(),
            },
            GenerateError::Pattern(PatternError::FactoryNotFound {
                expected: "tree_sitter_json".into(),
                file: "parser.c".into(),
            }),
            GenerateError::CreateSmokeTestDirectory {
                path: "smoke".into(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            },
            GenerateError::Pattern(PatternError::FactoryNameMismatch {
                expected: "tree_sitter_json".into(),
                found: "tree_sitter_yaml".into(),
                file: "parser.c".into(),
            }),
        ];

        let mut codes: Vec<i32> = errors.iter().map(|e| e.exit_code()).collect();
        assert!(codes.iter().all(|c| *c != 0));
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_pattern_diagnostic_names_file_and_marker() {
        let err = GenerateError::from(PatternError::MarkerNotFound {
            marker: "`#ifdef __cplusplus`".into(),
            file: "grammar/src/parser.c".into(),
        });
        let output = err.to_diagnostic().format(false);
        assert!(output.contains("#ifdef __cplusplus"));
        assert!(output.contains("--> grammar/src/parser.c"));
        assert!(output.contains("help: consider:"));
    }
}
