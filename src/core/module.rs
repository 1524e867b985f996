//! Repository discovery for the tree-sitter library and its grammars.

use std::path::{Path, PathBuf};

use crate::core::errors::{GenerateError, PathError};
use crate::rewrite::patterns::GRAMMAR_FUNCTION_PREFIX;
use crate::util::config::LayoutConfig;
use crate::util::fs::{find_files, C_HEADER_EXTENSIONS, C_SOURCE_EXTENSIONS};

/// Suffix CMake's FetchContent appends to checkout directories.
const FETCH_CONTENT_SUFFIX: &str = "-src";

/// Derive a module name from a repository directory name.
///
/// Every trailing `-src` is stripped (case-insensitively) and every `-`
/// becomes `_`, so `tree-sitter-python-src` and `tree-sitter-python` both
/// give `tree_sitter_python`.
pub fn module_name_from_dir(dir_name: &str) -> String {
    let mut name = dir_name;
    while name.len() >= FETCH_CONTENT_SUFFIX.len() {
        let split = name.len() - FETCH_CONTENT_SUFFIX.len();
        match name.get(split..) {
            Some(tail) if tail.eq_ignore_ascii_case(FETCH_CONTENT_SUFFIX) => name = &name[..split],
            _ => break,
        }
    }
    name.replace('-', "_")
}

/// True if `name` can stand inside a C identifier: ASCII letters, digits
/// and `_`, and not empty.
pub fn is_identifier_fragment(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Module name of `repo`, rejected when it cannot be used in C.
fn checked_module_name(repo: &Path) -> Result<String, PathError> {
    let name = module_name_from_repo(repo);
    if is_identifier_fragment(&name) {
        Ok(name)
    } else {
        Err(PathError::InvalidModuleName(repo.to_path_buf()))
    }
}

/// Derive a module name from a repository path.
pub fn module_name_from_repo(repo: &Path) -> String {
    // `.` and `..` have no file name of their own
    let dir_name = match repo.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => repo
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_default(),
    };
    module_name_from_dir(&dir_name)
}

/// Name of the factory function a module's parser must define.
///
/// A module name that already carries the `tree_sitter_` prefix is the
/// function name itself.
pub fn expected_factory_name(module_name: &str) -> String {
    if module_name.starts_with(GRAMMAR_FUNCTION_PREFIX) {
        module_name.to_string()
    } else {
        format!("{}{}", GRAMMAR_FUNCTION_PREFIX, module_name)
    }
}

/// A grammar repository with generated C sources and no headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageModule {
    module_name: String,
    repo_path: PathBuf,
    source_path: PathBuf,
    source_files: Vec<PathBuf>,
}

impl LanguageModule {
    /// Discover a grammar checkout.
    ///
    /// Only the top level of `src/` is scanned; `src/tree_sitter/` holds
    /// the runtime's private headers.
    pub fn discover(repo: &Path) -> Result<Self, PathError> {
        if !repo.is_dir() {
            return Err(PathError::DirectoryNotFound(repo.to_path_buf()));
        }

        let module_name = checked_module_name(repo)?;

        let source_path = repo.join("src");
        if !source_path.is_dir() {
            return Err(PathError::DirectoryNotFound(source_path));
        }

        let source_files = find_files(&source_path, C_SOURCE_EXTENSIONS, false);
        if source_files.is_empty() {
            return Err(PathError::SourceFilesNotFound(source_path));
        }

        Ok(LanguageModule {
            module_name,
            repo_path: repo.to_path_buf(),
            source_path,
            source_files,
        })
    }

    /// Build a module by hand, e.g. when the name is known up front.
    pub fn from_parts(
        module_name: impl Into<String>,
        repo_path: impl Into<PathBuf>,
        source_path: impl Into<PathBuf>,
        source_files: Vec<PathBuf>,
    ) -> Self {
        LanguageModule {
            module_name: module_name.into(),
            repo_path: repo_path.into(),
            source_path: source_path.into(),
            source_files,
        }
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn source_files(&self) -> &[PathBuf] {
        &self.source_files
    }

    pub fn factory_name(&self) -> String {
        expected_factory_name(&self.module_name)
    }

    /// The generated parser among the module's sources.
    pub fn parser_file(&self, layout: &LayoutConfig) -> Result<&Path, GenerateError> {
        self.source_files
            .iter()
            .find(|path| {
                path.file_name()
                    .is_some_and(|name| name.to_string_lossy() == layout.parser_file)
            })
            .map(PathBuf::as_path)
            .ok_or_else(|| GenerateError::ParserFileNotFound {
                file_name: layout.parser_file.clone(),
                dir: self.source_path.clone(),
            })
    }
}

/// The tree-sitter runtime checkout, whose headers already exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootLibrary {
    module_name: String,
    repo_path: PathBuf,
    include_path: PathBuf,
    header_files: Vec<PathBuf>,
}

impl RootLibrary {
    /// Discover the tree-sitter checkout and its public headers.
    pub fn discover(repo: &Path, layout: &LayoutConfig) -> Result<Self, PathError> {
        if !repo.is_dir() {
            return Err(PathError::DirectoryNotFound(repo.to_path_buf()));
        }

        let module_name = checked_module_name(repo)?;

        let include_path = repo.join(&layout.root_include_dir);
        if !include_path.is_dir() {
            return Err(PathError::DirectoryNotFound(include_path));
        }

        let header_files = find_files(&include_path, C_HEADER_EXTENSIONS, true);
        if header_files.is_empty() {
            return Err(PathError::HeadersNotFound(include_path));
        }

        Ok(RootLibrary {
            module_name,
            repo_path: repo.to_path_buf(),
            include_path,
            header_files,
        })
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    pub fn include_path(&self) -> &Path {
        &self.include_path
    }

    pub fn header_files(&self) -> &[PathBuf] {
        &self.header_files
    }
}
