//! Filesystem utilities.
//!
//! Writes are whole-buffer overwrites. A crash mid-write can leave a
//! truncated file behind; rerunning the generator rewrites it.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::core::errors::GenerateError;

/// Extensions of C source files in a grammar's `src/`.
pub const C_SOURCE_EXTENSIONS: &[&str] = &["c", "cc"];

/// Extensions of C headers.
pub const C_HEADER_EXTENSIONS: &[&str] = &["h", "hpp"];

/// Extensions of generated C# bindings.
pub const CSHARP_EXTENSIONS: &[&str] = &["cs"];

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<(), GenerateError> {
    if !path.is_dir() {
        fs::create_dir_all(path).map_err(|source| GenerateError::CreateDirectory {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Ensure `<root>/<module_name>` exists and return it.
pub fn ensure_dir_for_module(root: &Path, module_name: &str) -> Result<PathBuf, GenerateError> {
    let dir = root.join(module_name);
    ensure_dir(&dir)?;
    Ok(dir)
}

/// Read a file to string.
pub fn read_text(path: &Path) -> Result<String, GenerateError> {
    fs::read_to_string(path).map_err(|source| GenerateError::io("read", path, source))
}

/// Write a string to a file as UTF-8, replacing any existing contents.
pub fn write_text(path: &Path, contents: &str) -> Result<(), GenerateError> {
    fs::write(path, contents).map_err(|source| GenerateError::io("write", path, source))
}

/// Copy a file, overwriting the destination.
pub fn copy_file(src: &Path, dst: &Path) -> Result<(), GenerateError> {
    fs::copy(src, dst)
        .map(|_| ())
        .map_err(|source| GenerateError::io("copy", src, source))
}

/// Read `path`, transform it, and write it back if the text changed.
///
/// Returns whether the file was rewritten.
pub fn rewrite_in_place<F>(path: &Path, transform: F) -> Result<bool, GenerateError>
where
    F: FnOnce(&str) -> String,
{
    let original = read_text(path)?;
    let updated = transform(&original);
    if updated == original {
        return Ok(false);
    }
    write_text(path, &updated)?;
    Ok(true)
}

/// True if `path` has one of `extensions`, compared case-insensitively.
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            extensions.iter().any(|e| *e == ext)
        })
}

/// Files under `dir` with one of `extensions`, sorted.
///
/// With `recursive == false` only the top level of `dir` is listed.
pub fn find_files(dir: &Path, extensions: &[&str], recursive: bool) -> Vec<PathBuf> {
    let walker = WalkDir::new(dir).min_depth(1);
    let walker = if recursive { walker } else { walker.max_depth(1) };

    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("skipping unreadable entry under {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| has_extension(path, extensions))
        .collect();

    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_files_top_level_only() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(src.join("tree_sitter")).unwrap();
        fs::write(src.join("parser.c"), "").unwrap();
        fs::write(src.join("scanner.CC"), "").unwrap();
        fs::write(src.join("grammar.json"), "").unwrap();
        fs::write(src.join("tree_sitter/parser.h"), "").unwrap();
        fs::write(src.join("tree_sitter/alloc.c"), "").unwrap();

        let files = find_files(&src, C_SOURCE_EXTENSIONS, false);
        assert_eq!(files, vec![src.join("parser.c"), src.join("scanner.CC")]);

        let headers = find_files(&src, C_HEADER_EXTENSIONS, true);
        assert_eq!(headers, vec![src.join("tree_sitter/parser.h")]);
    }

    #[test]
    fn test_rewrite_in_place_skips_unchanged() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("api.h");
        fs::write(&path, "int x;\n").unwrap();

        assert!(!rewrite_in_place(&path, |text| text.to_string()).unwrap());
        assert!(rewrite_in_place(&path, |text| format!("// top\n{}", text)).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "// top\nint x;\n");
    }

    #[test]
    fn test_ensure_dir_for_module() {
        let tmp = TempDir::new().unwrap();
        let dir = ensure_dir_for_module(tmp.path(), "tree_sitter_json").unwrap();
        assert!(dir.is_dir());
        assert_eq!(dir, tmp.path().join("tree_sitter_json"));
    }

    #[test]
    fn test_ensure_dir_fails_under_a_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("taken");
        fs::write(&file, "").unwrap();

        let err = ensure_dir(&file.join("sub")).unwrap_err();
        assert!(matches!(err, GenerateError::CreateDirectory { .. }));
        assert_eq!(err.exit_code(), 3);
    }
}
