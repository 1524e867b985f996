//! Export-ready copies of the tree-sitter runtime headers.

use std::path::{Path, PathBuf};

use crate::core::errors::{GenerateError, PatternError};
use crate::core::module::RootLibrary;
use crate::rewrite::export::{Annotator, ExportMacro};
use crate::util::config::Config;
use crate::util::fs::{copy_file, ensure_dir_for_module, rewrite_in_place};

/// Annotate header files in place.
///
/// Returns the files whose contents changed.
pub fn annotate_files(annotator: &Annotator, files: &[PathBuf]) -> Result<Vec<PathBuf>, GenerateError> {
    let mut changed = Vec::new();
    for file in files {
        let mut prefixed = 0;
        let rewritten = rewrite_in_place(file, |text| {
            let annotated = annotator.annotate(text);
            prefixed = annotated.prefixed;
            annotated.text
        })?;

        if rewritten {
            tracing::debug!("exported {} declaration(s) in {}", prefixed, file.display());
            changed.push(file.clone());
        }
    }
    Ok(changed)
}

/// Annotator for the runtime's `ts_` API.
pub fn root_annotator(config: &Config) -> Result<Annotator, PatternError> {
    Annotator::new(
        ExportMacro::from(&config.export),
        &config.layout.root_function_prefix,
    )
}

/// Copy every root header into `<headers_out>/<root module>/` and annotate
/// the copies.
///
/// Headers are flattened by file name; existing copies are overwritten
/// before annotation, so reruns start from the pristine header.
pub fn export_root_headers(
    root: &RootLibrary,
    headers_out: &Path,
    config: &Config,
) -> Result<Vec<PathBuf>, GenerateError> {
    let annotator = root_annotator(config)?;
    let module_dir = ensure_dir_for_module(headers_out, root.module_name())?;

    tracing::info!(
        "exporting {} header(s) from {} to {}",
        root.header_files().len(),
        root.include_path().display(),
        module_dir.display()
    );

    let mut copies = Vec::with_capacity(root.header_files().len());
    for header in root.header_files() {
        let Some(file_name) = header.file_name() else {
            continue;
        };
        let copy = module_dir.join(file_name);
        copy_file(header, &copy)?;
        copies.push(copy);
    }

    annotate_files(&annotator, &copies)?;
    Ok(copies)
}
