//! `tsheader annotate` command
//!
//! Adds the export macro to existing headers, in place.

use anyhow::Result;

use crate::cli::AnnotateArgs;
use crate::commands::current_config;
use tsheader::ops::root_headers::annotate_files;
use tsheader::rewrite::{Annotator, ExportMacro};

pub fn execute(args: AnnotateArgs) -> Result<()> {
    let config = current_config()?;
    let annotator = Annotator::new(ExportMacro::from(&config.export), &args.prefix)
        .map_err(tsheader::GenerateError::from)?;

    let changed = annotate_files(&annotator, &args.files)?;

    for file in &args.files {
        if changed.contains(file) {
            eprintln!("   Annotated {}", file.display());
        } else {
            eprintln!("   Unchanged {}", file.display());
        }
    }
    Ok(())
}
