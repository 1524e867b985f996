//! `tsheader patch-bindings` command

use anyhow::Result;

use crate::cli::PatchBindingsArgs;
use tsheader::ops::{patch_path, PatchSummary};

pub fn execute(args: PatchBindingsArgs) -> Result<()> {
    let mut total = PatchSummary::default();

    for path in &args.paths {
        let summary = patch_path(path)?;
        total.files_scanned += summary.files_scanned;
        total.files_patched += summary.files_patched;
        total.lines_patched += summary.lines_patched;
    }

    eprintln!(
        "     Patched {} line(s) in {} of {} file(s)",
        total.lines_patched, total.files_patched, total.files_scanned
    );
    Ok(())
}
