//! `tsheader header` command

use anyhow::Result;

use crate::cli::HeaderArgs;
use crate::commands::current_config;
use tsheader::ops::process_grammar;

pub fn execute(args: HeaderArgs) -> Result<()> {
    let mut config = current_config()?;
    if args.allow_name_mismatch {
        config.generate.allow_name_mismatch = true;
    }

    let header = process_grammar(&args.grammar, &args.headers_out, &config)?;

    eprintln!(
        "   Generated {} ({} exported declaration(s))",
        header.header_path.display(),
        header.exported
    );
    Ok(())
}
