//! `tsheader generate` command

use anyhow::Result;

use crate::cli::GenerateArgs;
use crate::commands::current_config;
use tsheader::ops::{generate, generator_from_config, GenerateOptions};
use tsheader::util::diagnostic::emit;

pub fn execute(args: GenerateArgs, color: bool) -> Result<()> {
    let mut config = current_config()?;

    // Command-line flags win over both config files
    if args.jobs.is_some() {
        config.generate.jobs = args.jobs;
    }
    if args.allow_name_mismatch {
        config.generate.allow_name_mismatch = true;
    }
    if args.generator.is_some() {
        config.bindings.generator = args.generator;
    }

    let generator = generator_from_config(&config.bindings);
    tracing::debug!("binding generator: {}", generator.name());

    let opts = GenerateOptions {
        root_repo: args.root,
        grammar_repos: args.grammars,
        bindings_out: args.bindings_out,
        headers_out: args.headers_out,
        smoke_test_out: args.smoke_test_out,
        config,
    };

    let report = generate(&opts, generator.as_ref())?;

    for failure in &report.failures {
        emit(
            &failure
                .error
                .to_diagnostic()
                .with_context(format!("while processing {}", failure.repo.display())),
            color,
        );
    }

    eprintln!(
        "   Generated {} root header(s) and {} grammar header(s) in {}",
        report.root_headers.len(),
        report.language_headers.len(),
        opts.headers_out.display()
    );
    if report.patch.files_patched > 0 {
        eprintln!(
            "     Patched {} binding file(s) in {}",
            report.patch.files_patched,
            opts.bindings_out.display()
        );
    }
    if let Some(ref smoke_test) = report.smoke_test {
        eprintln!("       Wrote {}", smoke_test.display());
    }

    report.into_result()?;
    Ok(())
}
