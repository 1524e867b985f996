//! tsheader CLI - exportable C headers for tree-sitter grammars

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tsheader::util::diagnostic::emit;
use tsheader::GenerateError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli, color) {
        match e.downcast_ref::<GenerateError>() {
            Some(err) => {
                emit(&err.to_diagnostic(), color);
                std::process::exit(err.exit_code());
            }
            None => {
                eprintln!("error: {:#}", e);
                std::process::exit(1);
            }
        }
    }
}

fn run(cli: Cli, color: bool) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("tsheader=debug")
    } else if cli.quiet {
        EnvFilter::new("tsheader=warn")
    } else {
        EnvFilter::new("tsheader=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_ansi(color)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Generate(args) => commands::generate::execute(args, color),
        Commands::Header(args) => commands::header::execute(args),
        Commands::Annotate(args) => commands::annotate::execute(args),
        Commands::PatchBindings(args) => commands::patch_bindings::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
