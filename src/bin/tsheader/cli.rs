//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// tsheader - exportable C headers and patched C# bindings for tree-sitter grammars
#[derive(Parser)]
#[command(name = "tsheader")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline: root headers, grammar headers, bindings
    Generate(GenerateArgs),

    /// Generate the header for a single grammar
    Header(HeaderArgs),

    /// Add the export macro to headers in place
    Annotate(AnnotateArgs),

    /// Fix pointer casts in generated C# bindings
    PatchBindings(PatchBindingsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Path to the tree-sitter repository
    #[arg(long, value_name = "DIR")]
    pub root: PathBuf,

    /// Path to a grammar repository (repeatable)
    #[arg(long = "grammar", value_name = "DIR")]
    pub grammars: Vec<PathBuf>,

    /// Where the binding generator writes C# sources
    #[arg(long, value_name = "DIR")]
    pub bindings_out: PathBuf,

    /// Where generated and export-annotated headers are written
    #[arg(long, value_name = "DIR")]
    pub headers_out: PathBuf,

    /// Where to write a Program.cs that exercises the bindings
    #[arg(long, value_name = "DIR")]
    pub smoke_test_out: Option<PathBuf>,

    /// Number of grammar modules processed in parallel
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Keep going when a factory function is not named after its repository
    #[arg(long)]
    pub allow_name_mismatch: bool,

    /// Binding generator program (overrides the config file)
    #[arg(long, value_name = "PROGRAM")]
    pub generator: Option<PathBuf>,
}

#[derive(Args)]
pub struct HeaderArgs {
    /// Path to the grammar repository
    #[arg(long, value_name = "DIR")]
    pub grammar: PathBuf,

    /// Where the header is written
    #[arg(long, value_name = "DIR")]
    pub headers_out: PathBuf,

    /// Keep going when the factory function is not named after the repository
    #[arg(long)]
    pub allow_name_mismatch: bool,
}

#[derive(Args)]
pub struct AnnotateArgs {
    /// Header files to rewrite
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Prefix of the functions to export
    #[arg(long, default_value = "ts_")]
    pub prefix: String,
}

#[derive(Args)]
pub struct PatchBindingsArgs {
    /// C# files or directories of C# files
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
