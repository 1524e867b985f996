//! High-level operations.
//!
//! This module contains the pipeline stages behind the tsheader commands.

pub mod bindings;
pub mod generate;
pub mod language_header;
pub mod root_headers;

use std::path::PathBuf;

use crate::core::errors::GenerateError;
use crate::util::config::Config;

pub use bindings::{
    generator_from_config, patch_path, BindingGenerator, BindingRequest, ExternalGenerator,
    GenerationOutcome, NoopGenerator, PatchSummary,
};
pub use generate::generate;
pub use language_header::{process_grammar, LanguageHeader};
pub use root_headers::export_root_headers;
pub use smoke_test::write_smoke_test;

/// Inputs of a full generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// The tree-sitter checkout
    pub root_repo: PathBuf,

    /// Grammar checkouts, in the order they were given
    pub grammar_repos: Vec<PathBuf>,

    /// Where the binding generator writes C# sources
    pub bindings_out: PathBuf,

    /// Root of the `<module>/<module>.h` header tree
    pub headers_out: PathBuf,

    /// Where to write `Program.cs`, if anywhere
    pub smoke_test_out: Option<PathBuf>,

    /// Merged configuration
    pub config: Config,
}

/// A grammar module that could not be processed.
#[derive(Debug)]
pub struct ModuleFailure {
    pub repo: PathBuf,
    pub error: GenerateError,
}

/// What a generation run produced.
#[derive(Debug)]
pub struct GenerateReport {
    pub root_module: String,
    pub root_headers: Vec<PathBuf>,
    pub language_headers: Vec<LanguageHeader>,
    pub patch: PatchSummary,
    pub smoke_test: Option<PathBuf>,
    pub failures: Vec<ModuleFailure>,
}

impl GenerateReport {
    /// Number of grammar modules attempted.
    pub fn total_modules(&self) -> usize {
        self.language_headers.len() + self.failures.len()
    }

    /// `Err(ModulesFailed)` carrying the exit code of the first failure.
    pub fn into_result(self) -> Result<Self, GenerateError> {
        match self.failures.first() {
            None => Ok(self),
            Some(first) => Err(GenerateError::ModulesFailed {
                failed: self.failures.len(),
                total: self.total_modules(),
                exit_code: first.error.exit_code(),
            }),
        }
    }
}
