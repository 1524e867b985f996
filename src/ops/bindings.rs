//! C# binding generation and the post-generation patch pass.
//!
//! Generation itself is delegated to an external program. Whatever it
//! writes under the bindings directory is then patched in place.

use std::path::{Path, PathBuf};

use crate::core::errors::{GenerateError, PathError};
use crate::rewrite::binding_patch::patch_bindings;
use crate::util::config::BindingsConfig;
use crate::util::fs::{find_files, has_extension, rewrite_in_place, CSHARP_EXTENSIONS};
use crate::util::process::{resolve_program, ProcessBuilder};

/// Arguments used when the config names a generator but no arguments.
pub const DEFAULT_GENERATOR_ARGS: &[&str] = &[
    "--module",
    "{module}",
    "--include",
    "{include}",
    "--output",
    "{output}",
    "{headers}",
];

/// Everything a generator needs to bind one module.
#[derive(Debug, Clone, Copy)]
pub struct BindingRequest<'a> {
    pub module_name: &'a str,
    pub headers: &'a [PathBuf],
    pub include_dir: &'a Path,
    pub output_dir: &'a Path,
}

/// What a generator did with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    Generated,
    Skipped,
}

/// A C# binding generator.
pub trait BindingGenerator: Send + Sync {
    /// Short name for log messages.
    fn name(&self) -> &str;

    fn generate(&self, request: &BindingRequest<'_>) -> Result<GenerationOutcome, GenerateError>;
}

/// Runs a configured program once per module.
///
/// Recognised placeholders in arguments: `{module}`, `{include}`,
/// `{output}` and `{headers}`. An argument that is exactly `{headers}`
/// expands to one argument per header; embedded in a longer argument the
/// headers are joined with `,`.
#[derive(Debug, Clone)]
pub struct ExternalGenerator {
    program: PathBuf,
    args: Vec<String>,
}

impl ExternalGenerator {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        let args = if args.is_empty() {
            DEFAULT_GENERATOR_ARGS.iter().map(|a| a.to_string()).collect()
        } else {
            args
        };
        ExternalGenerator {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Substitute placeholders for one request.
    pub fn expand_args(&self, request: &BindingRequest<'_>) -> Vec<String> {
        let headers: Vec<String> = request
            .headers
            .iter()
            .map(|h| h.display().to_string())
            .collect();

        let mut expanded = Vec::with_capacity(self.args.len() + headers.len());
        for arg in &self.args {
            if arg == "{headers}" {
                expanded.extend(headers.iter().cloned());
                continue;
            }
            expanded.push(
                arg.replace("{module}", request.module_name)
                    .replace("{include}", &request.include_dir.display().to_string())
                    .replace("{output}", &request.output_dir.display().to_string())
                    .replace("{headers}", &headers.join(",")),
            );
        }
        expanded
    }
}

impl BindingGenerator for ExternalGenerator {
    fn name(&self) -> &str {
        self.program
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("generator")
    }

    fn generate(&self, request: &BindingRequest<'_>) -> Result<GenerationOutcome, GenerateError> {
        let program =
            resolve_program(&self.program).ok_or_else(|| GenerateError::BindingGeneration {
                module: request.module_name.to_string(),
                message: format!("could not find `{}`", self.program.display()),
            })?;

        let cmd = ProcessBuilder::new(program).args(self.expand_args(request));
        tracing::debug!("running {}", cmd.display_command());

        let output = cmd
            .exec_and_check()
            .map_err(|e| GenerateError::BindingGeneration {
                module: request.module_name.to_string(),
                message: format!("{:#}", e),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
            tracing::debug!("{}: {}", self.name(), line);
        }

        Ok(GenerationOutcome::Generated)
    }
}

/// Used when no generator is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopGenerator;

impl BindingGenerator for NoopGenerator {
    fn name(&self) -> &str {
        "none"
    }

    fn generate(&self, request: &BindingRequest<'_>) -> Result<GenerationOutcome, GenerateError> {
        tracing::info!(
            "no binding generator configured, skipping bindings for {}",
            request.module_name
        );
        Ok(GenerationOutcome::Skipped)
    }
}

/// Pick the generator named by the config.
pub fn generator_from_config(config: &BindingsConfig) -> Box<dyn BindingGenerator> {
    match &config.generator {
        Some(program) => Box::new(ExternalGenerator::new(program, config.args.clone())),
        None => Box::new(NoopGenerator),
    }
}

/// Totals of one patch pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchSummary {
    pub files_scanned: usize,
    pub files_patched: usize,
    pub lines_patched: usize,
}

impl PatchSummary {
    fn add(&mut self, other: PatchSummary) {
        self.files_scanned += other.files_scanned;
        self.files_patched += other.files_patched;
        self.lines_patched += other.lines_patched;
    }
}

/// Patch one C# file in place; unchanged files are not rewritten.
pub fn patch_file(path: &Path) -> Result<PatchSummary, GenerateError> {
    let mut lines_patched = 0;
    let rewritten = rewrite_in_place(path, |text| {
        let patched = patch_bindings(text);
        lines_patched = patched.patched_lines;
        patched.text
    })?;

    if rewritten {
        tracing::debug!("patched {} line(s) in {}", lines_patched, path.display());
    }

    Ok(PatchSummary {
        files_scanned: 1,
        files_patched: usize::from(rewritten),
        lines_patched,
    })
}

/// Patch every `.cs` file under `dir`, recursively.
pub fn patch_bindings_dir(dir: &Path) -> Result<PatchSummary, GenerateError> {
    let mut summary = PatchSummary::default();
    for file in find_files(dir, CSHARP_EXTENSIONS, true) {
        summary.add(patch_file(&file)?);
    }
    Ok(summary)
}

/// Patch a file or a directory of bindings.
pub fn patch_path(path: &Path) -> Result<PatchSummary, GenerateError> {
    if path.is_dir() {
        patch_bindings_dir(path)
    } else if path.is_file() {
        if !has_extension(path, CSHARP_EXTENSIONS) {
            tracing::warn!("{} is not a C# file, patching anyway", path.display());
        }
        patch_file(path)
    } else {
        Err(GenerateError::layout(
            path,
            PathError::FileNotFound(path.to_path_buf()),
        ))
    }
}

/// The patch pass that follows generation.
///
/// When a generator ran, its output directory must exist. When every
/// request was skipped, existing bindings are still patched.
pub fn patch_generated(
    module_name: &str,
    output_dir: &Path,
    generated: bool,
) -> Result<PatchSummary, GenerateError> {
    if !output_dir.is_dir() {
        if generated {
            return Err(GenerateError::BindingGeneration {
                module: module_name.to_string(),
                message: format!(
                    "the generator did not create `{}`",
                    output_dir.display()
                ),
            });
        }
        tracing::debug!(
            "no bindings at {}, nothing to patch",
            output_dir.display()
        );
        return Ok(PatchSummary::default());
    }

    let summary = patch_bindings_dir(output_dir)?;
    tracing::info!(
        "patched {} line(s) in {} of {} binding file(s)",
        summary.lines_patched,
        summary.files_patched,
        summary.files_scanned
    );
    Ok(summary)
}
