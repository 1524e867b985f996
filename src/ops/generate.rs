//! The full pipeline: root library, grammar modules, bindings, smoke test.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::core::errors::GenerateError;
use crate::core::module::{module_name_from_repo, LanguageModule, RootLibrary};
use crate::ops::bindings::{patch_generated, BindingGenerator, BindingRequest, GenerationOutcome};
use crate::ops::language_header::{
    annotate_language_header, language_annotator, write_language_header, LanguageHeader,
};
use crate::ops::root_headers::export_root_headers;
use crate::ops::smoke_test::write_smoke_test;
use crate::ops::{GenerateOptions, GenerateReport, ModuleFailure};

type ModuleResult = Result<(LanguageHeader, GenerationOutcome), GenerateError>;

/// Run the whole pipeline.
///
/// Any failure in the root stage is returned as the error. Failures of
/// individual grammar modules are collected into the report; call
/// [`GenerateReport::into_result`] to turn them into an error.
pub fn generate(
    opts: &GenerateOptions,
    generator: &dyn BindingGenerator,
) -> Result<GenerateReport, GenerateError> {
    if !opts.root_repo.is_dir() {
        return Err(GenerateError::RootRepoNotFound(opts.root_repo.clone()));
    }
    if opts.grammar_repos.is_empty() {
        return Err(GenerateError::MissingGrammars);
    }

    let root = RootLibrary::discover(&opts.root_repo, &opts.config.layout)
        .map_err(|e| GenerateError::layout(&opts.root_repo, e))?;
    tracing::info!(
        "root library {} with {} header(s)",
        root.module_name(),
        root.header_files().len()
    );

    // The generator sees the original headers, not the annotated copies.
    let root_outcome = generator.generate(&BindingRequest {
        module_name: root.module_name(),
        headers: root.header_files(),
        include_dir: root.include_path(),
        output_dir: &opts.bindings_out,
    })?;
    let root_headers = export_root_headers(&root, &opts.headers_out, &opts.config)?;

    let results = run_modules(opts, claim_module_names(&root, &opts.grammar_repos), generator);

    let mut language_headers = Vec::new();
    let mut failures = Vec::new();
    let mut smoke_module = None;
    let mut generated = root_outcome == GenerationOutcome::Generated;
    for (index, (repo, result)) in opts.grammar_repos.iter().zip(results).enumerate() {
        match result {
            Ok((header, outcome)) => {
                generated |= outcome == GenerationOutcome::Generated;
                if index == 0 {
                    smoke_module = Some(header.module_name.clone());
                }
                language_headers.push(header);
            }
            Err(error) => {
                tracing::debug!("{} failed: {}", repo.display(), error);
                failures.push(ModuleFailure {
                    repo: repo.clone(),
                    error,
                });
            }
        }
    }

    let patch = patch_generated(root.module_name(), &opts.bindings_out, generated)?;

    let smoke_test = match (&opts.smoke_test_out, smoke_module) {
        (Some(dir), Some(module)) => Some(write_smoke_test(dir, root.module_name(), &module)?),
        (Some(dir), None) => {
            tracing::warn!(
                "not writing a smoke test to {}: the first grammar failed",
                dir.display()
            );
            None
        }
        (None, _) => None,
    };

    Ok(GenerateReport {
        root_module: root.module_name().to_string(),
        root_headers,
        language_headers,
        patch,
        smoke_test,
        failures,
    })
}

/// Give every grammar its module name before any work starts.
///
/// Two repositories with the same module name would write the same header,
/// so every repository after the first that claims a name (the root
/// library's included) is turned into a failure.
fn claim_module_names<'a>(
    root: &'a RootLibrary,
    repos: &'a [PathBuf],
) -> Vec<Result<&'a Path, GenerateError>> {
    let mut claimed: HashMap<String, &Path> = HashMap::new();
    claimed.insert(root.module_name().to_string(), root.repo_path());

    repos
        .iter()
        .map(|repo| {
            let module = module_name_from_repo(repo);
            match claimed.get(&module) {
                Some(first) => Err(GenerateError::DuplicateModule {
                    module,
                    repo: repo.clone(),
                    first: first.to_path_buf(),
                }),
                None => {
                    claimed.insert(module, repo.as_path());
                    Ok(repo.as_path())
                }
            }
        })
        .collect()
}

/// Process every claimed grammar module, in parallel when more than one job
/// is allowed. Results come back in input order.
fn run_modules(
    opts: &GenerateOptions,
    claimed: Vec<Result<&Path, GenerateError>>,
    generator: &dyn BindingGenerator,
) -> Vec<ModuleResult> {
    let work = move || -> Vec<ModuleResult> {
        claimed
            .into_par_iter()
            .map(|claim| claim.and_then(|repo| run_module(repo, opts, generator)))
            .collect()
    };

    match opts.config.generate.jobs {
        Some(jobs) => match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
            Ok(pool) => pool.install(work),
            Err(e) => {
                tracing::warn!("could not start {} worker(s): {}", jobs, e);
                work()
            }
        },
        None => work(),
    }
}

fn run_module(
    repo: &Path,
    opts: &GenerateOptions,
    generator: &dyn BindingGenerator,
) -> ModuleResult {
    let module = LanguageModule::discover(repo).map_err(|e| GenerateError::layout(repo, e))?;
    let annotator = language_annotator(&opts.config)?;
    let header_path = write_language_header(&module, &opts.headers_out, &opts.config)?;

    // Bind the header as extracted; the export macro goes in afterwards.
    let headers = vec![header_path.clone()];
    let include_dir = header_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| opts.headers_out.clone());
    let outcome = generator.generate(&BindingRequest {
        module_name: module.module_name(),
        headers: &headers,
        include_dir: &include_dir,
        output_dir: &opts.bindings_out,
    })?;

    let header = annotate_language_header(&module, header_path, &annotator)?;
    Ok((header, outcome))
}
