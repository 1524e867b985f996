//! Command implementations

pub mod annotate;
pub mod completions;
pub mod generate;
pub mod header;
pub mod patch_bindings;

use anyhow::{Context, Result};

use tsheader::util::config::{global_config_path, load_config, project_config_path};
use tsheader::Config;

/// Global config merged with the config of the current directory.
pub fn current_config() -> Result<Config> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    let global = global_config_path();
    Ok(load_config(global.as_deref(), &project_config_path(&cwd)))
}
