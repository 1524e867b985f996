//! Configuration file support for tsheader.
//!
//! Two configuration file locations are read:
//! - Global: `~/.tsheader/config.toml` - User-wide defaults
//! - Project: `.tsheader/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// tsheader configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Export macro settings
    pub export: ExportConfig,

    /// Repository layout settings
    pub layout: LayoutConfig,

    /// External binding generator
    pub bindings: BindingsConfig,

    /// Pipeline settings
    pub generate: GenerateConfig,
}

/// The macro written into annotated headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Macro token prefixed to every exported declaration
    pub macro_name: String,

    /// Define that turns exporting on when building the shared library
    pub enable_define: String,

    /// Define that forces the macro empty even when exporting is on
    pub disable_define: String,

    /// Export attribute on Windows
    pub windows_attribute: String,

    /// Export attribute elsewhere
    pub unix_attribute: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            macro_name: "DllExport".to_string(),
            enable_define: "TREE_SITTER_EXPORTS".to_string(),
            disable_define: "TREE_SITTER_NO_EXPORT".to_string(),
            windows_attribute: "__declspec(dllexport)".to_string(),
            unix_attribute: "__attribute__((visibility(\"default\")))".to_string(),
        }
    }
}

/// Where things live inside the repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Prefix of the functions exported by the tree-sitter library headers
    pub root_function_prefix: String,

    /// Header directory inside the tree-sitter checkout
    pub root_include_dir: PathBuf,

    /// Name of the generated parser inside a grammar's src/
    pub parser_file: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            root_function_prefix: "ts_".to_string(),
            root_include_dir: PathBuf::from("lib/include/tree_sitter"),
            parser_file: "parser.c".to_string(),
        }
    }
}

/// External binding generator command.
///
/// `args` may contain `{module}`, `{headers}`, `{include}` and `{output}`
/// placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingsConfig {
    /// Program to run; no program means binding generation is skipped
    pub generator: Option<PathBuf>,

    /// Arguments passed to the program
    pub args: Vec<String>,
}

/// Pipeline settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Number of grammar modules processed in parallel (None = auto-detect)
    pub jobs: Option<usize>,

    /// Downgrade a factory name mismatch to a warning
    pub allow_name_mismatch: bool,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Load a config file as a raw table, checked against the schema.
    ///
    /// Only the keys the file actually sets are present, so an overlay can
    /// set a field back to its default value.
    pub fn load_table(path: &Path) -> Result<toml::Table> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let table: toml::Table = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        toml::Value::Table(table.clone())
            .try_into::<Config>()
            .with_context(|| format!("invalid config file: {}", path.display()))?;
        Ok(table)
    }
}

/// Overlay `other` onto `base`: tables merge key by key, any other value
/// replaces what was there.
pub fn merge_tables(base: &mut toml::Table, other: toml::Table) {
    for (key, value) in other {
        match value {
            toml::Value::Table(incoming) => match base.get_mut(&key) {
                Some(toml::Value::Table(existing)) => merge_tables(existing, incoming),
                _ => {
                    base.insert(key, toml::Value::Table(incoming));
                }
            },
            value => {
                base.insert(key, value);
            }
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.tsheader/config.toml)
/// 2. Global config (~/.tsheader/config.toml)
/// 3. Defaults
///
/// A file that fails to load is skipped with a warning.
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut merged = toml::Table::new();

    for path in global_path.into_iter().chain(Some(project_path)) {
        if !path.exists() {
            continue;
        }
        match Config::load_table(path) {
            Ok(table) => merge_tables(&mut merged, table),
            Err(e) => tracing::warn!("Failed to load config from {}: {:#}", path.display(), e),
        }
    }

    toml::Value::Table(merged)
        .try_into()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to merge config files: {}", e);
            Config::default()
        })
}

/// Get the global tsheader config directory (~/.tsheader).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".tsheader"))
}

/// Get the global config path (~/.tsheader/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.tsheader/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".tsheader").join("config.toml")
}
