//! # Configuration Module
//!
//! This module provides configuration support for licenseheaders, allowing
//! users to store default copyright metadata and to add or replace language
//! profiles.
//!
//! Configuration can be specified in a `.licenseheaders.toml` file in the
//! processed directory, via the `LICENSEHEADERS_CONFIG` environment variable,
//! or with `--config`.
//!
//! ```toml
//! [defaults]
//! owner = "Eager Hacker"
//! template = "apache-2"
//! exclude = ["target", "vendor/**"]
//!
//! [languages.lua]
//! extensions = [".lua"]
//! line_start = '^\s*--'
//! header_start = "--"
//! header_end = "--"
//! line_prefix = "-- "
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::languages::{LanguageProfile, LanguageRegistry, ProfileError};
use crate::verbose_log;

/// The default config file name.
pub const DEFAULT_CONFIG_FILENAME: &str = ".licenseheaders.toml";

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "LICENSEHEADERS_CONFIG";

/// Fallback values for command-line options.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
pub struct DefaultsConfig {
  /// Template name or template file path
  pub template: Option<String>,
  /// Copyright year or year range
  pub years: Option<String>,
  /// Copyright owner
  pub owner: Option<String>,
  /// Project name
  pub projectname: Option<String>,
  /// Project URL
  pub projecturl: Option<String>,
  /// Whether headers name the file they are in
  pub include_file: Option<bool>,
  /// Whether to write `.bak` copies before modifying files
  pub backup: Option<bool>,
  /// Exclusion patterns, added to those given on the command line
  #[serde(default)]
  pub exclude: Vec<String>,
}

/// User-defined language profile.
///
/// All pattern fields are regular expressions; the header fields are literal
/// text. `block_start` and `block_end` must be given together.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
pub struct LanguageConfig {
  /// Extensions handled by the language, each with its leading dot
  #[serde(default)]
  pub extensions: Vec<String>,
  /// Pattern for a first line kept above the header
  pub keep_first: Option<String>,
  /// Pattern for further leading lines kept above the header
  pub keep_more: Option<String>,
  /// Pattern for the line opening a block comment
  pub block_start: Option<String>,
  /// Pattern for the line closing a block comment
  pub block_end: Option<String>,
  /// Pattern for a line comment
  pub line_start: Option<String>,
  /// Literal written before the header text
  pub header_start: Option<String>,
  /// Literal written after the header text
  pub header_end: Option<String>,
  /// Literal prepended to each header text line
  pub line_prefix: Option<String>,
  /// Literal appended to each header text line
  pub line_suffix: Option<String>,
}

/// Main configuration struct for licenseheaders.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
  /// Fallback option values.
  #[serde(default)]
  pub defaults: DefaultsConfig,

  /// Language profiles keyed by tag. A tag naming a built-in language
  /// replaces it.
  #[serde(default)]
  pub languages: BTreeMap<String, LanguageConfig>,
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML.
  #[error("Failed to parse config file '{path}': {source}")]
  ParseError { path: PathBuf, source: toml::de::Error },

  /// A language profile is invalid.
  #[error(transparent)]
  InvalidLanguage(#[from] ProfileError),
}

impl Config {
  /// Load configuration from a file.
  ///
  /// The language profiles are compiled once here so that a bad pattern is
  /// reported before any file is processed.
  ///
  /// # Errors
  ///
  /// Returns a [`ConfigError`] if the file cannot be read or parsed, or if a
  /// language profile is invalid.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
      path: path.to_path_buf(),
      source: e,
    })?;

    config.registry()?;

    verbose_log!("Loaded {} language profiles", config.languages.len());

    Ok(config)
  }

  /// Builds the language registry: built-in profiles plus the configured
  /// ones, applied in tag order.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::InvalidLanguage`] for the first invalid profile.
  pub fn registry(&self) -> Result<LanguageRegistry, ConfigError> {
    let mut registry = LanguageRegistry::builtin();
    for (tag, language) in &self.languages {
      registry.register(LanguageProfile::from_config(tag, language)?);
    }
    Ok(registry)
  }
}

/// Discover the configuration file path.
///
/// The configuration file is discovered in the following order:
/// 1. Path specified via `--config` flag (passed as `explicit_path`)
/// 2. Path specified via `LICENSEHEADERS_CONFIG` environment variable
/// 3. `.licenseheaders.toml` in the processed directory
pub fn discover_config_path(explicit_path: Option<&Path>, root: &Path) -> Option<PathBuf> {
  if let Some(path) = explicit_path {
    if path.exists() {
      verbose_log!("Using explicit config path: {}", path.display());
      return Some(path.to_path_buf());
    }
    verbose_log!("Explicit config path does not exist: {}", path.display());
    return None;
  }

  if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
    let path = PathBuf::from(&env_path);
    if path.exists() {
      verbose_log!("Using config from {}: {}", CONFIG_ENV_VAR, path.display());
      return Some(path);
    }
    verbose_log!("{} path does not exist: {}", CONFIG_ENV_VAR, env_path);
  }

  let root_config = root.join(DEFAULT_CONFIG_FILENAME);
  if root_config.exists() {
    verbose_log!("Using config: {}", root_config.display());
    return Some(root_config);
  }

  verbose_log!("No config file found");
  None
}

/// Load configuration from the discovered path.
///
/// Returns `None` when discovery is disabled or no file is found.
///
/// # Errors
///
/// Returns an error if a discovered file cannot be loaded.
pub fn load_config(explicit_path: Option<&Path>, root: &Path, no_config: bool) -> Result<Option<Config>> {
  if no_config {
    verbose_log!("Config file discovery disabled (--no-config)");
    return Ok(None);
  }

  match discover_config_path(explicit_path, root) {
    Some(path) => {
      let config = Config::load(&path).with_context(|| format!("Failed to load config from {}", path.display()))?;
      Ok(Some(config))
    }
    None => Ok(None),
  }
}
