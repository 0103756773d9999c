//! Configuration module for cfggen
//!
//! Handles loading configuration from the first file found of:
//! - `--config <path>` or `CFGGEN_CONFIG`
//! - Project configuration (./cfggen.toml)
//! - User configuration (~/.config/cfggen/cfggen.toml)
//! - System configuration (/etc/cfggen/cfggen.toml)
//!
//! Environment variables are applied on top; command-line flags override both.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{read_source, Result};
use crate::vars::MergeMode;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default settings
    pub defaults: Defaults,

    /// Template rendering settings
    pub templates: TemplatesConfig,

    /// Output settings
    pub output: OutputConfig,

    /// File the configuration was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Default configuration values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// How override layers combine with earlier tables
    pub merge_mode: MergeMode,

    /// Sub-role mapping file
    pub role_map: Option<PathBuf>,
}

/// What an undefined template variable evaluates to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UndefinedMode {
    /// Undefined values and their attributes are silently empty
    #[default]
    Chainable,
    /// Undefined values are empty, attribute access on them fails
    Lenient,
    /// Any use of an undefined value fails
    Strict,
}

/// Template settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    pub trim_blocks: bool,
    pub lstrip_blocks: bool,
    pub undefined: UndefinedMode,
    /// Extra directories searched for included templates
    pub search_paths: Vec<PathBuf>,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            trim_blocks: true,
            lstrip_blocks: false,
            undefined: UndefinedMode::Chainable,
            search_paths: Vec::new(),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Indentation of JSON output
    pub json_indent: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { json_indent: 4 }
    }
}

impl Config {
    /// Load configuration from the first existing file, then the environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = match Self::get_config_paths(config_path)
            .into_iter()
            .find(|p| p.is_file())
        {
            Some(path) => Self::from_file(&path)?,
            None => Config::default(),
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Get the list of configuration file paths to check, in priority order
    fn get_config_paths(explicit_path: Option<&Path>) -> Vec<PathBuf> {
        // Explicit path takes priority
        if let Some(path) = explicit_path {
            return vec![path.to_path_buf()];
        }

        let mut paths = Vec::new();

        // Project config (current directory)
        paths.push(PathBuf::from("cfggen.toml"));

        // User config
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("cfggen/cfggen.toml"));
        }

        // System-wide config
        paths.push(PathBuf::from("/etc/cfggen/cfggen.toml"));

        paths
    }

    /// Load from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = read_source(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.source = Some(path.to_path_buf());
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // CFGGEN_MERGE_MODE
        if let Some(mode) = lookup("CFGGEN_MERGE_MODE") {
            match mode.parse() {
                Ok(mode) => self.defaults.merge_mode = mode,
                Err(e) => warn!("ignoring CFGGEN_MERGE_MODE: {}", e),
            }
        }

        // CFGGEN_ROLE_MAP
        if let Some(path) = lookup("CFGGEN_ROLE_MAP") {
            self.defaults.role_map = Some(PathBuf::from(path));
        }

        // CFGGEN_JSON_INDENT
        if let Some(indent) = lookup("CFGGEN_JSON_INDENT") {
            match indent.parse() {
                Ok(n) => self.output.json_indent = n,
                Err(_) => warn!("ignoring CFGGEN_JSON_INDENT '{}': not a number", indent),
            }
        }
    }
}
