//! CLI module for cfggen
//!
//! Argument parsing and the translation of arguments into an
//! [`Invocation`] for the library pipeline.

use clap::{ArgGroup, Parser, ValueEnum};
use std::path::PathBuf;

use cfggen::error::Result;
use cfggen::output::Request;
use cfggen::pipeline::Invocation;
use cfggen::vars::MergeMode;

/// cfggen - configuration generation for multi-ASIC network devices
///
/// Builds the configuration tables of the host or of one internal ASIC from
/// a minigraph topology, merges override files on top and prints the
/// requested part.
#[derive(Parser, Debug, Clone)]
#[command(name = "cfggen")]
#[command(author = "cfggen Contributors")]
#[command(version)]
#[command(about = "Generate per-instance configuration from a minigraph", long_about = None)]
#[command(group(
    ArgGroup::new("output")
        .args(["var", "var_json", "print_data", "template"])
        .multiple(false)
))]
pub struct Cli {
    /// Minigraph topology file
    #[arg(short = 'm', long = "minigraph")]
    pub minigraph: Option<PathBuf>,

    /// Port configuration file of the selected instance
    #[arg(short = 'p', long = "port-config")]
    pub port_config: Option<PathBuf>,

    /// Instance to generate for: asic<N>, or host (default)
    #[arg(short = 'n', long = "namespace", default_value = "")]
    pub namespace: String,

    /// Inline JSON data, highest precedence
    #[arg(short = 'a', long = "additional-data")]
    pub additional_data: Option<String>,

    /// YAML data file (repeatable)
    #[arg(short = 'y', long = "yaml", action = clap::ArgAction::Append)]
    pub yaml: Vec<PathBuf>,

    /// JSON data file (repeatable)
    #[arg(short = 'j', long = "json", action = clap::ArgAction::Append)]
    pub json: Vec<PathBuf>,

    /// Print the value of a variable expression
    #[arg(short = 'v', long = "var")]
    pub var: Option<String>,

    /// Print the value of a variable expression as JSON
    #[arg(long = "var-json")]
    pub var_json: Option<String>,

    /// Print all merged data as JSON
    #[arg(long = "print-data")]
    pub print_data: bool,

    /// Render a template (repeatable)
    #[arg(short = 't', long = "template", action = clap::ArgAction::Append)]
    pub template: Vec<PathBuf>,

    /// Sub-role mapping file
    #[arg(long = "role-map")]
    pub role_map: Option<PathBuf>,

    /// Merge override tables recursively instead of replacing them
    #[arg(long = "deep-merge")]
    pub deep_merge: bool,

    /// Path to configuration file
    #[arg(short = 'c', long, env = "CFGGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbosity level (--verbose, repeat for more)
    #[arg(long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Format of diagnostics written to stderr
    #[arg(long, value_enum, default_value = "text")]
    pub log_format: LogFormat,
}

/// Diagnostic log format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Get the effective verbosity level (0-3)
    pub fn verbosity(&self) -> u8 {
        self.verbose.min(3)
    }

    /// The requested output
    pub fn request(&self) -> Request {
        if let Some(expr) = &self.var {
            Request::Var(expr.clone())
        } else if let Some(expr) = &self.var_json {
            Request::VarJson(expr.clone())
        } else if self.print_data {
            Request::PrintData
        } else if !self.template.is_empty() {
            Request::Templates(self.template.clone())
        } else {
            Request::None
        }
    }

    /// Translate the arguments into a pipeline invocation
    pub fn invocation(&self) -> Result<Invocation> {
        Ok(Invocation {
            minigraph: self.minigraph.clone(),
            port_config: self.port_config.clone(),
            instance: self.namespace.parse()?,
            additional_data: self.additional_data.clone(),
            yaml_files: self.yaml.clone(),
            json_files: self.json.clone(),
            role_map: self.role_map.clone(),
            merge_mode: self.deep_merge.then_some(MergeMode::Deep),
            request: self.request(),
        })
    }
}
