//! Error types for cfggen.
//!
//! Every failure that aborts an invocation is one of the variants below.
//! A variable path that resolves to nothing is not an error at all; the
//! output projector reports it as empty output.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for cfggen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for cfggen.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Input Errors
    // ========================================================================
    /// Malformed XML, YAML, JSON or port-configuration input.
    #[error("Failed to parse '{source_name}': {message}")]
    Parse {
        /// File path or description of the offending source
        source_name: String,
        /// Error message
        message: String,
    },

    /// Input file could not be read.
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        /// Path of the file
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    // ========================================================================
    // Topology Errors
    // ========================================================================
    /// Structurally invalid topology or instance request.
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ========================================================================
    // Template Errors
    // ========================================================================
    /// Template or variable expression failed to compile or render.
    #[error("Template error in '{template}': {message}")]
    Template {
        /// Template name or expression
        template: String,
        /// Error message
        message: String,
    },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// YAML error outside of a named input source.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON error outside of a named input source.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Creates a new parse error for a named source.
    pub fn parse(source_name: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }

    /// Creates a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a new template error.
    pub fn template(template: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Template {
            template: template.into(),
            message: message.to_string(),
        }
    }

    /// Creates an IO error bound to the file it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the error code for CLI exit status.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Parse { .. } | Error::Yaml(_) | Error::Json(_) | Error::Toml(_) => 2,
            Error::Configuration(_) => 3,
            Error::Template { .. } => 4,
            Error::Io { .. } => 1,
        }
    }
}

/// Reads a whole input file, attaching the path to any failure.
pub fn read_source(path: &std::path::Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::io(path, e))
}
