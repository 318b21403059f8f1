//! Errors raised while loading configuration.

use std::path::PathBuf;

use thiserror::Error;

use crate::ast::DecodeError;

/// Errors that can occur when loading a taskfile or its settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("failed to read file '{path}': {source}")]
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The file is not valid YAML.
    #[error("YAML parse error in '{path}': {source}")]
    Yaml {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A `.env` file could not be parsed.
    #[error("invalid dotenv file '{path}': {source}")]
    Dotenv {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: dotenvy::Error,
    },

    /// A node of the document could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The requested task is not defined.
    #[error("task not found: {0}")]
    MissingTask(String),
}
