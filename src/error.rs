//! Error handling for k6gen.
//! Defines the error type shared by configuration loading, template loading
//! and output writing. The rendering engine and the placeholder resolver never
//! fail; they degrade to empty output instead.

use std::io;
use thiserror::Error;

/// Errors that can stop a generation run.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Raised when the configuration is not valid JSON or cannot be mapped
    /// onto the typed model
    #[error("JSON error: {0}.")]
    JsonError(#[from] serde_json::Error),

    /// Raised when a `.yml`/`.yaml` configuration cannot be parsed
    #[error("YAML error: {0}.")]
    YamlError(#[from] serde_yaml::Error),

    /// Represents errors in locating or reading the configuration
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Schema and required-field violations, all collected into one message
    #[error("Validation error: {0}.")]
    ValidationError(String),

    /// A template could not be found or read
    #[error("Template error: {0}.")]
    TemplateError(String),

    #[error("Output directory '{output_dir}' already exists. Use --force to overwrite it.")]
    OutputDirectoryExistsError { output_dir: String },
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
