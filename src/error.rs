//! Error handling for kiln.
//! Defines the error type and result alias used throughout the crate.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

use crate::engine::{Stage, Step};

/// Custom error types for kiln operations.
///
/// Every failure unwinds unchanged to the bootstrap orchestration, which wraps it
/// in [`Error::BootstrapError`] together with the step that was running.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O failure that is not tied to a single template path.
    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    /// Reading or writing a template file failed.
    #[error("Cannot process the file '{}'. Original error: {source}", .path.display())]
    FileError { path: PathBuf, source: std::io::Error },

    /// Listing, inspecting or creating a directory entry failed.
    #[error("Cannot access '{}'. Original error: {source}", .path.display())]
    DirectoryError { path: PathBuf, source: std::io::Error },

    /// A followed symbolic link leads back into one of its own ancestors.
    #[error("Refusing to re-enter '{}': it links back to its ancestor '{}'.", .path.display(), .ancestor.display())]
    TraversalCycle { path: PathBuf, ancestor: PathBuf },

    #[error("Version control failed. Original error: {0}")]
    Git2Error(#[from] git2::Error),

    /// An external command ran but finished with a non-zero status.
    #[error("Command '{command}' failed with status: {status}. Output: {output}")]
    CommandError { command: String, status: ExitStatus, output: String },

    #[error("Cannot proceed: a repository already exists in '{}'.", .path.display())]
    RepositoryExistsError { path: PathBuf },

    #[error("Configuration error: {0}.")]
    ConfigError(String),

    #[error("Failed to parse JSON. Original error: {0}")]
    JSONParseError(#[from] serde_json::Error),

    #[error("Failed to parse YAML. Original error: {0}")]
    YAMLParseError(#[from] serde_yaml::Error),

    #[error("Prompt failed. Original error: {0}")]
    PromptError(#[from] dialoguer::Error),

    /// Represents validation failures in user input
    #[error("Validation error: {0}.")]
    ValidationError(String),

    /// A bootstrap stage failed; the remaining stages were not run.
    #[error("Bootstrap failed while {step}. {source}")]
    BootstrapError { step: Step, source: Box<Error> },

    #[error("Cannot proceed: this engine has already run a bootstrap (state: {0}).")]
    BootstrapAlreadyRun(Stage),
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(1);
}
