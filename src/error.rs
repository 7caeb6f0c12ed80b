//! Error types for the command line front end.
//!
//! Library operations fail with [`crate::bundler::Error`]; this module wraps
//! them together with CLI-specific failures.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for all CLI operations
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Bundler errors
    #[error("Bundler error: {0}")]
    Bundler(#[from] crate::bundler::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// No addon references were given or discovered
    #[error("No native addons found in: {}", inputs.join(", "))]
    NoReferences {
        /// Inputs that were searched
        inputs: Vec<String>,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl BundlerError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            BundlerError::Cli(CliError::NoReferences { .. }) => vec![
                "Pass .node files or directories containing them".to_string(),
                "Check the --include and --exclude patterns".to_string(),
            ],
            BundlerError::Bundler(crate::bundler::Error::Pattern(_)) => {
                vec!["Patterns are regular expressions, e.g. '\\.node$'".to_string()]
            }
            BundlerError::Toml(_) | BundlerError::Bundler(crate::bundler::Error::Config(_)) => {
                vec!["Check the configuration file for unknown keys or wrong types".to_string()]
            }
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
