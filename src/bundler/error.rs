//! Error types for addon bundling operations.
//!
//! Every failure that is local to a single artifact is expressed as an
//! [`Error`] so the caller can decide whether to skip the artifact or abort.

use std::{
    fmt, io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

/// Result alias for addon bundling operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while claiming, rewriting or emitting native addons.
#[derive(ThisError, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Raw I/O error without additional context.
    #[error("{0}")]
    IoError(#[from] io::Error),

    /// Filesystem error with the operation and path that caused it.
    #[error("{context} {}: {source}", path.display())]
    Fs {
        /// What was being done when the error occurred.
        context: String,
        /// Path the operation was applied to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// An include or exclude pattern failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A loader template could not be registered.
    #[error("loader template error: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    /// A loader template could not be rendered.
    #[error("loader render error: {0}")]
    Render(#[from] handlebars::RenderError),

    /// Configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// JSON encoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A build session operation was called in the wrong phase.
    #[error("cannot {operation} while the build session is {phase}")]
    InvalidPhase {
        /// Operation that was attempted.
        operation: &'static str,
        /// Phase the session was in.
        phase: &'static str,
    },

    /// Two artifacts with different content resolved to the same output file.
    #[error("output file {file_name} is already claimed by {existing}")]
    OutputCollision {
        /// Output file name both artifacts map to.
        file_name: String,
        /// Original path of the artifact that was written first.
        existing: PathBuf,
    },

    /// Generic error with a message.
    #[error("{0}")]
    GenericError(String),
}

impl From<handlebars::TemplateError> for Error {
    fn from(e: handlebars::TemplateError) -> Self {
        Error::Template(Box::new(e))
    }
}

/// Attaches filesystem context to I/O results.
pub trait ErrorExt<T> {
    /// Wraps an I/O error with the operation description and path.
    fn fs_context(self, context: &str, path: &Path) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &str, path: &Path) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context: context.to_string(),
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Converts a missing value or a foreign error into [`Error::GenericError`].
pub trait Context<T> {
    /// Attaches `context` to the failure.
    fn context<C: fmt::Display>(self, context: C) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: fmt::Display>(self, context: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }
}

impl<T, E: std::error::Error> Context<T> for std::result::Result<T, E> {
    fn context<C: fmt::Display>(self, context: C) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{context}: {e}")))
    }
}

/// Returns early with [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}
