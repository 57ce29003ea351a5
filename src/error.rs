// src/error.rs

//! Error types for the hyforge pipeline
//!
//! Every error is fatal: the pipeline stops at the first failing phase
//! and the error propagates unmodified to the caller. There are no
//! retries and no fallback dependency versions.

use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the build pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem or process I/O failure
    #[error("I/O error: {0}")]
    Io(String),

    /// Malformed recipe file or dependency spec
    #[error("parse error: {0}")]
    Parse(String),

    /// A logical root could not be resolved to a writable path
    #[error("layout error: {0}")]
    Layout(String),

    /// A declared dependency could not be resolved against the index
    #[error("cannot resolve dependency {name}/{version}: {reason}")]
    Resolution {
        name: String,
        version: String,
        reason: String,
    },

    /// Descriptor generation failed (settings conflict, unwritable root)
    #[error("generation error: {0}")]
    Generation(String),

    /// The native build system reported a failure; diagnostics are verbatim
    #[error("native build step '{step}' failed: {stderr}")]
    Build { step: String, stderr: String },

    /// Packaging failed; no package root was published
    #[error("packaging error: {0}")]
    Packaging(String),

    /// A required file or tool is missing
    #[error("not found: {0}")]
    NotFound(String),
}

impl Error {
    /// Name of the pipeline phase this error belongs to, for reporting.
    pub fn phase(&self) -> &'static str {
        match self {
            Error::Layout(_) => "layout",
            Error::Parse(_) | Error::Resolution { .. } => "requirements",
            Error::Generation(_) => "generate",
            Error::Build { .. } => "build",
            Error::Packaging(_) => "package",
            Error::Io(_) | Error::NotFound(_) => "pipeline",
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}
