//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur before or while launching a conversion.
///
/// A tool that runs and exits non-zero is not an error: it is reported as
/// [`ConversionOutcome::Failed`](super::ConversionOutcome::Failed).
#[derive(Debug, Error)]
pub enum ConverterError {
    /// Requested output format is not one of the supported formats.
    #[error("Unsupported output format: {format}")]
    UnsupportedFormat { format: String },

    /// FFmpeg binary could not be spawned.
    #[error("FFmpeg not found at path: {path}")]
    ToolNotFound { path: PathBuf },

    /// FFmpeg was found but its version could not be proven compatible.
    #[error("Incompatible FFmpeg: {reason}")]
    IncompatibleVersion { reason: String },

    /// A source or destination path could not be made absolute.
    #[error("Invalid path: {path}")]
    InvalidPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error while launching or awaiting the tool.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConverterError {
    /// Creates a new unsupported format error.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Creates a new incompatible version error.
    pub fn incompatible_version(reason: impl Into<String>) -> Self {
        Self::IncompatibleVersion {
            reason: reason.into(),
        }
    }

    /// Whether this error was caused by the caller's input rather than the tool.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFormat { .. } | Self::InvalidPath { .. }
        )
    }
}
