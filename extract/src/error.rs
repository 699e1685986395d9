//! Error types for map extraction.

use std::path::PathBuf;

use linkmap_core::ConfigError;
use thiserror::Error;

/// Errors that abort an extraction run.
///
/// Missing sizes and unmatched lines are not errors; they are recovered with
/// zero defaults or skipped during the scan.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The map file could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// No line of the input matched a known map dialect.
    #[error("unrecognized map format in {input}")]
    UnrecognizedFormat { input: String },

    /// A configured naming rule produced an unusable scan pattern.
    #[error("invalid scan pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Configuration could not be loaded or failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Convenience alias for results with [`ExtractError`].
pub type Result<T> = std::result::Result<T, ExtractError>;
