//! Unified error types for spotitag
//!
//! Error strategy:
//! - Per-file errors (missing tags, catalog data, tag writes): recorded in the
//!   non-processed registry, batch continues
//! - System errors (traversal, report output, catalog auth): fatal, abort batch

use crate::catalog::CatalogError;
use crate::types::NonProcessedReason;
use std::path::PathBuf;
use thiserror::Error;

/// Supported formats for helpful error messages
pub const SUPPORTED_FORMATS: &str = "MP3 (ID3v2), FLAC (Vorbis comments)";

/// Top-level error type for spotitag operations
#[derive(Debug, Error)]
pub enum SpotitagError {
    // =========================================================================
    // Recoverable errors - record file, continue batch
    // =========================================================================
    #[error("No embedded {field} in '{path}'")]
    LocalTagMissing { path: PathBuf, field: &'static str },

    #[error("Unsupported tag container for '{path}': {format}\n  Supported formats: {SUPPORTED_FORMATS}")]
    UnsupportedFormat { path: PathBuf, format: String },

    #[error("Invalid key data from catalog: pitch class {pitch_class}, mode {mode}")]
    InvalidKeyData { pitch_class: i64, mode: i64 },

    #[error("Catalog has no audio features for track '{track_id}'")]
    MissingAudioFeatures { track_id: String },

    #[error("Failed to update tags in '{path}': {reason}")]
    TagError { path: PathBuf, reason: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    // =========================================================================
    // Fatal errors - abort entire batch
    // =========================================================================
    #[error("Path not found: '{0}'\n  Tip: Check the path exists and is accessible")]
    FileNotFound(PathBuf),

    #[error("Failed to read directory: {0}")]
    Scan(#[from] walkdir::Error),

    #[error("Cannot write output to '{path}': {reason}\n  Tip: Check write permissions for the output directory")]
    OutputError { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

/// Result type alias for spotitag operations
pub type Result<T> = std::result::Result<T, SpotitagError>;

impl SpotitagError {
    /// Registry reason for a per-file failure, `None` for batch-fatal errors
    pub fn non_processed_reason(&self) -> Option<NonProcessedReason> {
        match self {
            SpotitagError::LocalTagMissing { .. } => Some(NonProcessedReason::LocalTagMissing),
            SpotitagError::InvalidKeyData { .. } => Some(NonProcessedReason::InvalidKeyData),
            SpotitagError::MissingAudioFeatures { .. } => {
                Some(NonProcessedReason::MissingAudioFeatures)
            }
            SpotitagError::TagError { .. } => Some(NonProcessedReason::TagWriteFailure),
            // Bad credentials would fail every remaining file the same way
            SpotitagError::Catalog(CatalogError::Auth(_)) => None,
            SpotitagError::Catalog(_) => Some(NonProcessedReason::CatalogFailure),
            _ => None,
        }
    }

    /// Create a tag error from a lofty failure
    pub fn tag_error(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        SpotitagError::TagError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an output error, checking for common issues
    pub fn output_error(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        let reason = match err.kind() {
            std::io::ErrorKind::PermissionDenied => {
                format!("Permission denied. Check that you have write access to {}", path.display())
            }
            std::io::ErrorKind::NotFound => {
                format!("Directory does not exist: {}", path.parent().map(|p| p.display().to_string()).unwrap_or_default())
            }
            _ => err.to_string(),
        };
        SpotitagError::OutputError { path, reason }
    }
}
