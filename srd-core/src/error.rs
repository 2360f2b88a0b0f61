//! Error types for SRD loading and filter construction.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the fallible edges of the reference-data layer.
///
/// Corpus loading never surfaces these to callers: an unreadable source is
/// logged and replaced by an empty collection. They reach callers only from
/// the helpers that read a single file or build a filter from user input.
#[derive(Debug, Error)]
pub enum SrdError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not walk SRD directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("invalid value for {field}: {value:?}")]
    InvalidFilter { field: &'static str, value: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SrdError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SrdError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_filter(field: &'static str, value: impl Into<String>) -> Self {
        SrdError::InvalidFilter {
            field,
            value: value.into(),
        }
    }
}
