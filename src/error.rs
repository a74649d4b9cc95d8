//! Error types for the gallery, upload flow and configuration

use crate::flow::Phase;
use thiserror::Error;

/// Failures surfaced by the upload flow and the gallery store.
///
/// Collaborator failures (identification, chat) never show up here; they
/// are folded into an absent result or a fallback reply before reaching
/// the flow.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GalleryError {
    /// Input rejected, e.g. an empty name at save time
    #[error("validation failed: {0}")]
    Validation(String),

    /// Operation invoked in a phase that does not allow it
    #[error("`{operation}` is not allowed while {phase}")]
    Precondition {
        operation: &'static str,
        phase: Phase,
    },

    /// No saved entry or care record under this name
    #[error("not found: {0}")]
    NotFound(String),
}

impl GalleryError {
    pub(crate) fn precondition(operation: &'static str, phase: Phase) -> Self {
        Self::Precondition { operation, phase }
    }
}

/// Failures while loading configuration or reference data from disk
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine the application data directory")]
    NoDataDir,

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
