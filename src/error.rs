//! Crate-level error type.

use std::path::PathBuf;

use crate::pipeline::validation::ValidationReport;

/// Result alias using [`SentimentError`] by default.
pub type Result<T, E = SentimentError> = std::result::Result<T, E>;

/// Errors raised while configuring or loading pipeline inputs.
///
/// Running the pipeline itself never fails on content: unmatched tokens are
/// dropped and empty documents produce no tokens.
#[derive(Debug, thiserror::Error)]
pub enum SentimentError {
    /// A configuration value was not recognised (granularity, language, ...).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A pipeline spec failed validation; the report carries every finding.
    #[error("invalid pipeline spec: {} error(s)", .0.errors().count())]
    InvalidSpec(ValidationReport),

    /// A named sub-lexicon was requested but the bundle has no such tag.
    #[error("lexicon '{0}' not found in bundle")]
    UnknownLexicon(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SentimentError {
    pub(crate) fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}
