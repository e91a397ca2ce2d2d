//! Error taxonomy for the clustering pipeline

use thiserror::Error;

/// Failures that abort a clustering run.
///
/// Pipeline functions return `crate::Result`, so these travel inside an
/// `anyhow::Error`; use `downcast_ref::<LogClusterError>()` to inspect them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogClusterError {
    /// The error source could not supply any data
    #[error("Error source '{source_id}' unavailable: {reason}")]
    SourceUnavailable { source_id: String, reason: String },

    /// Vectorization produced no features
    #[error("Empty vocabulary: {0}")]
    EmptyVocabulary(String),

    /// The number entered for k was not a positive integer
    #[error("Invalid cluster count selection: {0:?}")]
    InvalidSelection(String),

    /// The chosen k is out of range for the data
    #[error("Invalid number of clusters {k}: must be between 1 and {n_records}")]
    InvalidK { k: usize, n_records: usize },

    /// The distortion curve bound leaves no candidate k
    #[error("Clusters range must be at least 2, got {0}")]
    InvalidRange(usize),
}
