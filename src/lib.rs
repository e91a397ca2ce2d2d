//! logcluster: group recurring log errors into clusters of similar messages
//!
//! Error lines are weighted with TF-IDF, a K-Means distortion curve helps
//! choose the number of clusters, and each cluster's distinct lines are
//! listed with their occurrence counts.

pub mod cli;
pub mod data;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod select;
pub mod stop_words;
pub mod vectorize;
pub mod viz;

// Re-export public items for easier access
pub use cli::Args;
pub use data::{load_errors, BuiltinErrors, ErrorLog, ErrorSource, FileErrors};
pub use error::LogClusterError;
pub use model::{calculate_distortions, perform_clustering, ClusterAssignment, DistortionCurve};
pub use pipeline::{ClusterConfig, LogClusterer};
pub use report::ClusterReport;
pub use select::{FixedK, InteractiveSelector, KSelector};
pub use vectorize::{FeatureMatrix, TfIdfVectorizer};

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
