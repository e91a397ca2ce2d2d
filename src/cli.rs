//! Command-line interface definitions and argument parsing

use crate::data::{BuiltinErrors, ErrorSource, FileErrors};
use crate::model::KMeansSettings;
use crate::pipeline::ClusterConfig;
use clap::Parser;
use std::path::PathBuf;

/// Group similar log error lines with TF-IDF and K-Means
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Read errors from this file, one per line, instead of the bundled list
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Number of clusters; skips the interactive prompt
    #[arg(short = 'k', long)]
    pub k: Option<usize>,

    /// Exclusive upper bound of k on the elbow chart
    #[arg(long, default_value = "14")]
    pub clusters_range: usize,

    /// Random seed for K-Means initialisation
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Maximum iterations for K-Means algorithm
    #[arg(long, default_value = "300")]
    pub max_iters: usize,

    /// Tolerance for K-Means convergence
    #[arg(long, default_value = "1e-4")]
    pub tolerance: f64,

    /// Also save the elbow chart as an SVG file
    #[arg(short, long)]
    pub chart: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn config(&self) -> ClusterConfig {
        ClusterConfig {
            clusters_range: self.clusters_range,
            kmeans: KMeansSettings {
                seed: self.seed,
                max_iters: self.max_iters,
                tolerance: self.tolerance,
            },
            chart_path: self.chart.clone(),
        }
    }

    /// The file given with `--input`, or the bundled errors
    pub fn source(&self) -> Box<dyn ErrorSource> {
        match &self.input {
            Some(path) => Box::new(FileErrors::new(path)),
            None => Box::new(BuiltinErrors::sample()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DEFAULT_LOG_SOURCE;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["logcluster"]).unwrap();

        assert_eq!(args.k, None);
        assert_eq!(args.config(), ClusterConfig::default());
        assert_eq!(args.source().id(), DEFAULT_LOG_SOURCE);
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "logcluster",
            "-i",
            "errors.log",
            "-k",
            "3",
            "--clusters-range",
            "8",
            "--seed",
            "7",
            "-c",
            "elbow.svg",
        ])
        .unwrap();

        assert_eq!(args.k, Some(3));
        assert_eq!(args.source().id(), "errors.log");

        let config = args.config();
        assert_eq!(config.clusters_range, 8);
        assert_eq!(config.kmeans.seed, 7);
        assert_eq!(config.chart_path, Some(PathBuf::from("elbow.svg")));
    }

    #[test]
    fn test_rejects_non_numeric_k() {
        assert!(Args::try_parse_from(["logcluster", "-k", "many"]).is_err());
    }
}
