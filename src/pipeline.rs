//! The clustering run: load, vectorize, distortions, select k, assign, report

use crate::data::{load_errors, ErrorLog, ErrorSource};
use crate::model::{
    calculate_distortions, perform_clustering, ClusterAssignment, DistortionCurve, KMeansSettings,
};
use crate::report::ClusterReport;
use crate::select::KSelector;
use crate::vectorize::{FeatureMatrix, TfIdfVectorizer};
use crate::viz::save_elbow_chart;
use log::{debug, info};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

/// Settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterConfig {
    /// Exclusive upper bound of the k values on the distortion curve
    pub clusters_range: usize,
    pub kmeans: KMeansSettings,
    /// Where to also save the elbow chart as SVG
    pub chart_path: Option<PathBuf>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            clusters_range: 14,
            kmeans: KMeansSettings::default(),
            chart_path: None,
        }
    }
}

/// Groups log errors into clusters of similar messages
#[derive(Debug, Clone, Default)]
pub struct LogClusterer {
    config: ClusterConfig,
}

impl LogClusterer {
    pub fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    pub fn read_errors(&self, source: &dyn ErrorSource) -> crate::Result<ErrorLog> {
        load_errors(source)
    }

    pub fn vectorize_errors(&self, log: &ErrorLog) -> crate::Result<FeatureMatrix> {
        TfIdfVectorizer::new()?.fit_transform(&log.records)
    }

    pub fn calculate_distortions(&self, matrix: &FeatureMatrix) -> crate::Result<DistortionCurve> {
        calculate_distortions(matrix, self.config.clusters_range, &self.config.kmeans)
    }

    /// Save the chart if configured, then let `selector` pick k
    pub fn find_optimal_k(
        &self,
        curve: &DistortionCurve,
        selector: &mut dyn KSelector,
    ) -> crate::Result<usize> {
        if let Some(path) = &self.config.chart_path {
            save_elbow_chart(curve, path)?;
        }
        selector.select(curve)
    }

    pub fn perform_clustering(
        &self,
        matrix: &FeatureMatrix,
        k: usize,
    ) -> crate::Result<ClusterAssignment> {
        perform_clustering(matrix, k, &self.config.kmeans)
    }

    /// Run every stage, writing the report to `out`
    ///
    /// Nothing is written to `out` unless all stages before reporting succeed.
    pub fn cluster_logs<W: Write>(
        &self,
        source: &dyn ErrorSource,
        selector: &mut dyn KSelector,
        out: &mut W,
    ) -> crate::Result<ClusterReport> {
        let start_time = Instant::now();

        let log = self.read_errors(source)?;
        info!("Loaded {} errors from {}", log.records.len(), log.source_id);

        let stage = Instant::now();
        let matrix = self.vectorize_errors(&log)?;
        debug!(
            "Vectorized into {:?} in {:.2}s",
            matrix.features.shape(),
            stage.elapsed().as_secs_f64()
        );

        let stage = Instant::now();
        let curve = self.calculate_distortions(&matrix)?;
        debug!(
            "Computed {} distortions in {:.2}s",
            curve.points.len(),
            stage.elapsed().as_secs_f64()
        );

        let k = self.find_optimal_k(&curve, selector)?;
        info!("Clustering with k = {}", k);

        let assignment = self.perform_clustering(&matrix, k)?;
        debug!("Cluster sizes: {:?}", assignment.cluster_sizes());

        let report = ClusterReport::build(&log.records, &assignment);
        report.write_to(out)?;

        debug!("Total processing time: {:.2}s", start_time.elapsed().as_secs_f64());
        Ok(report)
    }
}
