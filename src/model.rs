//! K-Means clustering of feature matrices: the distortion curve and the final assignment

use crate::error::LogClusterError;
use crate::vectorize::FeatureMatrix;
use linfa::prelude::*;
use linfa_clustering::KMeans;
use linfa_nn::distance::L2Dist;
use log::{debug, warn};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Parameters shared by every K-Means fit in a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeansSettings {
    /// Seed for centroid initialisation, so runs are reproducible
    pub seed: u64,
    /// Maximum iterations for convergence
    pub max_iters: usize,
    /// Convergence tolerance
    pub tolerance: f64,
}

impl Default for KMeansSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            max_iters: 300,
            tolerance: 1e-4,
        }
    }
}

/// Inertia of a K-Means fit for each candidate k
#[derive(Debug, Clone, PartialEq)]
pub struct DistortionCurve {
    /// `(k, inertia)` pairs in ascending k
    pub points: Vec<(usize, f64)>,
}

impl DistortionCurve {
    pub fn ks(&self) -> Vec<usize> {
        self.points.iter().map(|&(k, _)| k).collect()
    }

    pub fn scores(&self) -> Vec<f64> {
        self.points.iter().map(|&(_, score)| score).collect()
    }

    pub fn max_score(&self) -> f64 {
        self.points.iter().map(|&(_, s)| s).fold(0.0, f64::max)
    }
}

/// Cluster label for every record
#[derive(Debug, Clone)]
pub struct ClusterAssignment {
    /// Number of clusters requested
    pub n_clusters: usize,
    /// Cluster id of each row, in `[0, n_clusters)`
    pub labels: Array1<usize>,
    /// Within-cluster sum of squares
    pub inertia: f64,
}

impl ClusterAssignment {
    /// Get cluster sizes, empty clusters included
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.n_clusters];
        for &label in self.labels.iter() {
            if label < self.n_clusters {
                sizes[label] += 1;
            }
        }
        sizes
    }
}

/// Fit K-Means once per k in `[1, clusters_range)` and record each inertia
///
/// The upper bound is clamped to the number of distinct rows: K-Means cannot
/// place more centroids than there are distinct points.
pub fn calculate_distortions(
    matrix: &FeatureMatrix,
    clusters_range: usize,
    settings: &KMeansSettings,
) -> crate::Result<DistortionCurve> {
    if clusters_range < 2 {
        return Err(LogClusterError::InvalidRange(clusters_range).into());
    }

    let distinct = matrix.distinct_rows();
    let upper = clusters_range.min(distinct + 1);
    if upper < clusters_range {
        warn!(
            "Only {} distinct errors, computing distortions for k = 1..{} instead of 1..{}",
            distinct,
            upper - 1,
            clusters_range - 1
        );
    }

    let mut points = Vec::with_capacity(upper - 1);
    for k in 1..upper {
        let (_, inertia) = fit(&matrix.features, k, settings)?;
        debug!("k = {}: distortion {:.4}", k, inertia);
        points.push((k, inertia));
    }

    Ok(DistortionCurve { points })
}

/// Partition the rows of `matrix` into `k` clusters
///
/// # Arguments
/// * `matrix` - Vectorized error log
/// * `k` - Number of clusters, between 1 and the number of rows
/// * `settings` - Seed and convergence parameters
///
/// # Returns
/// * `ClusterAssignment` with one label per row
pub fn perform_clustering(
    matrix: &FeatureMatrix,
    k: usize,
    settings: &KMeansSettings,
) -> crate::Result<ClusterAssignment> {
    let n_records = matrix.nrows();
    if k < 1 || k > n_records {
        return Err(LogClusterError::InvalidK { k, n_records }.into());
    }

    // Duplicated rows cannot seed separate centroids; the surplus clusters stay empty
    let distinct = matrix.distinct_rows();
    let fitted_k = k.min(distinct);
    if fitted_k < k {
        warn!(
            "Only {} distinct errors, clusters {}..{} will be empty",
            distinct,
            fitted_k + 1,
            k
        );
    }

    let (labels, inertia) = fit(&matrix.features, fitted_k, settings)?;

    Ok(ClusterAssignment {
        n_clusters: k,
        labels,
        inertia,
    })
}

/// Fit linfa's K-Means with a seeded RNG
fn fit(
    features: &Array2<f64>,
    k: usize,
    settings: &KMeansSettings,
) -> crate::Result<(Array1<usize>, f64)> {
    let n_samples = features.nrows();
    let targets: Array1<usize> = Array1::zeros(n_samples);
    let dataset = Dataset::new(features.clone(), targets);

    let rng = StdRng::seed_from_u64(settings.seed);
    let model = KMeans::params_with(k, rng, L2Dist)
        .max_n_iterations(settings.max_iters as u64)
        .tolerance(settings.tolerance)
        .fit(&dataset)?;

    let labels = model.predict(features);
    let inertia = compute_inertia(features, &labels, model.centroids());

    Ok((labels, inertia))
}

/// Compute within-cluster sum of squares (inertia)
fn compute_inertia(features: &Array2<f64>, labels: &Array1<usize>, centroids: &Array2<f64>) -> f64 {
    let mut inertia = 0.0;

    for (i, &cluster) in labels.iter().enumerate() {
        if cluster < centroids.nrows() {
            let point = features.row(i);
            let centroid = centroids.row(cluster);
            let distance_sq = point
                .iter()
                .zip(centroid.iter())
                .map(|(a, b)| (a - b).powi(2))
                .sum::<f64>();
            inertia += distance_sq;
        }
    }

    inertia
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorize::TfIdfVectorizer;

    const DISTINCT_ERRORS: [&str; 14] = [
        "disk quota exceeded",
        "network timeout",
        "connection refused",
        "permission denied",
        "deadlock detected",
        "certificate expired",
        "heap space exhausted",
        "segmentation fault",
        "broken pipe",
        "unknown host",
        "invalid token",
        "service unavailable",
        "checksum mismatch",
        "queue overflow",
    ];

    fn matrix(docs: &[&str]) -> FeatureMatrix {
        TfIdfVectorizer::new().unwrap().fit_transform(docs).unwrap()
    }

    #[test]
    fn test_distortion_curve_shape() {
        let m = matrix(&DISTINCT_ERRORS);
        let curve = calculate_distortions(&m, 13, &KMeansSettings::default()).unwrap();

        assert_eq!(curve.points.len(), 12);
        assert_eq!(curve.ks(), (1..13).collect::<Vec<_>>());
        assert!(curve.scores().iter().all(|&s| s >= 0.0 && s.is_finite()));
    }

    #[test]
    fn test_distortions_deterministic() {
        let m = matrix(&DISTINCT_ERRORS);
        let settings = KMeansSettings::default();

        let a = calculate_distortions(&m, 14, &settings).unwrap();
        let b = calculate_distortions(&m, 14, &settings).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_distortions_clamped_to_distinct_rows() {
        let m = matrix(&["disk full", "disk full", "network timeout"]);
        let curve = calculate_distortions(&m, 14, &KMeansSettings::default()).unwrap();

        assert_eq!(curve.ks(), vec![1, 2]);
        assert!(curve.scores()[1].abs() < 1e-9);
    }

    #[test]
    fn test_invalid_range() {
        let m = matrix(&DISTINCT_ERRORS);
        let err = calculate_distortions(&m, 1, &KMeansSettings::default()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<LogClusterError>(),
            Some(&LogClusterError::InvalidRange(1))
        );
    }

    #[test]
    fn test_perform_clustering() {
        let m = matrix(&DISTINCT_ERRORS);
        let assignment = perform_clustering(&m, 4, &KMeansSettings::default()).unwrap();

        assert_eq!(assignment.n_clusters, 4);
        assert_eq!(assignment.labels.len(), DISTINCT_ERRORS.len());
        assert!(assignment.labels.iter().all(|&l| l < 4));
        assert_eq!(assignment.cluster_sizes().iter().sum::<usize>(), DISTINCT_ERRORS.len());
        assert!(assignment.inertia >= 0.0);
    }

    #[test]
    fn test_duplicates_leave_clusters_empty() {
        let m = matrix(&["oom killed"; 5]);
        let assignment = perform_clustering(&m, 3, &KMeansSettings::default()).unwrap();

        assert_eq!(assignment.cluster_sizes(), vec![5, 0, 0]);
    }

    #[test]
    fn test_invalid_k() {
        let m = matrix(&["disk full", "network timeout"]);

        for k in [0, 3] {
            let err = perform_clustering(&m, k, &KMeansSettings::default()).unwrap_err();
            assert_eq!(
                err.downcast_ref::<LogClusterError>(),
                Some(&LogClusterError::InvalidK { k, n_records: 2 })
            );
        }
    }
}
