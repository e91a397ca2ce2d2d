//! Per-cluster listing of distinct errors and their counts

use crate::model::ClusterAssignment;
use std::collections::HashMap;
use std::io::Write;

/// Distinct errors of one cluster, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterSummary {
    /// Zero-based cluster id
    pub id: usize,
    /// `(error text, occurrences)` pairs
    pub errors: Vec<(String, usize)>,
}

impl ClusterSummary {
    pub fn total(&self) -> usize {
        self.errors.iter().map(|(_, count)| count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Grouped errors for every cluster id, ascending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterReport {
    pub clusters: Vec<ClusterSummary>,
}

impl ClusterReport {
    /// Group `records` by their label, counting identical texts
    ///
    /// `assignment` must hold one label per record.
    pub fn build<S: AsRef<str>>(records: &[S], assignment: &ClusterAssignment) -> Self {
        debug_assert_eq!(records.len(), assignment.labels.len());
        let mut clusters: Vec<ClusterSummary> = (0..assignment.n_clusters)
            .map(|id| ClusterSummary {
                id,
                errors: Vec::new(),
            })
            .collect();
        let mut seen: Vec<HashMap<&str, usize>> = vec![HashMap::new(); assignment.n_clusters];

        for (record, &label) in records.iter().zip(assignment.labels.iter()) {
            let text = record.as_ref();
            let summary = &mut clusters[label];
            match seen[label].get(text).copied() {
                Some(slot) => summary.errors[slot].1 += 1,
                None => {
                    seen[label].insert(text, summary.errors.len());
                    summary.errors.push((text.to_string(), 1));
                }
            }
        }

        Self { clusters }
    }

    /// Sum of all counts, equal to the number of records reported
    pub fn total(&self) -> usize {
        self.clusters.iter().map(ClusterSummary::total).sum()
    }

    /// Print each cluster: a header, `<count> - <error>` lines, then a blank line
    pub fn write_to<W: Write>(&self, out: &mut W) -> crate::Result<()> {
        for cluster in &self.clusters {
            writeln!(out, "Cluster {} Errors:", cluster.id + 1)?;
            for (error, count) in &cluster.errors {
                writeln!(out, "{} - {}", count, error.trim())?;
            }
            writeln!(out)?;
        }
        out.flush()?;
        Ok(())
    }
}
