use serde::{Deserialize, Serialize};

use super::defaults;
use crate::errors::{InsightError, InsightResult};

/// Clustering engine and orchestrator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Upper bound on k-means iterations per run.
    pub max_iterations: usize,
    /// Fixed seed for centroid initialization. `None` draws from the OS.
    pub seed: Option<u64>,
    /// How many of a form's most recent analyses are compared against new clusters.
    pub prior_analysis_lookback: usize,
    /// Minimum insight-set overlap (Jaccard) for a new cluster to inherit prior state.
    pub prior_match_overlap: f64,
    /// Number of top keywords used for a cluster label.
    pub label_keyword_count: usize,
    /// Number of descriptions folded into the fallback cluster summary.
    pub summary_description_count: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            max_iterations: defaults::DEFAULT_MAX_ITERATIONS,
            seed: None,
            prior_analysis_lookback: defaults::DEFAULT_PRIOR_ANALYSIS_LOOKBACK,
            prior_match_overlap: defaults::DEFAULT_PRIOR_MATCH_OVERLAP,
            label_keyword_count: defaults::DEFAULT_LABEL_KEYWORD_COUNT,
            summary_description_count: defaults::DEFAULT_SUMMARY_DESCRIPTION_COUNT,
        }
    }
}

impl ClusteringConfig {
    pub fn validate(&self) -> InsightResult<()> {
        if !(0.0..=1.0).contains(&self.prior_match_overlap) {
            return Err(InsightError::ConfigError(format!(
                "clustering.prior_match_overlap = {}: must be between 0.0 and 1.0",
                self.prior_match_overlap
            )));
        }
        Ok(())
    }
}
