use serde::{Deserialize, Serialize};

use super::{ClusterAnalysis, Impact, Urgency};

/// Cluster data handed to the email collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummaryData {
    pub form_id: String,
    pub cluster_label: String,
    pub cluster_summary: String,
    pub cluster_size: usize,
    pub recommendation: Option<String>,
    pub impact: Impact,
    pub urgency: Urgency,
}

impl From<&ClusterAnalysis> for ClusterSummaryData {
    fn from(analysis: &ClusterAnalysis) -> Self {
        Self {
            form_id: analysis.form_id.clone(),
            cluster_label: analysis.cluster_label.clone(),
            cluster_summary: analysis.cluster_summary.clone(),
            cluster_size: analysis.cluster_size,
            recommendation: analysis.recommendation.clone(),
            impact: analysis.impact,
            urgency: analysis.urgency,
        }
    }
}
