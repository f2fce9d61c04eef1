use serde::{Deserialize, Serialize};

use super::ClusterAnalysis;
use crate::constants::INSUFFICIENT_INSIGHTS_MESSAGE;

/// Result of clustering one form.
///
/// Too few insights is a valid terminal state, not an error. The
/// insufficient variant is listed first so untagged decoding can tell them apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClusteringOutcome {
    #[serde(rename_all = "camelCase")]
    InsufficientInsights {
        form_id: String,
        total_insights: usize,
        message: String,
        clusters: Vec<ClusterAnalysis>,
    },
    #[serde(rename_all = "camelCase")]
    Clustered {
        form_id: String,
        total_insights: usize,
        clusters: Vec<ClusterAnalysis>,
    },
}

impl ClusteringOutcome {
    pub fn insufficient(form_id: impl Into<String>, total_insights: usize) -> Self {
        Self::InsufficientInsights {
            form_id: form_id.into(),
            total_insights,
            message: INSUFFICIENT_INSIGHTS_MESSAGE.to_string(),
            clusters: Vec::new(),
        }
    }

    pub fn form_id(&self) -> &str {
        match self {
            Self::Clustered { form_id, .. } | Self::InsufficientInsights { form_id, .. } => form_id,
        }
    }

    pub fn total_insights(&self) -> usize {
        match self {
            Self::Clustered { total_insights, .. }
            | Self::InsufficientInsights { total_insights, .. } => *total_insights,
        }
    }

    pub fn clusters(&self) -> &[ClusterAnalysis] {
        match self {
            Self::Clustered { clusters, .. } | Self::InsufficientInsights { clusters, .. } => {
                clusters
            }
        }
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, Self::InsufficientInsights { .. })
    }
}
