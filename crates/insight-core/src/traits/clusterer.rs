use async_trait::async_trait;

use crate::errors::InsightResult;
use crate::models::ClusteringOutcome;

/// Anything that can run the per-form clustering pipeline.
#[async_trait]
pub trait IFormClusterer: Send + Sync {
    async fn cluster_form(&self, form_id: &str) -> InsightResult<ClusteringOutcome>;
}
