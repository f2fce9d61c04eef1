use async_trait::async_trait;

use crate::errors::InsightResult;
use crate::models::ClusterSummaryData;

/// Email collaborator. Pacing between sends is the implementation's concern.
#[async_trait]
pub trait INotificationClient: Send + Sync {
    /// Send a cluster alert. `Ok(true)` only when delivery was confirmed.
    async fn send(
        &self,
        to_address: &str,
        cluster: &ClusterSummaryData,
        sentiment_percentage: f64,
    ) -> InsightResult<bool>;
}
