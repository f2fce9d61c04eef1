use async_trait::async_trait;

use crate::errors::InsightResult;
use crate::models::{ClusterAnalysis, IssueTrackerConfig, TicketReference};

/// Issue-tracker collaborator.
#[async_trait]
pub trait ITicketClient: Send + Sync {
    /// File a ticket for `analysis`. `Ok(None)` means the tracker declined.
    async fn create_ticket(
        &self,
        analysis: &ClusterAnalysis,
        tracker: &IssueTrackerConfig,
    ) -> InsightResult<Option<TicketReference>>;
}
