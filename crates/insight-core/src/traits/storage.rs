use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::InsightResult;
use crate::models::{ClusterAnalysis, Insight, Organization};

/// The slice of the document store the clustering pipeline reads and writes.
///
/// Listing methods that take a `limit` return the most recent records first.
#[async_trait]
pub trait IInsightStore: Send + Sync {
    // --- Feedback ---
    async fn feedback_ids_for_form(&self, form_id: &str) -> InsightResult<Vec<String>>;
    /// Distinct form ids with at least one feedback created at or after `since`.
    async fn forms_with_feedback_since(&self, since: DateTime<Utc>) -> InsightResult<Vec<String>>;

    // --- Insights ---
    async fn insights_for_feedback(&self, feedback_ids: &[String]) -> InsightResult<Vec<Insight>>;
    async fn update_insight_embedding(&self, insight_id: &str, embedding: &[f32])
        -> InsightResult<()>;

    // --- Cluster analyses ---
    async fn insert_cluster_analysis(&self, analysis: &ClusterAnalysis) -> InsightResult<()>;
    async fn update_cluster_analysis(&self, analysis: &ClusterAnalysis) -> InsightResult<()>;
    async fn get_cluster_analysis(&self, id: &str) -> InsightResult<Option<ClusterAnalysis>>;
    async fn cluster_analyses_for_form(
        &self,
        form_id: &str,
        limit: usize,
    ) -> InsightResult<Vec<ClusterAnalysis>>;
    async fn cluster_analyses_for_organization(
        &self,
        organization_id: &str,
        limit: usize,
    ) -> InsightResult<Vec<ClusterAnalysis>>;

    // --- Organizations ---
    async fn find_organization(&self, organization_id: &str) -> InsightResult<Option<Organization>>;
}
