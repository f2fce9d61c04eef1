//! In-memory implementation of the document-store contract.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use insight_core::errors::{InsightResult, PersistenceError};
use insight_core::traits::IInsightStore;
use insight_core::{ClusterAnalysis, Feedback, Insight, Organization};

/// Store operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Failure {
    FeedbackQuery,
    InsightQuery,
    EmbeddingWrite,
    AnalysisInsert,
    AnalysisUpdate,
    AnalysisQuery,
    OrganizationQuery,
}

#[derive(Default)]
struct State {
    feedback: Vec<Feedback>,
    insights: Vec<Insight>,
    analyses: Vec<ClusterAnalysis>,
    organizations: HashMap<String, Organization>,
    embedding_writes: Vec<String>,
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    failures: Mutex<HashSet<Failure>>,
}

fn query_failed(operation: &str) -> PersistenceError {
    PersistenceError::QueryFailed {
        operation: operation.to_string(),
        reason: "injected failure".to_string(),
    }
}

fn write_failed(operation: &str) -> PersistenceError {
    PersistenceError::WriteFailed {
        operation: operation.to_string(),
        reason: "injected failure".to_string(),
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn failing(&self, failure: Failure) -> bool {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&failure)
    }

    /// Make `failure` fail until [`Self::heal`] is called.
    pub fn fail(&self, failure: Failure) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(failure);
    }

    pub fn heal(&self, failure: Failure) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&failure);
    }

    pub fn add_feedback(&self, feedback: Feedback) {
        self.state().feedback.push(feedback);
    }

    /// Add an insight plus a matching feedback record created at the insight's time.
    pub fn add_insight(&self, insight: Insight) {
        let mut state = self.state();
        if !state.feedback.iter().any(|f| f.id == insight.feedback_id) {
            state.feedback.push(Feedback {
                id: insight.feedback_id.clone(),
                form_id: insight.form_id.clone(),
                organization: insight.organization.clone(),
                created_at: insight.created_at,
            });
        }
        state.insights.push(insight);
    }

    pub fn add_analysis(&self, analysis: ClusterAnalysis) {
        self.state().analyses.push(analysis);
    }

    pub fn add_organization(&self, organization: Organization) {
        self.state()
            .organizations
            .insert(organization.id.clone(), organization);
    }

    pub fn insight(&self, id: &str) -> Option<Insight> {
        self.state().insights.iter().find(|i| i.id == id).cloned()
    }

    /// Every stored analysis, in insertion order.
    pub fn analyses(&self) -> Vec<ClusterAnalysis> {
        self.state().analyses.clone()
    }

    /// Insight ids whose embedding was written, in write order.
    pub fn embedding_writes(&self) -> Vec<String> {
        self.state().embedding_writes.clone()
    }

    fn newest_first(mut analyses: Vec<ClusterAnalysis>, limit: usize) -> Vec<ClusterAnalysis> {
        analyses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        analyses.truncate(limit);
        analyses
    }
}

#[async_trait]
impl IInsightStore for InMemoryStore {
    async fn feedback_ids_for_form(&self, form_id: &str) -> InsightResult<Vec<String>> {
        if self.failing(Failure::FeedbackQuery) {
            return Err(query_failed("feedback_ids_for_form").into());
        }
        Ok(self
            .state()
            .feedback
            .iter()
            .filter(|f| f.form_id == form_id)
            .map(|f| f.id.clone())
            .collect())
    }

    async fn forms_with_feedback_since(&self, since: DateTime<Utc>) -> InsightResult<Vec<String>> {
        if self.failing(Failure::FeedbackQuery) {
            return Err(query_failed("forms_with_feedback_since").into());
        }
        let forms: BTreeSet<String> = self
            .state()
            .feedback
            .iter()
            .filter(|f| f.created_at >= since)
            .map(|f| f.form_id.clone())
            .collect();
        Ok(forms.into_iter().collect())
    }

    async fn insights_for_feedback(&self, feedback_ids: &[String]) -> InsightResult<Vec<Insight>> {
        if self.failing(Failure::InsightQuery) {
            return Err(query_failed("insights_for_feedback").into());
        }
        let wanted: HashSet<&str> = feedback_ids.iter().map(String::as_str).collect();
        Ok(self
            .state()
            .insights
            .iter()
            .filter(|i| wanted.contains(i.feedback_id.as_str()))
            .cloned()
            .collect())
    }

    async fn update_insight_embedding(
        &self,
        insight_id: &str,
        embedding: &[f32],
    ) -> InsightResult<()> {
        if self.failing(Failure::EmbeddingWrite) {
            return Err(write_failed("update_insight_embedding").into());
        }
        let mut state = self.state();
        let insight = state
            .insights
            .iter_mut()
            .find(|i| i.id == insight_id)
            .ok_or_else(|| PersistenceError::NotFound {
                entity: "insight".to_string(),
                id: insight_id.to_string(),
            })?;
        insight.embedding = Some(embedding.to_vec());
        state.embedding_writes.push(insight_id.to_string());
        Ok(())
    }

    async fn insert_cluster_analysis(&self, analysis: &ClusterAnalysis) -> InsightResult<()> {
        if self.failing(Failure::AnalysisInsert) {
            return Err(write_failed("insert_cluster_analysis").into());
        }
        self.state().analyses.push(analysis.clone());
        Ok(())
    }

    async fn update_cluster_analysis(&self, analysis: &ClusterAnalysis) -> InsightResult<()> {
        if self.failing(Failure::AnalysisUpdate) {
            return Err(write_failed("update_cluster_analysis").into());
        }
        let mut state = self.state();
        let slot = state
            .analyses
            .iter_mut()
            .find(|a| a.id == analysis.id)
            .ok_or_else(|| PersistenceError::NotFound {
                entity: "cluster analysis".to_string(),
                id: analysis.id.clone(),
            })?;
        *slot = analysis.clone();
        Ok(())
    }

    async fn get_cluster_analysis(&self, id: &str) -> InsightResult<Option<ClusterAnalysis>> {
        if self.failing(Failure::AnalysisQuery) {
            return Err(query_failed("get_cluster_analysis").into());
        }
        Ok(self.state().analyses.iter().find(|a| a.id == id).cloned())
    }

    async fn cluster_analyses_for_form(
        &self,
        form_id: &str,
        limit: usize,
    ) -> InsightResult<Vec<ClusterAnalysis>> {
        if self.failing(Failure::AnalysisQuery) {
            return Err(query_failed("cluster_analyses_for_form").into());
        }
        let matching = self
            .state()
            .analyses
            .iter()
            .filter(|a| a.form_id == form_id)
            .cloned()
            .collect();
        Ok(Self::newest_first(matching, limit))
    }

    async fn cluster_analyses_for_organization(
        &self,
        organization_id: &str,
        limit: usize,
    ) -> InsightResult<Vec<ClusterAnalysis>> {
        if self.failing(Failure::AnalysisQuery) {
            return Err(query_failed("cluster_analyses_for_organization").into());
        }
        let matching = self
            .state()
            .analyses
            .iter()
            .filter(|a| a.organization == organization_id)
            .cloned()
            .collect();
        Ok(Self::newest_first(matching, limit))
    }

    async fn find_organization(&self, organization_id: &str) -> InsightResult<Option<Organization>> {
        if self.failing(Failure::OrganizationQuery) {
            return Err(query_failed("find_organization").into());
        }
        Ok(self.state().organizations.get(organization_id).cloned())
    }
}
