//! InsightClusteringEngine: the per-form clustering orchestrator.
//!
//! Steps within one form run strictly in order. Only failures loading the
//! form's feedback or insights abort the run; embedding, AI, email, and
//! per-cluster write failures are logged and degrade the output.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use insight_core::config::ClusteringConfig;
use insight_core::constants::MIN_INSIGHTS_FOR_CLUSTERING;
use insight_core::errors::InsightResult;
use insight_core::ids;
use insight_core::traits::{
    IEmbeddingProvider, IFormClusterer, IGenerativeModel, IInsightStore, INotificationClient,
};
use insight_core::{ClusterAnalysis, ClusteringOutcome, Insight, Organization};
use insight_observability::events;
use tracing::{warn, Instrument};

use crate::algorithms::{determine_optimal_clusters, KMeans};
use crate::pipeline::{backfill_embeddings, decisioning, grouping, labeling, EmbeddedInsight};
use crate::recommendation::EnrichmentTracker;

/// The per-form clustering orchestrator.
pub struct InsightClusteringEngine {
    store: Arc<dyn IInsightStore>,
    embedder: Arc<dyn IEmbeddingProvider>,
    generative: Arc<dyn IGenerativeModel>,
    notifier: Arc<dyn INotificationClient>,
    config: ClusteringConfig,
    tracker: EnrichmentTracker,
}

impl InsightClusteringEngine {
    pub fn new(
        store: Arc<dyn IInsightStore>,
        embedder: Arc<dyn IEmbeddingProvider>,
        generative: Arc<dyn IGenerativeModel>,
        notifier: Arc<dyn INotificationClient>,
        config: ClusteringConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            generative,
            notifier,
            config,
            tracker: EnrichmentTracker::new(),
        }
    }

    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }

    /// AI enrichment statistics across all runs of this engine.
    pub fn enrichment(&self) -> &EnrichmentTracker {
        &self.tracker
    }

    /// Cluster every insight of `form_id` and record one analysis per cluster.
    pub async fn cluster_insights_by_form(&self, form_id: &str) -> InsightResult<ClusteringOutcome> {
        let span = insight_observability::clustering_span!(form_id);
        self.run(form_id).instrument(span).await
    }

    async fn run(&self, form_id: &str) -> InsightResult<ClusteringOutcome> {
        ids::validate_id(form_id)?;

        let feedback_ids = self.store.feedback_ids_for_form(form_id).await?;
        let insights = if feedback_ids.is_empty() {
            Vec::new()
        } else {
            self.store.insights_for_feedback(&feedback_ids).await?
        };

        let total = insights.len();
        if total < MIN_INSIGHTS_FOR_CLUSTERING {
            return Ok(ClusteringOutcome::insufficient(form_id, total));
        }
        let organization_id = insights[0].organization.clone();

        let (embedded, writes) =
            backfill_embeddings(form_id, insights, self.embedder.as_ref(), &self.store).await;
        if embedded.len() < MIN_INSIGHTS_FOR_CLUSTERING {
            writes.drain().await;
            return Ok(ClusteringOutcome::insufficient(form_id, total));
        }

        let (members, vectors): (Vec<Insight>, Vec<Vec<f32>>) = embedded
            .into_iter()
            .map(|EmbeddedInsight { insight, embedding }| (insight, embedding))
            .unzip();

        let k = determine_optimal_clusters(total);
        let fit = KMeans::new(k)
            .with_max_iterations(self.config.max_iterations)
            .with_seed(self.config.seed)
            .fit(&vectors)?;
        if !fit.converged {
            warn!(form_id, iterations = fit.iterations, "k-means stopped before convergence");
        }
        let groups = grouping::partition(&fit.assignments);

        let organization = self.load_organization(form_id, &organization_id).await;
        let priors = self.load_priors(form_id).await;

        let mut clusters = Vec::with_capacity(groups.len());
        for group in groups {
            let cluster: Vec<&Insight> = group.iter().map(|&i| &members[i]).collect();
            let mut draft = self.draft_analysis(form_id, &organization_id, &cluster);

            if let Some(prior) =
                decisioning::match_prior(&draft, &priors, self.config.prior_match_overlap)
            {
                decisioning::carry_over(&mut draft, prior);
            }
            if let Some(org) = &organization {
                self.apply_policy(&mut draft, &cluster, org).await;
            }

            match self.store.insert_cluster_analysis(&draft).await {
                Ok(()) => {
                    events::cluster_recorded(
                        form_id,
                        &draft.id,
                        draft.cluster_size,
                        draft.sentiment_percentage,
                    );
                    clusters.push(draft);
                }
                Err(e) => {
                    events::cluster_write_failed(form_id, &draft.cluster_label, &e.to_string())
                }
            }
        }

        writes.drain().await;
        events::clustering_completed(form_id, total, clusters.len());

        Ok(ClusteringOutcome::Clustered {
            form_id: form_id.to_string(),
            total_insights: total,
            clusters,
        })
    }

    fn draft_analysis(
        &self,
        form_id: &str,
        organization_id: &str,
        cluster: &[&Insight],
    ) -> ClusterAnalysis {
        let sentiment_percentage = grouping::negative_percentage(cluster);
        let (impact, urgency) = decisioning::default_rating(sentiment_percentage);
        ClusterAnalysis {
            id: ids::new_id(),
            form_id: form_id.to_string(),
            organization: organization_id.to_string(),
            cluster_label: labeling::cluster_label(cluster, self.config.label_keyword_count),
            cluster_summary: labeling::cluster_summary(
                cluster,
                self.config.summary_description_count,
            ),
            insight_ids: cluster.iter().map(|i| i.id.clone()).collect(),
            sentiment_percentage,
            cluster_size: cluster.len(),
            recommendation: None,
            impact,
            urgency,
            ticket_created: false,
            jira_ticket_id: None,
            jira_ticket_url: None,
            jira_ticket_status: None,
            email_notification_sent: false,
            email_notification_date: None,
            created_at: Utc::now(),
        }
    }

    async fn apply_policy(
        &self,
        draft: &mut ClusterAnalysis,
        cluster: &[&Insight],
        organization: &Organization,
    ) {
        let decision = decisioning::decide(organization, draft.sentiment_percentage);
        if decision.recommend {
            decisioning::apply_recommendation(
                draft,
                cluster,
                self.generative.as_ref(),
                &self.tracker,
            )
            .await;
        }
        if decision.notify {
            decisioning::apply_notification(draft, organization, self.notifier.as_ref()).await;
        }
    }

    async fn load_organization(&self, form_id: &str, organization_id: &str) -> Option<Organization> {
        match self.store.find_organization(organization_id).await {
            Ok(Some(org)) => Some(org),
            Ok(None) => {
                warn!(form_id, organization = %organization_id, "organization not found, skipping decisioning");
                None
            }
            Err(e) => {
                events::enrichment_degraded(form_id, organization_id, "organization", &e.to_string());
                None
            }
        }
    }

    async fn load_priors(&self, form_id: &str) -> Vec<ClusterAnalysis> {
        match self
            .store
            .cluster_analyses_for_form(form_id, self.config.prior_analysis_lookback)
            .await
        {
            Ok(priors) => priors,
            Err(e) => {
                warn!(form_id, error = %e, "prior analyses unavailable, treating clusters as new");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl IFormClusterer for InsightClusteringEngine {
    async fn cluster_form(&self, form_id: &str) -> InsightResult<ClusteringOutcome> {
        self.cluster_insights_by_form(form_id).await
    }
}
