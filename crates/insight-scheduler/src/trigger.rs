//! ClusteringService: the thin entry point callers use.
//!
//! Every method passes straight through to the orchestrator, the scheduler,
//! the ticket dispatcher, or the store.

use std::sync::Arc;

use insight_clustering::{InsightClusteringEngine, TicketDispatcher};
use insight_core::errors::InsightResult;
use insight_core::ids;
use insight_core::models::TicketReference;
use insight_core::traits::{
    IEmbeddingProvider, IGenerativeModel, IInsightStore, INotificationClient, ITicketClient,
};
use insight_core::{ClusterAnalysis, ClusteringOutcome, InsightConfig};
use insight_embeddings::EmbeddingEngine;

use crate::scheduler::{ClusteringScheduler, SchedulerStatus};
use crate::summary::RunOutcome;

/// Upper bound on analyses returned by one listing call.
const MAX_LISTING_LIMIT: usize = 100;

pub struct ClusteringService {
    engine: Arc<InsightClusteringEngine>,
    scheduler: ClusteringScheduler,
    tickets: TicketDispatcher,
    store: Arc<dyn IInsightStore>,
}

impl ClusteringService {
    /// Wire the full pipeline with the embedding backend named in `config`.
    pub fn from_config(
        store: Arc<dyn IInsightStore>,
        generative: Arc<dyn IGenerativeModel>,
        notifier: Arc<dyn INotificationClient>,
        ticket_client: Arc<dyn ITicketClient>,
        config: &InsightConfig,
    ) -> InsightResult<Self> {
        let embedder: Arc<dyn IEmbeddingProvider> =
            Arc::new(EmbeddingEngine::new(&config.embedding));
        Self::with_embedder(store, embedder, generative, notifier, ticket_client, config)
    }

    /// Wire the full pipeline around an explicit embedding provider.
    ///
    /// Fails on config values that cannot be used. Starts the scheduler when
    /// `scheduler.auto_start` is set, which requires a tokio runtime.
    pub fn with_embedder(
        store: Arc<dyn IInsightStore>,
        embedder: Arc<dyn IEmbeddingProvider>,
        generative: Arc<dyn IGenerativeModel>,
        notifier: Arc<dyn INotificationClient>,
        ticket_client: Arc<dyn ITicketClient>,
        config: &InsightConfig,
    ) -> InsightResult<Self> {
        config.validate()?;
        let engine = Arc::new(InsightClusteringEngine::new(
            Arc::clone(&store),
            embedder,
            generative,
            notifier,
            config.clustering.clone(),
        ));
        let scheduler =
            ClusteringScheduler::new(engine.clone(), Arc::clone(&store), &config.scheduler);
        let tickets = TicketDispatcher::new(Arc::clone(&store), ticket_client);

        let service = Self {
            engine,
            scheduler,
            tickets,
            store,
        };
        if config.scheduler.auto_start {
            service.scheduler.start()?;
        }
        Ok(service)
    }

    pub fn engine(&self) -> &InsightClusteringEngine {
        &self.engine
    }

    pub fn scheduler(&self) -> &ClusteringScheduler {
        &self.scheduler
    }

    /// Cluster one form now, outside the schedule and its guards.
    pub async fn run_for_form(&self, form_id: &str) -> InsightResult<ClusteringOutcome> {
        self.engine.cluster_insights_by_form(form_id).await
    }

    /// A scheduled run triggered by hand.
    pub async fn run_now(&self) -> InsightResult<RunOutcome> {
        self.scheduler.run_scheduled_clustering().await
    }

    pub fn status(&self) -> SchedulerStatus {
        self.scheduler.status()
    }

    pub fn start(&self) -> InsightResult<SchedulerStatus> {
        self.scheduler.start()?;
        Ok(self.scheduler.status())
    }

    pub fn stop(&self) -> SchedulerStatus {
        self.scheduler.stop();
        self.scheduler.status()
    }

    pub fn restart(&self, cron_expression: Option<&str>) -> InsightResult<SchedulerStatus> {
        self.scheduler.restart(cron_expression)?;
        Ok(self.scheduler.status())
    }

    pub async fn create_ticket(&self, analysis_id: &str) -> InsightResult<Option<TicketReference>> {
        self.tickets.create_ticket_for_analysis(analysis_id).await
    }

    /// Most recent analyses for a form, newest first.
    pub async fn recent_analyses_for_form(
        &self,
        form_id: &str,
        limit: usize,
    ) -> InsightResult<Vec<ClusterAnalysis>> {
        ids::validate_id(form_id)?;
        self.store
            .cluster_analyses_for_form(form_id, limit.min(MAX_LISTING_LIMIT))
            .await
    }

    /// Most recent analyses for an organization, newest first.
    pub async fn recent_analyses_for_organization(
        &self,
        organization_id: &str,
        limit: usize,
    ) -> InsightResult<Vec<ClusterAnalysis>> {
        ids::validate_id(organization_id)?;
        self.store
            .cluster_analyses_for_organization(organization_id, limit.min(MAX_LISTING_LIMIT))
            .await
    }
}
