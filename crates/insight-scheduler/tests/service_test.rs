//! The full pipeline wired through `ClusteringService`.

use std::sync::Arc;

use insight_core::config::InsightConfig;
use insight_core::constants::INSUFFICIENT_INSIGHTS_MESSAGE;
use insight_core::errors::{InsightError, TicketError};
use insight_core::Sentiment;
use insight_scheduler::{ClusteringService, FormOutcome, RunOutcome, SchedulerState, SkipReason};
use test_fixtures::{
    object_id, organization, InMemoryStore, InsightBuilder, RecordingEmbedder, RecordingNotifier,
    RecordingTicketClient, ScriptedGenerativeModel,
};

const ORG: &str = "65a1f0c2a1d3e4f5a6b7c8aa";

struct Harness {
    store: Arc<InMemoryStore>,
    embedder: Arc<RecordingEmbedder>,
    service: ClusteringService,
}

fn harness(config: InsightConfig) -> Harness {
    let store = Arc::new(InMemoryStore::new());
    store.add_organization(organization(ORG));
    let embedder = Arc::new(RecordingEmbedder::new(8));
    let service = ClusteringService::with_embedder(
        store.clone(),
        embedder.clone(),
        Arc::new(ScriptedGenerativeModel::valid()),
        Arc::new(RecordingNotifier::confirming()),
        Arc::new(RecordingTicketClient::accepting()),
        &config,
    )
    .unwrap();
    Harness {
        store,
        embedder,
        service,
    }
}

fn seeded_config() -> InsightConfig {
    let mut config = InsightConfig::default();
    config.clustering.seed = Some(7);
    config
}

fn seed_form(store: &InMemoryStore, form_id: &str, first: u64, count: u64) {
    for i in first..first + count {
        store.add_insight(
            InsightBuilder::new(&object_id(i))
                .form(form_id)
                .organization(ORG)
                .sentiment(Sentiment::Dissatisfied)
                .keywords(&["slow", "checkout"])
                .build(),
        );
    }
}

#[tokio::test]
async fn scheduled_run_clusters_then_respects_freshness() {
    let h = harness(seeded_config());
    let form = object_id(500);
    seed_form(&h.store, &form, 1, 4);

    let first = h.service.run_now().await.unwrap();
    let summary = first.summary().unwrap();
    assert_eq!(summary.successful, 1);
    assert!(matches!(
        summary.report(&form).unwrap().outcome,
        FormOutcome::Succeeded { clusters } if clusters >= 1
    ));
    assert_eq!(h.embedder.calls().len(), 4);

    let recorded = h.service.recent_analyses_for_form(&form, 10).await.unwrap();
    assert!(!recorded.is_empty());
    let clustered: usize = recorded.iter().map(|a| a.cluster_size).sum();
    assert_eq!(clustered, 4);

    // Analyses just recorded put the form inside the freshness window.
    let second = h.service.run_now().await.unwrap();
    assert!(matches!(
        second.summary().unwrap().report(&form).unwrap().outcome,
        FormOutcome::Skipped {
            reason: SkipReason::RecentlyAnalyzed { .. }
        }
    ));
    assert_eq!(h.embedder.calls().len(), 4);
}

#[tokio::test]
async fn manual_form_run_bypasses_guards() {
    let h = harness(seeded_config());
    let form = object_id(501);
    seed_form(&h.store, &form, 10, 1);

    let outcome = h.service.run_for_form(&form).await.unwrap();
    assert!(outcome.is_insufficient());
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["message"], INSUFFICIENT_INSIGHTS_MESSAGE);
    assert_eq!(json["clusters"], serde_json::json!([]));

    seed_form(&h.store, &form, 20, 2);
    let outcome = h.service.run_for_form(&form).await.unwrap();
    assert!(!outcome.is_insufficient());
    assert_eq!(outcome.total_insights(), 3);
}

#[tokio::test]
async fn listings_validate_ids() {
    let h = harness(seeded_config());
    let err = h
        .service
        .recent_analyses_for_form("not-an-id", 5)
        .await
        .unwrap_err();
    assert!(matches!(err, InsightError::InvalidId { .. }));
    assert!(err.is_client_error());

    let form = object_id(502);
    seed_form(&h.store, &form, 30, 3);
    h.service.run_for_form(&form).await.unwrap();
    let by_org = h
        .service
        .recent_analyses_for_organization(ORG, 1)
        .await
        .unwrap();
    assert_eq!(by_org.len(), 1);
}

#[tokio::test]
async fn ticket_requests_pass_through() {
    let h = harness(seeded_config());
    let form = object_id(503);
    seed_form(&h.store, &form, 40, 3);
    let outcome = h.service.run_for_form(&form).await.unwrap();
    let analysis_id = outcome.clusters()[0].id.clone();

    // The fixture organization has no issue tracker.
    let err = h.service.create_ticket(&analysis_id).await.unwrap_err();
    assert!(matches!(
        err,
        InsightError::TicketError(TicketError::NotConfigured { .. })
    ));
}

#[tokio::test]
async fn scheduler_controls_pass_through() {
    let h = harness(seeded_config());
    assert_eq!(h.service.status().is_running, SchedulerState::Stopped);

    let status = h.service.start().unwrap();
    assert_eq!(status.is_running, SchedulerState::Idle);

    let status = h.service.restart(Some("@daily")).unwrap();
    assert_eq!(status.cron_expression, "@daily");
    assert!(status.next_run.is_some());

    let status = h.service.stop();
    assert_eq!(status.is_running, SchedulerState::Stopped);
    assert!(status.next_run.is_none());
}

#[tokio::test]
async fn auto_start_enables_the_timer() {
    let mut config = seeded_config();
    config.scheduler.auto_start = true;
    let h = harness(config);
    assert!(h.service.status().enabled);
    h.service.stop();
}

#[tokio::test]
async fn unusable_config_is_refused_at_construction() {
    let mut config = seeded_config();
    config.clustering.prior_match_overlap = 1.5;
    let result = ClusteringService::with_embedder(
        Arc::new(InMemoryStore::new()),
        Arc::new(RecordingEmbedder::new(8)),
        Arc::new(ScriptedGenerativeModel::valid()),
        Arc::new(RecordingNotifier::confirming()),
        Arc::new(RecordingTicketClient::accepting()),
        &config,
    );
    assert!(matches!(result, Err(InsightError::ConfigError(_))));
}

#[tokio::test]
async fn from_config_uses_the_offline_embedding_backend() {
    let store = Arc::new(InMemoryStore::new());
    store.add_organization(organization(ORG));
    let form = object_id(504);
    seed_form(&store, &form, 50, 3);
    let service = ClusteringService::from_config(
        store.clone(),
        Arc::new(ScriptedGenerativeModel::valid()),
        Arc::new(RecordingNotifier::confirming()),
        Arc::new(RecordingTicketClient::accepting()),
        &InsightConfig::default(),
    )
    .unwrap();

    let outcome = service.run_for_form(&form).await.unwrap();
    assert_eq!(outcome.total_insights(), 3);
    let written = store.insight(&object_id(50)).unwrap().embedding.unwrap();
    assert_eq!(written.len(), 384);

    assert!(matches!(service.run_now().await.unwrap(), RunOutcome::Completed(_)));
}
