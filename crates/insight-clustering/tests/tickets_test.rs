//! Explicit ticket creation gated by the organization's delay.

use std::sync::Arc;

use chrono::{Duration, Utc};
use insight_clustering::TicketDispatcher;
use insight_core::errors::{InsightError, PersistenceError, TicketError};
use insight_core::models::IssueTrackerConfig;
use test_fixtures::{analysis, object_id, organization, InMemoryStore, RecordingTicketClient};

const ORG: &str = "65a1f0c2a1d3e4f5a6b7c8aa";

fn tracked_org(delay_days: u32) -> insight_core::Organization {
    let mut org = organization(ORG);
    org.ticket_creation_delay = delay_days;
    org.issue_tracker = Some(IssueTrackerConfig {
        enabled: true,
        base_url: "https://acme.tracker.test".into(),
        project_key: "CX".into(),
        issue_type: "Task".into(),
    });
    org
}

fn setup(
    delay_days: u32,
    age: Duration,
    client: RecordingTicketClient,
) -> (Arc<InMemoryStore>, Arc<RecordingTicketClient>, TicketDispatcher, String) {
    let store = Arc::new(InMemoryStore::new());
    store.add_organization(tracked_org(delay_days));
    let id = object_id(42);
    store.add_analysis(analysis(&id, &object_id(1), ORG, Utc::now() - age, &["a", "b"]));
    let client = Arc::new(client);
    let dispatcher = TicketDispatcher::new(store.clone(), client.clone());
    (store, client, dispatcher, id)
}

#[tokio::test]
async fn refuses_before_delay_then_files_once() {
    let (store, client, dispatcher, id) =
        setup(3, Duration::days(1), RecordingTicketClient::accepting());

    let err = dispatcher.create_ticket_for_analysis(&id).await.unwrap_err();
    assert!(matches!(
        err,
        InsightError::TicketError(TicketError::DelayNotElapsed { remaining_hours: 48 })
    ));
    assert!(err.is_client_error());
    assert!(client.calls().is_empty());

    let later = Utc::now() + Duration::days(2) + Duration::minutes(1);
    let ticket = dispatcher.create_ticket_at(&id, later).await.unwrap().unwrap();
    assert_eq!(ticket.ticket_id, "CX-1");
    assert_eq!(ticket.ticket_url, "https://acme.tracker.test/browse/CX-1");
    assert_eq!(ticket.status.as_deref(), Some("open"));

    let stored = store.analyses().into_iter().find(|a| a.id == id).unwrap();
    assert!(stored.ticket_created);
    assert_eq!(stored.jira_ticket_id.as_deref(), Some("CX-1"));

    // A second request returns the existing ticket without calling the tracker.
    let again = dispatcher.create_ticket_at(&id, later).await.unwrap().unwrap();
    assert_eq!(again.ticket_id, "CX-1");
    assert_eq!(client.calls(), vec![id]);
}

#[tokio::test]
async fn declined_ticket_leaves_analysis_untouched() {
    let (store, client, dispatcher, id) =
        setup(0, Duration::hours(1), RecordingTicketClient::declining());

    assert!(dispatcher.create_ticket_for_analysis(&id).await.unwrap().is_none());
    assert_eq!(client.calls().len(), 1);
    assert!(!store.analyses()[0].ticket_created);
}

#[tokio::test]
async fn tracker_failure_propagates() {
    let (store, _client, dispatcher, id) =
        setup(0, Duration::hours(1), RecordingTicketClient::failing());

    let err = dispatcher.create_ticket_for_analysis(&id).await.unwrap_err();
    assert!(matches!(
        err,
        InsightError::TicketError(TicketError::RequestFailed { .. })
    ));
    assert!(!store.analyses()[0].ticket_created);
}

#[tokio::test]
async fn unconfigured_tracker_is_refused() {
    let store = Arc::new(InMemoryStore::new());
    store.add_organization(organization(ORG));
    let id = object_id(7);
    store.add_analysis(analysis(&id, &object_id(1), ORG, Utc::now() - Duration::days(30), &[]));
    let client = Arc::new(RecordingTicketClient::accepting());
    let dispatcher = TicketDispatcher::new(store, client.clone());

    let err = dispatcher.create_ticket_for_analysis(&id).await.unwrap_err();
    assert!(matches!(
        err,
        InsightError::TicketError(TicketError::NotConfigured { .. })
    ));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn unknown_and_malformed_ids() {
    let (_store, _client, dispatcher, _id) =
        setup(0, Duration::hours(1), RecordingTicketClient::accepting());

    let err = dispatcher
        .create_ticket_for_analysis(&object_id(999))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        InsightError::PersistenceError(PersistenceError::NotFound { .. })
    ));

    let err = dispatcher.create_ticket_for_analysis("xyz").await.unwrap_err();
    assert!(matches!(err, InsightError::InvalidId { .. }));
}
