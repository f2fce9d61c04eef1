use insight_core::errors::*;

#[test]
fn invalid_id_carries_id() {
    let err = InsightError::InvalidId {
        id: "not-an-id".into(),
    };
    assert!(err.to_string().contains("not-an-id"));
    assert!(err.is_client_error());
}

#[test]
fn insufficient_data_carries_counts() {
    let err = InsightError::InsufficientData {
        found: 1,
        required: 2,
    };
    let msg = err.to_string();
    assert!(msg.contains('1'));
    assert!(msg.contains('2'));
}

// --- From impls ---

#[test]
fn embedding_error_converts() {
    let err: InsightError = EmbeddingError::Format {
        reason: "not a number".into(),
    }
    .into();
    assert!(matches!(err, InsightError::EmbeddingError(_)));
    assert!(!err.is_client_error());
}

#[test]
fn clustering_error_converts() {
    let err: InsightError = ClusteringError::DimensionMismatch { left: 3, right: 4 }.into();
    assert!(matches!(err, InsightError::ClusteringError(_)));
    assert!(err.to_string().contains("3 vs 4"));
}

#[test]
fn persistence_error_converts() {
    let err: InsightError = PersistenceError::QueryFailed {
        operation: "find_feedback".into(),
        reason: "connection reset".into(),
    }
    .into();
    assert!(matches!(err, InsightError::PersistenceError(_)));
    assert!(!err.is_client_error());
}

#[test]
fn not_found_is_client_error() {
    let err: InsightError = PersistenceError::NotFound {
        entity: "cluster analysis".into(),
        id: "abc".into(),
    }
    .into();
    assert!(err.is_client_error());
}

#[test]
fn scheduler_error_carries_expression() {
    let err: InsightError = SchedulerError::InvalidSchedule {
        expression: "61 * * * *".into(),
        reason: "minute out of range".into(),
    }
    .into();
    assert!(err.to_string().contains("61 * * * *"));
}

#[test]
fn serialization_error_converts() {
    let json_err = serde_json::from_str::<String>("not valid json").unwrap_err();
    let err: InsightError = json_err.into();
    assert!(matches!(err, InsightError::SerializationError(_)));
}

#[test]
fn ticket_delay_carries_remaining_hours() {
    let err = TicketError::DelayNotElapsed { remaining_hours: 17 };
    assert!(err.to_string().contains("17"));
}
