/// Persistence-store errors.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("query failed during {operation}: {reason}")]
    QueryFailed { operation: String, reason: String },

    #[error("write failed during {operation}: {reason}")]
    WriteFailed { operation: String, reason: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },
}
