use super::{
    AiServiceError, ClusteringError, EmbeddingError, NotificationError, PersistenceError,
    SchedulerError, TicketError,
};

/// Crate-wide result alias.
pub type InsightResult<T> = Result<T, InsightError>;

/// Top-level error for the insight clustering system.
#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    #[error("invalid identifier: {id:?}")]
    InvalidId { id: String },

    #[error("insufficient data: found {found} insights, at least {required} required")]
    InsufficientData { found: usize, required: usize },

    #[error("embedding error: {0}")]
    EmbeddingError(#[from] EmbeddingError),

    #[error("clustering error: {0}")]
    ClusteringError(#[from] ClusteringError),

    #[error("persistence error: {0}")]
    PersistenceError(#[from] PersistenceError),

    #[error("ai service error: {0}")]
    AiServiceError(#[from] AiServiceError),

    #[error("notification error: {0}")]
    NotificationError(#[from] NotificationError),

    #[error("ticket error: {0}")]
    TicketError(#[from] TicketError),

    #[error("scheduler error: {0}")]
    SchedulerError(#[from] SchedulerError),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl InsightError {
    /// Whether the error was caused by the caller's input (4xx at an HTTP boundary).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidId { .. }
                | Self::TicketError(TicketError::DelayNotElapsed { .. })
                | Self::TicketError(TicketError::NotConfigured { .. })
                | Self::TicketError(TicketError::InProgress { .. })
                | Self::PersistenceError(PersistenceError::NotFound { .. })
        )
    }
}
