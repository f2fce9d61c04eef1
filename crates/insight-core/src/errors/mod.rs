mod ai_service_error;
mod clustering_error;
mod embedding_error;
mod insight_error;
mod notification_error;
mod persistence_error;
mod scheduler_error;
mod ticket_error;

pub use ai_service_error::AiServiceError;
pub use clustering_error::ClusteringError;
pub use embedding_error::EmbeddingError;
pub use insight_error::{InsightError, InsightResult};
pub use notification_error::NotificationError;
pub use persistence_error::PersistenceError;
pub use scheduler_error::SchedulerError;
pub use ticket_error::TicketError;
