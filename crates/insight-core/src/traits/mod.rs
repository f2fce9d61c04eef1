mod clusterer;
mod embedding;
mod generative;
mod notification;
mod storage;
mod ticket;

pub use clusterer::IFormClusterer;
pub use embedding::IEmbeddingProvider;
pub use generative::IGenerativeModel;
pub use notification::INotificationClient;
pub use storage::IInsightStore;
pub use ticket::ITicketClient;
