//! Test fixtures for the insight workspace: an in-memory document store,
//! recording fakes for every collaborator, record builders, and the golden
//! feedback datasets under `golden/`.

pub mod builders;
pub mod fakes;
pub mod golden;
pub mod store;

pub use builders::{analysis, feedback, object_id, organization, InsightBuilder};
pub use fakes::{
    FormBehavior, RecordingEmbedder, RecordingNotifier, RecordingTicketClient,
    ScriptedGenerativeModel, SentNotification, SpyClusterer,
};
pub use golden::{load_fixture, GoldenDataset};
pub use store::{Failure, InMemoryStore};
