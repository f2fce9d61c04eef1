//! # insight-core
//!
//! Foundation crate for the insight clustering system.
//! Defines the data model, collaborator traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod ids;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::InsightConfig;
pub use errors::{InsightError, InsightResult};
pub use models::{
    ClusterAnalysis, ClusteringOutcome, Feedback, Impact, Insight, Organization, Sentiment,
    Urgency,
};
