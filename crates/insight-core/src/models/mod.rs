mod cluster_analysis;
mod clustering_outcome;
mod feedback;
mod insight;
mod notification;
mod organization;
mod recommendation;
mod sentiment;
mod ticket;

pub use cluster_analysis::ClusterAnalysis;
pub use clustering_outcome::ClusteringOutcome;
pub use feedback::Feedback;
pub use insight::Insight;
pub use notification::ClusterSummaryData;
pub use organization::{IssueTrackerConfig, Organization};
pub use recommendation::{Impact, Recommendation, Urgency};
pub use sentiment::Sentiment;
pub use ticket::TicketReference;
