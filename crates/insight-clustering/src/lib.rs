//! # insight-clustering
//!
//! Groups a form's insights by embedding similarity and records one
//! `ClusterAnalysis` per group. Per-organization thresholds decide whether a
//! cluster gets an AI recommendation or an email alert. Ticket creation is a
//! separate, explicit operation.

pub mod algorithms;
pub mod engine;
pub mod pipeline;
pub mod recommendation;
pub mod tickets;

pub use algorithms::{cluster_embeddings, cosine_similarity, determine_optimal_clusters, KMeans};
pub use engine::InsightClusteringEngine;
pub use recommendation::EnrichmentTracker;
pub use tickets::TicketDispatcher;
