//! Clustering math: cosine similarity, k-means, cluster-count heuristic.

pub mod cluster_count;
pub mod kmeans;
pub mod similarity;

pub use cluster_count::determine_optimal_clusters;
pub use kmeans::{cluster_embeddings, KMeans, KMeansResult};
pub use similarity::{cosine_distance, cosine_similarity};
