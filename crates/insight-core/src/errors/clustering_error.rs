/// Clustering engine errors.
#[derive(Debug, thiserror::Error)]
pub enum ClusteringError {
    #[error("vector dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("invalid cluster count: {k}")]
    InvalidClusterCount { k: usize },
}
