use async_trait::async_trait;

use crate::errors::InsightResult;

/// Embedding generation provider.
#[async_trait]
pub trait IEmbeddingProvider: Send + Sync {
    /// Embed a single text, returning a vector of floats.
    async fn embed(&self, text: &str) -> InsightResult<Vec<f32>>;

    /// The dimensionality of embeddings produced by this provider (0 if not yet known).
    fn dimensions(&self) -> usize;

    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Whether this provider is currently able to serve requests.
    fn is_available(&self) -> bool;
}
