//! Model backends and the loader that brings them up.
//!
//! A loader does the expensive part once (health checks, weight loading);
//! the model it yields serves every subsequent inference.

pub mod hashing;
pub mod ollama;

pub use hashing::{HashingLoader, HashingModel};
pub use ollama::{OllamaLoader, OllamaModel};

use std::sync::Arc;

use async_trait::async_trait;
use insight_core::config::{defaults, EmbeddingConfig};
use insight_core::errors::InsightResult;
use tracing::{info, warn};

use crate::normalize::RawEmbedding;

/// A loaded model able to embed one text.
#[async_trait]
pub trait IEmbeddingModel: Send + Sync {
    async fn infer(&self, text: &str) -> InsightResult<RawEmbedding>;
}

/// Brings a model up. Called at most once per successful initialization.
#[async_trait]
pub trait IModelLoader: Send + Sync {
    async fn load(&self) -> InsightResult<Arc<dyn IEmbeddingModel>>;

    fn name(&self) -> &str;
}

/// Create the loader named by `config.provider`.
///
/// Unknown names fall back to the offline hashing backend.
pub fn create_loader(config: &EmbeddingConfig) -> Arc<dyn IModelLoader> {
    let dims = if config.dimensions == 0 {
        defaults::DEFAULT_EMBEDDING_DIMENSIONS
    } else {
        config.dimensions
    };

    match config.provider.as_str() {
        "ollama" => {
            info!(provider = "ollama", model = %config.ollama_model, "embedding loader selected");
            Arc::new(OllamaLoader::new(
                config.ollama_url.clone(),
                config.ollama_model.clone(),
                config.request_timeout_secs,
            ))
        }
        "hashing" => {
            info!(provider = "hashing", "embedding loader selected");
            Arc::new(HashingLoader::new(dims))
        }
        other => {
            warn!(provider = %other, "unknown embedding provider, using hashing fallback");
            Arc::new(HashingLoader::new(dims))
        }
    }
}
