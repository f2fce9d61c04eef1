use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding backend: "hashing" or "ollama".
    pub provider: String,
    /// Expected embedding dimensions. 0 accepts whatever the model returns.
    pub dimensions: usize,
    /// L1 in-memory cache max entries.
    pub l1_cache_size: u64,
    /// Base URL of the Ollama server.
    pub ollama_url: String,
    /// Model name passed to Ollama.
    pub ollama_model: String,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: defaults::DEFAULT_EMBEDDING_PROVIDER.to_string(),
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            l1_cache_size: defaults::DEFAULT_L1_CACHE_SIZE,
            ollama_url: defaults::DEFAULT_OLLAMA_URL.to_string(),
            ollama_model: defaults::DEFAULT_OLLAMA_MODEL.to_string(),
            request_timeout_secs: defaults::DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}
