//! Ollama local embedding backend.
//!
//! Loading performs the health check; a server that is down leaves the
//! engine uninitialized so the next call retries.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use insight_core::errors::{EmbeddingError, InsightResult};
use serde::Serialize;
use tracing::debug;

use super::{IEmbeddingModel, IModelLoader};
use crate::normalize::RawEmbedding;

const HEALTH_CHECK_TIMEOUT_SECS: u64 = 5;

pub struct OllamaLoader {
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OllamaLoader {
    pub fn new(base_url: String, model: String, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            timeout: Duration::from_secs(timeout_secs.max(1)),
        }
    }

    fn load_error(&self, reason: impl Into<String>) -> EmbeddingError {
        EmbeddingError::ModelLoadFailed {
            model: self.model.clone(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl IModelLoader for OllamaLoader {
    async fn load(&self) -> InsightResult<Arc<dyn IEmbeddingModel>> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| self.load_error(format!("client build failed: {e}")))?;

        let url = format!("{}/api/tags", self.base_url);
        let resp = client
            .get(&url)
            .timeout(Duration::from_secs(HEALTH_CHECK_TIMEOUT_SECS))
            .send()
            .await
            .map_err(|e| self.load_error(format!("Ollama unreachable: {e}")))?;

        if !resp.status().is_success() {
            return Err(self
                .load_error(format!("health check returned {}", resp.status()))
                .into());
        }
        debug!(model = %self.model, "Ollama health check passed");

        Ok(Arc::new(OllamaModel {
            client,
            url: format!("{}/api/embed", self.base_url),
            model: self.model.clone(),
        }))
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

#[derive(Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

pub struct OllamaModel {
    client: reqwest::Client,
    url: String,
    model: String,
}

#[async_trait]
impl IEmbeddingModel for OllamaModel {
    async fn infer(&self, text: &str) -> InsightResult<RawEmbedding> {
        let request = OllamaEmbedRequest {
            model: &self.model,
            input: vec![text],
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| EmbeddingError::ProviderFailed {
                reason: format!("Ollama HTTP error: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::ProviderFailed {
                reason: format!("Ollama returned {status}: {body}"),
            }
            .into());
        }

        let mut body: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::ProviderFailed {
                    reason: format!("Ollama JSON parse error: {e}"),
                })?;

        // `{"embeddings": [[...]]}`; the single-row batch is unwrapped by normalization.
        let embeddings = body
            .get_mut("embeddings")
            .map(serde_json::Value::take)
            .ok_or_else(|| EmbeddingError::Format {
                reason: "Ollama response has no embeddings field".to_string(),
            })?;

        Ok(RawEmbedding::Json(embeddings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_server_fails_to_load() {
        // Port 9 (discard) is essentially never an HTTP server.
        let loader = OllamaLoader::new("http://127.0.0.1:9".to_string(), "m".to_string(), 1);
        let err = loader.load().await.err().expect("load should fail");
        assert!(err.to_string().contains("model load failed"));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let loader = OllamaLoader::new("http://host:11434/".to_string(), "m".to_string(), 5);
        assert_eq!(loader.base_url, "http://host:11434");
    }
}
