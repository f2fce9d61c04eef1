//! EmbeddingEngine: the single shared entry point for text embedding.
//!
//! The model is loaded lazily on first use. Concurrent first callers wait
//! on one in-flight load instead of starting their own; a failed load
//! returns the engine to `Uninitialized` so a later call retries.

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use insight_core::config::EmbeddingConfig;
use insight_core::errors::{EmbeddingError, InsightResult};
use insight_core::traits::IEmbeddingProvider;
use insight_observability::events;
use tokio::sync::OnceCell;
use tracing::Instrument;

use crate::cache::EmbeddingCache;
use crate::normalize;
use crate::providers::{self, IEmbeddingModel, IModelLoader};

/// Lifecycle of the shared model instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum InitState {
    Uninitialized = 0,
    Initializing = 1,
    Ready = 2,
}

impl InitState {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Initializing,
            2 => Self::Ready,
            _ => Self::Uninitialized,
        }
    }
}

pub struct EmbeddingEngine {
    loader: Arc<dyn IModelLoader>,
    model: OnceCell<Arc<dyn IEmbeddingModel>>,
    state: AtomicU8,
    last_load_failed: AtomicBool,
    cache: EmbeddingCache,
    /// 0 accepts whatever the model returns.
    expected_dimensions: usize,
    observed_dimensions: AtomicUsize,
}

impl EmbeddingEngine {
    /// Build an engine with the loader named in `config`.
    pub fn new(config: &EmbeddingConfig) -> Self {
        Self::with_loader(providers::create_loader(config), config)
    }

    /// Build an engine around an explicit loader.
    pub fn with_loader(loader: Arc<dyn IModelLoader>, config: &EmbeddingConfig) -> Self {
        let cache = EmbeddingCache::new(loader.name(), config.l1_cache_size);
        Self {
            loader,
            model: OnceCell::new(),
            state: AtomicU8::new(InitState::Uninitialized as u8),
            last_load_failed: AtomicBool::new(false),
            cache,
            expected_dimensions: config.dimensions,
            observed_dimensions: AtomicUsize::new(0),
        }
    }

    pub fn state(&self) -> InitState {
        InitState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Load the model now instead of on the first embed call.
    pub async fn warm_up(&self) -> InsightResult<()> {
        self.model().await.map(|_| ())
    }

    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }

    async fn model(&self) -> InsightResult<&Arc<dyn IEmbeddingModel>> {
        if let Some(model) = self.model.get() {
            return Ok(model);
        }

        self.model
            .get_or_try_init(|| async {
                self.state
                    .store(InitState::Initializing as u8, Ordering::Release);
                let started = Instant::now();
                match self.loader.load().await {
                    Ok(model) => {
                        self.state.store(InitState::Ready as u8, Ordering::Release);
                        self.last_load_failed.store(false, Ordering::Relaxed);
                        events::embedding_model_loaded(
                            self.loader.name(),
                            started.elapsed().as_millis(),
                        );
                        Ok(model)
                    }
                    Err(e) => {
                        self.state
                            .store(InitState::Uninitialized as u8, Ordering::Release);
                        self.last_load_failed.store(true, Ordering::Relaxed);
                        events::embedding_model_load_failed(self.loader.name(), &e.to_string());
                        Err(e)
                    }
                }
            })
            .await
    }

    fn check_dimensions(&self, actual: usize) -> Result<(), EmbeddingError> {
        if self.expected_dimensions > 0 {
            if actual != self.expected_dimensions {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: self.expected_dimensions,
                    actual,
                });
            }
            return Ok(());
        }
        let _ = self.observed_dimensions.compare_exchange(
            0,
            actual,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        Ok(())
    }

    async fn embed_uncached(&self, text: &str) -> InsightResult<Vec<f32>> {
        let model = self.model().await?;
        let raw = model.infer(text).await?;
        let vector = normalize::to_vector(raw)?;
        self.check_dimensions(vector.len())?;
        Ok(vector)
    }
}

#[async_trait]
impl IEmbeddingProvider for EmbeddingEngine {
    async fn embed(&self, text: &str) -> InsightResult<Vec<f32>> {
        if let Some(hit) = self.cache.get(text) {
            return Ok(hit);
        }

        let span = insight_observability::embedding_span!(self.loader.name());
        let vector = self.embed_uncached(text).instrument(span).await?;
        self.cache.insert(text, vector.clone());
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        if self.expected_dimensions > 0 {
            self.expected_dimensions
        } else {
            self.observed_dimensions.load(Ordering::Acquire)
        }
    }

    fn name(&self) -> &str {
        self.loader.name()
    }

    fn is_available(&self) -> bool {
        self.state() == InitState::Ready || !self.last_load_failed.load(Ordering::Relaxed)
    }
}
