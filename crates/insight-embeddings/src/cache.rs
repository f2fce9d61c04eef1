//! Per-model vector cache backed by moka.
//!
//! Repeated insight texts (duplicate submissions, re-runs after a failed
//! write-back) are served without touching the model. Keys mix the model
//! name into the text hash, so vectors from one backend are never served
//! for another.

use std::time::Duration;

use moka::sync::Cache;

/// Entries untouched for this long are evicted.
const IDLE_EVICTION: Duration = Duration::from_secs(3600);

pub struct EmbeddingCache {
    model: String,
    vectors: Cache<blake3::Hash, Vec<f32>>,
}

impl EmbeddingCache {
    pub fn new(model: &str, max_entries: u64) -> Self {
        Self {
            model: model.to_string(),
            vectors: Cache::builder()
                .max_capacity(max_entries)
                .time_to_idle(IDLE_EVICTION)
                .build(),
        }
    }

    fn key(&self, text: &str) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.model.as_bytes());
        hasher.update(&[0]);
        hasher.update(text.as_bytes());
        hasher.finalize()
    }

    pub fn get(&self, text: &str) -> Option<Vec<f32>> {
        self.vectors.get(&self.key(text))
    }

    pub fn insert(&self, text: &str, vector: Vec<f32>) {
        self.vectors.insert(self.key(text), vector);
    }
}
