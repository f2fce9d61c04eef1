//! Offline feature-hashing backend.
//!
//! Hashes terms into fixed-dimension buckets weighted by term frequency.
//! Not as semantically rich as a neural model, but always available and
//! deterministic, which is what tests and air-gapped deployments need.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use insight_core::errors::InsightResult;

use super::{IEmbeddingModel, IModelLoader};
use crate::normalize::RawEmbedding;

/// Loader for [`HashingModel`]. Loading never fails.
pub struct HashingLoader {
    dimensions: usize,
}

impl HashingLoader {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

#[async_trait]
impl IModelLoader for HashingLoader {
    async fn load(&self) -> InsightResult<Arc<dyn IEmbeddingModel>> {
        Ok(Arc::new(HashingModel::new(self.dimensions)))
    }

    fn name(&self) -> &str {
        "hashing"
    }
}

pub struct HashingModel {
    dimensions: usize,
}

impl HashingModel {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    /// Bucket index and sign for a term. The sign bit halves the damage of
    /// bucket collisions.
    fn hash_term(term: &str, dims: usize) -> (usize, f32) {
        let digest = blake3::hash(term.as_bytes());
        let bytes = digest.as_bytes();
        let mut word = [0u8; 8];
        word.copy_from_slice(&bytes[..8]);
        let h = u64::from_le_bytes(word);
        let sign = if bytes[8] & 1 == 0 { 1.0 } else { -1.0 };
        ((h % dims as u64) as usize, sign)
    }

    /// Lowercase alphanumeric terms of at least two characters.
    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|s| s.chars().count() >= 2)
            .map(|s| s.to_lowercase())
            .collect()
    }

    pub fn vectorize(&self, text: &str) -> Vec<f32> {
        let tokens = Self::tokenize(text);
        let mut vec = vec![0.0f32; self.dimensions];
        if tokens.is_empty() {
            return vec;
        }

        let mut tf: HashMap<&str, f32> = HashMap::new();
        for tok in &tokens {
            *tf.entry(tok.as_str()).or_default() += 1.0;
        }

        let total = tokens.len() as f32;
        for (term, count) in &tf {
            let freq = count / total;
            // Longer terms carry more signal than short function words.
            let idf = 1.0 + (term.len() as f32).ln();
            let (bucket, sign) = Self::hash_term(term, self.dimensions);
            vec[bucket] += sign * freq * idf;
        }

        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }
        vec
    }
}

#[async_trait]
impl IEmbeddingModel for HashingModel {
    async fn infer(&self, text: &str) -> InsightResult<RawEmbedding> {
        Ok(RawEmbedding::F32(self.vectorize(text)))
    }
}
