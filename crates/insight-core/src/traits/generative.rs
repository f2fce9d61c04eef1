use async_trait::async_trait;

use crate::errors::InsightResult;

/// Generative-AI text service. Treated as unreliable by callers.
#[async_trait]
pub trait IGenerativeModel: Send + Sync {
    /// Complete `prompt`, returning the raw model text.
    async fn generate(&self, prompt: &str) -> InsightResult<String>;

    fn name(&self) -> &str;
}
