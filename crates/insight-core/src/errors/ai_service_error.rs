/// Generative-AI collaborator errors.
#[derive(Debug, thiserror::Error)]
pub enum AiServiceError {
    #[error("ai request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("malformed ai response: {reason}")]
    MalformedResponse { reason: String },
}
