use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Sentiment;

/// One sentiment-tagged excerpt derived from a feedback submission.
///
/// Only `embedding` is ever written by the clustering pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: String,
    pub feedback_id: String,
    pub form_id: String,
    pub organization: String,
    pub sentiment: Sentiment,
    pub feedback_description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
    pub created_at: DateTime<Utc>,
}

impl Insight {
    /// Text fed to the embedding provider: description then space-joined keywords.
    pub fn embedding_text(&self) -> String {
        format!("{} {}", self.feedback_description, self.keywords.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_text_joins_description_and_keywords() {
        let insight = Insight {
            id: "a".into(),
            feedback_id: "f".into(),
            form_id: "form".into(),
            organization: "org".into(),
            sentiment: Sentiment::Neutral,
            feedback_description: "Checkout is slow".into(),
            keywords: vec!["checkout".into(), "latency".into()],
            embedding: None,
            created_at: Utc::now(),
        };
        assert_eq!(insight.embedding_text(), "Checkout is slow checkout latency");
    }
}
