use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A feedback submission. The pipeline only reads its identity and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: String,
    pub form_id: String,
    pub organization: String,
    pub created_at: DateTime<Utc>,
}
