use serde::{Deserialize, Serialize};

/// Issue-tracker settings for an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueTrackerConfig {
    pub enabled: bool,
    pub base_url: String,
    pub project_key: String,
    #[serde(default = "default_issue_type")]
    pub issue_type: String,
}

fn default_issue_type() -> String {
    "Task".to_string()
}

/// Organization policy, read-only to the pipeline.
///
/// Thresholds are fractions in `[0, 1]`; cluster sentiment percentages are
/// divided by 100 before comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub contact_email: Option<String>,
    pub recommendation_threshold: f64,
    pub notification_threshold: f64,
    /// Days a cluster analysis must age before a ticket may be filed for it.
    pub ticket_creation_delay: u32,
    #[serde(default)]
    pub issue_tracker: Option<IssueTrackerConfig>,
}

impl Organization {
    /// Whether a cluster with this negative percentage (0-100) warrants an AI recommendation.
    pub fn wants_recommendation(&self, sentiment_percentage: f64) -> bool {
        sentiment_percentage / 100.0 >= self.recommendation_threshold
    }

    /// Whether a cluster with this negative percentage (0-100) warrants an email alert.
    pub fn wants_notification(&self, sentiment_percentage: f64) -> bool {
        sentiment_percentage / 100.0 >= self.notification_threshold
    }

    /// The issue tracker config, only when it is enabled.
    pub fn active_issue_tracker(&self) -> Option<&IssueTrackerConfig> {
        self.issue_tracker.as_ref().filter(|t| t.enabled)
    }
}
