//! Record builders with sensible defaults.

use chrono::{DateTime, Utc};
use insight_core::{ClusterAnalysis, Feedback, Impact, Insight, Organization, Sentiment, Urgency};

/// Deterministic 24-hex object id for `n`.
pub fn object_id(n: u64) -> String {
    format!("{n:024x}")
}

pub fn feedback(id: &str, form_id: &str, organization: &str, created_at: DateTime<Utc>) -> Feedback {
    Feedback {
        id: id.to_string(),
        form_id: form_id.to_string(),
        organization: organization.to_string(),
        created_at,
    }
}

/// An organization with 0.5 thresholds, no ticket delay, and a contact address.
pub fn organization(id: &str) -> Organization {
    Organization {
        id: id.to_string(),
        name: format!("Org {id}"),
        contact_email: Some(format!("alerts+{id}@example.test")),
        recommendation_threshold: 0.5,
        notification_threshold: 0.5,
        ticket_creation_delay: 0,
        issue_tracker: None,
    }
}

/// A minimal recorded analysis for `form_id`.
pub fn analysis(
    id: &str,
    form_id: &str,
    organization: &str,
    created_at: DateTime<Utc>,
    insight_ids: &[&str],
) -> ClusterAnalysis {
    ClusterAnalysis {
        id: id.to_string(),
        form_id: form_id.to_string(),
        organization: organization.to_string(),
        cluster_label: "fixture".to_string(),
        cluster_summary: "fixture cluster".to_string(),
        insight_ids: insight_ids.iter().map(|s| s.to_string()).collect(),
        sentiment_percentage: 0.0,
        cluster_size: insight_ids.len(),
        recommendation: None,
        impact: Impact::Low,
        urgency: Urgency::Later,
        ticket_created: false,
        jira_ticket_id: None,
        jira_ticket_url: None,
        jira_ticket_status: None,
        email_notification_sent: false,
        email_notification_date: None,
        created_at,
    }
}

pub struct InsightBuilder {
    insight: Insight,
}

impl InsightBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            insight: Insight {
                id: id.to_string(),
                feedback_id: id.to_string(),
                form_id: String::new(),
                organization: String::new(),
                sentiment: Sentiment::Neutral,
                feedback_description: format!("feedback {id}"),
                keywords: Vec::new(),
                embedding: None,
                created_at: Utc::now(),
            },
        }
    }

    pub fn form(mut self, form_id: &str) -> Self {
        self.insight.form_id = form_id.to_string();
        self
    }

    pub fn feedback(mut self, feedback_id: &str) -> Self {
        self.insight.feedback_id = feedback_id.to_string();
        self
    }

    pub fn organization(mut self, organization: &str) -> Self {
        self.insight.organization = organization.to_string();
        self
    }

    pub fn sentiment(mut self, sentiment: Sentiment) -> Self {
        self.insight.sentiment = sentiment;
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.insight.feedback_description = description.to_string();
        self
    }

    pub fn keywords(mut self, keywords: &[&str]) -> Self {
        self.insight.keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn embedding(mut self, embedding: Vec<f32>) -> Self {
        self.insight.embedding = Some(embedding);
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.insight.created_at = created_at;
        self
    }

    pub fn build(self) -> Insight {
        self.insight
    }
}
