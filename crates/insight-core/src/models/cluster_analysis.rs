use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Impact, TicketReference, Urgency};
use crate::constants::DEFAULT_TICKET_STATUS;

/// One persisted cluster produced by a clustering run.
///
/// Inserted once per cluster per run. Ticket and email fields are updated
/// later; records are never deleted by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterAnalysis {
    pub id: String,
    pub form_id: String,
    pub organization: String,
    pub cluster_label: String,
    pub cluster_summary: String,
    pub insight_ids: BTreeSet<String>,
    /// Share of negative-sentiment insights, 0-100.
    pub sentiment_percentage: f64,
    pub cluster_size: usize,
    pub recommendation: Option<String>,
    pub impact: Impact,
    pub urgency: Urgency,
    pub ticket_created: bool,
    pub jira_ticket_id: Option<String>,
    pub jira_ticket_url: Option<String>,
    pub jira_ticket_status: Option<String>,
    pub email_notification_sent: bool,
    pub email_notification_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ClusterAnalysis {
    /// Jaccard overlap of the two insight sets, in `[0, 1]`.
    pub fn overlap_with(&self, other: &ClusterAnalysis) -> f64 {
        let union = self.insight_ids.union(&other.insight_ids).count();
        if union == 0 {
            return 0.0;
        }
        let shared = self.insight_ids.intersection(&other.insight_ids).count();
        shared as f64 / union as f64
    }

    /// The filed ticket, if any.
    pub fn ticket(&self) -> Option<TicketReference> {
        if !self.ticket_created {
            return None;
        }
        Some(TicketReference {
            ticket_id: self.jira_ticket_id.clone().unwrap_or_default(),
            ticket_url: self.jira_ticket_url.clone().unwrap_or_default(),
            status: self.jira_ticket_status.clone(),
        })
    }

    /// Record a filed ticket on this analysis.
    pub fn record_ticket(&mut self, ticket: &TicketReference) {
        self.ticket_created = true;
        self.jira_ticket_id = Some(ticket.ticket_id.clone());
        self.jira_ticket_url = Some(ticket.ticket_url.clone());
        self.jira_ticket_status = Some(
            ticket
                .status
                .clone()
                .unwrap_or_else(|| DEFAULT_TICKET_STATUS.to_string()),
        );
    }

    /// Record a confirmed email notification.
    pub fn record_notification(&mut self, at: DateTime<Utc>) {
        self.email_notification_sent = true;
        self.email_notification_date = Some(at);
    }
}
