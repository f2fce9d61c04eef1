//! Per-cluster threshold decisioning against organization policy.
//!
//! Percentages are compared as fractions. Every collaborator failure here
//! degrades the cluster and is logged; none of them fail the run.

use chrono::Utc;
use insight_core::errors::NotificationError;
use insight_core::models::ClusterSummaryData;
use insight_core::traits::{IGenerativeModel, INotificationClient};
use insight_core::{ClusterAnalysis, Impact, Insight, Organization, Urgency};
use insight_observability::events;
use tracing::debug;

use crate::recommendation::{self, EnrichmentTracker};

/// Which downstream actions a cluster qualifies for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub recommend: bool,
    pub notify: bool,
}

pub fn decide(organization: &Organization, sentiment_percentage: f64) -> Decision {
    Decision {
        recommend: organization.wants_recommendation(sentiment_percentage),
        notify: organization.wants_notification(sentiment_percentage),
    }
}

/// Default impact and urgency before any AI enrichment.
pub fn default_rating(sentiment_percentage: f64) -> (Impact, Urgency) {
    let fraction = sentiment_percentage / 100.0;
    (
        Impact::from_negative_fraction(fraction),
        Urgency::from_negative_fraction(fraction),
    )
}

/// The prior analysis describing the same cluster, if any.
///
/// Picks the highest insight-set overlap at or above `min_overlap`. `priors`
/// are newest first, so ties resolve to the most recent.
pub fn match_prior<'a>(
    draft: &ClusterAnalysis,
    priors: &'a [ClusterAnalysis],
    min_overlap: f64,
) -> Option<&'a ClusterAnalysis> {
    let mut best: Option<(&ClusterAnalysis, f64)> = None;
    for prior in priors {
        let overlap = draft.overlap_with(prior);
        if overlap < min_overlap {
            continue;
        }
        if best.map_or(true, |(_, b)| overlap > b) {
            best = Some((prior, overlap));
        }
    }
    best.map(|(p, _)| p)
}

/// Copy downstream-action state from a matched prior so the new record
/// neither re-sends an email nor requests a duplicate ticket.
pub fn carry_over(draft: &mut ClusterAnalysis, prior: &ClusterAnalysis) {
    if prior.ticket_created {
        draft.ticket_created = true;
        draft.jira_ticket_id = prior.jira_ticket_id.clone();
        draft.jira_ticket_url = prior.jira_ticket_url.clone();
        draft.jira_ticket_status = prior.jira_ticket_status.clone();
    }
    if prior.email_notification_sent {
        draft.email_notification_sent = true;
        draft.email_notification_date = prior.email_notification_date;
    }
}

/// Attach an AI recommendation. On failure the draft keeps its heuristic
/// summary and default rating.
pub async fn apply_recommendation(
    draft: &mut ClusterAnalysis,
    members: &[&Insight],
    model: &dyn IGenerativeModel,
    tracker: &EnrichmentTracker,
) {
    let prompt =
        recommendation::build_prompt(&draft.cluster_label, draft.sentiment_percentage, members);
    match recommendation::request_recommendation(model, &prompt).await {
        Ok(rec) => {
            tracker.record_enriched();
            draft.recommendation = Some(rec.recommendation);
            draft.impact = rec.impact;
            draft.urgency = rec.urgency;
            if !rec.cluster_summary.is_empty() {
                draft.cluster_summary = rec.cluster_summary;
            }
        }
        Err(e) => {
            tracker.record_degraded();
            events::enrichment_degraded(
                &draft.form_id,
                &draft.organization,
                "recommendation",
                &e.to_string(),
            );
        }
    }
}

/// Email the organization about this cluster unless its prior state was
/// already notified. The sent flag is set only on confirmed delivery.
pub async fn apply_notification(
    draft: &mut ClusterAnalysis,
    organization: &Organization,
    notifier: &dyn INotificationClient,
) {
    if draft.email_notification_sent {
        debug!(form_id = %draft.form_id, cluster = %draft.cluster_label, "cluster already notified");
        return;
    }

    let Some(recipient) = organization
        .contact_email
        .as_deref()
        .filter(|a| !a.trim().is_empty())
    else {
        let err = NotificationError::MissingRecipient {
            organization: organization.id.clone(),
        };
        events::enrichment_degraded(
            &draft.form_id,
            &draft.organization,
            "notification",
            &err.to_string(),
        );
        return;
    };

    let summary = ClusterSummaryData::from(&*draft);
    match notifier
        .send(recipient, &summary, draft.sentiment_percentage)
        .await
    {
        Ok(true) => {
            draft.record_notification(Utc::now());
            events::notification_sent(
                &draft.form_id,
                &draft.organization,
                draft.sentiment_percentage,
            );
        }
        Ok(false) => {
            let err = NotificationError::Rejected {
                recipient: recipient.to_string(),
            };
            events::enrichment_degraded(
                &draft.form_id,
                &draft.organization,
                "notification",
                &err.to_string(),
            );
        }
        Err(e) => events::enrichment_degraded(
            &draft.form_id,
            &draft.organization,
            "notification",
            &e.to_string(),
        ),
    }
}
