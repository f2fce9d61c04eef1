//! Which forms a scheduled run clusters.
//!
//! Active-form discovery bounds a run to forms with recent feedback. Each
//! active form then passes two guards: it must not have been analyzed within
//! the freshness window, and it must have enough insights to cluster.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use insight_core::config::SchedulerConfig;
use insight_core::errors::InsightResult;
use insight_core::traits::IInsightStore;
use serde::Serialize;

/// Why a form was left out of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// A cluster analysis was recorded inside the freshness window.
    RecentlyAnalyzed { analyzed_at: DateTime<Utc> },
    InsufficientInsights { found: usize, required: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RecentlyAnalyzed { analyzed_at } => {
                write!(f, "analyzed at {}", analyzed_at.to_rfc3339())
            }
            Self::InsufficientInsights { found, required } => {
                write!(f, "{found} insights, at least {required} required")
            }
        }
    }
}

/// What the guards look at for one form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSignals {
    pub last_analysis_at: Option<DateTime<Utc>>,
    pub insight_count: usize,
}

/// Window and threshold settings for the guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardPolicy {
    pub active_window: Duration,
    pub freshness_window: Duration,
    pub min_insights: usize,
}

/// Out-of-range hours saturate here; [`SchedulerConfig::validate`] rejects them.
fn window(hours: i64) -> Duration {
    Duration::try_hours(hours).unwrap_or(if hours < 0 { Duration::MIN } else { Duration::MAX })
}

impl From<&SchedulerConfig> for GuardPolicy {
    fn from(config: &SchedulerConfig) -> Self {
        Self {
            active_window: window(config.active_window_hours),
            freshness_window: window(config.freshness_window_hours),
            min_insights: config.min_insights,
        }
    }
}

impl Default for GuardPolicy {
    fn default() -> Self {
        Self::from(&SchedulerConfig::default())
    }
}

/// Forms with at least one feedback inside the active window ending at `now`.
pub async fn active_forms(
    store: &dyn IInsightStore,
    policy: &GuardPolicy,
    now: DateTime<Utc>,
) -> InsightResult<Vec<String>> {
    store
        .forms_with_feedback_since(now - policy.active_window)
        .await
}

/// Read the signals the guards need for `form_id`.
pub async fn gather_signals(store: &dyn IInsightStore, form_id: &str) -> InsightResult<FormSignals> {
    let last_analysis_at = store
        .cluster_analyses_for_form(form_id, 1)
        .await?
        .first()
        .map(|a| a.created_at);

    let feedback_ids = store.feedback_ids_for_form(form_id).await?;
    let insight_count = if feedback_ids.is_empty() {
        0
    } else {
        store.insights_for_feedback(&feedback_ids).await?.len()
    };

    Ok(FormSignals {
        last_analysis_at,
        insight_count,
    })
}

/// `None` when the form should be clustered. Freshness is checked first.
pub fn skip_reason(
    signals: &FormSignals,
    policy: &GuardPolicy,
    now: DateTime<Utc>,
) -> Option<SkipReason> {
    if let Some(analyzed_at) = signals.last_analysis_at {
        if analyzed_at > now - policy.freshness_window {
            return Some(SkipReason::RecentlyAnalyzed { analyzed_at });
        }
    }
    if signals.insight_count < policy.min_insights {
        return Some(SkipReason::InsufficientInsights {
            found: signals.insight_count,
            required: policy.min_insights,
        });
    }
    None
}
