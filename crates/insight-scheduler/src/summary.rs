//! Per-run reporting.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::guards::SkipReason;

/// What happened to one active form during a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FormOutcome {
    Skipped { reason: SkipReason },
    Succeeded { clusters: usize },
    /// The pipeline ran but found too few usable insights.
    Insufficient { total_insights: usize },
    Failed { error: String },
}

impl FormOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Insufficient { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormRunReport {
    pub form_id: String,
    pub outcome: FormOutcome,
}

/// Summary of one completed scheduled run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub active_forms: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
    pub forms: Vec<FormRunReport>,
}

impl RunSummary {
    pub fn from_reports(
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        forms: Vec<FormRunReport>,
    ) -> Self {
        let mut successful = 0;
        let mut failed = 0;
        let mut skipped = 0;
        for report in &forms {
            match report.outcome {
                FormOutcome::Skipped { .. } => skipped += 1,
                FormOutcome::Failed { .. } => failed += 1,
                FormOutcome::Succeeded { .. } | FormOutcome::Insufficient { .. } => {
                    successful += 1
                }
            }
        }
        Self {
            started_at,
            finished_at,
            active_forms: forms.len(),
            successful,
            failed,
            skipped,
            forms,
        }
    }

    pub fn report(&self, form_id: &str) -> Option<&FormRunReport> {
        self.forms.iter().find(|r| r.form_id == form_id)
    }
}

/// Result of asking for a scheduled run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RunOutcome {
    Completed(RunSummary),
    /// Another run was in flight; nothing was done.
    AlreadyRunning,
}

impl RunOutcome {
    pub fn summary(&self) -> Option<&RunSummary> {
        match self {
            Self::Completed(summary) => Some(summary),
            Self::AlreadyRunning => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(form_id: &str, outcome: FormOutcome) -> FormRunReport {
        FormRunReport {
            form_id: form_id.to_string(),
            outcome,
        }
    }

    #[test]
    fn counts_each_outcome() {
        let now = Utc::now();
        let summary = RunSummary::from_reports(
            now,
            now,
            vec![
                report("a", FormOutcome::Succeeded { clusters: 3 }),
                report("b", FormOutcome::Insufficient { total_insights: 1 }),
                report(
                    "c",
                    FormOutcome::Failed {
                        error: "boom".into(),
                    },
                ),
                report(
                    "d",
                    FormOutcome::Skipped {
                        reason: SkipReason::InsufficientInsights {
                            found: 0,
                            required: 2,
                        },
                    },
                ),
            ],
        );
        assert_eq!(summary.active_forms, 4);
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert!(summary.report("c").is_some());
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(report("a", FormOutcome::Succeeded { clusters: 2 })).unwrap();
        assert_eq!(json["formId"], "a");
        assert_eq!(json["outcome"]["status"], "succeeded");
        assert_eq!(json["outcome"]["clusters"], 2);
    }
}
