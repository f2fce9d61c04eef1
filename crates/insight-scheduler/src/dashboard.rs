//! Running totals across scheduled runs.

use serde::Serialize;

use crate::summary::RunSummary;

/// Snapshot of scheduler health for observability. Refused runs are not recorded.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerDashboard {
    pub total_runs: usize,
    pub forms_succeeded: usize,
    pub forms_failed: usize,
    pub forms_skipped: usize,
    /// Fraction of attempted (non-skipped) forms that succeeded, 0.0 before any attempt.
    pub success_rate: f64,
    pub last_run: Option<RunSummary>,
}

impl SchedulerDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_run(&mut self, summary: &RunSummary) {
        self.total_runs += 1;
        self.forms_succeeded += summary.successful;
        self.forms_failed += summary.failed;
        self.forms_skipped += summary.skipped;

        let attempted = self.forms_succeeded + self.forms_failed;
        self.success_rate = if attempted > 0 {
            self.forms_succeeded as f64 / attempted as f64
        } else {
            0.0
        };
        self.last_run = Some(summary.clone());
    }
}
