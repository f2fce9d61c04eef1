use serde::{Deserialize, Serialize};

use super::defaults;
use crate::errors::{InsightError, InsightResult};

/// Periodic clustering scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// 5-field cron expression (UTC). Validated when the scheduler starts.
    pub cron_expression: String,
    /// Forms with feedback newer than this many hours are considered active.
    pub active_window_hours: i64,
    /// Forms analyzed within this many hours are skipped.
    pub freshness_window_hours: i64,
    /// Forms with fewer insights than this are skipped.
    pub min_insights: usize,
    /// Cap on concurrently clustered forms. 0 = unbounded.
    pub max_concurrent_forms: usize,
    /// Start the timer as soon as the service is built.
    pub auto_start: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            cron_expression: defaults::DEFAULT_CRON_EXPRESSION.to_string(),
            active_window_hours: defaults::DEFAULT_ACTIVE_WINDOW_HOURS,
            freshness_window_hours: defaults::DEFAULT_FRESHNESS_WINDOW_HOURS,
            min_insights: defaults::DEFAULT_MIN_INSIGHTS,
            max_concurrent_forms: defaults::DEFAULT_MAX_CONCURRENT_FORMS,
            auto_start: false,
        }
    }
}

impl SchedulerConfig {
    /// Check the guard windows. The cron expression is checked separately,
    /// when the timer starts.
    pub fn validate(&self) -> InsightResult<()> {
        if !(1..=defaults::MAX_WINDOW_HOURS).contains(&self.active_window_hours) {
            return Err(invalid(
                "scheduler.active_window_hours",
                self.active_window_hours,
                1,
            ));
        }
        // Zero disables the freshness guard.
        if !(0..=defaults::MAX_WINDOW_HOURS).contains(&self.freshness_window_hours) {
            return Err(invalid(
                "scheduler.freshness_window_hours",
                self.freshness_window_hours,
                0,
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, value: i64, min: i64) -> InsightError {
    InsightError::ConfigError(format!(
        "{field} = {value}: must be between {min} and {} hours",
        defaults::MAX_WINDOW_HOURS
    ))
}
