//! ClusteringScheduler: runs the per-form pipeline across active forms on a
//! cron timer.
//!
//! Two independent flags carry the state. `enabled` is set while the timer
//! task is registered, `busy` while a run is in flight. At most one run
//! executes at a time; a second request is refused, never queued. The busy
//! flag is released by a drop guard, so a failed or panicking run cannot
//! leave the scheduler stuck.

use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use chrono::{DateTime, Utc};
use insight_core::config::SchedulerConfig;
use insight_core::errors::{InsightResult, SchedulerError};
use insight_core::traits::{IFormClusterer, IInsightStore};
use insight_observability::events;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tracing::{debug, error, info, warn, Instrument};

use crate::cron::CronSchedule;
use crate::dashboard::SchedulerDashboard;
use crate::guards::{self, GuardPolicy};
use crate::summary::{FormOutcome, FormRunReport, RunOutcome, RunSummary};

/// Scheduler state as reported to callers, derived from the two flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerState {
    Stopped,
    Idle,
    Processing,
}

impl SchedulerState {
    fn derive(enabled: bool, busy: bool) -> Self {
        match (enabled, busy) {
            (_, true) => Self::Processing,
            (true, false) => Self::Idle,
            (false, false) => Self::Stopped,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerStatus {
    pub is_running: SchedulerState,
    pub enabled: bool,
    pub busy: bool,
    pub cron_expression: String,
    /// `None` while the timer is inactive.
    pub next_run: Option<DateTime<Utc>>,
    pub last_run: Option<RunSummary>,
}

struct Timer {
    schedule: CronSchedule,
    task: JoinHandle<()>,
}

struct Shared {
    clusterer: Arc<dyn IFormClusterer>,
    store: Arc<dyn IInsightStore>,
    config: SchedulerConfig,
    policy: GuardPolicy,
    expression: Mutex<String>,
    enabled: AtomicBool,
    busy: AtomicBool,
    timer: Mutex<Option<Timer>>,
    dashboard: Mutex<SchedulerDashboard>,
}

impl Drop for Shared {
    fn drop(&mut self) {
        if let Some(timer) = lock(&self.timer).take() {
            timer.task.abort();
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// Clears the busy flag on every exit path.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn try_acquire(flag: &AtomicBool) -> Option<BusyGuard<'_>> {
    flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .ok()
        .map(|_| BusyGuard(flag))
}

/// Cheap to clone; clones share one timer and one pair of flags.
#[derive(Clone)]
pub struct ClusteringScheduler {
    shared: Arc<Shared>,
}

impl ClusteringScheduler {
    /// Build a stopped scheduler. The cron expression and the guard windows
    /// are validated by [`Self::start`].
    pub fn new(
        clusterer: Arc<dyn IFormClusterer>,
        store: Arc<dyn IInsightStore>,
        config: &SchedulerConfig,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                clusterer,
                store,
                config: config.clone(),
                policy: GuardPolicy::from(config),
                expression: Mutex::new(config.cron_expression.clone()),
                enabled: AtomicBool::new(false),
                busy: AtomicBool::new(false),
                timer: Mutex::new(None),
                dashboard: Mutex::new(SchedulerDashboard::new()),
            }),
        }
    }

    /// Register the timer and enable it. A no-op when already started.
    ///
    /// An invalid expression leaves the scheduler stopped. Must be called
    /// from inside a tokio runtime.
    pub fn start(&self) -> InsightResult<()> {
        self.shared.config.validate()?;
        let expression = lock(&self.shared.expression).clone();
        let schedule = CronSchedule::parse(&expression)?;
        self.start_with(schedule)
    }

    fn start_with(&self, schedule: CronSchedule) -> InsightResult<()> {
        let mut timer = lock(&self.shared.timer);
        if timer.is_some() {
            debug!("clustering scheduler already started");
            return Ok(());
        }

        let first = schedule.next_after(Utc::now())?;
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| SchedulerError::RuntimeUnavailable)?;
        let task = runtime.spawn(timer_loop(Arc::downgrade(&self.shared), schedule.clone()));

        info!(cron = %schedule.expression(), next_run = %first, "clustering scheduler started");
        *timer = Some(Timer { schedule, task });
        self.shared.enabled.store(true, Ordering::Release);
        Ok(())
    }

    /// Disable and release the timer. A run already in flight finishes.
    pub fn stop(&self) {
        let Some(timer) = lock(&self.shared.timer).take() else {
            return;
        };
        self.shared.enabled.store(false, Ordering::Release);
        timer.task.abort();
        info!("clustering scheduler stopped");
    }

    /// Stop, then start again, optionally with a new expression.
    ///
    /// A new expression is validated before the running timer is touched.
    pub fn restart(&self, expression: Option<&str>) -> InsightResult<()> {
        self.shared.config.validate()?;
        let schedule = match expression {
            Some(raw) => CronSchedule::parse(raw)?,
            None => CronSchedule::parse(&lock(&self.shared.expression))?,
        };
        schedule.next_after(Utc::now())?;

        self.stop();
        *lock(&self.shared.expression) = schedule.expression().to_string();
        self.start_with(schedule)
    }

    pub fn status(&self) -> SchedulerStatus {
        let enabled = self.shared.enabled.load(Ordering::Acquire);
        let busy = self.shared.busy.load(Ordering::Acquire);
        let next_run = lock(&self.shared.timer)
            .as_ref()
            .filter(|_| enabled)
            .and_then(|t| t.schedule.next_after(Utc::now()).ok());

        SchedulerStatus {
            is_running: SchedulerState::derive(enabled, busy),
            enabled,
            busy,
            cron_expression: lock(&self.shared.expression).clone(),
            next_run,
            last_run: lock(&self.shared.dashboard).last_run.clone(),
        }
    }

    pub fn state(&self) -> SchedulerState {
        SchedulerState::derive(
            self.shared.enabled.load(Ordering::Acquire),
            self.shared.busy.load(Ordering::Acquire),
        )
    }

    pub fn dashboard(&self) -> SchedulerDashboard {
        lock(&self.shared.dashboard).clone()
    }

    /// Cluster every eligible active form now.
    ///
    /// Returns [`RunOutcome::AlreadyRunning`] without touching any form when
    /// another run is in flight. Only unusable guard windows and a failure to
    /// discover active forms are returned as errors; per-form failures land
    /// in the summary.
    pub async fn run_scheduled_clustering(&self) -> InsightResult<RunOutcome> {
        self.run("manual").await
    }

    async fn run(&self, trigger: &'static str) -> InsightResult<RunOutcome> {
        let Some(_busy) = try_acquire(&self.shared.busy) else {
            events::scheduler_run_refused();
            return Ok(RunOutcome::AlreadyRunning);
        };

        let span = insight_observability::scheduler_run_span!(trigger);
        let summary = self.fan_out().instrument(span).await?;

        lock(&self.shared.dashboard).record_run(&summary);
        events::scheduler_run_completed(
            summary.active_forms,
            summary.successful,
            summary.failed,
            summary.skipped,
        );
        Ok(RunOutcome::Completed(summary))
    }

    /// Guard and cluster every active form concurrently; all tasks settle.
    async fn fan_out(&self) -> InsightResult<RunSummary> {
        self.shared.config.validate()?;
        let started_at = Utc::now();
        let forms =
            guards::active_forms(self.shared.store.as_ref(), &self.shared.policy, started_at)
                .await?;
        info!(active_forms = forms.len(), "starting scheduled clustering run");

        let cap = self.shared.config.max_concurrent_forms;
        let limiter = (cap > 0).then(|| Arc::new(Semaphore::new(cap)));

        let mut set = JoinSet::new();
        let mut task_index = HashMap::with_capacity(forms.len());
        for (index, form_id) in forms.iter().enumerate() {
            let shared = Arc::clone(&self.shared);
            let limiter = limiter.clone();
            let form_id = form_id.clone();
            let handle = set.spawn(async move {
                let _permit = match limiter {
                    Some(limiter) => limiter.acquire_owned().await.ok(),
                    None => None,
                };
                (index, run_form(&shared, &form_id, started_at).await)
            });
            task_index.insert(handle.id(), index);
        }

        let mut outcomes: Vec<Option<FormOutcome>> = vec![None; forms.len()];
        while let Some(joined) = set.join_next_with_id().await {
            match joined {
                Ok((_, (index, outcome))) => outcomes[index] = Some(outcome),
                Err(e) => {
                    let Some(&index) = task_index.get(&e.id()) else {
                        continue;
                    };
                    let error = join_failure(e);
                    events::form_failed(&forms[index], &error);
                    outcomes[index] = Some(FormOutcome::Failed { error });
                }
            }
        }

        let reports = forms
            .into_iter()
            .zip(outcomes)
            .map(|(form_id, outcome)| FormRunReport {
                form_id,
                outcome: outcome.unwrap_or_else(|| FormOutcome::Failed {
                    error: "form task did not report".to_string(),
                }),
            })
            .collect();

        Ok(RunSummary::from_reports(started_at, Utc::now(), reports))
    }
}

/// Guard one form, then run its pipeline. Never fails; errors become the outcome.
async fn run_form(shared: &Shared, form_id: &str, now: DateTime<Utc>) -> FormOutcome {
    let signals = match guards::gather_signals(shared.store.as_ref(), form_id).await {
        Ok(signals) => signals,
        Err(e) => {
            let error = e.to_string();
            events::form_failed(form_id, &error);
            return FormOutcome::Failed { error };
        }
    };

    if let Some(reason) = guards::skip_reason(&signals, &shared.policy, now) {
        events::form_skipped(form_id, &reason.to_string());
        return FormOutcome::Skipped { reason };
    }

    match shared.clusterer.cluster_form(form_id).await {
        Ok(outcome) if outcome.is_insufficient() => FormOutcome::Insufficient {
            total_insights: outcome.total_insights(),
        },
        Ok(outcome) => FormOutcome::Succeeded {
            clusters: outcome.clusters().len(),
        },
        Err(e) => {
            let error = e.to_string();
            events::form_failed(form_id, &error);
            FormOutcome::Failed { error }
        }
    }
}

fn join_failure(e: JoinError) -> String {
    if !e.is_panic() {
        return "form task cancelled".to_string();
    }
    let payload: Box<dyn Any + Send> = e.into_panic();
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("form pipeline panicked: {message}")
}

/// Sleep until each tick and spawn a run. Runs are separate tasks so
/// aborting this loop never cancels one in flight.
async fn timer_loop(shared: Weak<Shared>, schedule: CronSchedule) {
    let mut after = Utc::now();
    loop {
        let next = match schedule.next_after(after) {
            Ok(next) => next,
            Err(e) => {
                warn!(error = %e, "no upcoming scheduled run, timer exiting");
                return;
            }
        };
        let wait = (next - Utc::now()).to_std().unwrap_or_default();
        tokio::time::sleep(wait).await;
        after = next.max(Utc::now());

        let Some(shared) = shared.upgrade() else {
            return;
        };
        if !shared.enabled.load(Ordering::Acquire) {
            return;
        }
        let scheduler = ClusteringScheduler { shared };
        tokio::spawn(async move {
            if let Err(e) = scheduler.run("timer").await {
                error!(error = %e, "scheduled clustering run failed");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_is_derived_from_flags() {
        assert_eq!(SchedulerState::derive(false, false), SchedulerState::Stopped);
        assert_eq!(SchedulerState::derive(true, false), SchedulerState::Idle);
        assert_eq!(SchedulerState::derive(true, true), SchedulerState::Processing);
        assert_eq!(SchedulerState::derive(false, true), SchedulerState::Processing);
    }

    #[test]
    fn busy_guard_releases_on_drop() {
        let flag = AtomicBool::new(false);
        {
            let _guard = try_acquire(&flag).unwrap();
            assert!(try_acquire(&flag).is_none());
        }
        assert!(!flag.load(Ordering::Acquire));
        assert!(try_acquire(&flag).is_some());
    }
}
