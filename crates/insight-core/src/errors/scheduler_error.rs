/// Scheduler errors.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("invalid schedule {expression:?}: {reason}")]
    InvalidSchedule { expression: String, reason: String },

    #[error("no upcoming run for schedule {expression:?}")]
    NoUpcomingRun { expression: String },

    #[error("scheduler timer needs a running tokio runtime")]
    RuntimeUnavailable,
}
