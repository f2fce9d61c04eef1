/// Issue-tracker ticket errors.
#[derive(Debug, thiserror::Error)]
pub enum TicketError {
    #[error("issue tracker not configured for organization {organization}")]
    NotConfigured { organization: String },

    #[error("ticket creation delay not elapsed: {remaining_hours}h remaining")]
    DelayNotElapsed { remaining_hours: i64 },

    #[error("ticket creation already in progress for analysis {analysis_id}")]
    InProgress { analysis_id: String },

    #[error("ticket request failed: {reason}")]
    RequestFailed { reason: String },
}
