/// Email notification errors.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification send failed: {reason}")]
    SendFailed { reason: String },

    #[error("notification rejected for {recipient}")]
    Rejected { recipient: String },

    #[error("organization {organization} has no contact address")]
    MissingRecipient { organization: String },
}
