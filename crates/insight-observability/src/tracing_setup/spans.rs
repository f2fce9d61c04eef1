//! Span definitions per operation: clustering, scheduler run, embedding, ticketing.

/// Create a per-form clustering span.
#[macro_export]
macro_rules! clustering_span {
    ($form_id:expr) => {
        tracing::info_span!("insight.clustering", form_id = %$form_id)
    };
}

/// Create a scheduler run span.
#[macro_export]
macro_rules! scheduler_run_span {
    ($trigger:expr) => {
        tracing::info_span!("insight.scheduler_run", trigger = %$trigger)
    };
}

/// Create an embedding span.
#[macro_export]
macro_rules! embedding_span {
    ($provider:expr) => {
        tracing::debug_span!("insight.embedding", provider = %$provider)
    };
}

/// Create a ticket creation span.
#[macro_export]
macro_rules! ticket_span {
    ($analysis_id:expr) => {
        tracing::info_span!("insight.ticket", analysis_id = %$analysis_id)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const CLUSTERING: &str = "insight.clustering";
    pub const SCHEDULER_RUN: &str = "insight.scheduler_run";
    pub const EMBEDDING: &str = "insight.embedding";
    pub const TICKET: &str = "insight.ticket";
}
