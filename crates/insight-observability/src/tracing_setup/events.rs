//! Structured log events for key system operations.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log a backfilled insight embedding.
pub fn embedding_backfilled(insight_id: &str, dimensions: usize) {
    tracing::debug!(
        event = "embedding_backfilled",
        insight_id = %insight_id,
        dimensions = dimensions,
        "insight embedding computed"
    );
}

/// Log a loaded embedding model.
pub fn embedding_model_loaded(provider: &str, elapsed_ms: u128) {
    tracing::info!(
        event = "embedding_model_loaded",
        provider = %provider,
        elapsed_ms = elapsed_ms as u64,
        "embedding model ready"
    );
}

/// Log a failed model load. The next embed call retries.
pub fn embedding_model_load_failed(provider: &str, error: &str) {
    tracing::warn!(
        event = "embedding_model_load_failed",
        provider = %provider,
        error = %error,
        "embedding model failed to load"
    );
}

/// Log a failed embedding write-back. Never fatal to the run.
pub fn embedding_write_failed(insight_id: &str, error: &str) {
    tracing::warn!(
        event = "embedding_write_failed",
        insight_id = %insight_id,
        error = %error,
        "failed to persist insight embedding"
    );
}

/// Log a failed embedding computation for one insight.
pub fn embedding_failed(form_id: &str, insight_id: &str, error: &str) {
    tracing::warn!(
        event = "embedding_failed",
        form_id = %form_id,
        insight_id = %insight_id,
        error = %error,
        "embedding failed, insight excluded from clustering"
    );
}

/// Log a recorded cluster analysis.
pub fn cluster_recorded(
    form_id: &str,
    analysis_id: &str,
    cluster_size: usize,
    sentiment_percentage: f64,
) {
    tracing::info!(
        event = "cluster_recorded",
        form_id = %form_id,
        analysis_id = %analysis_id,
        cluster_size = cluster_size,
        sentiment_percentage = sentiment_percentage,
        "cluster analysis recorded"
    );
}

/// Log a failed cluster analysis insert.
pub fn cluster_write_failed(form_id: &str, cluster_label: &str, error: &str) {
    tracing::error!(
        event = "cluster_write_failed",
        form_id = %form_id,
        cluster_label = %cluster_label,
        error = %error,
        "failed to persist cluster analysis"
    );
}

/// Log a completed clustering run for one form.
pub fn clustering_completed(form_id: &str, total_insights: usize, clusters: usize) {
    tracing::info!(
        event = "clustering_completed",
        form_id = %form_id,
        total_insights = total_insights,
        clusters = clusters,
        "clustering completed"
    );
}

/// Log a degraded cluster enrichment (AI, email, or ticket collaborator failed).
pub fn enrichment_degraded(form_id: &str, organization: &str, component: &str, error: &str) {
    tracing::warn!(
        event = "enrichment_degraded",
        form_id = %form_id,
        organization = %organization,
        component = %component,
        error = %error,
        "cluster enrichment degraded"
    );
}

/// Log a confirmed email notification.
pub fn notification_sent(form_id: &str, organization: &str, sentiment_percentage: f64) {
    tracing::info!(
        event = "notification_sent",
        form_id = %form_id,
        organization = %organization,
        sentiment_percentage = sentiment_percentage,
        "cluster notification sent"
    );
}

/// Log a created issue-tracker ticket.
pub fn ticket_created(analysis_id: &str, ticket_id: &str) {
    tracing::info!(
        event = "ticket_created",
        analysis_id = %analysis_id,
        ticket_id = %ticket_id,
        "issue tracker ticket created"
    );
}

/// Log a form skipped by the scheduler.
pub fn form_skipped(form_id: &str, reason: &str) {
    tracing::debug!(
        event = "form_skipped",
        form_id = %form_id,
        reason = %reason,
        "form skipped"
    );
}

/// Log a form whose pipeline failed inside a scheduled run.
pub fn form_failed(form_id: &str, error: &str) {
    tracing::error!(
        event = "form_failed",
        form_id = %form_id,
        error = %error,
        "scheduled clustering failed for form"
    );
}

/// Log a completed scheduler run.
pub fn scheduler_run_completed(active: usize, successful: usize, failed: usize, skipped: usize) {
    tracing::info!(
        event = "scheduler_run_completed",
        active = active,
        successful = successful,
        failed = failed,
        skipped = skipped,
        "scheduled clustering run completed"
    );
}

/// Log a refused run because another is in flight.
pub fn scheduler_run_refused() {
    tracing::warn!(
        event = "scheduler_run_refused",
        "clustering run already in progress, skipping"
    );
}
