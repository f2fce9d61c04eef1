//! Explicit issue-tracker ticket creation for a recorded cluster analysis.
//!
//! Never triggered by a clustering run. An analysis must age for the
//! organization's `ticket_creation_delay` days before a ticket may be filed,
//! and an analysis carries at most one ticket.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use insight_core::errors::{InsightResult, PersistenceError, TicketError};
use insight_core::ids;
use insight_core::models::TicketReference;
use insight_core::traits::{IInsightStore, ITicketClient};
use insight_core::ClusterAnalysis;
use insight_observability::events;
use tracing::{info, Instrument};

pub struct TicketDispatcher {
    store: Arc<dyn IInsightStore>,
    client: Arc<dyn ITicketClient>,
    in_flight: Mutex<HashSet<String>>,
}

/// Removes an analysis id from the in-flight set on every exit path.
struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<String>>,
    analysis_id: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut set = self.set.lock().unwrap_or_else(|e| e.into_inner());
        set.remove(&self.analysis_id);
    }
}

impl TicketDispatcher {
    pub fn new(store: Arc<dyn IInsightStore>, client: Arc<dyn ITicketClient>) -> Self {
        Self {
            store,
            client,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// File a ticket for `analysis_id`, or return the one it already has.
    ///
    /// `Ok(None)` means the tracker declined to create one.
    pub async fn create_ticket_for_analysis(
        &self,
        analysis_id: &str,
    ) -> InsightResult<Option<TicketReference>> {
        self.create_ticket_at(analysis_id, Utc::now()).await
    }

    /// [`Self::create_ticket_for_analysis`] with an explicit clock.
    pub async fn create_ticket_at(
        &self,
        analysis_id: &str,
        now: DateTime<Utc>,
    ) -> InsightResult<Option<TicketReference>> {
        let span = insight_observability::ticket_span!(analysis_id);
        self.create(analysis_id, now).instrument(span).await
    }

    fn claim(&self, analysis_id: &str) -> Result<InFlightGuard<'_>, TicketError> {
        let mut set = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if !set.insert(analysis_id.to_string()) {
            return Err(TicketError::InProgress {
                analysis_id: analysis_id.to_string(),
            });
        }
        Ok(InFlightGuard {
            set: &self.in_flight,
            analysis_id: analysis_id.to_string(),
        })
    }

    async fn create(
        &self,
        analysis_id: &str,
        now: DateTime<Utc>,
    ) -> InsightResult<Option<TicketReference>> {
        ids::validate_id(analysis_id)?;
        let _guard = self.claim(analysis_id)?;

        let mut analysis = self
            .store
            .get_cluster_analysis(analysis_id)
            .await?
            .ok_or_else(|| PersistenceError::NotFound {
                entity: "cluster analysis".to_string(),
                id: analysis_id.to_string(),
            })?;

        if let Some(existing) = analysis.ticket() {
            info!(ticket_id = %existing.ticket_id, "ticket already exists");
            return Ok(Some(existing));
        }

        let organization = self
            .store
            .find_organization(&analysis.organization)
            .await?
            .ok_or_else(|| PersistenceError::NotFound {
                entity: "organization".to_string(),
                id: analysis.organization.clone(),
            })?;
        let tracker = organization
            .active_issue_tracker()
            .ok_or_else(|| TicketError::NotConfigured {
                organization: organization.id.clone(),
            })?;

        check_delay(&analysis, organization.ticket_creation_delay, now)?;

        let Some(ticket) = self.client.create_ticket(&analysis, tracker).await? else {
            info!("issue tracker declined to create a ticket");
            return Ok(None);
        };

        analysis.record_ticket(&ticket);
        self.store.update_cluster_analysis(&analysis).await?;
        events::ticket_created(&analysis.id, &ticket.ticket_id);
        Ok(analysis.ticket())
    }
}

/// Refuse until `created_at + delay_days` has passed.
fn check_delay(
    analysis: &ClusterAnalysis,
    delay_days: u32,
    now: DateTime<Utc>,
) -> Result<(), TicketError> {
    let due = analysis.created_at + Duration::days(i64::from(delay_days));
    if now >= due {
        return Ok(());
    }
    // Any partial hour counts as a full one, so a refusal never reports 0h.
    let remaining_seconds = (due - now).num_seconds();
    Err(TicketError::DelayNotElapsed {
        remaining_hours: ((remaining_seconds + 3599) / 3600).max(1),
    })
}
