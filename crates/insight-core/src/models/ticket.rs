use serde::{Deserialize, Serialize};

/// Reference to a ticket filed in the issue tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketReference {
    pub ticket_id: String,
    pub ticket_url: String,
    #[serde(default)]
    pub status: Option<String>,
}
