/// System version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Minimum number of insights a form needs before clustering runs.
pub const MIN_INSIGHTS_FOR_CLUSTERING: usize = 2;

/// Message returned when a form has too few insights to cluster.
pub const INSUFFICIENT_INSIGHTS_MESSAGE: &str =
    "Not enough insights for clustering (minimum 2 required)";

/// Upper bound on the number of clusters the heuristic will ever pick.
pub const MAX_CLUSTERS: usize = 5;

/// Length of a document-store object id in hex characters.
pub const OBJECT_ID_HEX_LEN: usize = 24;

/// Ticket status recorded when the issue tracker does not report one.
pub const DEFAULT_TICKET_STATUS: &str = "open";
