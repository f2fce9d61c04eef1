//! Per-form pipeline stages, run in order by the engine:
//! backfill → k-means → grouping → labeling → decisioning → persistence.

pub mod backfill;
pub mod decisioning;
pub mod grouping;
pub mod labeling;

pub use backfill::{backfill_embeddings, EmbeddedInsight, PendingWrites};
pub use decisioning::{decide, Decision};
