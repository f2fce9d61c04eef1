//! # insight-scheduler
//!
//! Runs the per-form clustering pipeline across every active form on a cron
//! schedule, and exposes the whole system through [`ClusteringService`].
//!
//! ## Architecture
//!
//! ```text
//! ClusteringService
//! ├── InsightClusteringEngine (run one form now)
//! ├── TicketDispatcher (explicit ticket creation)
//! └── ClusteringScheduler
//!     ├── CronSchedule (UTC, 5-field)
//!     ├── guards (active window → freshness → sufficiency)
//!     ├── fan-out (JoinSet, optional semaphore, all-settle)
//!     └── SchedulerDashboard (running totals)
//! ```

pub mod cron;
pub mod dashboard;
pub mod guards;
pub mod scheduler;
pub mod summary;
pub mod trigger;

pub use cron::CronSchedule;
pub use dashboard::SchedulerDashboard;
pub use guards::{GuardPolicy, SkipReason};
pub use scheduler::{ClusteringScheduler, SchedulerState, SchedulerStatus};
pub use summary::{FormOutcome, FormRunReport, RunOutcome, RunSummary};
pub use trigger::ClusteringService;
