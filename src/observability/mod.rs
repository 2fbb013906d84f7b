//! Operational visibility for the wagering core
//!
//! Two pieces: cheap atomic counters over orchestrator activity, and a
//! health registry whose most important job is making failed compensations
//! visible to operators as pending manual reconciliations.

pub mod health;
pub mod metrics;

pub use health::{HealthRegistry, HealthStatus, ReconciliationFlag};
pub use metrics::{CoreMetrics, MetricsSnapshot};
