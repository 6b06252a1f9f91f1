//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events on stderr)
//!     → metrics.rs (probe gauges and histograms)
//!
//! Consumers:
//!     → Log aggregation (platform log drain)
//!     → Metrics endpoint (Prometheus scrape, when METRICS_ADDR is set)
//! ```
//!
//! # Design Decisions
//! - JSON logs in production, human-readable elsewhere
//! - Request ID flows through every request span
//! - Metric updates are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
