//! Dependency health subsystem.
//!
//! # Data Flow
//! ```text
//! GET /health (or the startup gate)
//!     → prober.rs spawns one task per dependency
//!         → postgres.rs: SELECT 1 on the shared pool
//!         → broker.rs:   fresh connection → PING → drop
//!     → each task bounded by its own deadline
//!     → HealthReport { db, redis } → 200 / 503
//! ```
//!
//! # Design Decisions
//! - Probe outcomes are values (`Result<(), ProbeError>`), never propagated
//! - Probes run isolated: an error, timeout or panic in one cannot affect the other
//! - No retries and no caching; every request probes afresh
//! - Only the database decides the status code; the broker is informational

pub mod broker;
pub mod postgres;
pub mod probe;
pub mod prober;

pub use broker::RedisProbe;
pub use postgres::PostgresProbe;
pub use probe::{DependencyStatus, Probe, ProbeError};
pub use prober::{HealthProber, HealthReport};
