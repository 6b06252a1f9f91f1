//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     validating-config (in main) → checking-db → serving
//!                                        ↘ failed (exit 1)
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → broadcast → Stop accepting → Drain connections → Exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then the database gate, then the listener
//! - The gate runs once; later outages show up on /health instead
//! - Any startup error is fatal

pub mod signals;
pub mod startup;

pub use startup::{StartupError, StartupPhase};
