//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment (or a fabricated map in tests)
//!     → source.rs (EnvSource lookup)
//!     → validation.rs (per-key typed checks)
//!     → loader.rs (collect every violation, build Config)
//!     → Config (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is built once in `main` and never reloaded
//! - Validation is all-or-nothing: either a complete Config or every violation
//! - Optional keys carry defaults; required keys never do
//! - Secrets are wrapped so `Debug` output cannot leak them

pub mod loader;
pub mod schema;
pub mod source;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{
    BrokerConfig, Config, DatabaseConfig, Environment, ObjectStorageConfig, ObservabilityConfig,
    ServerConfig,
};
pub use source::{EnvSource, ProcessEnv};
pub use validation::ValidationError;
