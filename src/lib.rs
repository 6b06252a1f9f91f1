//! HOMP API library: validated configuration, dependency health probes and
//! the HTTP surface that reports them.

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::{Config, ConfigError};
pub use health::{HealthProber, HealthReport};
pub use http::HttpServer;
