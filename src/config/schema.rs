//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the API.
//! Values are only ever produced by the loader, so every field is already
//! validated when a `Config` exists.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Environment variable names.
pub mod keys {
    pub const DATABASE_URL: &str = "DATABASE_URL";
    pub const REDIS_URL: &str = "REDIS_URL";
    pub const APP_ENV: &str = "APP_ENV";
    /// Read for the execution mode when `APP_ENV` is unset.
    pub const NODE_ENV: &str = "NODE_ENV";
    pub const HOST: &str = "HOST";
    pub const PORT: &str = "PORT";
    pub const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
    pub const DB_PROBE_TIMEOUT_MS: &str = "DB_PROBE_TIMEOUT_MS";
    pub const REDIS_CONNECT_TIMEOUT_MS: &str = "REDIS_CONNECT_TIMEOUT_MS";
    pub const S3_ENDPOINT: &str = "S3_ENDPOINT";
    pub const S3_BUCKET: &str = "S3_BUCKET";
    pub const S3_ACCESS_KEY_ID: &str = "S3_ACCESS_KEY_ID";
    pub const S3_SECRET_ACCESS_KEY: &str = "S3_SECRET_ACCESS_KEY";
    pub const S3_REGION: &str = "S3_REGION";
    pub const METRICS_ADDR: &str = "METRICS_ADDR";

    /// Keys that have no default and must be set.
    pub const REQUIRED: &[&str] = &[
        DATABASE_URL,
        REDIS_URL,
        S3_ENDPOINT,
        S3_BUCKET,
        S3_ACCESS_KEY_ID,
        S3_SECRET_ACCESS_KEY,
    ];
}

pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_DB_PROBE_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_REDIS_CONNECT_TIMEOUT_MS: u64 = 3_000;
pub const DEFAULT_S3_REGION: &str = "us-east-1";

/// Root configuration for the API process.
#[derive(Debug)]
pub struct Config {
    /// Execution mode.
    pub environment: Environment,

    /// Listener settings.
    pub server: ServerConfig,

    /// PostgreSQL connection and probe settings.
    pub database: DatabaseConfig,

    /// Redis connection and probe settings.
    pub broker: BrokerConfig,

    /// S3-compatible object storage settings.
    pub storage: ObjectStorageConfig,

    /// Metrics exposition.
    pub observability: ObservabilityConfig,
}

/// Execution mode of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    /// Accepted spellings, in declaration order.
    pub const VARIANTS: &'static [&'static str] = &["development", "test", "production"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "production" => Ok(Environment::Production),
            _ => Err(()),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind (e.g., 0.0.0.0).
    pub host: IpAddr,

    /// Listening port. Zero asks the OS for an ephemeral port.
    pub port: u16,

    /// Upper bound on the total time spent serving one request.
    pub request_timeout: Duration,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// PostgreSQL configuration.
#[derive(Debug)]
pub struct DatabaseConfig {
    /// Connection URL (may embed credentials).
    pub url: SecretString,

    /// Deadline for a single liveness probe.
    pub probe_timeout: Duration,
}

/// Redis configuration.
#[derive(Debug)]
pub struct BrokerConfig {
    /// Connection URL (may embed credentials).
    pub url: SecretString,

    /// Deadline for connect + PING.
    pub connect_timeout: Duration,
}

/// Object storage configuration. Only validated; nothing reads or writes objects.
#[derive(Debug)]
pub struct ObjectStorageConfig {
    pub endpoint: Url,
    pub bucket: String,
    pub access_key_id: String,
    pub secret_access_key: SecretString,
    pub region: String,
}

/// Observability configuration.
#[derive(Debug, Clone, Default)]
pub struct ObservabilityConfig {
    /// Prometheus scrape endpoint; metrics are disabled when unset.
    pub metrics_address: Option<SocketAddr>,
}
