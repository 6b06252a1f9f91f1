//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the dependency probes from configuration
//! - Gate startup on one bounded database probe
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last, so traffic only arrives once the database answered
//! - After serving begins the gate never runs again

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::Config;
use crate::health::{HealthProber, ProbeError};
use crate::http::HttpServer;

const DATABASE_HINT: &str = "Ensure docker compose is running: docker compose up -d postgres";

/// Phases of process startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupPhase {
    ValidatingConfig,
    CheckingDatabase,
    Serving,
    Failed,
}

impl fmt::Display for StartupPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StartupPhase::ValidatingConfig => "validating-config",
            StartupPhase::CheckingDatabase => "checking-db",
            StartupPhase::Serving => "serving",
            StartupPhase::Failed => "failed",
        })
    }
}

/// Fatal startup failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Cannot connect to database: {0}")]
    DatabaseUnreachable(#[source] ProbeError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP server failed: {0}")]
    Serve(#[source] std::io::Error),
}

impl StartupError {
    /// An actionable suggestion for the operator, when one exists.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            StartupError::DatabaseUnreachable(_) => Some(DATABASE_HINT),
            StartupError::Bind { .. } => Some("Check that PORT is free and HOST is a local address"),
            StartupError::Serve(_) => None,
        }
    }

    /// The phase in which the failure happened.
    pub fn phase(&self) -> StartupPhase {
        match self {
            StartupError::DatabaseUnreachable(_) => StartupPhase::CheckingDatabase,
            StartupError::Bind { .. } | StartupError::Serve(_) => StartupPhase::Serving,
        }
    }
}

/// Build the real probes from `config` and run the startup sequence.
pub async fn run(
    config: Arc<Config>,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), StartupError> {
    let prober = HealthProber::from_config(&config).map_err(StartupError::DatabaseUnreachable)?;
    launch(config, prober, shutdown).await
}

/// Gate on the database, then bind and serve until `shutdown` fires.
pub async fn launch(
    config: Arc<Config>,
    prober: HealthProber,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), StartupError> {
    check_database(&prober).await?;

    let addr = config.server.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    let local_addr = listener.local_addr().map_err(StartupError::Serve)?;

    tracing::info!(
        phase = %StartupPhase::Serving,
        address = %local_addr,
        "HOMP API running on http://{}",
        local_addr
    );

    HttpServer::new(config, prober)
        .run(listener, shutdown)
        .await
        .map_err(StartupError::Serve)
}

/// The startup gate: one bounded database probe.
pub async fn check_database(prober: &HealthProber) -> Result<(), StartupError> {
    tracing::info!(phase = %StartupPhase::CheckingDatabase, "Checking database connection");

    match prober.probe_database().await {
        Ok(()) => {
            tracing::info!(phase = %StartupPhase::CheckingDatabase, "Database connected");
            Ok(())
        }
        Err(e) => Err(StartupError::DatabaseUnreachable(e)),
    }
}
