//! HOMP API
//!
//! # Architecture Overview
//!
//! ```text
//!   environment ──▶ config (validate all, fail fast)
//!                        │
//!                        ▼
//!                 lifecycle::startup ──▶ SELECT 1 ──✗──▶ exit 1
//!                        │ ✓
//!                        ▼
//!     client ──▶ http::server ──▶ GET /        → { message, version }
//!                              └─▶ GET /health → health::prober
//!                                                 ├─ postgres: SELECT 1
//!                                                 └─ redis:    connect + PING
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use homp_api::config::Config;
use homp_api::lifecycle::{signals, startup, StartupPhase};
use homp_api::observability::{logging, metrics};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Logging depends on APP_ENV, so configuration errors go straight to stderr.
    let config = match Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("✗ {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init(config.environment);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        phase = %StartupPhase::ValidatingConfig,
        environment = %config.environment,
        port = config.server.port,
        "Configuration loaded"
    );

    if let Some(addr) = config.observability.metrics_address {
        metrics::init_metrics(addr);
    }

    let shutdown = signals::spawn_listener();

    match startup::run(config, shutdown).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            // Written directly so the diagnostic survives RUST_LOG=off.
            eprintln!("✗ {}", e);
            if let Some(hint) = e.hint() {
                eprintln!("  {}", hint);
            }
            tracing::error!(
                phase = %StartupPhase::Failed,
                failed_during = %e.phase(),
                error = %e,
                hint = e.hint().unwrap_or_default(),
                "✗ {}",
                e
            );
            ExitCode::FAILURE
        }
    }
}
