//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once, at process start
//! - Pick the output format from the execution mode
//!
//! # Design Decisions
//! - JSON format for production, pretty format for development
//! - Log level configurable via `RUST_LOG`
//! - Everything goes to stderr so diagnostics and logs share one stream

use std::io::IsTerminal;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Environment;

const DEFAULT_FILTER: &str = "homp_api=info,tower_http=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into())
}

/// Install the global subscriber. Call once, after configuration is loaded.
pub fn init(environment: Environment) {
    let registry = tracing_subscriber::registry().with(env_filter());

    if environment.is_production() {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(std::io::stderr().is_terminal())
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
