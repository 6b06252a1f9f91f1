//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Serve on a bound listener until shutdown is signalled

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::health::HealthProber;
use crate::http::handlers;
use crate::http::request::MakeRequestUuid;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub prober: Arc<HealthProber>,
}

impl AppState {
    pub fn new(prober: HealthProber) -> Self {
        Self {
            prober: Arc::new(prober),
        }
    }
}

/// Build the Axum router with all middleware layers.
///
/// `/health` sits outside the request timeout: its probes carry their own
/// deadlines and the route must always answer with a status body.
#[allow(deprecated)]
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    let bounded = Router::new()
        .route("/", get(handlers::root))
        .layer(TimeoutLayer::new(request_timeout));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(bounded)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}

/// HTTP server for the API.
pub struct HttpServer {
    router: Router,
    config: Arc<Config>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: Arc<Config>, prober: HealthProber) -> Self {
        let router = build_router(AppState::new(prober), config.server.request_timeout);
        Self { router, config }
    }

    /// Run the server on `listener` until `shutdown` fires, then drain
    /// in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            environment = %self.config.environment,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
