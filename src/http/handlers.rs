use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::health::HealthReport;
use crate::http::server::AppState;

pub const SERVICE_NAME: &str = "HOMP API";

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: &'static str,
    pub version: &'static str,
}

/// `GET /`: static service information. Touches no dependency.
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /health`: fresh probe of every dependency.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let report = state.prober.check().await;
    (report.status_code(), Json(report))
}
