//! Per-request dependency probing.
//!
//! # Responsibilities
//! - Run the database and broker probes concurrently
//! - Bound each probe by its own deadline
//! - Convert every failure into a status field
//!
//! # Design Decisions
//! - Each probe runs in its own task so a panic is caught as a `JoinError`
//! - A timed-out task is aborted, dropping any connection it holds
//! - The status code tracks the database only. The broker is reported but
//!   does not flip the code; monitors rely on this, so it stays explicit.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::StatusCode;
use serde::Serialize;

use crate::config::Config;
use crate::health::broker::RedisProbe;
use crate::health::postgres::PostgresProbe;
use crate::health::probe::{DependencyStatus, Probe, ProbeError};
use crate::observability::metrics;

/// Outcome of one round of probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub db: DependencyStatus,
    pub redis: DependencyStatus,
}

impl HealthReport {
    /// 200 when the database is reachable, 503 otherwise.
    pub fn status_code(&self) -> StatusCode {
        if self.db.is_ok() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Probes the database and the broker.
#[derive(Clone)]
pub struct HealthProber {
    database: Arc<dyn Probe>,
    broker: Arc<dyn Probe>,
    database_timeout: Duration,
    broker_timeout: Duration,
}

impl HealthProber {
    pub fn new(
        database: Arc<dyn Probe>,
        broker: Arc<dyn Probe>,
        database_timeout: Duration,
        broker_timeout: Duration,
    ) -> Self {
        Self {
            database,
            broker,
            database_timeout,
            broker_timeout,
        }
    }

    /// Wire up the real PostgreSQL and Redis probes.
    pub fn from_config(config: &Config) -> Result<Self, ProbeError> {
        let database = PostgresProbe::connect_lazy(&config.database)?;
        let broker = RedisProbe::from_config(&config.broker);

        Ok(Self::new(
            Arc::new(database),
            Arc::new(broker),
            config.database.probe_timeout,
            config.broker.connect_timeout,
        ))
    }

    /// One fresh round of probes. Never fails; waits for both probes.
    pub async fn check(&self) -> HealthReport {
        let (db, redis) = tokio::join!(self.probe_database(), self.probe_broker());

        HealthReport {
            db: DependencyStatus::from(&db),
            redis: DependencyStatus::from(&redis),
        }
    }

    /// A single bounded database probe.
    pub async fn probe_database(&self) -> Result<(), ProbeError> {
        run_probe("db", self.database.clone(), self.database_timeout).await
    }

    /// A single bounded broker probe.
    pub async fn probe_broker(&self) -> Result<(), ProbeError> {
        run_probe("redis", self.broker.clone(), self.broker_timeout).await
    }
}

async fn run_probe(
    dependency: &'static str,
    probe: Arc<dyn Probe>,
    deadline: Duration,
) -> Result<(), ProbeError> {
    let start = Instant::now();
    let mut task = tokio::spawn(async move { probe.check().await });

    let outcome = match tokio::time::timeout(deadline, &mut task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(ProbeError::Aborted(join_error.to_string())),
        Err(_) => {
            task.abort();
            Err(ProbeError::Timeout(deadline))
        }
    };

    match &outcome {
        Ok(()) => tracing::debug!(dependency, elapsed = ?start.elapsed(), "Probe succeeded"),
        Err(e) => tracing::warn!(dependency, error = %e, elapsed = ?start.elapsed(), "Probe failed"),
    }
    metrics::record_probe(dependency, outcome.is_ok(), start);

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed(bool);

    #[async_trait]
    impl Probe for Fixed {
        async fn check(&self) -> Result<(), ProbeError> {
            if self.0 {
                Ok(())
            } else {
                Err(ProbeError::UnexpectedReply("nope".into()))
            }
        }
    }

    struct Hanging;

    #[async_trait]
    impl Probe for Hanging {
        async fn check(&self) -> Result<(), ProbeError> {
            std::future::pending().await
        }
    }

    struct Panicking;

    #[async_trait]
    impl Probe for Panicking {
        async fn check(&self) -> Result<(), ProbeError> {
            panic!("probe blew up")
        }
    }

    #[derive(Default)]
    struct Counting(AtomicUsize);

    #[async_trait]
    impl Probe for Counting {
        async fn check(&self) -> Result<(), ProbeError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn prober(database: Arc<dyn Probe>, broker: Arc<dyn Probe>) -> HealthProber {
        HealthProber::new(
            database,
            broker,
            Duration::from_millis(200),
            Duration::from_millis(200),
        )
    }

    #[tokio::test]
    async fn test_all_healthy() {
        let report = prober(Arc::new(Fixed(true)), Arc::new(Fixed(true))).check().await;
        assert_eq!(report, HealthReport { db: DependencyStatus::Ok, redis: DependencyStatus::Ok });
        assert_eq!(report.status_code(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_broker_failure_does_not_flip_status() {
        let report = prober(Arc::new(Fixed(true)), Arc::new(Fixed(false))).check().await;
        assert_eq!(report.redis, DependencyStatus::Error);
        assert_eq!(report.status_code(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_database_failure_is_unavailable_and_broker_still_probed() {
        let broker = Arc::new(Counting::default());
        let report = prober(Arc::new(Fixed(false)), broker.clone()).check().await;

        assert_eq!(report.db, DependencyStatus::Error);
        assert_eq!(report.redis, DependencyStatus::Ok);
        assert_eq!(report.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(broker.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_hanging_probe_resolves_within_deadline() {
        let started = Instant::now();
        let report = prober(Arc::new(Fixed(true)), Arc::new(Hanging)).check().await;

        assert_eq!(report.redis, DependencyStatus::Error);
        assert_eq!(report.db, DependencyStatus::Ok);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_hanging_database_times_out() {
        let result = prober(Arc::new(Hanging), Arc::new(Fixed(true)))
            .probe_database()
            .await;
        assert!(matches!(result, Err(ProbeError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_panicking_probe_is_isolated() {
        let report = prober(Arc::new(Fixed(true)), Arc::new(Panicking)).check().await;
        assert_eq!(report.db, DependencyStatus::Ok);
        assert_eq!(report.redis, DependencyStatus::Error);
    }

    #[tokio::test]
    async fn test_every_check_probes_afresh() {
        let database = Arc::new(Counting::default());
        let broker = Arc::new(Counting::default());
        let prober = prober(database.clone(), broker.clone());

        prober.check().await;
        prober.check().await;

        assert_eq!(database.0.load(Ordering::SeqCst), 2);
        assert_eq!(broker.0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_report_serializes_with_dependency_names() {
        let report = HealthReport { db: DependencyStatus::Ok, redis: DependencyStatus::Error };
        assert_eq!(
            serde_json::to_string(&report).unwrap(),
            r#"{"db":"ok","redis":"error"}"#
        );
    }
}
