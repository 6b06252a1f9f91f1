//! Probe abstraction and outcome types.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Why a dependency was judged unreachable.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("broker error: {0}")]
    Broker(#[from] redis::RedisError),

    #[error("unexpected broker reply `{0}`")]
    UnexpectedReply(String),

    #[error("probe task aborted: {0}")]
    Aborted(String),
}

/// A minimal, side-effect-free reachability check against one dependency.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn check(&self) -> Result<(), ProbeError>;
}

/// Reported state of one dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyStatus {
    Ok,
    Error,
}

impl DependencyStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, DependencyStatus::Ok)
    }
}

impl<E> From<&Result<(), E>> for DependencyStatus {
    fn from(outcome: &Result<(), E>) -> Self {
        if outcome.is_ok() {
            DependencyStatus::Ok
        } else {
            DependencyStatus::Error
        }
    }
}
