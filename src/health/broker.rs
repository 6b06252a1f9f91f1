//! Redis liveness probe.
//!
//! Every check opens its own connection, sends one PING and drops the
//! connection before returning. Nothing is pooled or reused across checks.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::config::BrokerConfig;
use crate::health::probe::{Probe, ProbeError};

/// Connects to Redis and expects `PONG`.
#[derive(Debug)]
pub struct RedisProbe {
    url: SecretString,
    connect_timeout: Duration,
}

impl RedisProbe {
    pub fn new(url: SecretString, connect_timeout: Duration) -> Self {
        Self { url, connect_timeout }
    }

    pub fn from_config(config: &BrokerConfig) -> Self {
        Self::new(
            SecretString::new(config.url.expose_secret().into()),
            config.connect_timeout,
        )
    }

    async fn ping(&self) -> Result<(), ProbeError> {
        let client = redis::Client::open(self.url.expose_secret())?;
        let mut conn = client.get_multiplexed_async_connection().await?;

        let reply: String = redis::cmd("PING").query_async(&mut conn).await?;
        if reply != "PONG" {
            return Err(ProbeError::UnexpectedReply(reply));
        }
        Ok(())
    }
}

#[async_trait]
impl Probe for RedisProbe {
    async fn check(&self) -> Result<(), ProbeError> {
        // The deadline covers connect and PING together. On expiry the
        // inner future is dropped, which closes the half-open connection.
        tokio::time::timeout(self.connect_timeout, self.ping())
            .await
            .map_err(|_| ProbeError::Timeout(self.connect_timeout))?
    }
}
