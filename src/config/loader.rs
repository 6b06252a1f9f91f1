//! Configuration loading from the environment.

use std::collections::HashMap;
use std::fmt;

use crate::config::schema::{
    self, keys, BrokerConfig, Config, DatabaseConfig, Environment, ObjectStorageConfig,
    ObservabilityConfig, ServerConfig,
};
use crate::config::source::{EnvSource, ProcessEnv};
use crate::config::validation::{self as check, ValidationError};

const POSTGRES_SCHEMES: &[&str] = &["postgres", "postgresql"];
const REDIS_SCHEMES: &[&str] = &["redis", "rediss"];
const HTTP_SCHEMES: &[&str] = &["http", "https"];

/// Every violation found while validating the environment.
#[derive(Debug)]
pub struct ConfigError {
    violations: Vec<ValidationError>,
}

impl ConfigError {
    /// Violations in schema order.
    pub fn violations(&self) -> &[ValidationError] {
        &self.violations
    }

    /// Keys of all offending settings.
    pub fn keys(&self) -> Vec<&'static str> {
        self.violations.iter().map(ValidationError::key).collect()
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid environment configuration ({} problem{}):",
            self.violations.len(),
            if self.violations.len() == 1 { "" } else { "s" }
        )?;
        for violation in &self.violations {
            write!(f, "\n  - {}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigError {}

/// Collect the errors of independently validated fields.
fn violations<const N: usize>(results: [Option<ValidationError>; N]) -> Vec<ValidationError> {
    results.into_iter().flatten().collect()
}

/// `APP_ENV` when set, otherwise the conventional `NODE_ENV`.
fn environment_key(env: &dyn EnvSource) -> &'static str {
    match env.get(keys::APP_ENV) {
        Some(v) if !v.is_empty() => keys::APP_ENV,
        _ => keys::NODE_ENV,
    }
}

impl Config {
    /// Validate the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&ProcessEnv)
    }

    /// Validate a fabricated set of variables.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::from_source(&map)
    }

    /// Validate every key of the schema against `env`.
    ///
    /// All keys are checked before deciding, so the error lists every
    /// missing or malformed setting rather than the first one found.
    pub fn from_source(env: &dyn EnvSource) -> Result<Self, ConfigError> {
        let database = DatabaseConfig::load(env);
        let broker = BrokerConfig::load(env);
        let environment = check::choice_or(
            env,
            environment_key(env),
            Environment::default(),
            Environment::VARIANTS,
        );
        let server = ServerConfig::load(env);
        let storage = ObjectStorageConfig::load(env);
        let observability = ObservabilityConfig::load(env);

        match (database, broker, environment, server, storage, observability) {
            (Ok(database), Ok(broker), Ok(environment), Ok(server), Ok(storage), Ok(observability)) => {
                Ok(Config {
                    environment,
                    server,
                    database,
                    broker,
                    storage,
                    observability,
                })
            }
            (database, broker, environment, server, storage, observability) => {
                let mut all = Vec::new();
                all.extend(database.err().unwrap_or_default());
                all.extend(broker.err().unwrap_or_default());
                all.extend(environment.err());
                all.extend(server.err().unwrap_or_default());
                all.extend(storage.err().unwrap_or_default());
                all.extend(observability.err());
                Err(ConfigError { violations: all })
            }
        }
    }
}

impl DatabaseConfig {
    fn load(env: &dyn EnvSource) -> Result<Self, Vec<ValidationError>> {
        let url = check::required_secret_url(env, keys::DATABASE_URL, POSTGRES_SCHEMES);
        let probe_timeout = check::millis_or(
            env,
            keys::DB_PROBE_TIMEOUT_MS,
            schema::DEFAULT_DB_PROBE_TIMEOUT_MS,
        );

        match (url, probe_timeout) {
            (Ok(url), Ok(probe_timeout)) => Ok(Self { url, probe_timeout }),
            (url, probe_timeout) => Err(violations([url.err(), probe_timeout.err()])),
        }
    }
}

impl BrokerConfig {
    fn load(env: &dyn EnvSource) -> Result<Self, Vec<ValidationError>> {
        let url = check::required_secret_url(env, keys::REDIS_URL, REDIS_SCHEMES);
        let connect_timeout = check::millis_or(
            env,
            keys::REDIS_CONNECT_TIMEOUT_MS,
            schema::DEFAULT_REDIS_CONNECT_TIMEOUT_MS,
        );

        match (url, connect_timeout) {
            (Ok(url), Ok(connect_timeout)) => Ok(Self { url, connect_timeout }),
            (url, connect_timeout) => Err(violations([url.err(), connect_timeout.err()])),
        }
    }
}

impl ServerConfig {
    fn load(env: &dyn EnvSource) -> Result<Self, Vec<ValidationError>> {
        let host = check::ip_or(env, keys::HOST, schema::DEFAULT_HOST);
        let port = check::number_or(env, keys::PORT, schema::DEFAULT_PORT);
        let request_timeout = check::secs_or(
            env,
            keys::REQUEST_TIMEOUT_SECS,
            schema::DEFAULT_REQUEST_TIMEOUT_SECS,
        );

        match (host, port, request_timeout) {
            (Ok(host), Ok(port), Ok(request_timeout)) => Ok(Self {
                host,
                port,
                request_timeout,
            }),
            (host, port, request_timeout) => Err(violations([
                host.err(),
                port.err(),
                request_timeout.err(),
            ])),
        }
    }
}

impl ObjectStorageConfig {
    fn load(env: &dyn EnvSource) -> Result<Self, Vec<ValidationError>> {
        let endpoint = check::required_url(env, keys::S3_ENDPOINT, HTTP_SCHEMES);
        let bucket = check::required_string(env, keys::S3_BUCKET);
        let access_key_id = check::required_string(env, keys::S3_ACCESS_KEY_ID);
        let secret_access_key = check::required_secret(env, keys::S3_SECRET_ACCESS_KEY);
        let region = check::string_or(env, keys::S3_REGION, schema::DEFAULT_S3_REGION);

        match (endpoint, bucket, access_key_id, secret_access_key) {
            (Ok(endpoint), Ok(bucket), Ok(access_key_id), Ok(secret_access_key)) => Ok(Self {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            }),
            (endpoint, bucket, access_key_id, secret_access_key) => Err(violations([
                endpoint.err(),
                bucket.err(),
                access_key_id.err(),
                secret_access_key.err(),
            ])),
        }
    }
}

impl ObservabilityConfig {
    fn load(env: &dyn EnvSource) -> Result<Self, ValidationError> {
        let metrics_address = check::optional_socket_addr(env, keys::METRICS_ADDR)?;
        Ok(Self { metrics_address })
    }
}
