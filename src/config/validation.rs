//! Configuration validation.
//!
//! # Responsibilities
//! - Read one key from an `EnvSource` and check its semantic type
//! - Apply defaults for optional keys
//! - Describe each violation with the offending key
//!
//! # Design Decisions
//! - Each check is a pure function returning `Result<T, ValidationError>`
//! - The loader runs every check before deciding, so all errors are reported
//! - Unset and empty optional values both fall back to the default

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::config::source::EnvSource;

/// A single invalid or missing setting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{key} is required but not set")]
    Missing { key: &'static str },

    #[error("{key} must not be empty")]
    Empty { key: &'static str },

    #[error("{key} is not a valid URL: {reason}")]
    InvalidUrl { key: &'static str, reason: String },

    #[error("{key} has unsupported scheme `{scheme}` (expected {})", .expected.join(" or "))]
    UnsupportedScheme {
        key: &'static str,
        scheme: String,
        expected: &'static [&'static str],
    },

    #[error("{key} must be one of {}, got `{value}`", .expected.join(", "))]
    InvalidChoice {
        key: &'static str,
        value: String,
        expected: &'static [&'static str],
    },

    #[error("{key} must be a number, got `{value}`")]
    InvalidNumber { key: &'static str, value: String },

    #[error("{key} must be greater than zero")]
    NotPositive { key: &'static str },

    #[error("{key} must be an address, got `{value}`")]
    InvalidAddress { key: &'static str, value: String },
}

impl ValidationError {
    /// The environment key this violation refers to.
    pub fn key(&self) -> &'static str {
        match self {
            ValidationError::Missing { key }
            | ValidationError::Empty { key }
            | ValidationError::InvalidUrl { key, .. }
            | ValidationError::UnsupportedScheme { key, .. }
            | ValidationError::InvalidChoice { key, .. }
            | ValidationError::InvalidNumber { key, .. }
            | ValidationError::NotPositive { key }
            | ValidationError::InvalidAddress { key, .. } => key,
        }
    }
}

/// Value for an optional key; empty strings count as unset.
fn optional(env: &dyn EnvSource, key: &str) -> Option<String> {
    env.get(key).filter(|v| !v.is_empty())
}

/// A required, non-empty string.
pub fn required_string(env: &dyn EnvSource, key: &'static str) -> Result<String, ValidationError> {
    match env.get(key) {
        None => Err(ValidationError::Missing { key }),
        Some(v) if v.is_empty() => Err(ValidationError::Empty { key }),
        Some(v) => Ok(v),
    }
}

/// A required, non-empty secret string.
pub fn required_secret(
    env: &dyn EnvSource,
    key: &'static str,
) -> Result<SecretString, ValidationError> {
    required_string(env, key).map(|v| SecretString::new(v.into()))
}

fn parse_url(
    key: &'static str,
    raw: &str,
    schemes: &'static [&'static str],
) -> Result<Url, ValidationError> {
    let url = Url::parse(raw).map_err(|e| ValidationError::InvalidUrl {
        key,
        reason: e.to_string(),
    })?;

    if !schemes.contains(&url.scheme()) {
        return Err(ValidationError::UnsupportedScheme {
            key,
            scheme: url.scheme().to_string(),
            expected: schemes,
        });
    }

    Ok(url)
}

/// A required, well-formed URL with one of the given schemes.
pub fn required_url(
    env: &dyn EnvSource,
    key: &'static str,
    schemes: &'static [&'static str],
) -> Result<Url, ValidationError> {
    let raw = required_string(env, key)?;
    parse_url(key, &raw, schemes)
}

/// Like [`required_url`] but keeps the original text as a secret, since
/// connection URLs usually carry credentials.
pub fn required_secret_url(
    env: &dyn EnvSource,
    key: &'static str,
    schemes: &'static [&'static str],
) -> Result<SecretString, ValidationError> {
    let raw = required_string(env, key)?;
    parse_url(key, &raw, schemes)?;
    Ok(SecretString::new(raw.into()))
}

/// An optional string with a default.
pub fn string_or(env: &dyn EnvSource, key: &'static str, default: &str) -> String {
    optional(env, key).unwrap_or_else(|| default.to_string())
}

/// One of an enumerated set of values, with a default.
pub fn choice_or<T: FromStr>(
    env: &dyn EnvSource,
    key: &'static str,
    default: T,
    expected: &'static [&'static str],
) -> Result<T, ValidationError> {
    match optional(env, key) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ValidationError::InvalidChoice { key, value, expected }),
    }
}

/// A number with a default. Leading and trailing whitespace is ignored.
pub fn number_or<T: FromStr>(
    env: &dyn EnvSource,
    key: &'static str,
    default: T,
) -> Result<T, ValidationError> {
    match optional(env, key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidNumber { key, value }),
    }
}

fn positive(key: &'static str, n: u64) -> Result<u64, ValidationError> {
    if n == 0 {
        Err(ValidationError::NotPositive { key })
    } else {
        Ok(n)
    }
}

/// A positive duration given in milliseconds.
pub fn millis_or(
    env: &dyn EnvSource,
    key: &'static str,
    default_ms: u64,
) -> Result<Duration, ValidationError> {
    let ms = positive(key, number_or(env, key, default_ms)?)?;
    Ok(Duration::from_millis(ms))
}

/// A positive duration given in seconds.
pub fn secs_or(
    env: &dyn EnvSource,
    key: &'static str,
    default_secs: u64,
) -> Result<Duration, ValidationError> {
    let secs = positive(key, number_or(env, key, default_secs)?)?;
    Ok(Duration::from_secs(secs))
}

/// An IP address with a default.
pub fn ip_or(
    env: &dyn EnvSource,
    key: &'static str,
    default: IpAddr,
) -> Result<IpAddr, ValidationError> {
    match optional(env, key) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ValidationError::InvalidAddress { key, value }),
    }
}

/// An optional socket address.
pub fn optional_socket_addr(
    env: &dyn EnvSource,
    key: &'static str,
) -> Result<Option<SocketAddr>, ValidationError> {
    match optional(env, key) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ValidationError::InvalidAddress { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    const PG: &[&str] = &["postgres", "postgresql"];

    #[test]
    fn test_required_string_missing_and_empty() {
        let src = env(&[("EMPTY", "")]);
        assert_eq!(
            required_string(&src, "ABSENT"),
            Err(ValidationError::Missing { key: "ABSENT" })
        );
        assert_eq!(
            required_string(&src, "EMPTY"),
            Err(ValidationError::Empty { key: "EMPTY" })
        );
    }

    #[test]
    fn test_url_scheme_checked() {
        let src = env(&[
            ("GOOD", "postgres://u:p@localhost:5432/homp"),
            ("WRONG", "mysql://localhost/homp"),
            ("JUNK", "not a url"),
        ]);

        assert!(required_url(&src, "GOOD", PG).is_ok());
        assert!(matches!(
            required_url(&src, "WRONG", PG),
            Err(ValidationError::UnsupportedScheme { ref scheme, .. }) if scheme == "mysql"
        ));
        assert!(matches!(
            required_url(&src, "JUNK", PG),
            Err(ValidationError::InvalidUrl { key: "JUNK", .. })
        ));
    }

    #[test]
    fn test_secret_url_keeps_original_text() {
        use secrecy::ExposeSecret;

        let raw = "postgres://user:pa%20ss@db:5432/homp?sslmode=disable";
        let src = env(&[("DATABASE_URL", raw)]);
        let secret = required_secret_url(&src, "DATABASE_URL", PG).unwrap();
        assert_eq!(secret.expose_secret(), raw);
    }

    #[test]
    fn test_number_defaults_and_errors() {
        let src = env(&[("PORT", " 8080 "), ("BAD", "eighty"), ("BLANK", "")]);
        assert_eq!(number_or::<u16>(&src, "PORT", 3001), Ok(8080));
        assert_eq!(number_or::<u16>(&src, "UNSET", 3001), Ok(3001));
        assert_eq!(number_or::<u16>(&src, "BLANK", 3001), Ok(3001));
        assert!(matches!(
            number_or::<u16>(&src, "BAD", 3001),
            Err(ValidationError::InvalidNumber { key: "BAD", .. })
        ));
    }

    #[test]
    fn test_port_out_of_range_rejected() {
        let src = env(&[("PORT", "70000")]);
        assert!(number_or::<u16>(&src, "PORT", 3001).is_err());
    }

    #[test]
    fn test_zero_duration_rejected() {
        let src = env(&[("T", "0")]);
        assert_eq!(
            millis_or(&src, "T", 3000),
            Err(ValidationError::NotPositive { key: "T" })
        );
        assert_eq!(millis_or(&src, "UNSET", 3000), Ok(Duration::from_secs(3)));
    }

    #[test]
    fn test_error_messages_name_the_key() {
        let err = ValidationError::InvalidChoice {
            key: "APP_ENV",
            value: "staging".into(),
            expected: &["development", "test", "production"],
        };
        assert_eq!(
            err.to_string(),
            "APP_ENV must be one of development, test, production, got `staging`"
        );
        assert_eq!(err.key(), "APP_ENV");
    }
}
