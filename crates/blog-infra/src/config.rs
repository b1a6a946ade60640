//! Database configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Configuration for the blog database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub sql_logging: bool,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(10),
            sql_logging: false,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Returns `Ok(None)` when `DATABASE_URL` is not set.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key/value source.
    ///
    /// Recognised keys: `DATABASE_URL`, `DB_MAX_CONNECTIONS`,
    /// `DB_MIN_CONNECTIONS`, `DB_CONNECT_TIMEOUT_SECS`, `DB_SQL_LOGGING`.
    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(url) = lookup("DATABASE_URL") else {
            return Ok(None);
        };
        if url.trim().is_empty() {
            return Err(ConfigError::Empty("DATABASE_URL"));
        }

        let defaults = Self::new(url);
        let max_connections =
            parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.max_connections)?;
        let min_connections =
            parse_or(&lookup, "DB_MIN_CONNECTIONS", defaults.min_connections)?;
        let connect_timeout = parse_or(
            &lookup,
            "DB_CONNECT_TIMEOUT_SECS",
            defaults.connect_timeout.as_secs(),
        )?;
        let sql_logging = match lookup("DB_SQL_LOGGING") {
            Some(value) => parse_flag("DB_SQL_LOGGING", &value)?,
            None => defaults.sql_logging,
        };

        if min_connections > max_connections {
            return Err(ConfigError::Invalid {
                key: "DB_MIN_CONNECTIONS",
                value: min_connections.to_string(),
            });
        }

        Ok(Some(Self {
            max_connections,
            min_connections,
            connect_timeout: Duration::from_secs(connect_timeout),
            sql_logging,
            ..defaults
        }))
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_url_means_no_database() {
        assert_eq!(DatabaseConfig::from_lookup(lookup(&[])), Ok(None));
    }

    #[test]
    fn defaults_apply() {
        let config = DatabaseConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://db/blog")]))
            .unwrap()
            .unwrap();
        assert_eq!(config, DatabaseConfig::new("postgres://db/blog"));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = DatabaseConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/blog"),
            ("DB_MAX_CONNECTIONS", "25"),
            ("DB_MIN_CONNECTIONS", " 5 "),
            ("DB_CONNECT_TIMEOUT_SECS", "3"),
            ("DB_SQL_LOGGING", "true"),
        ]))
        .unwrap()
        .unwrap();

        assert_eq!(config.max_connections, 25);
        assert_eq!(config.min_connections, 5);
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert!(config.sql_logging);
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = DatabaseConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/blog"),
            ("DB_MAX_CONNECTIONS", "lots"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS",
                value: "lots".to_string()
            }
        );

        let err = DatabaseConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/blog"),
            ("DB_MAX_CONNECTIONS", "2"),
            ("DB_MIN_CONNECTIONS", "3"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "DB_MIN_CONNECTIONS", .. }));
    }

    #[test]
    fn blank_url_is_rejected() {
        let err = DatabaseConfig::from_lookup(lookup(&[("DATABASE_URL", "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Empty("DATABASE_URL"));
    }
}
