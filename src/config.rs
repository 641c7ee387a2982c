use std::env;
use std::time::Duration;

use crate::auth::{MAX_BCRYPT_COST, MIN_BCRYPT_COST};

/// Which store backend the server runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres { database_url: String },
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub jwt_secret: String,
    pub store_backend: StoreBackend,
    pub store_timeout: Duration,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let store_backend = match get("STORE_BACKEND").as_deref() {
            None | Some("memory") => StoreBackend::Memory,
            Some("postgres") => StoreBackend::Postgres {
                database_url: get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            },
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "STORE_BACKEND",
                    value: other.to_string(),
                    reason: "expected memory or postgres",
                })
            }
        };

        let server_port = parse_or(&get, "SERVER_PORT", 8080_u16, "must be a port number")?;
        let timeout_secs = parse_or(&get, "STORE_TIMEOUT_SECS", 5_u64, "must be whole seconds")?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "STORE_TIMEOUT_SECS",
                value: "0".to_string(),
                reason: "must be at least 1",
            });
        }
        let bcrypt_cost = parse_or(&get, "BCRYPT_COST", bcrypt::DEFAULT_COST, "must be a number")?;
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                name: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
                reason: "must be between 4 and 31",
            });
        }

        Ok(Self {
            server_host: get("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            server_port,
            jwt_secret,
            store_backend,
            store_timeout: Duration::from_secs(timeout_secs),
            bcrypt_cost,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<T, G>(
    get: &G,
    name: &'static str,
    default: T,
    reason: &'static str,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            value,
            reason,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup(&[("JWT_SECRET", "s3cret")])).unwrap();

        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.store_timeout, Duration::from_secs(5));
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(config.server_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_config_custom_values() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "s3cret"),
            ("SERVER_PORT", "3000"),
            ("SERVER_HOST", "0.0.0.0"),
            ("STORE_BACKEND", "postgres"),
            ("DATABASE_URL", "postgres://localhost/todos"),
            ("STORE_TIMEOUT_SECS", "10"),
            ("BCRYPT_COST", "10"),
        ]))
        .unwrap();

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(
            config.store_backend,
            StoreBackend::Postgres {
                database_url: "postgres://localhost/todos".to_string()
            }
        );
        assert_eq!(config.store_timeout, Duration::from_secs(10));
        assert_eq!(config.bcrypt_cost, 10);
    }

    #[test]
    fn test_config_missing_values() {
        assert_eq!(
            Config::from_lookup(lookup(&[])).err(),
            Some(ConfigError::Missing("JWT_SECRET"))
        );
        assert_eq!(
            Config::from_lookup(lookup(&[("JWT_SECRET", "  ")])).err(),
            Some(ConfigError::Missing("JWT_SECRET"))
        );
        assert_eq!(
            Config::from_lookup(lookup(&[("JWT_SECRET", "x"), ("STORE_BACKEND", "postgres")]))
                .err(),
            Some(ConfigError::Missing("DATABASE_URL"))
        );
    }

    #[test]
    fn test_config_invalid_values() {
        for (key, value) in [
            ("SERVER_PORT", "eighty"),
            ("STORE_BACKEND", "mongo"),
            ("STORE_TIMEOUT_SECS", "0"),
            ("BCRYPT_COST", "2"),
        ] {
            let result = Config::from_lookup(lookup(&[("JWT_SECRET", "x"), (key, value)]));
            assert!(
                matches!(result, Err(ConfigError::Invalid { name, .. }) if name == key),
                "{key}={value} should be rejected"
            );
        }
    }
}
