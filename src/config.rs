/// Server configuration read from the environment.
use crate::source::Environment;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
/// Cached row sets per table kind
pub const DEFAULT_CACHE_CAPACITY: usize = 16;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a number, got '{value}'")]
    NotANumber { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding `skaters.json` and `goalies.json`; mock rows when unset
    pub data_dir: Option<PathBuf>,
    pub environment: Environment,
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_dir: None,
            environment: Environment::Development,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl ServerConfig {
    /// Read `HOST`, `PORT`, `STATS_DATA_DIR`, `APP_ENV`, `CACHE_TTL_SECS` and
    /// `CACHE_CAPACITY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup; unset and empty variables take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = ServerConfig::default();

        let port = match get("PORT") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::NotANumber { name: "PORT", value: v })?,
            None => defaults.port,
        };
        let cache_ttl = match get("CACHE_TTL_SECS") {
            Some(v) => Duration::from_secs(
                v.trim()
                    .parse()
                    .map_err(|_| ConfigError::NotANumber { name: "CACHE_TTL_SECS", value: v })?,
            ),
            None => defaults.cache_ttl,
        };
        let cache_capacity = match get("CACHE_CAPACITY") {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|_| ConfigError::NotANumber { name: "CACHE_CAPACITY", value: v })?,
            None => defaults.cache_capacity,
        };

        Ok(ServerConfig {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            data_dir: get("STATS_DATA_DIR").map(PathBuf::from),
            environment: get("APP_ENV")
                .map(|v| Environment::from_name(&v))
                .unwrap_or_default(),
            cache_ttl,
            cache_capacity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, 8080);
        assert_eq!(config.cache_ttl.as_secs(), 300);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "9000"),
            ("STATS_DATA_DIR", "/var/lib/stats"),
            ("APP_ENV", "production"),
            ("CACHE_TTL_SECS", "30"),
            ("CACHE_CAPACITY", "4"),
        ]))
        .unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/stats")));
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.cache_ttl.as_secs(), 30);
        assert_eq!(config.cache_capacity, 4);
    }

    #[test]
    fn test_invalid_port() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
        assert_eq!(err, ConfigError::NotANumber { name: "PORT", value: "http".to_string() });
        assert!(ServerConfig::from_lookup(lookup(&[("PORT", "70000")])).is_err());
    }

    #[test]
    fn test_blank_values_take_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[("PORT", " "), ("HOST", "")])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
    }
}
