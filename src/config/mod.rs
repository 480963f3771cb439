//! Configuration module.
//!
//! Loads configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;

/// Where entity records are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreBackend {
    #[default]
    Memory,
    Mongo,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "mongo" | "mongodb" => Ok(Self::Mongo),
            other => Err(ConfigError::Invalid {
                key: "STORE_BACKEND",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Shards the replay runtime creates.
    pub shard_count: u32,
    pub store_backend: StoreBackend,

    // MongoDB
    /// Required when the backend is [`StoreBackend::Mongo`].
    pub mongodb_uri: Option<String>,
    pub mongodb_database: String,

    // Read-through cache in front of mongo stores
    pub cache_enabled: bool,
    pub cache_max_capacity: u64,
    pub cache_ttl: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let shard_count: u32 = parse(&var, "SHARD_COUNT", 1)?;
        if shard_count == 0 {
            return Err(ConfigError::Invalid {
                key: "SHARD_COUNT",
                value: "0".into(),
            });
        }

        let store_backend = match var("STORE_BACKEND") {
            Some(value) => value.parse()?,
            None => StoreBackend::default(),
        };

        let mongodb_uri = var("MONGODB_URI");
        if store_backend == StoreBackend::Mongo && mongodb_uri.is_none() {
            return Err(ConfigError::Missing("MONGODB_URI"));
        }

        Ok(Self {
            shard_count,
            store_backend,
            mongodb_uri,
            mongodb_database: var("MONGODB_DATABASE").unwrap_or_else(|| "aether".to_string()),
            cache_enabled: parse_bool(&var, "CACHE_ENABLED", true)?,
            cache_max_capacity: parse(&var, "CACHE_MAX_CAPACITY", 10_000)?,
            cache_ttl: Duration::from_secs(parse(&var, "CACHE_TTL_SECS", 300)?),
        })
    }

    /// Cache settings for mongo stores, `None` when caching is off.
    pub fn cache(&self) -> Option<CacheConfig> {
        self.cache_enabled.then(|| {
            CacheConfig::with_capacity(self.cache_max_capacity).ttl(self.cache_ttl)
        })
    }
}

fn parse<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match var(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn parse_bool(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    match var(key) {
        Some(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value }),
        },
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.shard_count, 1);
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert!(config.mongodb_uri.is_none());
        assert_eq!(config.mongodb_database, "aether");
        assert!(config.cache_enabled);
        assert_eq!(config.cache_max_capacity, 10_000);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_mongo_requires_uri() {
        assert_eq!(
            load(&[("STORE_BACKEND", "mongo")]).unwrap_err(),
            ConfigError::Missing("MONGODB_URI")
        );

        let config = load(&[
            ("STORE_BACKEND", "Mongo"),
            ("MONGODB_URI", "mongodb://localhost:27017"),
            ("MONGODB_DATABASE", "gateway"),
        ])
        .unwrap();
        assert_eq!(config.store_backend, StoreBackend::Mongo);
        assert_eq!(config.mongodb_database, "gateway");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            load(&[("SHARD_COUNT", "many")]),
            Err(ConfigError::Invalid { key: "SHARD_COUNT", .. })
        ));
        assert!(load(&[("SHARD_COUNT", "0")]).is_err());
        assert!(load(&[("STORE_BACKEND", "redis")]).is_err());
        assert!(load(&[("CACHE_ENABLED", "maybe")]).is_err());
    }

    #[test]
    fn test_cache_settings() {
        let config = load(&[("CACHE_MAX_CAPACITY", "50"), ("CACHE_TTL_SECS", "10")]).unwrap();
        let cache = config.cache().unwrap();
        assert_eq!(cache.max_capacity, 50);
        assert_eq!(cache.ttl, Some(Duration::from_secs(10)));

        let config = load(&[("CACHE_ENABLED", "false")]).unwrap();
        assert!(config.cache().is_none());
    }
}
