#![forbid(unsafe_code)]

use sca_breeds::{DEFAULT_POSITIVE_TTL, DEFAULT_REDIS_PREFIX, DEFAULT_REGISTRY_TIMEOUT, DEFAULT_REGISTRY_URL};
use sca_core::limits::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use sca_storage::DEFAULT_OPERATION_TIMEOUT;
use serde::{Serialize, Serializer};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_STORAGE_DIR: &str = ".sca";
pub const DEFAULT_BREED_CACHE_MAX_ENTRIES: usize = 1024;
pub const DEFAULT_POOL_SIZE: usize = 8;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid config {field}: {reason}")]
pub struct ConfigError {
    pub field: &'static str,
    pub reason: &'static str,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct AgencyConfig {
    pub storage_dir: PathBuf,
    #[serde(rename = "operation_timeout_ms", serialize_with = "as_millis")]
    pub operation_timeout: Duration,
    pub breed_registry_url: String,
    #[serde(rename = "breed_registry_timeout_ms", serialize_with = "as_millis")]
    pub breed_registry_timeout: Duration,
    #[serde(rename = "breed_cache_ttl_secs", serialize_with = "as_secs")]
    pub breed_cache_ttl: Duration,
    pub breed_cache_max_entries: usize,
    pub redis_url: Option<String>,
    pub redis_prefix: String,
    pub default_page_limit: i64,
    pub max_page_limit: i64,
    pub pool_size: usize,
    pub log_json: bool,
}

impl Default for AgencyConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
            breed_registry_url: DEFAULT_REGISTRY_URL.to_string(),
            breed_registry_timeout: DEFAULT_REGISTRY_TIMEOUT,
            breed_cache_ttl: DEFAULT_POSITIVE_TTL,
            breed_cache_max_entries: DEFAULT_BREED_CACHE_MAX_ENTRIES,
            redis_url: None,
            redis_prefix: DEFAULT_REDIS_PREFIX.to_string(),
            default_page_limit: DEFAULT_PAGE_LIMIT,
            max_page_limit: MAX_PAGE_LIMIT,
            pool_size: DEFAULT_POOL_SIZE,
            log_json: false,
        }
    }
}

impl AgencyConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source. Unparseable values fall back
    /// to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            storage_dir: lookup_string(&lookup, "SCA_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
            operation_timeout: lookup_duration_ms(
                &lookup,
                "SCA_OPERATION_TIMEOUT_MS",
                defaults.operation_timeout,
            ),
            breed_registry_url: lookup_string(&lookup, "SCA_BREED_REGISTRY_URL")
                .unwrap_or(defaults.breed_registry_url),
            breed_registry_timeout: lookup_duration_ms(
                &lookup,
                "SCA_BREED_REGISTRY_TIMEOUT_MS",
                defaults.breed_registry_timeout,
            ),
            breed_cache_ttl: lookup_parsed::<u64>(&lookup, "SCA_BREED_CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.breed_cache_ttl),
            breed_cache_max_entries: lookup_parsed(&lookup, "SCA_BREED_CACHE_MAX_ENTRIES")
                .unwrap_or(defaults.breed_cache_max_entries),
            redis_url: lookup_string(&lookup, "SCA_REDIS_URL"),
            redis_prefix: lookup_string(&lookup, "SCA_REDIS_PREFIX")
                .unwrap_or(defaults.redis_prefix),
            default_page_limit: lookup_parsed(&lookup, "SCA_DEFAULT_PAGE_LIMIT")
                .unwrap_or(defaults.default_page_limit),
            max_page_limit: lookup_parsed(&lookup, "SCA_MAX_PAGE_LIMIT")
                .unwrap_or(defaults.max_page_limit),
            pool_size: lookup_parsed(&lookup, "SCA_POOL_SIZE").unwrap_or(defaults.pool_size),
            log_json: lookup_bool(&lookup, "SCA_LOG_JSON").unwrap_or(defaults.log_json),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.operation_timeout.is_zero() {
            return Err(invalid("operation_timeout", "must be positive"));
        }
        if self.breed_registry_timeout.is_zero() {
            return Err(invalid("breed_registry_timeout", "must be positive"));
        }
        if self.breed_cache_ttl.is_zero() {
            return Err(invalid("breed_cache_ttl", "must be positive"));
        }
        if !(1..=MAX_PAGE_LIMIT).contains(&self.max_page_limit) {
            return Err(invalid("max_page_limit", "must be within 1..=100"));
        }
        if !(1..=self.max_page_limit).contains(&self.default_page_limit) {
            return Err(invalid(
                "default_page_limit",
                "must be within 1..=max_page_limit",
            ));
        }
        if self.pool_size == 0 {
            return Err(invalid("pool_size", "must be positive"));
        }
        if self.breed_registry_url.trim().is_empty() {
            return Err(invalid("breed_registry_url", "is required"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError { field, reason }
}

fn lookup_string(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn lookup_parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Option<T> {
    lookup_string(lookup, name).and_then(|value| value.parse::<T>().ok())
}

fn lookup_bool(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<bool> {
    lookup_string(lookup, name).and_then(|value| match value.as_str() {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    })
}

fn lookup_duration_ms(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: Duration,
) -> Duration {
    lookup_parsed::<u64>(lookup, name)
        .map(Duration::from_millis)
        .unwrap_or(default)
}

fn as_millis<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
}

fn as_secs<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(value.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> AgencyConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AgencyConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = from_pairs(&[]);
        assert_eq!(config, AgencyConfig::default());
        assert_eq!(config.operation_timeout, Duration::from_secs(5));
        assert_eq!(config.breed_cache_ttl, Duration::from_secs(3600));
        assert!(config.redis_url.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn overrides_are_applied() {
        let config = from_pairs(&[
            ("SCA_STORAGE_DIR", "/var/lib/sca"),
            ("SCA_OPERATION_TIMEOUT_MS", "250"),
            ("SCA_REDIS_URL", "redis://cache:6379"),
            ("SCA_DEFAULT_PAGE_LIMIT", "25"),
            ("SCA_MAX_PAGE_LIMIT", "50"),
            ("SCA_LOG_JSON", "yes"),
        ]);
        assert_eq!(config.storage_dir, PathBuf::from("/var/lib/sca"));
        assert_eq!(config.operation_timeout, Duration::from_millis(250));
        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!((config.default_page_limit, config.max_page_limit), (25, 50));
        assert!(config.log_json);
        config.validate().unwrap();
    }

    #[test]
    fn garbage_values_fall_back_to_defaults() {
        let config = from_pairs(&[
            ("SCA_OPERATION_TIMEOUT_MS", "soon"),
            ("SCA_POOL_SIZE", "-3"),
            ("SCA_LOG_JSON", "maybe"),
            ("SCA_REDIS_URL", "   "),
        ]);
        assert_eq!(config, AgencyConfig::default());
    }

    #[test]
    fn validate_rejects_bad_paging_and_timeouts() {
        let err = from_pairs(&[("SCA_MAX_PAGE_LIMIT", "101")])
            .validate()
            .unwrap_err();
        assert_eq!(err.field, "max_page_limit");

        let err = from_pairs(&[("SCA_DEFAULT_PAGE_LIMIT", "30"), ("SCA_MAX_PAGE_LIMIT", "20")])
            .validate()
            .unwrap_err();
        assert_eq!(err.field, "default_page_limit");

        let err = from_pairs(&[("SCA_OPERATION_TIMEOUT_MS", "0")])
            .validate()
            .unwrap_err();
        assert_eq!(err.field, "operation_timeout");
    }

    #[test]
    fn printed_config_uses_plain_units() {
        let json = serde_json::to_value(AgencyConfig::default()).unwrap();
        assert_eq!(json["operation_timeout_ms"], 5000);
        assert_eq!(json["breed_registry_timeout_ms"], 10000);
        assert_eq!(json["breed_cache_ttl_secs"], 3600);
        assert_eq!(json["redis_url"], serde_json::Value::Null);
    }
}
