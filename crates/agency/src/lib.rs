#![forbid(unsafe_code)]

//! Spy Cat Agency engine: cats, missions and their targets behind one thread-safe facade.

mod config;
mod error;
mod ops;
mod pool;
pub mod telemetry;
mod validator;

pub use config::{AgencyConfig, ConfigError};
pub use error::{AgencyError, ErrorKind, Infrastructure};
pub use validator::RequestValidator;

pub use sca_core::{
    Cat, Mission, MissionView, MissionWithTargets, NewCat, NewTarget, PageRequest, Target,
};
pub use sca_storage::{CreateMissionRequest, TargetRef};

use pool::StorePool;
use sca_breeds::{
    BreedCache, BreedChecker, BreedRegistry, HttpBreedRegistry, MemoryBreedCache, RedisBreedCache,
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub store_ok: bool,
    pub schema_version: Option<i64>,
    pub version: &'static str,
}

pub struct Agency {
    pool: StorePool,
    validator: RequestValidator,
    default_page_limit: i64,
    max_page_limit: i64,
}

impl Agency {
    /// Wires the production breed registry and cache (Redis when configured, otherwise
    /// in memory) and opens the store.
    pub fn open(config: &AgencyConfig) -> Result<Self, AgencyError> {
        let registry: Arc<dyn BreedRegistry> = Arc::new(HttpBreedRegistry::new(
            config.breed_registry_url.clone(),
            config.breed_registry_timeout,
        )?);
        let cache: Arc<dyn BreedCache> = match &config.redis_url {
            Some(url) => Arc::new(RedisBreedCache::new(
                url,
                &config.redis_prefix,
                config.operation_timeout,
            )?),
            None => Arc::new(MemoryBreedCache::new(config.breed_cache_max_entries)),
        };
        let checker = BreedChecker::with_ttl(registry, cache, config.breed_cache_ttl);
        Self::with_breed_checker(config, Arc::new(checker))
    }

    pub fn with_breed_checker(
        config: &AgencyConfig,
        breeds: Arc<BreedChecker>,
    ) -> Result<Self, AgencyError> {
        config.validate().map_err(|err| AgencyError::ValidationRejected {
            field: err.field,
            reason: err.reason,
        })?;
        let pool = StorePool::open(&config.storage_dir, config.operation_timeout, config.pool_size)?;
        tracing::info!(
            storage_dir = %config.storage_dir.display(),
            pool_size = config.pool_size,
            "agency opened"
        );
        Ok(Self {
            pool,
            validator: RequestValidator::new(breeds),
            default_page_limit: config.default_page_limit,
            max_page_limit: config.max_page_limit,
        })
    }

    pub fn storage_dir(&self) -> &Path {
        self.pool.storage_dir()
    }

    /// Never fails: an unreachable store is reported through `store_ok`.
    pub fn health(&self) -> HealthReport {
        let schema_version = self
            .pool
            .checkout()
            .and_then(|store| store.schema_version());
        match schema_version {
            Ok(version) => HealthReport {
                store_ok: true,
                schema_version: Some(version),
                version: VERSION,
            },
            Err(err) => {
                tracing::warn!(code = err.code(), error = %err, "health check failed");
                HealthReport {
                    store_ok: false,
                    schema_version: None,
                    version: VERSION,
                }
            }
        }
    }
}
