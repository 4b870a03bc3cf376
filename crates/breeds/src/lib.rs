#![forbid(unsafe_code)]

//! Cat breed validation: a remote breed registry fronted by a cache of known breeds.

mod cache;
mod checker;
mod error;
mod registry;

pub use cache::{BreedCache, MemoryBreedCache, RedisBreedCache};
pub use checker::BreedChecker;
pub use error::BreedError;
pub use registry::{BreedRegistry, HttpBreedRegistry, parse_breed_names};

use std::time::Duration;

pub const DEFAULT_REGISTRY_URL: &str = "https://api.thecatapi.com/v1/breeds";
pub const DEFAULT_REGISTRY_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_POSITIVE_TTL: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_REDIS_PREFIX: &str = "sca:breed";
