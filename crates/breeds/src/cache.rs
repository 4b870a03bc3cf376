#![forbid(unsafe_code)]

use crate::{BreedError, DEFAULT_REDIS_PREFIX};
use redis::Commands;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Remembers breeds already confirmed by the registry.
///
/// `get` answers `None` on a miss; only positive answers are ever stored.
pub trait BreedCache: Send + Sync {
    fn get(&self, breed: &str) -> Result<Option<bool>, BreedError>;
    fn put_known(&self, breed: &str, ttl: Duration) -> Result<(), BreedError>;
}

struct MemoryEntry {
    known: bool,
    stored_at: Instant,
    ttl: Duration,
}

impl MemoryEntry {
    fn is_live(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) <= self.ttl
    }
}

/// Process-local cache. Expired entries are swept on every access; when full, the
/// oldest entry makes room.
pub struct MemoryBreedCache {
    max_entries: usize,
    entries: Mutex<HashMap<String, MemoryEntry>>,
}

impl MemoryBreedCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            max_entries: max_entries.max(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, MemoryEntry>>, BreedError> {
        self.entries
            .lock()
            .map_err(|_| BreedError::Cache("memory cache lock poisoned".to_string()))
    }
}

impl BreedCache for MemoryBreedCache {
    fn get(&self, breed: &str) -> Result<Option<bool>, BreedError> {
        let now = Instant::now();
        let mut entries = self.lock()?;
        entries.retain(|_, entry| entry.is_live(now));
        Ok(entries.get(breed).map(|entry| entry.known))
    }

    fn put_known(&self, breed: &str, ttl: Duration) -> Result<(), BreedError> {
        let now = Instant::now();
        let mut entries = self.lock()?;
        entries.retain(|_, entry| entry.is_live(now));
        if entries.len() >= self.max_entries && !entries.contains_key(breed) {
            if let Some(victim) = entries
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at)
                .map(|(key, _)| key.clone())
            {
                entries.remove(&victim);
            }
        }
        entries.insert(
            breed.to_string(),
            MemoryEntry {
                known: true,
                stored_at: now,
                ttl,
            },
        );
        Ok(())
    }
}

/// Shared cache in Redis: `SET <prefix>:<breed> "true" EX <ttl>` / `GET`.
pub struct RedisBreedCache {
    client: redis::Client,
    prefix: String,
    timeout: Duration,
}

impl RedisBreedCache {
    pub fn new(url: &str, prefix: &str, timeout: Duration) -> Result<Self, BreedError> {
        let client = redis::Client::open(url)?;
        let prefix = if prefix.is_empty() {
            DEFAULT_REDIS_PREFIX
        } else {
            prefix
        };
        Ok(Self {
            client,
            prefix: prefix.to_string(),
            timeout,
        })
    }

    fn key(&self, breed: &str) -> String {
        format!("{}:{}", self.prefix, breed)
    }

    fn connection(&self) -> Result<redis::Connection, BreedError> {
        let conn = self.client.get_connection_with_timeout(self.timeout)?;
        conn.set_read_timeout(Some(self.timeout))?;
        conn.set_write_timeout(Some(self.timeout))?;
        Ok(conn)
    }
}

impl BreedCache for RedisBreedCache {
    fn get(&self, breed: &str) -> Result<Option<bool>, BreedError> {
        let mut conn = self.connection()?;
        let raw: Option<String> = conn.get(self.key(breed))?;
        match raw {
            None => Ok(None),
            Some(value) => value
                .parse::<bool>()
                .map(Some)
                .map_err(|_| BreedError::Cache(format!("unexpected cached value {value:?}"))),
        }
    }

    fn put_known(&self, breed: &str, ttl: Duration) -> Result<(), BreedError> {
        let mut conn = self.connection()?;
        let secs = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(self.key(breed), "true", secs)?;
        Ok(())
    }
}
