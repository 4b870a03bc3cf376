#![forbid(unsafe_code)]

use sca_storage::{SqliteStore, StoreError};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// Connections to one storage directory. Idle connections are reused; a checkout with
/// none idle opens a fresh one. At most `max_idle` connections are kept on return.
pub(crate) struct StorePool {
    storage_dir: PathBuf,
    operation_timeout: Duration,
    max_idle: usize,
    idle: Mutex<Vec<SqliteStore>>,
}

impl StorePool {
    /// Opens the first connection eagerly so schema problems surface at startup.
    pub(crate) fn open(
        storage_dir: &Path,
        operation_timeout: Duration,
        max_idle: usize,
    ) -> Result<Self, StoreError> {
        let first = SqliteStore::open_with_timeout(storage_dir, operation_timeout)?;
        Ok(Self {
            storage_dir: storage_dir.to_path_buf(),
            operation_timeout,
            max_idle: max_idle.max(1),
            idle: Mutex::new(vec![first]),
        })
    }

    pub(crate) fn checkout(&self) -> Result<PooledStore<'_>, StoreError> {
        let reused = self
            .idle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop();
        let store = match reused {
            Some(store) => store,
            None => SqliteStore::open_with_timeout(&self.storage_dir, self.operation_timeout)?,
        };
        Ok(PooledStore {
            pool: self,
            store: Some(store),
        })
    }

    pub(crate) fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    fn give_back(&self, store: SqliteStore) {
        let mut idle = self
            .idle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if idle.len() < self.max_idle {
            idle.push(store);
        }
    }

    #[cfg(test)]
    fn idle_count(&self) -> usize {
        self.idle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

pub(crate) struct PooledStore<'a> {
    pool: &'a StorePool,
    store: Option<SqliteStore>,
}

impl Deref for PooledStore<'_> {
    type Target = SqliteStore;

    fn deref(&self) -> &SqliteStore {
        match &self.store {
            Some(store) => store,
            None => unreachable!("store is only taken on drop"),
        }
    }
}

impl DerefMut for PooledStore<'_> {
    fn deref_mut(&mut self) -> &mut SqliteStore {
        match &mut self.store {
            Some(store) => store,
            None => unreachable!("store is only taken on drop"),
        }
    }
}

impl Drop for PooledStore<'_> {
    fn drop(&mut self) {
        if let Some(store) = self.store.take() {
            self.pool.give_back(store);
        }
    }
}
