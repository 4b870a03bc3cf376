#![forbid(unsafe_code)]

use crate::{BreedCache, BreedError, BreedRegistry, DEFAULT_POSITIVE_TTL};
use std::sync::Arc;
use std::time::Duration;

/// Cache-aside breed lookup. Names match exactly (case-sensitive). Only positive
/// answers are cached, so a breed added to the registry is picked up on the next call.
pub struct BreedChecker {
    registry: Arc<dyn BreedRegistry>,
    cache: Arc<dyn BreedCache>,
    positive_ttl: Duration,
}

impl BreedChecker {
    pub fn new(registry: Arc<dyn BreedRegistry>, cache: Arc<dyn BreedCache>) -> Self {
        Self::with_ttl(registry, cache, DEFAULT_POSITIVE_TTL)
    }

    pub fn with_ttl(
        registry: Arc<dyn BreedRegistry>,
        cache: Arc<dyn BreedCache>,
        positive_ttl: Duration,
    ) -> Self {
        Self {
            registry,
            cache,
            positive_ttl,
        }
    }

    pub fn is_known_breed(&self, breed: &str) -> Result<bool, BreedError> {
        if let Some(known) = self.cache.get(breed)? {
            tracing::debug!(breed, known, "breed cache hit");
            return Ok(known);
        }
        tracing::debug!(breed, "breed cache miss");

        let known = self
            .registry
            .fetch_breeds()?
            .iter()
            .any(|name| name == breed);
        if known {
            self.cache.put_known(breed, self.positive_ttl)?;
        }
        Ok(known)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryBreedCache;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingRegistry {
        names: Mutex<Vec<String>>,
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingRegistry {
        fn new(names: &[&str]) -> Self {
            Self {
                names: Mutex::new(names.iter().map(|name| name.to_string()).collect()),
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn replace(&self, names: &[&str]) {
            *self.names.lock().unwrap() = names.iter().map(|name| name.to_string()).collect();
        }
    }

    impl BreedRegistry for CountingRegistry {
        fn fetch_breeds(&self) -> Result<Vec<String>, BreedError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(BreedError::Registry("registry down".to_string()));
            }
            Ok(self.names.lock().unwrap().clone())
        }
    }

    struct BrokenCache;

    impl BreedCache for BrokenCache {
        fn get(&self, _breed: &str) -> Result<Option<bool>, BreedError> {
            Err(BreedError::Cache("connection refused".to_string()))
        }

        fn put_known(&self, _breed: &str, _ttl: Duration) -> Result<(), BreedError> {
            Err(BreedError::Cache("connection refused".to_string()))
        }
    }

    struct ReadOnlyCache;

    impl BreedCache for ReadOnlyCache {
        fn get(&self, _breed: &str) -> Result<Option<bool>, BreedError> {
            Ok(None)
        }

        fn put_known(&self, _breed: &str, _ttl: Duration) -> Result<(), BreedError> {
            Err(BreedError::Cache("READONLY replica".to_string()))
        }
    }

    fn checker(registry: &Arc<CountingRegistry>) -> BreedChecker {
        BreedChecker::new(registry.clone(), Arc::new(MemoryBreedCache::new(16)))
    }

    #[test]
    fn known_breed_is_fetched_once_then_served_from_cache() {
        let registry = Arc::new(CountingRegistry::new(&["Bengal", "Sphynx"]));
        let checker = checker(&registry);

        assert!(checker.is_known_breed("Bengal").unwrap());
        assert!(checker.is_known_breed("Bengal").unwrap());
        assert!(checker.is_known_breed("Bengal").unwrap());
        assert_eq!(registry.calls(), 1);
    }

    #[test]
    fn unknown_breed_is_never_cached() {
        let registry = Arc::new(CountingRegistry::new(&["Bengal"]));
        let checker = checker(&registry);

        assert!(!checker.is_known_breed("Dragon").unwrap());
        assert!(!checker.is_known_breed("Dragon").unwrap());
        assert_eq!(registry.calls(), 2);
    }

    #[test]
    fn cached_positive_survives_registry_shrinking() {
        let registry = Arc::new(CountingRegistry::new(&["Siberian", "Persian"]));
        let checker = checker(&registry);
        assert!(checker.is_known_breed("Siberian").unwrap());

        registry.replace(&[]);
        assert!(checker.is_known_breed("Siberian").unwrap());
        assert_eq!(registry.calls(), 1);

        assert!(!checker.is_known_breed("Sphynx").unwrap());
        assert!(!checker.is_known_breed("Sphynx").unwrap());
        assert_eq!(registry.calls(), 3);

        registry.replace(&["Sphynx"]);
        assert!(checker.is_known_breed("Sphynx").unwrap());
    }

    #[test]
    fn match_is_case_sensitive() {
        let registry = Arc::new(CountingRegistry::new(&["Bengal"]));
        let checker = checker(&registry);
        assert!(!checker.is_known_breed("bengal").unwrap());
        assert!(!checker.is_known_breed("Bengal ").unwrap());
    }

    #[test]
    fn registry_failure_propagates() {
        let registry = Arc::new(CountingRegistry {
            fail: true,
            ..CountingRegistry::new(&["Bengal"])
        });
        let err = checker(&registry).is_known_breed("Bengal").unwrap_err();
        assert!(matches!(err, BreedError::Registry(_)));
    }

    #[test]
    fn cache_failure_propagates_without_calling_registry() {
        let registry = Arc::new(CountingRegistry::new(&["Bengal"]));
        let checker = BreedChecker::new(registry.clone(), Arc::new(BrokenCache));
        let err = checker.is_known_breed("Bengal").unwrap_err();
        assert!(matches!(err, BreedError::Cache(_)));
        assert_eq!(registry.calls(), 0);
    }

    #[test]
    fn failing_to_remember_a_confirmed_breed_is_a_cache_error() {
        let registry = Arc::new(CountingRegistry::new(&["Bengal"]));
        let checker = BreedChecker::new(registry.clone(), Arc::new(ReadOnlyCache));
        let err = checker.is_known_breed("Bengal").unwrap_err();
        assert!(matches!(err, BreedError::Cache(_)), "got {err:?}");
        assert_eq!(registry.calls(), 1);

        assert!(!checker.is_known_breed("Dragon").unwrap(), "unknown breeds are never written");
    }
}
