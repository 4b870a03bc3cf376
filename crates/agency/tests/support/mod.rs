#![allow(dead_code)]

use sca_agency::{Agency, AgencyConfig, NewCat, NewTarget};
use sca_breeds::{BreedChecker, BreedError, BreedRegistry, MemoryBreedCache};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = base.join(format!("sca_agency_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

pub struct FakeRegistry {
    names: Vec<String>,
    calls: AtomicUsize,
    down: AtomicBool,
}

impl FakeRegistry {
    pub fn new(names: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            names: names.iter().map(|name| name.to_string()).collect(),
            calls: AtomicUsize::new(0),
            down: AtomicBool::new(false),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }
}

impl BreedRegistry for FakeRegistry {
    fn fetch_breeds(&self) -> Result<Vec<String>, BreedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.down.load(Ordering::SeqCst) {
            return Err(BreedError::Timeout);
        }
        Ok(self.names.clone())
    }
}

pub fn config(test_name: &str) -> AgencyConfig {
    AgencyConfig {
        storage_dir: temp_dir(test_name),
        ..AgencyConfig::default()
    }
}

pub fn agency_with(config: &AgencyConfig, registry: &Arc<FakeRegistry>) -> Agency {
    let checker = BreedChecker::new(registry.clone(), Arc::new(MemoryBreedCache::new(64)));
    Agency::with_breed_checker(config, Arc::new(checker)).expect("open agency")
}

pub fn agency(test_name: &str) -> (Agency, Arc<FakeRegistry>) {
    let registry = FakeRegistry::new(&["Bengal", "Persian", "Sphynx"]);
    (agency_with(&config(test_name), &registry), registry)
}

pub fn cat(name: &str, breed: &str) -> NewCat {
    NewCat {
        name: name.to_string(),
        years_of_experience: 4,
        breed: breed.to_string(),
        salary: 1_200,
    }
}

pub fn target(name: &str) -> NewTarget {
    NewTarget {
        name: name.to_string(),
        country: "Italy".to_string(),
        notes: "last seen near the docks".to_string(),
        completed: false,
    }
}
