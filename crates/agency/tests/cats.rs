mod support;

use sca_agency::{Agency, AgencyConfig, ErrorKind, PageRequest};
use sca_breeds::{BreedCache, BreedChecker, BreedError};
use std::sync::Arc;
use std::time::Duration;
use support::{FakeRegistry, agency, agency_with, cat, config};

#[test]
fn field_rules_run_before_the_breed_lookup() {
    let (agency, registry) = agency("field_first");

    let err = agency
        .create_cat(cat("   ", "Bengal"))
        .expect_err("blank name");
    assert_eq!(err.kind(), ErrorKind::ValidationRejected);

    let mut rookie = cat("Tom", "Bengal");
    rookie.years_of_experience = 0;
    let err = agency.create_cat(rookie).expect_err("no experience");
    assert_eq!(err.kind(), ErrorKind::ValidationRejected);

    assert_eq!(registry.calls(), 0);
}

#[test]
fn unknown_breed_is_its_own_kind_and_stores_nothing() {
    let (agency, registry) = agency("unknown_breed");

    let err = agency
        .create_cat(cat("Tom", "Dragon"))
        .expect_err("no such breed");
    assert_eq!(err.kind(), ErrorKind::UnknownBreed);
    assert!(!err.is_retryable());

    let err = agency
        .create_cat(cat("Tom", "bengal"))
        .expect_err("breed match is case-sensitive");
    assert_eq!(err.kind(), ErrorKind::UnknownBreed);

    assert!(agency.list_cats(PageRequest::default()).unwrap().is_empty());
    assert_eq!(registry.calls(), 2, "negative answers are not cached");
}

#[test]
fn known_breed_is_fetched_once() {
    let (agency, registry) = agency("breed_cache");
    agency.create_cat(cat("Tom", "Bengal")).expect("first");
    agency.create_cat(cat("Jerry", "Bengal")).expect("second");
    assert_eq!(registry.calls(), 1);
}

#[test]
fn registry_outage_is_retryable_infrastructure() {
    let (agency, registry) = agency("outage");
    registry.set_down(true);

    let err = agency
        .create_cat(cat("Tom", "Sphynx"))
        .expect_err("registry unreachable");
    assert_eq!(err.kind(), ErrorKind::Infrastructure);
    assert!(err.is_retryable());
    assert!(agency.list_cats(PageRequest::default()).unwrap().is_empty());

    registry.set_down(false);
    agency.create_cat(cat("Tom", "Sphynx")).expect("retry succeeds");
}

#[test]
fn salary_update_and_delete() {
    let (agency, _) = agency("salary");
    let tom = agency.create_cat(cat("Tom", "Persian")).unwrap();

    let err = agency
        .update_cat_salary(tom.id, -1)
        .expect_err("negative salary");
    assert_eq!(err.kind(), ErrorKind::ValidationRejected);

    let updated = agency.update_cat_salary(tom.id, 0).expect("zero is fine");
    assert_eq!(updated.salary, 0);
    assert_eq!(agency.get_cat(tom.id).unwrap().salary, 0);

    agency.delete_cat(tom.id).expect("delete");
    assert_eq!(
        agency.get_cat(tom.id).expect_err("gone").kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        agency.get_cat(0).expect_err("bad id").kind(),
        ErrorKind::ValidationRejected
    );
}

#[test]
fn pagination_defaults_follow_config() {
    let registry = FakeRegistry::new(&["Bengal"]);
    let config = AgencyConfig {
        default_page_limit: 2,
        max_page_limit: 3,
        ..config("paging")
    };
    let agency = agency_with(&config, &registry);
    for i in 0..5 {
        agency.create_cat(cat(&format!("Cat {i}"), "Bengal")).unwrap();
    }

    assert_eq!(agency.list_cats(PageRequest::default()).unwrap().len(), 2);
    let tail = agency
        .list_cats(PageRequest::new(Some(3), Some(3)))
        .unwrap();
    assert_eq!(tail.len(), 2);
    assert_eq!(tail[0].name, "Cat 3");

    let err = agency
        .list_cats(PageRequest::new(Some(4), None))
        .expect_err("above configured maximum");
    assert_eq!(err.kind(), ErrorKind::ValidationRejected);
    let err = agency
        .list_cats(PageRequest::new(None, Some(-1)))
        .expect_err("negative offset");
    assert_eq!(err.kind(), ErrorKind::ValidationRejected);
}

#[test]
fn referenced_cat_cannot_be_deleted() {
    let (agency, _) = agency("referenced_cat");
    let tom = agency.create_cat(cat("Tom", "Bengal")).unwrap();
    agency
        .create_mission(sca_agency::CreateMissionRequest {
            cat_id: Some(tom.id),
            completed: false,
            targets: vec![support::target("a")],
        })
        .unwrap();
    assert_eq!(
        agency.delete_cat(tom.id).expect_err("in use").kind(),
        ErrorKind::Conflict
    );
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

#[test]
fn cache_write_failure_after_confirmation_is_retryable() {
    let registry = FakeRegistry::new(&["Bengal"]);
    let checker = BreedChecker::new(registry.clone(), Arc::new(ReadOnlyCache));
    let agency = Agency::with_breed_checker(&config("cache_write"), Arc::new(checker))
        .expect("open agency");

    let err = agency
        .create_cat(cat("Tom", "Bengal"))
        .expect_err("cache write failed");
    assert_eq!(err.kind(), ErrorKind::Infrastructure);
    assert!(err.is_retryable());
    assert_eq!(registry.calls(), 1);
    assert!(agency.list_cats(PageRequest::default()).unwrap().is_empty());
}
