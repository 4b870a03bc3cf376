#![forbid(unsafe_code)]

use crate::AgencyError;
use sca_breeds::BreedChecker;
use sca_core::NewCat;
use sca_core::validate::validate_new_cat;
use std::sync::Arc;

/// Request-level checks for cat creation. Field rules run first; the breed lookup
/// (which may hit the network) only runs for an otherwise valid cat.
#[derive(Clone)]
pub struct RequestValidator {
    breeds: Arc<BreedChecker>,
}

impl RequestValidator {
    pub fn new(breeds: Arc<BreedChecker>) -> Self {
        Self { breeds }
    }

    pub fn validate_new_cat(&self, cat: &NewCat) -> Result<(), AgencyError> {
        validate_new_cat(cat)?;
        if !self.breeds.is_known_breed(&cat.breed)? {
            return Err(AgencyError::UnknownBreed {
                breed: cat.breed.clone(),
            });
        }
        Ok(())
    }
}
