#![forbid(unsafe_code)]

use crate::{Agency, AgencyError};
use sca_core::validate::{validate_id, validate_salary};
use sca_core::{Cat, NewCat, PageRequest};
use sca_storage::{ListCatsRequest, UpdateSalaryRequest};

impl Agency {
    /// The breed is confirmed before a store connection is taken.
    pub fn create_cat(&self, cat: NewCat) -> Result<Cat, AgencyError> {
        tracing::debug!(breed = %cat.breed, "create_cat");
        self.validator.validate_new_cat(&cat)?;

        let created = self.pool.checkout()?.create_cat(cat)?;
        tracing::info!(cat_id = created.id, "cat created");
        Ok(created)
    }

    pub fn get_cat(&self, cat_id: i64) -> Result<Cat, AgencyError> {
        validate_id("cat_id", cat_id)?;
        Ok(self.pool.checkout()?.get_cat(cat_id)?)
    }

    pub fn list_cats(&self, page: PageRequest) -> Result<Vec<Cat>, AgencyError> {
        let page = page.resolve_with(self.default_page_limit, self.max_page_limit)?;
        tracing::debug!(limit = page.limit, offset = page.offset, "list_cats");
        Ok(self.pool.checkout()?.list_cats(ListCatsRequest { page })?)
    }

    pub fn update_cat_salary(&self, cat_id: i64, salary: i64) -> Result<Cat, AgencyError> {
        validate_id("cat_id", cat_id)?;
        validate_salary(salary)?;

        let updated = self
            .pool
            .checkout()?
            .update_cat_salary(UpdateSalaryRequest { cat_id, salary })?;
        tracing::info!(cat_id, "cat salary updated");
        Ok(updated)
    }

    pub fn delete_cat(&self, cat_id: i64) -> Result<(), AgencyError> {
        validate_id("cat_id", cat_id)?;
        self.pool.checkout()?.delete_cat(cat_id)?;
        tracing::info!(cat_id, "cat deleted");
        Ok(())
    }
}
