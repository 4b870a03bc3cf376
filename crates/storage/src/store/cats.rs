#![forbid(unsafe_code)]

use super::rows::{CAT_COLUMNS, cat_from_row};
use super::{ListCatsRequest, SqliteStore, StoreError, UpdateSalaryRequest, map_write_error};
use rusqlite::{OptionalExtension, params};
use sca_core::{Cat, NewCat};

impl SqliteStore {
    pub fn create_cat(&mut self, cat: NewCat) -> Result<Cat, StoreError> {
        let _deadline = self.arm_deadline();

        let id = self
            .conn
            .query_row(
                "INSERT INTO cats(name, years_of_experience, breed, salary) \
                 VALUES (?1, ?2, ?3, ?4) RETURNING id",
                params![cat.name, cat.years_of_experience, cat.breed, cat.salary],
                |row| row.get::<_, i64>(0),
            )
            .map_err(|err| map_write_error(err, StoreError::Conflict, StoreError::Conflict))?;

        Ok(cat.into_cat(id))
    }

    pub fn get_cat(&self, cat_id: i64) -> Result<Cat, StoreError> {
        let _deadline = self.arm_deadline();

        self.conn
            .query_row(
                &format!("SELECT {CAT_COLUMNS} FROM cats WHERE id=?1"),
                params![cat_id],
                cat_from_row,
            )
            .optional()?
            .ok_or(StoreError::UnknownId)
    }

    /// Rewrites the salary only; every other column is immutable after creation.
    pub fn update_cat_salary(&mut self, request: UpdateSalaryRequest) -> Result<Cat, StoreError> {
        let _deadline = self.arm_deadline();

        self.conn
            .query_row(
                &format!("UPDATE cats SET salary=?2 WHERE id=?1 RETURNING {CAT_COLUMNS}"),
                params![request.cat_id, request.salary],
                cat_from_row,
            )
            .optional()
            .map_err(|err| map_write_error(err, StoreError::Conflict, StoreError::Conflict))?
            .ok_or(StoreError::UnknownId)
    }

    /// A cat still referenced by any mission cannot be removed; that surfaces as
    /// [`StoreError::Conflict`].
    pub fn delete_cat(&mut self, cat_id: i64) -> Result<(), StoreError> {
        let _deadline = self.arm_deadline();

        let deleted = self
            .conn
            .execute("DELETE FROM cats WHERE id=?1", params![cat_id])
            .map_err(|err| map_write_error(err, StoreError::Conflict, StoreError::Conflict))?;

        if deleted == 0 {
            return Err(StoreError::UnknownId);
        }
        Ok(())
    }

    pub fn list_cats(&self, request: ListCatsRequest) -> Result<Vec<Cat>, StoreError> {
        let _deadline = self.arm_deadline();

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CAT_COLUMNS} FROM cats ORDER BY id ASC LIMIT ?1 OFFSET ?2"
        ))?;
        let cats = stmt
            .query_map(
                params![request.page.limit, request.page.offset],
                cat_from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(cats)
    }

    pub fn cat_exists(&self, cat_id: i64) -> Result<bool, StoreError> {
        let _deadline = self.arm_deadline();

        Ok(self
            .conn
            .query_row(
                "SELECT 1 FROM cats WHERE id=?1",
                params![cat_id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?
            .is_some())
    }
}
