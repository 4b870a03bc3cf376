#![forbid(unsafe_code)]

use crate::limits::{
    MAX_BREED_CHARS, MAX_CAT_NAME_CHARS, MAX_COUNTRY_CHARS, MAX_NOTES_CHARS,
    MAX_TARGET_NAME_CHARS, MAX_TARGETS_PER_MISSION,
};
use crate::model::{NewCat, NewTarget};
use std::collections::BTreeSet;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: {reason}")]
    Field {
        field: &'static str,
        reason: &'static str,
    },
    #[error("duplicate target name: {name}")]
    DuplicateTargetName { name: String },
}

impl ValidationError {
    pub fn field(field: &'static str, reason: &'static str) -> Self {
        Self::Field { field, reason }
    }
}

pub fn validate_id(field: &'static str, value: i64) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(ValidationError::field(field, "must be a positive integer"));
    }
    Ok(())
}

pub fn validate_new_cat(cat: &NewCat) -> Result<(), ValidationError> {
    required_text("name", &cat.name, MAX_CAT_NAME_CHARS)?;
    if cat.years_of_experience < 1 {
        return Err(ValidationError::field(
            "years_of_experience",
            "must be at least 1",
        ));
    }
    required_text("breed", &cat.breed, MAX_BREED_CHARS)?;
    if cat.salary < 1 {
        return Err(ValidationError::field("salary", "must be at least 1"));
    }
    Ok(())
}

pub fn validate_salary(salary: i64) -> Result<(), ValidationError> {
    if salary < 0 {
        return Err(ValidationError::field("salary", "must not be negative"));
    }
    Ok(())
}

pub fn validate_new_target(target: &NewTarget) -> Result<(), ValidationError> {
    required_text("name", &target.name, MAX_TARGET_NAME_CHARS)?;
    required_text("country", &target.country, MAX_COUNTRY_CHARS)?;
    validate_notes(&target.notes)
}

pub fn validate_notes(notes: &str) -> Result<(), ValidationError> {
    required_text("notes", notes, MAX_NOTES_CHARS)
}

/// Structural checks for a mission creation batch: 1..=3 targets, each well formed,
/// names unique within the batch. The name check runs before anything is persisted.
pub fn validate_target_batch(targets: &[NewTarget]) -> Result<(), ValidationError> {
    if targets.is_empty() {
        return Err(ValidationError::field("targets", "at least one target is required"));
    }
    if targets.len() > MAX_TARGETS_PER_MISSION {
        return Err(ValidationError::field("targets", "at most 3 targets are allowed"));
    }
    for target in targets {
        validate_new_target(target)?;
    }
    ensure_unique_target_names(targets)
}

pub fn ensure_unique_target_names(targets: &[NewTarget]) -> Result<(), ValidationError> {
    let mut seen = BTreeSet::new();
    for target in targets {
        if !seen.insert(target.name.as_str()) {
            return Err(ValidationError::DuplicateTargetName {
                name: target.name.clone(),
            });
        }
    }
    Ok(())
}

fn required_text(field: &'static str, value: &str, max_chars: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::field(field, "is required"));
    }
    if value.chars().count() > max_chars {
        return Err(ValidationError::field(field, "is too long"));
    }
    Ok(())
}
