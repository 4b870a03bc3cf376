#![forbid(unsafe_code)]

use crate::{Agency, AgencyError};
use sca_core::validate::{validate_id, validate_new_target, validate_notes};
use sca_core::{NewTarget, Target};
use sca_storage::{AddTargetRequest, TargetRef, UpdateTargetNoteRequest};

impl Agency {
    /// The new target always starts incomplete, whatever `target.completed` says.
    pub fn add_target(&self, mission_id: i64, target: NewTarget) -> Result<Target, AgencyError> {
        validate_id("mission_id", mission_id)?;
        validate_new_target(&target)?;

        let added = self
            .pool
            .checkout()?
            .add_target(AddTargetRequest { mission_id, target })?;
        tracing::info!(mission_id, target_id = added.id, "target added");
        Ok(added)
    }

    pub fn update_target_note(&self, target: TargetRef, notes: String) -> Result<(), AgencyError> {
        validate_target_ref(target)?;
        validate_notes(&notes)?;
        self.pool
            .checkout()?
            .update_target_note(UpdateTargetNoteRequest { target, notes })?;
        tracing::info!(
            mission_id = target.mission_id,
            target_id = target.target_id,
            "target notes updated"
        );
        Ok(())
    }

    /// Returns whether this call completed the mission.
    pub fn complete_target(&self, target: TargetRef) -> Result<bool, AgencyError> {
        validate_target_ref(target)?;
        let mission_completed = self.pool.checkout()?.complete_target(target)?;
        tracing::info!(
            mission_id = target.mission_id,
            target_id = target.target_id,
            mission_completed,
            "target completed"
        );
        Ok(mission_completed)
    }

    pub fn delete_target(&self, target: TargetRef) -> Result<(), AgencyError> {
        validate_target_ref(target)?;
        self.pool.checkout()?.delete_target(target)?;
        tracing::info!(
            mission_id = target.mission_id,
            target_id = target.target_id,
            "target deleted"
        );
        Ok(())
    }
}

fn validate_target_ref(target: TargetRef) -> Result<(), AgencyError> {
    validate_id("mission_id", target.mission_id)?;
    validate_id("target_id", target.target_id)?;
    Ok(())
}
