#![forbid(unsafe_code)]

use crate::{Agency, AgencyError};
use sca_core::validate::{validate_id, validate_target_batch};
use sca_core::{MissionView, MissionWithTargets};
use sca_storage::{AssignCatRequest, CreateMissionRequest, UpdateMissionStatusRequest};

impl Agency {
    pub fn create_mission(
        &self,
        request: CreateMissionRequest,
    ) -> Result<MissionWithTargets, AgencyError> {
        tracing::debug!(targets = request.targets.len(), "create_mission");
        if let Some(cat_id) = request.cat_id {
            validate_id("cat_id", cat_id)?;
        }
        validate_target_batch(&request.targets)?;

        let created = self.pool.checkout()?.create_mission(request)?;
        tracing::info!(
            mission_id = created.mission.id,
            targets = created.targets.len(),
            "mission created"
        );
        Ok(created)
    }

    pub fn get_mission(&self, mission_id: i64) -> Result<MissionView, AgencyError> {
        validate_id("mission_id", mission_id)?;
        Ok(self.pool.checkout()?.get_mission(mission_id)?)
    }

    pub fn list_missions(&self) -> Result<Vec<MissionView>, AgencyError> {
        Ok(self.pool.checkout()?.list_missions()?)
    }

    pub fn delete_mission(&self, mission_id: i64) -> Result<(), AgencyError> {
        validate_id("mission_id", mission_id)?;
        self.pool.checkout()?.delete_mission(mission_id)?;
        tracing::info!(mission_id, "mission deleted");
        Ok(())
    }

    /// Completion latches; clearing it on a completed mission reports `NotFound`.
    pub fn update_mission_status(&self, mission_id: i64, completed: bool) -> Result<(), AgencyError> {
        validate_id("mission_id", mission_id)?;
        self.pool
            .checkout()?
            .update_mission_status(UpdateMissionStatusRequest {
                mission_id,
                completed,
            })?;
        tracing::info!(mission_id, completed, "mission status set");
        Ok(())
    }

    pub fn assign_cat(&self, mission_id: i64, cat_id: i64) -> Result<(), AgencyError> {
        validate_id("mission_id", mission_id)?;
        validate_id("cat_id", cat_id)?;
        self.pool
            .checkout()?
            .assign_cat(AssignCatRequest { mission_id, cat_id })?;
        tracing::info!(mission_id, cat_id, "cat assigned");
        Ok(())
    }

    pub fn unassign_cat(&self, mission_id: i64) -> Result<(), AgencyError> {
        validate_id("mission_id", mission_id)?;
        self.pool.checkout()?.unassign_cat(mission_id)?;
        tracing::info!(mission_id, "cat unassigned");
        Ok(())
    }
}
