#![forbid(unsafe_code)]

use super::rows::{MISSION_VIEW_SELECT, mission_view_from_row, targets_by_mission, targets_for_mission};
use super::{
    AssignCatRequest, CreateMissionRequest, SqliteStore, StoreError, UpdateMissionStatusRequest,
    map_write_error,
};
use rusqlite::{OptionalExtension, Transaction, TransactionBehavior, params};
use sca_core::limits::MAX_TARGETS_PER_MISSION;
use sca_core::validate::ensure_unique_target_names;
use sca_core::{Mission, MissionView, MissionWithTargets};

impl SqliteStore {
    /// Inserts the mission and all of its targets in one transaction. Any failure,
    /// including a target name collision, leaves nothing behind.
    pub fn create_mission(
        &mut self,
        request: CreateMissionRequest,
    ) -> Result<MissionWithTargets, StoreError> {
        if request.targets.is_empty() {
            return Err(StoreError::InvalidInput("mission needs at least one target"));
        }
        if request.targets.len() > MAX_TARGETS_PER_MISSION {
            return Err(StoreError::InvalidInput("mission takes at most 3 targets"));
        }
        if ensure_unique_target_names(&request.targets).is_err() {
            return Err(StoreError::DuplicateName);
        }

        let _deadline = self.arm_deadline();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mission_id = tx
            .query_row(
                "INSERT INTO missions(cat_id, completed) VALUES (?1, ?2) RETURNING id",
                params![request.cat_id, request.completed],
                |row| row.get::<_, i64>(0),
            )
            .map_err(|err| {
                map_write_error(err, StoreError::AlreadyAssigned, StoreError::UnknownId)
            })?;

        let mut targets = Vec::with_capacity(request.targets.len());
        for target in request.targets {
            let target_id = tx
                .query_row(
                    "INSERT INTO targets(mission_id, name, country, notes, completed) \
                     VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id",
                    params![
                        mission_id,
                        target.name,
                        target.country,
                        target.notes,
                        target.completed
                    ],
                    |row| row.get::<_, i64>(0),
                )
                .map_err(|err| {
                    map_write_error(err, StoreError::DuplicateName, StoreError::UnknownId)
                })?;
            targets.push(target.into_target(target_id, mission_id));
        }

        tx.commit()?;
        Ok(MissionWithTargets {
            mission: Mission {
                id: mission_id,
                cat_id: request.cat_id,
                completed: request.completed,
            },
            targets,
        })
    }

    /// Deletion is refused while a cat is attached, whatever the completion state.
    /// Targets go with the mission through the cascading foreign key.
    pub fn delete_mission(&mut self, mission_id: i64) -> Result<(), StoreError> {
        let _deadline = self.arm_deadline();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let state = mission_state_tx(&tx, mission_id)?;
        if state.cat_id.is_some() {
            return Err(StoreError::CatAssigned);
        }

        let deleted = tx.execute("DELETE FROM missions WHERE id=?1", params![mission_id])?;
        if deleted == 0 {
            return Err(StoreError::UnknownId);
        }

        tx.commit()?;
        Ok(())
    }

    /// Operator override. `completed` only ever latches to true: asking to clear it on a
    /// completed mission matches no row and is reported as an unknown id.
    pub fn update_mission_status(
        &mut self,
        request: UpdateMissionStatusRequest,
    ) -> Result<(), StoreError> {
        let _deadline = self.arm_deadline();

        let updated = self
            .conn
            .execute(
                "UPDATE missions SET completed=?2 \
                 WHERE id=?1 AND (completed=0 OR ?2=1)",
                params![request.mission_id, request.completed],
            )
            .map_err(|err| map_write_error(err, StoreError::Conflict, StoreError::Conflict))?;

        if updated == 0 {
            return Err(StoreError::UnknownId);
        }
        Ok(())
    }

    pub fn assign_cat(&mut self, request: AssignCatRequest) -> Result<(), StoreError> {
        let _deadline = self.arm_deadline();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let state = mission_state_tx(&tx, request.mission_id)?;
        if state.completed {
            return Err(StoreError::MissionCompleted);
        }

        let cat_exists = tx
            .query_row(
                "SELECT 1 FROM cats WHERE id=?1",
                params![request.cat_id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?
            .is_some();
        if !cat_exists {
            return Err(StoreError::UnknownId);
        }

        let updated = tx
            .execute(
                "UPDATE missions SET cat_id=?2 WHERE id=?1 AND completed=0",
                params![request.mission_id, request.cat_id],
            )
            .map_err(|err| {
                map_write_error(err, StoreError::AlreadyAssigned, StoreError::UnknownId)
            })?;
        if updated == 0 {
            return Err(StoreError::UnknownId);
        }

        tx.commit()?;
        Ok(())
    }

    /// Clears the cat assignment of an open mission. Completed missions keep their cat.
    pub fn unassign_cat(&mut self, mission_id: i64) -> Result<(), StoreError> {
        let _deadline = self.arm_deadline();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let state = mission_state_tx(&tx, mission_id)?;
        if state.completed {
            return Err(StoreError::MissionCompleted);
        }

        tx.execute(
            "UPDATE missions SET cat_id=NULL WHERE id=?1 AND completed=0",
            params![mission_id],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// The mission row and its targets are read from one snapshot.
    pub fn get_mission(&self, mission_id: i64) -> Result<MissionView, StoreError> {
        let _deadline = self.arm_deadline();
        let tx = self.conn.unchecked_transaction()?;

        let mut view = tx
            .query_row(
                &format!("{MISSION_VIEW_SELECT} WHERE m.id=?1"),
                params![mission_id],
                mission_view_from_row,
            )
            .optional()?
            .ok_or(StoreError::UnknownId)?;
        view.targets = targets_for_mission(&tx, mission_id)?;

        tx.commit()?;
        Ok(view)
    }

    pub fn list_missions(&self) -> Result<Vec<MissionView>, StoreError> {
        let _deadline = self.arm_deadline();
        let tx = self.conn.unchecked_transaction()?;

        let mut views = {
            let mut stmt = tx.prepare(&format!("{MISSION_VIEW_SELECT} ORDER BY m.id ASC"))?;
            let rows = stmt
                .query_map([], mission_view_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
        };

        let mut targets = targets_by_mission(&tx)?;
        for view in &mut views {
            view.targets = targets.remove(&view.mission.id).unwrap_or_default();
        }

        tx.commit()?;
        Ok(views)
    }
}

#[derive(Debug)]
pub(super) struct MissionState {
    pub(super) cat_id: Option<i64>,
    pub(super) completed: bool,
    pub(super) target_count: usize,
}

/// Re-reads the governing mission row inside the caller's transaction.
pub(super) fn mission_state_tx(
    tx: &Transaction<'_>,
    mission_id: i64,
) -> Result<MissionState, StoreError> {
    let value = tx
        .query_row(
            "SELECT m.cat_id, m.completed, \
               (SELECT COUNT(1) FROM targets t WHERE t.mission_id = m.id) \
             FROM missions m WHERE m.id=?1",
            params![mission_id],
            |row| {
                Ok((
                    row.get::<_, Option<i64>>(0)?,
                    row.get::<_, bool>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            },
        )
        .optional()?;

    match value {
        Some((cat_id, completed, target_count)) => Ok(MissionState {
            cat_id,
            completed,
            target_count: usize::try_from(target_count).unwrap_or(usize::MAX),
        }),
        None => Err(StoreError::UnknownId),
    }
}
