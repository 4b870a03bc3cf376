#![forbid(unsafe_code)]

use super::missions::mission_state_tx;
use super::{
    AddTargetRequest, SqliteStore, StoreError, TargetRef, UpdateTargetNoteRequest,
    map_write_error,
};
use rusqlite::{OptionalExtension, TransactionBehavior, params};
use sca_core::Target;
use sca_core::limits::MAX_TARGETS_PER_MISSION;

impl SqliteStore {
    /// Adds one target to an open mission holding fewer than three targets. The
    /// completion flag and the count are read under the same write transaction as the
    /// insert, so concurrent adds cannot push a mission past the cap.
    ///
    /// New targets always start incomplete.
    pub fn add_target(&mut self, request: AddTargetRequest) -> Result<Target, StoreError> {
        let _deadline = self.arm_deadline();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let state = mission_state_tx(&tx, request.mission_id)?;
        if state.completed || state.target_count >= MAX_TARGETS_PER_MISSION {
            return Err(StoreError::TargetLimitExceeded);
        }

        let target = request.target;
        let target_id = tx
            .query_row(
                "INSERT INTO targets(mission_id, name, country, notes, completed) \
                 VALUES (?1, ?2, ?3, ?4, 0) RETURNING id",
                params![request.mission_id, target.name, target.country, target.notes],
                |row| row.get::<_, i64>(0),
            )
            .map_err(|err| map_write_error(err, StoreError::DuplicateName, StoreError::UnknownId))?;

        tx.commit()?;
        Ok(Target {
            id: target_id,
            mission_id: request.mission_id,
            name: target.name,
            country: target.country,
            notes: target.notes,
            completed: false,
        })
    }

    /// Notes are editable only while both the target and its mission are open. The guard
    /// lives in the WHERE clause; a miss for any reason is reported as an unknown id.
    pub fn update_target_note(&mut self, request: UpdateTargetNoteRequest) -> Result<(), StoreError> {
        let _deadline = self.arm_deadline();

        let updated = self.conn.execute(
            "UPDATE targets SET notes=?3 \
             WHERE id=?1 AND mission_id=?2 AND completed=0 \
               AND EXISTS (SELECT 1 FROM missions m WHERE m.id=?2 AND m.completed=0)",
            params![
                request.target.target_id,
                request.target.mission_id,
                request.notes
            ],
        )?;

        if updated == 0 {
            return Err(StoreError::UnknownId);
        }
        Ok(())
    }

    /// Latches the target to completed. When this flips the last open target, the
    /// mission is completed in the same transaction. An already completed target is
    /// left alone and never cascades.
    ///
    /// Returns whether the mission was completed by this call.
    pub fn complete_target(&mut self, target: TargetRef) -> Result<bool, StoreError> {
        let _deadline = self.arm_deadline();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let was_completed = tx
            .query_row(
                "SELECT completed FROM targets WHERE id=?1 AND mission_id=?2",
                params![target.target_id, target.mission_id],
                |row| row.get::<_, bool>(0),
            )
            .optional()?
            .ok_or(StoreError::UnknownId)?;
        if was_completed {
            return Ok(false);
        }

        tx.execute(
            "UPDATE targets SET completed=1 WHERE id=?1 AND mission_id=?2",
            params![target.target_id, target.mission_id],
        )?;

        let open_targets = tx.query_row(
            "SELECT COUNT(1) FROM targets WHERE mission_id=?1 AND completed=0",
            params![target.mission_id],
            |row| row.get::<_, i64>(0),
        )?;

        let mission_completed = if open_targets == 0 {
            tx.execute(
                "UPDATE missions SET completed=1 WHERE id=?1 AND completed=0",
                params![target.mission_id],
            )? > 0
        } else {
            false
        };

        tx.commit()?;
        if mission_completed {
            tracing::info!(mission_id = target.mission_id, "mission completed by last target");
        }
        Ok(mission_completed)
    }

    /// Only open targets can be removed.
    pub fn delete_target(&mut self, target: TargetRef) -> Result<(), StoreError> {
        let _deadline = self.arm_deadline();

        let deleted = self.conn.execute(
            "DELETE FROM targets WHERE id=?1 AND mission_id=?2 AND completed=0",
            params![target.target_id, target.mission_id],
        )?;

        if deleted == 0 {
            return Err(StoreError::UnknownId);
        }
        Ok(())
    }
}
