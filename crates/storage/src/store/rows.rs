#![forbid(unsafe_code)]

use super::StoreError;
use rusqlite::{Connection, Row, params};
use sca_core::{Cat, Mission, MissionView, Target};
use std::collections::BTreeMap;

pub(super) const CAT_COLUMNS: &str = "id, name, years_of_experience, breed, salary";
pub(super) const TARGET_COLUMNS: &str = "id, mission_id, name, country, notes, completed";

/// Missions left-joined to their cat; cat columns are NULL for unassigned missions.
pub(super) const MISSION_VIEW_SELECT: &str = "SELECT m.id, m.cat_id, m.completed, \
     c.id, c.name, c.years_of_experience, c.breed, c.salary \
     FROM missions m \
     LEFT JOIN cats c ON c.id = m.cat_id";

pub(super) fn cat_from_row(row: &Row<'_>) -> rusqlite::Result<Cat> {
    Ok(Cat {
        id: row.get(0)?,
        name: row.get(1)?,
        years_of_experience: row.get(2)?,
        breed: row.get(3)?,
        salary: row.get(4)?,
    })
}

pub(super) fn target_from_row(row: &Row<'_>) -> rusqlite::Result<Target> {
    Ok(Target {
        id: row.get(0)?,
        mission_id: row.get(1)?,
        name: row.get(2)?,
        country: row.get(3)?,
        notes: row.get(4)?,
        completed: row.get(5)?,
    })
}

pub(super) fn mission_view_from_row(row: &Row<'_>) -> rusqlite::Result<MissionView> {
    let mission = Mission {
        id: row.get(0)?,
        cat_id: row.get(1)?,
        completed: row.get(2)?,
    };
    let cat = match row.get::<_, Option<i64>>(3)? {
        Some(id) => Some(Cat {
            id,
            name: row.get(4)?,
            years_of_experience: row.get(5)?,
            breed: row.get(6)?,
            salary: row.get(7)?,
        }),
        None => None,
    };
    Ok(MissionView {
        mission,
        cat,
        targets: Vec::new(),
    })
}

pub(super) fn targets_for_mission(
    conn: &Connection,
    mission_id: i64,
) -> Result<Vec<Target>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TARGET_COLUMNS} FROM targets WHERE mission_id=?1 ORDER BY id ASC"
    ))?;
    let targets = stmt
        .query_map(params![mission_id], target_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(targets)
}

/// Every target grouped by mission id, each group ordered by target id.
pub(super) fn targets_by_mission(
    conn: &Connection,
) -> Result<BTreeMap<i64, Vec<Target>>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TARGET_COLUMNS} FROM targets ORDER BY mission_id ASC, id ASC"
    ))?;
    let mut rows = stmt.query([])?;
    let mut out: BTreeMap<i64, Vec<Target>> = BTreeMap::new();
    while let Some(row) = rows.next()? {
        let target = target_from_row(row)?;
        out.entry(target.mission_id).or_default().push(target);
    }
    Ok(out)
}
