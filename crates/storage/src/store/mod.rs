#![forbid(unsafe_code)]

mod cats;
mod deadline;
mod error;
mod missions;
mod requests;
mod rows;
mod targets;

pub use error::StoreError;
pub use requests::*;

use deadline::{DeadlineGuard, OperationClock, PROGRESS_STEPS};
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DB_FILE_NAME: &str = "spy_cat_agency.db";
pub const SCHEMA_VERSION: i64 = 1;
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: PathBuf,
    clock: OperationClock,
    operation_timeout: Duration,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_with_timeout(storage_dir, DEFAULT_OPERATION_TIMEOUT)
    }

    /// Opens (creating if needed) the agency database under `storage_dir`.
    ///
    /// `operation_timeout` bounds every store operation: it is used both as the SQLite
    /// busy timeout for lock waits and as the progress-handler deadline for running
    /// statements. Either one expiring yields [`StoreError::Timeout`].
    pub fn open_with_timeout(
        storage_dir: impl AsRef<Path>,
        operation_timeout: Duration,
    ) -> Result<Self, StoreError> {
        if operation_timeout.is_zero() {
            return Err(StoreError::InvalidInput("operation timeout must be positive"));
        }
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join(DB_FILE_NAME);
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(operation_timeout)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let _: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;

        preflight_gate(&conn)?;
        install_schema(&conn)?;

        let clock = OperationClock::new();
        let handler_clock = clock.clone();
        conn.progress_handler(PROGRESS_STEPS, Some(move || handler_clock.expired()));

        tracing::debug!(
            storage_dir = %storage_dir.display(),
            timeout_ms = operation_timeout.as_millis() as u64,
            "store opened"
        );

        Ok(Self {
            conn,
            storage_dir,
            clock,
            operation_timeout,
        })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    pub fn schema_version(&self) -> Result<i64, StoreError> {
        let _deadline = self.arm_deadline();
        Ok(self.conn.query_row(
            "SELECT schema_version FROM schema_state WHERE singleton=1",
            [],
            |row| row.get::<_, i64>(0),
        )?)
    }

    fn arm_deadline(&self) -> DeadlineGuard {
        self.clock.arm(self.operation_timeout)
    }
}

fn preflight_gate(conn: &Connection) -> Result<(), StoreError> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
    )?;
    let mut rows = stmt.query([])?;
    let mut tables = BTreeSet::new();
    while let Some(row) = rows.next()? {
        tables.insert(row.get::<_, String>(0)?);
    }

    if tables.is_empty() {
        return Ok(());
    }

    let required: BTreeSet<&str> = ["schema_state", "cats", "missions", "targets"]
        .into_iter()
        .collect();

    if tables
        .iter()
        .any(|table| !required.contains(table.as_str()))
    {
        return Err(StoreError::InvalidInput(
            "RESET_REQUIRED: unsupported tables detected",
        ));
    }

    for table in required {
        if !tables.contains(table) {
            return Err(StoreError::InvalidInput(
                "RESET_REQUIRED: required table is missing",
            ));
        }
    }

    let version = conn
        .query_row(
            "SELECT schema_version FROM schema_state WHERE singleton=1",
            [],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;

    match version {
        Some(v) if v == SCHEMA_VERSION => Ok(()),
        Some(_) => Err(StoreError::InvalidInput(
            "RESET_REQUIRED: schema version mismatch",
        )),
        None => Err(StoreError::InvalidInput(
            "RESET_REQUIRED: schema state row is missing",
        )),
    }
}

fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    let now_ms = now_ms();

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_state (
          singleton INTEGER PRIMARY KEY CHECK(singleton = 1),
          schema_version INTEGER NOT NULL,
          created_at_ms INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS cats (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          name TEXT NOT NULL,
          years_of_experience INTEGER NOT NULL,
          breed TEXT NOT NULL,
          salary INTEGER NOT NULL,
          CHECK(years_of_experience >= 0),
          CHECK(salary >= 0)
        );

        CREATE TABLE IF NOT EXISTS missions (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          cat_id INTEGER,
          completed INTEGER NOT NULL DEFAULT 0,
          FOREIGN KEY(cat_id) REFERENCES cats(id) ON DELETE RESTRICT,
          CHECK(completed IN (0, 1))
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_missions_active_cat
          ON missions(cat_id)
          WHERE cat_id IS NOT NULL AND completed = 0;

        CREATE TABLE IF NOT EXISTS targets (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          mission_id INTEGER NOT NULL,
          name TEXT NOT NULL,
          country TEXT NOT NULL,
          notes TEXT NOT NULL,
          completed INTEGER NOT NULL DEFAULT 0,
          UNIQUE(mission_id, name),
          FOREIGN KEY(mission_id) REFERENCES missions(id) ON DELETE CASCADE,
          CHECK(completed IN (0, 1))
        );

        CREATE INDEX IF NOT EXISTS idx_targets_mission
          ON targets(mission_id, id);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_state(singleton, schema_version, created_at_ms) \
         VALUES (1, ?1, ?2)",
        params![SCHEMA_VERSION, now_ms],
    )?;

    Ok(())
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, message) => {
            code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || message.as_deref().is_some_and(|value| {
                    value.contains("UNIQUE constraint failed")
                        || value.contains("PRIMARY KEY constraint failed")
                })
        }
        _ => false,
    }
}

fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, message) => {
            code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
                || message
                    .as_deref()
                    .is_some_and(|value| value.contains("FOREIGN KEY constraint failed"))
        }
        _ => false,
    }
}

/// Translates a failed write into a domain error: uniqueness violations become
/// `on_unique`, foreign-key violations become `on_foreign_key`, any other constraint
/// failure is a generic [`StoreError::Conflict`].
fn map_write_error(
    err: rusqlite::Error,
    on_unique: StoreError,
    on_foreign_key: StoreError,
) -> StoreError {
    if is_unique_violation(&err) {
        return on_unique;
    }
    if is_foreign_key_violation(&err) {
        return on_foreign_key;
    }
    if let rusqlite::Error::SqliteFailure(code, _) = &err {
        if code.code == ErrorCode::ConstraintViolation {
            return StoreError::Conflict;
        }
    }
    StoreError::from(err)
}

fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(duration) => duration,
        Err(_) => return 0,
    };

    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}
