#![forbid(unsafe_code)]

use rusqlite::ErrorCode;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite: {0}")]
    Sql(rusqlite::Error),
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("unknown id")]
    UnknownId,
    #[error("target name already used in this mission")]
    DuplicateName,
    #[error("mission has a cat assigned")]
    CatAssigned,
    #[error("mission already completed")]
    MissionCompleted,
    #[error("mission cannot take more targets")]
    TargetLimitExceeded,
    #[error("cat already assigned to another active mission")]
    AlreadyAssigned,
    #[error("conflicting record")]
    Conflict,
    #[error("operation deadline exceeded")]
    Timeout,
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "IO",
            Self::Sql(_) => "SQLITE",
            Self::InvalidInput(message) if message.starts_with("RESET_REQUIRED") => {
                "RESET_REQUIRED"
            }
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::UnknownId => "UNKNOWN_ID",
            Self::DuplicateName => "DUPLICATE_NAME",
            Self::CatAssigned => "CAT_ASSIGNED",
            Self::MissionCompleted => "MISSION_COMPLETED",
            Self::TargetLimitExceeded => "TARGET_LIMIT_EXCEEDED",
            Self::AlreadyAssigned => "ALREADY_ASSIGNED",
            Self::Conflict => "CONFLICT",
            Self::Timeout => "TIMEOUT",
        }
    }

    /// Failures of the store itself rather than of the request.
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Sql(_) | Self::Timeout)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        if is_deadline_failure(&value) {
            return Self::Timeout;
        }
        Self::Sql(value)
    }
}

fn is_deadline_failure(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, _) => matches!(
            code.code,
            ErrorCode::OperationInterrupted | ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
        ),
        _ => false,
    }
}
