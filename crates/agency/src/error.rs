#![forbid(unsafe_code)]

use sca_breeds::BreedError;
use sca_core::ValidationError;
use sca_storage::StoreError;

/// Stable classification of [`AgencyError`] for transports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    ValidationRejected,
    UnknownBreed,
    DuplicateName,
    CatAssigned,
    MissionCompleted,
    TargetLimitExceeded,
    AlreadyAssigned,
    Conflict,
    Infrastructure,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::ValidationRejected => "VALIDATION_REJECTED",
            Self::UnknownBreed => "UNKNOWN_BREED",
            Self::DuplicateName => "DUPLICATE_NAME",
            Self::CatAssigned => "CAT_ASSIGNED",
            Self::MissionCompleted => "MISSION_COMPLETED",
            Self::TargetLimitExceeded => "TARGET_LIMIT_EXCEEDED",
            Self::AlreadyAssigned => "ALREADY_ASSIGNED",
            Self::Conflict => "CONFLICT",
            Self::Infrastructure => "INFRASTRUCTURE",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AgencyError {
    #[error("not found")]
    NotFound,
    #[error("invalid {field}: {reason}")]
    ValidationRejected {
        field: &'static str,
        reason: &'static str,
    },
    #[error("unknown breed: {breed}")]
    UnknownBreed { breed: String },
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
    #[error("infrastructure failure: {0}")]
    Infrastructure(#[source] Infrastructure),
}

/// Underlying cause of an infrastructure failure.
#[derive(Debug, thiserror::Error)]
pub enum Infrastructure {
    #[error(transparent)]
    Store(StoreError),
    #[error(transparent)]
    Breeds(BreedError),
}

impl AgencyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound => ErrorKind::NotFound,
            Self::ValidationRejected { .. } => ErrorKind::ValidationRejected,
            Self::UnknownBreed { .. } => ErrorKind::UnknownBreed,
            Self::DuplicateName => ErrorKind::DuplicateName,
            Self::CatAssigned => ErrorKind::CatAssigned,
            Self::MissionCompleted => ErrorKind::MissionCompleted,
            Self::TargetLimitExceeded => ErrorKind::TargetLimitExceeded,
            Self::AlreadyAssigned => ErrorKind::AlreadyAssigned,
            Self::Conflict => ErrorKind::Conflict,
            Self::Infrastructure(_) => ErrorKind::Infrastructure,
        }
    }

    /// Only infrastructure failures are worth retrying unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Infrastructure(_))
    }
}

impl From<ValidationError> for AgencyError {
    fn from(value: ValidationError) -> Self {
        match value {
            ValidationError::Field { field, reason } => Self::ValidationRejected { field, reason },
            ValidationError::DuplicateTargetName { .. } => Self::DuplicateName,
        }
    }
}

impl From<StoreError> for AgencyError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::UnknownId => Self::NotFound,
            StoreError::DuplicateName => Self::DuplicateName,
            StoreError::CatAssigned => Self::CatAssigned,
            StoreError::MissionCompleted => Self::MissionCompleted,
            StoreError::TargetLimitExceeded => Self::TargetLimitExceeded,
            StoreError::AlreadyAssigned => Self::AlreadyAssigned,
            StoreError::Conflict => Self::Conflict,
            StoreError::InvalidInput(reason) if is_request_error(reason) => {
                Self::ValidationRejected {
                    field: "request",
                    reason,
                }
            }
            other => {
                tracing::warn!(code = other.code(), error = %other, "store failure");
                Self::Infrastructure(Infrastructure::Store(other))
            }
        }
    }
}

impl From<BreedError> for AgencyError {
    fn from(value: BreedError) -> Self {
        tracing::warn!(error = %value, "breed lookup failure");
        Self::Infrastructure(Infrastructure::Breeds(value))
    }
}

// A reset-required store is broken for every request, not just this one.
fn is_request_error(reason: &str) -> bool {
    !reason.starts_with("RESET_REQUIRED")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_domain_kinds() {
        assert_eq!(AgencyError::from(StoreError::UnknownId).kind(), ErrorKind::NotFound);
        assert_eq!(
            AgencyError::from(StoreError::AlreadyAssigned).kind(),
            ErrorKind::AlreadyAssigned
        );
        assert_eq!(
            AgencyError::from(StoreError::InvalidInput("mission needs at least one target")).kind(),
            ErrorKind::ValidationRejected
        );
        let reset = AgencyError::from(StoreError::InvalidInput("RESET_REQUIRED: x"));
        assert_eq!(reset.kind(), ErrorKind::Infrastructure);
        assert!(reset.is_retryable());
    }

    #[test]
    fn only_infrastructure_is_retryable() {
        assert!(AgencyError::from(StoreError::Timeout).is_retryable());
        assert!(AgencyError::from(BreedError::Timeout).is_retryable());
        assert!(!AgencyError::NotFound.is_retryable());
        assert!(
            !AgencyError::UnknownBreed {
                breed: "Dragon".to_string()
            }
            .is_retryable()
        );
    }

    #[test]
    fn duplicate_batch_names_are_duplicate_name() {
        let err = AgencyError::from(ValidationError::DuplicateTargetName {
            name: "x".to_string(),
        });
        assert_eq!(err.kind(), ErrorKind::DuplicateName);
        assert_eq!(err.kind().as_str(), "DUPLICATE_NAME");
    }
}
