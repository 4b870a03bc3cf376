#![forbid(unsafe_code)]

use crate::limits::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use crate::validate::ValidationError;
use serde::{Deserialize, Serialize};

/// Pagination parameters as they arrive from a caller; both are optional.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Resolved, bounds-checked pagination window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

impl PageRequest {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self { limit, offset }
    }

    pub fn resolve(self) -> Result<Page, ValidationError> {
        self.resolve_with(DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT)
    }

    /// `max_limit` is clamped to the global ceiling of 100.
    pub fn resolve_with(self, default_limit: i64, max_limit: i64) -> Result<Page, ValidationError> {
        let max_limit = max_limit.clamp(1, MAX_PAGE_LIMIT);
        let limit = self.limit.unwrap_or(default_limit);
        if limit < 1 || limit > max_limit {
            return Err(ValidationError::field("limit", "out of range"));
        }
        let offset = self.offset.unwrap_or(0);
        if offset < 0 {
            return Err(ValidationError::field("offset", "must not be negative"));
        }
        Ok(Page { limit, offset })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unspecified() {
        assert_eq!(PageRequest::default().resolve().unwrap(), Page::default());
    }

    #[test]
    fn limit_bounds_are_inclusive() {
        assert_eq!(
            PageRequest::new(Some(1), Some(0)).resolve().unwrap().limit,
            1
        );
        assert_eq!(
            PageRequest::new(Some(100), None).resolve().unwrap().limit,
            100
        );
        assert!(PageRequest::new(Some(0), None).resolve().is_err());
        assert!(PageRequest::new(Some(101), None).resolve().is_err());
    }

    #[test]
    fn configured_maximum_cannot_exceed_global_ceiling() {
        assert!(PageRequest::new(Some(150), None).resolve_with(10, 500).is_err());
        assert!(PageRequest::new(Some(30), None).resolve_with(10, 20).is_err());
        assert_eq!(
            PageRequest::new(None, Some(40))
                .resolve_with(5, 20)
                .unwrap(),
            Page {
                limit: 5,
                offset: 40
            }
        );
    }

    #[test]
    fn negative_offset_is_rejected() {
        assert_eq!(
            PageRequest::new(None, Some(-1)).resolve().unwrap_err(),
            ValidationError::field("offset", "must not be negative")
        );
    }
}
