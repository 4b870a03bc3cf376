#![forbid(unsafe_code)]

use sca_core::{NewTarget, Page};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListCatsRequest {
    pub page: Page,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateSalaryRequest {
    pub cat_id: i64,
    pub salary: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateMissionRequest {
    pub cat_id: Option<i64>,
    pub completed: bool,
    pub targets: Vec<NewTarget>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateMissionStatusRequest {
    pub mission_id: i64,
    pub completed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssignCatRequest {
    pub mission_id: i64,
    pub cat_id: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddTargetRequest {
    pub mission_id: i64,
    pub target: NewTarget,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetRef {
    pub mission_id: i64,
    pub target_id: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateTargetNoteRequest {
    pub target: TargetRef,
    pub notes: String,
}
