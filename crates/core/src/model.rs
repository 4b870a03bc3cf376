#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cat {
    pub id: i64,
    pub name: String,
    pub years_of_experience: i64,
    pub breed: String,
    pub salary: i64,
}

/// Cat fields accepted on creation; the store assigns the id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCat {
    pub name: String,
    pub years_of_experience: i64,
    pub breed: String,
    pub salary: i64,
}

impl NewCat {
    pub fn into_cat(self, id: i64) -> Cat {
        Cat {
            id,
            name: self.name,
            years_of_experience: self.years_of_experience,
            breed: self.breed,
            salary: self.salary,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub id: i64,
    pub cat_id: Option<i64>,
    pub completed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub id: i64,
    pub mission_id: i64,
    pub name: String,
    pub country: String,
    pub notes: String,
    pub completed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTarget {
    pub name: String,
    pub country: String,
    pub notes: String,
    pub completed: bool,
}

impl NewTarget {
    pub fn into_target(self, id: i64, mission_id: i64) -> Target {
        Target {
            id,
            mission_id,
            name: self.name,
            country: self.country,
            notes: self.notes,
            completed: self.completed,
        }
    }
}

/// A freshly created mission together with the targets inserted alongside it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionWithTargets {
    pub mission: Mission,
    pub targets: Vec<Target>,
}

/// Read model: a mission, the cat it is pinned to (if any) and its targets ordered by id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionView {
    pub mission: Mission,
    pub cat: Option<Cat>,
    pub targets: Vec<Target>,
}

impl MissionView {
    pub fn open_targets(&self) -> usize {
        self.targets.iter().filter(|target| !target.completed).count()
    }
}
