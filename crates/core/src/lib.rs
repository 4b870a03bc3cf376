#![forbid(unsafe_code)]

pub mod model;
pub mod paging;
pub mod validate;

pub use model::{Cat, Mission, MissionView, MissionWithTargets, NewCat, NewTarget, Target};
pub use paging::{Page, PageRequest};
pub use validate::ValidationError;

pub mod limits {
    /// Upper bound on targets owned by one mission.
    pub const MAX_TARGETS_PER_MISSION: usize = 3;

    pub const MAX_CAT_NAME_CHARS: usize = 200;
    pub const MAX_BREED_CHARS: usize = 200;
    pub const MAX_TARGET_NAME_CHARS: usize = 200;
    pub const MAX_COUNTRY_CHARS: usize = 200;
    pub const MAX_NOTES_CHARS: usize = 255;

    pub const DEFAULT_PAGE_LIMIT: i64 = 10;
    pub const MAX_PAGE_LIMIT: i64 = 100;
}
