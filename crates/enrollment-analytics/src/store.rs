//! Storage abstractions for the relational backend that owns records and
//! goals between requests. The engine itself only ever sees fully
//! materialized lists; these traits are the seam the service wires an
//! implementation into.

use crate::analytics::{CourseGoal, EnrollmentRecord};

/// Per-unit record storage with mirror semantics: a new import replaces the
/// unit's previous records wholesale.
pub trait RecordStore: Send + Sync {
    /// Deletes every record of `unit` and inserts `records` in their place.
    /// Returns the number of records inserted.
    fn replace_unit(&self, unit: &str, records: Vec<EnrollmentRecord>) -> Result<usize, StoreError>;

    /// Full, materialized record list for `unit`. Unknown units yield an
    /// empty list rather than an error.
    fn fetch(&self, unit: &str) -> Result<Vec<EnrollmentRecord>, StoreError>;
}

/// Per-unit, per-period goal storage backing the ranking tables.
pub trait GoalStore: Send + Sync {
    /// Replaces the goal list for `unit` in `period`.
    fn replace(&self, unit: &str, period: &str, goals: Vec<CourseGoal>) -> Result<(), StoreError>;

    /// Goals for `unit` in `period`; empty when none were entered.
    fn fetch(&self, unit: &str, period: &str) -> Result<Vec<CourseGoal>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
