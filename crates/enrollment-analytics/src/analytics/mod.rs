//! The in-memory aggregation engine: a filter predicate language, independent
//! reducers over the same record set, and a rule-based insight generator.
//! Everything here is synchronous and free of interior state; each call
//! receives its full input and returns a fresh result.

pub mod dataset;
pub mod domain;
pub mod filter;
pub mod insights;
pub mod period;

mod comparative;
mod distribution;
mod evolution;
mod kpi;
mod ranking;

pub use comparative::{comparative, ComparativePoint};
pub use dataset::{active_courses, top_enrollment_dates, Dataset, EnrollmentDateCount};
pub use distribution::{distribution_by, Dimension, DistributionSlice, UNSPECIFIED_LABEL};
pub use domain::{EnrollmentRecord, ACQUISITION_FLAG};
pub use evolution::{evolution, EvolutionPoint};
pub use filter::{filter_records, EnrollmentKind, FilterSpec, PeriodParity};
pub use insights::{generate_insights, Insight, InsightIcon, InsightSeverity, MAX_INSIGHTS};
pub use kpi::{calculate_kpis, KpiSummary};
pub use ranking::{
    acquisition_ranking, renewal_ranking, AcquisitionRankingRow, CourseGoal, GoalKind,
    RenewalRankingRow,
};
