use super::domain::{
    EnrollmentRecord, RENEWAL_CHURN_STATUSES, STATUS_ENROLLED, STATUS_PRE_ENROLLED_WEB,
};
use super::filter::{filter_records, FilterSpec};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Which manually-entered target a goal applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    Acquisition,
    Renewal,
}

/// A per-course numeric target for one period, entered by unit staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseGoal {
    pub course: String,
    pub kind: GoalKind,
    pub target: u32,
}

/// Renewal standing of one course against its target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenewalRankingRow {
    pub course: String,
    pub target: u32,
    pub renewed: usize,
    pub churned: usize,
    pub pending_renewal: usize,
    pub pct_met: f64,
    pub pct_unmet: f64,
}

/// Acquisition standing of one course against its target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcquisitionRankingRow {
    pub course: String,
    pub target: u32,
    pub achieved: usize,
    pub pct_met: f64,
}

/// Renewal ranking over `courses` for the analysis period, descending by
/// percent of target met. Only continuing students count: acquisitions are
/// excluded before any status is inspected, and churn uses the narrow
/// exact-match vocabulary.
pub fn renewal_ranking(
    records: &[EnrollmentRecord],
    filter: &FilterSpec,
    analysis_period: &str,
    courses: &[String],
    goals: &[CourseGoal],
) -> Vec<RenewalRankingRow> {
    let current = filter_records(records, &filter.with_period(analysis_period));

    let mut rows: Vec<RenewalRankingRow> = courses
        .iter()
        .map(|course| {
            let course_records: Vec<&&EnrollmentRecord> = current
                .iter()
                .filter(|record| record.course == *course && !record.is_acquisition())
                .collect();

            let renewed = course_records
                .iter()
                .filter(|record| record.status == STATUS_ENROLLED)
                .count();
            let pending_renewal = course_records
                .iter()
                .filter(|record| record.status == STATUS_PRE_ENROLLED_WEB)
                .count();
            let churned = course_records
                .iter()
                .filter(|record| RENEWAL_CHURN_STATUSES.contains(&record.status.as_str()))
                .count();

            let target = goal_target(goals, course, GoalKind::Renewal);
            let (pct_met, pct_unmet) = if target > 0 {
                (
                    renewed as f64 / target as f64 * 100.0,
                    (target as f64 - renewed as f64) / target as f64 * 100.0,
                )
            } else {
                (0.0, 0.0)
            };

            RenewalRankingRow {
                course: course.clone(),
                target,
                renewed,
                churned,
                pending_renewal,
                pct_met,
                pct_unmet,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.pct_met.partial_cmp(&a.pct_met).unwrap_or(Ordering::Equal));
    rows
}

/// Acquisition ranking over `courses` for the analysis period, descending by
/// percent of target met.
pub fn acquisition_ranking(
    records: &[EnrollmentRecord],
    filter: &FilterSpec,
    analysis_period: &str,
    courses: &[String],
    goals: &[CourseGoal],
) -> Vec<AcquisitionRankingRow> {
    let current = filter_records(records, &filter.with_period(analysis_period));

    let mut rows: Vec<AcquisitionRankingRow> = courses
        .iter()
        .map(|course| {
            let achieved = current
                .iter()
                .filter(|record| record.course == *course && record.is_acquisition())
                .count();
            let target = goal_target(goals, course, GoalKind::Acquisition);
            let pct_met = if target > 0 {
                achieved as f64 / target as f64 * 100.0
            } else {
                0.0
            };

            AcquisitionRankingRow {
                course: course.clone(),
                target,
                achieved,
                pct_met,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.pct_met.partial_cmp(&a.pct_met).unwrap_or(Ordering::Equal));
    rows
}

fn goal_target(goals: &[CourseGoal], course: &str, kind: GoalKind) -> u32 {
    goals
        .iter()
        .find(|goal| goal.course == course && goal.kind == kind)
        .map(|goal| goal.target)
        .unwrap_or(0)
}
