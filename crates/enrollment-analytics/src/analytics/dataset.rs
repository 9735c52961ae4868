use super::domain::{EnrollmentRecord, STATUS_ENROLLED, STATUS_PRE_ENROLLED_WEB};
use super::filter::{filter_records, FilterSpec};
use serde::Serialize;
use std::collections::BTreeSet;

/// Materialized snapshot of one unit's records, with the catalogs the filter
/// panel offers and the detected current period. Pure function of the record
/// list; nothing here is mutated after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    pub records: Vec<EnrollmentRecord>,
    pub courses: Vec<String>,
    pub statuses: Vec<String>,
    pub shifts: Vec<String>,
    pub periods: Vec<String>,
    pub modalities: Vec<String>,
    /// Highest period code present; the default analysis period.
    pub current_period: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
}

impl Dataset {
    pub fn from_records(records: Vec<EnrollmentRecord>) -> Self {
        let courses = distinct(records.iter().map(|r| r.course.as_str()));
        let statuses = distinct(records.iter().map(|r| r.status.as_str()));
        let shifts = distinct(records.iter().map(|r| r.shift.as_str()));
        let periods = distinct(records.iter().map(|r| r.period.as_str()));
        let modalities = distinct(records.iter().map(|r| r.modality.as_str()));

        let current_period = periods.last().cloned().unwrap_or_default();
        let branch_name = records
            .iter()
            .find(|r| !r.branch_name.trim().is_empty())
            .map(|r| r.branch_name.clone());

        Self {
            records,
            courses,
            statuses,
            shifts,
            periods,
            modalities,
            current_period,
            branch_name,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let set: BTreeSet<&str> = values.filter(|value| !value.is_empty()).collect();
    set.into_iter().map(str::to_string).collect()
}

/// Courses with enrollment activity in the period: at least one confirmed
/// enrollment, web pre-enrollment, or acquisition. Feeds the ranking tables.
pub fn active_courses(records: &[EnrollmentRecord], period: &str) -> Vec<String> {
    distinct(
        records
            .iter()
            .filter(|r| r.period == period)
            .filter(|r| {
                r.status == STATUS_ENROLLED
                    || r.status == STATUS_PRE_ENROLLED_WEB
                    || r.is_acquisition()
            })
            .map(|r| r.course.as_str()),
    )
}

/// One enrollment date and how many students enrolled on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrollmentDateCount {
    pub date: String,
    pub count: usize,
}

/// Top-20 enrollment dates by volume within the analysis period, for the
/// peak-days table. Records without a date are ignored.
pub fn top_enrollment_dates(
    records: &[EnrollmentRecord],
    filter: &FilterSpec,
    current_period: &str,
) -> Vec<EnrollmentDateCount> {
    let analysis_period = filter.analysis_period(current_period).to_string();
    let filtered = filter_records(records, &filter.with_period(analysis_period));

    let mut counts: Vec<EnrollmentDateCount> = Vec::new();
    for record in &filtered {
        if record.enrollment_date.is_empty() {
            continue;
        }
        match counts.iter_mut().find(|entry| entry.date == record.enrollment_date) {
            Some(entry) => entry.count += 1,
            None => counts.push(EnrollmentDateCount {
                date: record.enrollment_date.clone(),
                count: 1,
            }),
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(20);
    counts
}
