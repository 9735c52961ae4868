use super::domain::EnrollmentRecord;
use super::filter::{filter_records, FilterSpec};
use serde::{Deserialize, Serialize};

/// Bucket label used when a record carries no value for the dimension.
pub const UNSPECIFIED_LABEL: &str = "Não informado";

/// Categorical dimensions the dashboard breaks the analysis period down by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Shift,
    Course,
    AcademicTerm,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionSlice {
    pub label: String,
    pub count: usize,
}

/// Groups the analysis period's records by the chosen dimension.
///
/// Blank shifts and courses fall into the [`UNSPECIFIED_LABEL`] bucket; blank
/// academic terms are skipped entirely. Courses come back sorted by count
/// descending, terms ascending by ordinal, shifts in first-seen order.
pub fn distribution_by(
    records: &[EnrollmentRecord],
    filter: &FilterSpec,
    current_period: &str,
    dimension: Dimension,
) -> Vec<DistributionSlice> {
    let analysis_period = filter.analysis_period(current_period).to_string();
    let filtered = filter_records(records, &filter.with_period(analysis_period));

    let mut slices: Vec<DistributionSlice> = Vec::new();
    for record in &filtered {
        let label = match dimension {
            Dimension::Shift => labeled(&record.shift),
            Dimension::Course => labeled(&record.course),
            Dimension::AcademicTerm => {
                if record.academic_term.trim().is_empty() {
                    continue;
                }
                format!("{}º Período", record.academic_term)
            }
        };
        match slices.iter_mut().find(|slice| slice.label == label) {
            Some(slice) => slice.count += 1,
            None => slices.push(DistributionSlice { label, count: 1 }),
        }
    }

    match dimension {
        Dimension::Shift => {}
        Dimension::Course => slices.sort_by(|a, b| b.count.cmp(&a.count)),
        Dimension::AcademicTerm => slices.sort_by_key(|slice| term_ordinal(&slice.label)),
    }
    slices
}

fn labeled(value: &str) -> String {
    if value.is_empty() {
        UNSPECIFIED_LABEL.to_string()
    } else {
        value.to_string()
    }
}

fn term_ordinal(label: &str) -> i64 {
    let digits: String = label
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(i64::MAX)
}
