use super::domain::{is_churn_status, EnrollmentRecord, STATUS_ACTIVE};
use super::filter::{filter_records, FilterSpec};
use super::period::previous_year_same_parity;
use serde::Serialize;

/// Headline numbers for the current selection. Recomputed on every filter
/// change; rates are percentages and degrade to zero on empty input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KpiSummary {
    pub total_students: usize,
    pub growth_rate: f64,
    pub acquisition_count: usize,
    pub acquisition_rate: f64,
    pub active_count: usize,
    pub retention_rate: f64,
    pub churn_count: usize,
    pub churn_rate: f64,
}

/// Computes the KPI card values for the analysis period implied by `filter`
/// (falling back to `default_period`), comparing against the same half-year
/// slot one calendar year back.
pub fn calculate_kpis(
    records: &[EnrollmentRecord],
    default_period: &str,
    filter: &FilterSpec,
) -> KpiSummary {
    let analysis_period = filter.analysis_period(default_period).to_string();
    let current = filter_records(records, &filter.with_period(analysis_period.clone()));
    let total_students = current.len();

    let previous_count = previous_year_same_parity(&analysis_period)
        .map(|previous| filter_records(records, &filter.with_period(previous)).len())
        .unwrap_or(0);

    let growth_rate = if previous_count > 0 {
        (total_students as f64 - previous_count as f64) / previous_count as f64 * 100.0
    } else if total_students > 0 {
        100.0
    } else {
        0.0
    };

    let acquisition_count = current.iter().filter(|r| r.is_acquisition()).count();
    let active_count = current.iter().filter(|r| r.status == STATUS_ACTIVE).count();
    let churn_count = current.iter().filter(|r| is_churn_status(&r.status)).count();

    KpiSummary {
        total_students,
        growth_rate,
        acquisition_count,
        acquisition_rate: rate(acquisition_count, total_students),
        active_count,
        retention_rate: rate(active_count, total_students),
        churn_count,
        churn_rate: rate(churn_count, total_students),
    }
}

fn rate(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
