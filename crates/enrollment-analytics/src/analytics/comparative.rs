use super::domain::EnrollmentRecord;
use super::filter::FilterSpec;
use super::period::{format_period, parity};
use serde::Serialize;
use std::collections::BTreeSet;

/// Year-over-year totals at the same half-year slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparativePoint {
    /// Formatted period label, `"2026.1"`.
    pub label: String,
    pub total: usize,
}

/// Counts matching records for every period on record that shares the parity
/// of the reference period (falling back to `current_period`). The period and
/// reference-period filter fields are cleared so the remaining dimensions
/// still narrow each year's total.
pub fn comparative(
    records: &[EnrollmentRecord],
    current_period: &str,
    filter: &FilterSpec,
) -> Vec<ComparativePoint> {
    let base_period = filter.reference_period.as_deref().unwrap_or(current_period);
    let Some(parity_digit) = parity(base_period) else {
        return Vec::new();
    };

    let periods: BTreeSet<&str> = records
        .iter()
        .map(|record| record.period.as_str())
        .filter(|period| !period.is_empty() && period.chars().last() == Some(parity_digit))
        .collect();

    let mut scoped = filter.clone();
    scoped.period = None;
    scoped.reference_period = None;

    periods
        .into_iter()
        .map(|period| {
            let total = records
                .iter()
                .filter(|record| record.period == period && scoped.matches(record))
                .count();
            ComparativePoint {
                label: format_period(period),
                total,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(period: &str, course: &str) -> EnrollmentRecord {
        EnrollmentRecord {
            period: period.to_string(),
            course: course.to_string(),
            ..EnrollmentRecord::default()
        }
    }

    fn sample() -> Vec<EnrollmentRecord> {
        vec![
            record("20241", "DIREITO"),
            record("20241", "MEDICINA"),
            record("20251", "DIREITO"),
            record("20252", "DIREITO"),
            record("20261", "DIREITO"),
            record("20261", "DIREITO"),
        ]
    }

    #[test]
    fn enumerates_same_parity_periods_ascending() {
        let points = comparative(&sample(), "20261", &FilterSpec::default());
        assert_eq!(
            points,
            vec![
                ComparativePoint { label: "2024.1".to_string(), total: 2 },
                ComparativePoint { label: "2025.1".to_string(), total: 1 },
                ComparativePoint { label: "2026.1".to_string(), total: 2 },
            ]
        );
    }

    #[test]
    fn reference_period_selects_the_parity() {
        let points = comparative(&sample(), "20261", &FilterSpec {
            reference_period: Some("20252".to_string()),
            ..FilterSpec::default()
        });
        assert_eq!(points, vec![ComparativePoint { label: "2025.2".to_string(), total: 1 }]);
    }

    #[test]
    fn period_filter_fields_do_not_leak_into_the_counts() {
        let filter = FilterSpec {
            period: Some("20261".to_string()),
            course: Some("DIREITO".to_string()),
            ..FilterSpec::default()
        };
        let points = comparative(&sample(), "20261", &filter);
        // Every first-semester year is present; only the course narrows them.
        assert_eq!(
            points,
            vec![
                ComparativePoint { label: "2024.1".to_string(), total: 1 },
                ComparativePoint { label: "2025.1".to_string(), total: 1 },
                ComparativePoint { label: "2026.1".to_string(), total: 2 },
            ]
        );
    }

    #[test]
    fn empty_current_period_yields_no_points() {
        assert!(comparative(&sample(), "", &FilterSpec::default()).is_empty());
    }
}
