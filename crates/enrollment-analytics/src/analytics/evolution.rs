use super::domain::EnrollmentRecord;
use super::filter::{EnrollmentKind, FilterSpec};
use super::period::{format_period, parity};
use serde::Serialize;
use std::collections::HashMap;

/// One point of the per-period evolution series. Which counts are present
/// depends on the enrollment-kind filter the series was built with; absent
/// counts are omitted from the serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvolutionPoint {
    /// Formatted period label, `"2026.1"`.
    pub period: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acquisition: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renewal: Option<usize>,
}

/// Groups the full population by period, ascending. The enrollment-kind
/// constraint is lifted for counting and instead shapes which fields each
/// point exposes. When a reference period is set the series is restricted to
/// periods sharing its parity (the same-half-year overlay the dashboard
/// offers).
pub fn evolution(records: &[EnrollmentRecord], filter: &FilterSpec) -> Vec<EvolutionPoint> {
    let base = filter.without_kind();
    let reference_parity = filter.reference_period.as_deref().and_then(parity);

    let mut groups: HashMap<&str, (usize, usize)> = HashMap::new();
    for record in records.iter().filter(|record| base.matches(record)) {
        if record.period.is_empty() {
            continue;
        }
        if let Some(digit) = reference_parity {
            if record.period.chars().last() != Some(digit) {
                continue;
            }
        }
        let entry = groups.entry(record.period.as_str()).or_default();
        entry.0 += 1;
        if record.is_acquisition() {
            entry.1 += 1;
        }
    }

    let mut points: Vec<EvolutionPoint> = groups
        .into_iter()
        .map(|(period, (total, acquisition))| {
            let period = format_period(period);
            match filter.kind {
                EnrollmentKind::Acquisition => EvolutionPoint {
                    period,
                    total: None,
                    acquisition: Some(acquisition),
                    renewal: None,
                },
                EnrollmentKind::Renewal => EvolutionPoint {
                    period,
                    total: None,
                    acquisition: None,
                    renewal: Some(total - acquisition),
                },
                EnrollmentKind::All => EvolutionPoint {
                    period,
                    total: Some(total),
                    acquisition: Some(acquisition),
                    renewal: None,
                },
            }
        })
        .collect();

    points.sort_by(|a, b| a.period.cmp(&b.period));
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(period: &str, flag: &str) -> EnrollmentRecord {
        EnrollmentRecord {
            period: period.to_string(),
            status: "MATRICULADO".to_string(),
            acquisition_flag: flag.to_string(),
            ..EnrollmentRecord::default()
        }
    }

    fn sample() -> Vec<EnrollmentRecord> {
        let mut records = Vec::new();
        for i in 0..8 {
            records.push(record("20251", if i < 3 { "CAPTAÇÃO" } else { "" }));
        }
        for i in 0..5 {
            records.push(record("20252", if i < 1 { "CAPTAÇÃO" } else { "" }));
        }
        records
    }

    #[test]
    fn groups_by_period_ascending_with_both_counts() {
        let points = evolution(&sample(), &FilterSpec::default());
        assert_eq!(
            points,
            vec![
                EvolutionPoint {
                    period: "2025.1".to_string(),
                    total: Some(8),
                    acquisition: Some(3),
                    renewal: None,
                },
                EvolutionPoint {
                    period: "2025.2".to_string(),
                    total: Some(5),
                    acquisition: Some(1),
                    renewal: None,
                },
            ]
        );
    }

    #[test]
    fn acquisition_kind_exposes_only_acquisition_counts() {
        let filter = FilterSpec {
            kind: EnrollmentKind::Acquisition,
            ..FilterSpec::default()
        };
        let points = evolution(&sample(), &filter);
        for point in &points {
            assert!(point.total.is_none());
            assert!(point.renewal.is_none());
            assert!(point.acquisition.is_some());
        }
        // The full population is still counted: totals are not narrowed to
        // acquisitions before grouping.
        assert_eq!(points[0].acquisition, Some(3));
    }

    #[test]
    fn renewal_kind_exposes_total_minus_acquisition() {
        let filter = FilterSpec {
            kind: EnrollmentKind::Renewal,
            ..FilterSpec::default()
        };
        let points = evolution(&sample(), &filter);
        assert_eq!(points[0].renewal, Some(5));
        assert_eq!(points[1].renewal, Some(4));
        for point in &points {
            assert!(point.total.is_none());
            assert!(point.acquisition.is_none());
        }
    }

    #[test]
    fn reference_period_restricts_to_matching_parity() {
        let filter = FilterSpec {
            reference_period: Some("20251".to_string()),
            ..FilterSpec::default()
        };
        let points = evolution(&sample(), &filter);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].period, "2025.1");
    }

    #[test]
    fn records_without_period_are_skipped() {
        let mut records = sample();
        records.push(record("", "CAPTAÇÃO"));
        let points = evolution(&records, &FilterSpec::default());
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn other_dimension_filters_narrow_the_series() {
        let mut records = sample();
        records[0].course = "DIREITO".to_string();
        let filter = FilterSpec {
            course: Some("DIREITO".to_string()),
            ..FilterSpec::default()
        };
        let points = evolution(&records, &filter);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].total, Some(1));
    }
}
