use super::domain::EnrollmentRecord;
use serde::{Deserialize, Deserializer, Serialize};

/// Half-year slot selector derived from the period code's trailing digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodParity {
    #[serde(rename = "1")]
    First,
    #[serde(rename = "2")]
    Second,
}

impl PeriodParity {
    pub const fn digit(self) -> char {
        match self {
            Self::First => '1',
            Self::Second => '2',
        }
    }
}

/// Acquisition vs. renewal selector. `All` imposes no constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentKind {
    #[default]
    All,
    Acquisition,
    Renewal,
}

/// Dimension selection applied to every aggregation. Each field is
/// independently optional and all present constraints compose by logical AND.
///
/// The UI-facing `"all"` sentinel (and the empty string) are translated to
/// `None` while deserializing; the in-memory type never stores the sentinel.
/// `reference_period` is carried for the comparison aggregations and the
/// insight generator — the basic predicate ignores it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    #[serde(deserialize_with = "all_as_none")]
    pub course: Option<String>,
    #[serde(deserialize_with = "all_as_none")]
    pub status: Option<String>,
    #[serde(deserialize_with = "all_as_none")]
    pub shift: Option<String>,
    #[serde(deserialize_with = "all_as_none")]
    pub period: Option<String>,
    #[serde(deserialize_with = "parity_all_as_none")]
    pub parity: Option<PeriodParity>,
    pub kind: EnrollmentKind,
    #[serde(deserialize_with = "all_as_none")]
    pub reference_period: Option<String>,
    #[serde(deserialize_with = "all_as_none")]
    pub modality: Option<String>,
}

impl FilterSpec {
    /// Evaluates one record against every present constraint.
    pub fn matches(&self, record: &EnrollmentRecord) -> bool {
        if let Some(course) = &self.course {
            if record.course != *course {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if record.status != *status {
                return false;
            }
        }
        if let Some(shift) = &self.shift {
            if record.shift != *shift {
                return false;
            }
        }
        if let Some(period) = &self.period {
            if record.period != *period {
                return false;
            }
        }
        if let Some(modality) = &self.modality {
            if record.modality != *modality {
                return false;
            }
        }
        if let Some(parity) = self.parity {
            // A record with an empty period fails the rule outright.
            match record.period.chars().last() {
                Some(digit) if digit == parity.digit() => {}
                _ => return false,
            }
        }
        match self.kind {
            EnrollmentKind::All => {}
            EnrollmentKind::Acquisition => {
                if !record.is_acquisition() {
                    return false;
                }
            }
            EnrollmentKind::Renewal => {
                if record.is_acquisition() {
                    return false;
                }
            }
        }
        true
    }

    /// Copy of this filter with the period constraint forced to `period`.
    pub fn with_period(&self, period: impl Into<String>) -> Self {
        let mut filter = self.clone();
        filter.period = Some(period.into());
        filter
    }

    /// Copy of this filter with the enrollment-kind constraint lifted.
    pub fn without_kind(&self) -> Self {
        let mut filter = self.clone();
        filter.kind = EnrollmentKind::All;
        filter
    }

    /// Period the dashboard is analyzing: the explicit period filter when
    /// present, otherwise the caller-supplied default.
    pub fn analysis_period<'a>(&'a self, default_period: &'a str) -> &'a str {
        self.period.as_deref().unwrap_or(default_period)
    }
}

/// Filters a record slice, borrowing the matches.
pub fn filter_records<'a>(
    records: &'a [EnrollmentRecord],
    filter: &FilterSpec,
) -> Vec<&'a EnrollmentRecord> {
    records.iter().filter(|record| filter.matches(record)).collect()
}

fn all_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.is_empty() && value != "all"))
}

fn parity_all_as_none<'de, D>(deserializer: D) -> Result<Option<PeriodParity>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref() {
        None | Some("") | Some("all") => Ok(None),
        Some("1") => Ok(Some(PeriodParity::First)),
        Some("2") => Ok(Some(PeriodParity::Second)),
        Some(other) => Err(serde::de::Error::custom(format!(
            "invalid period parity '{other}', expected '1', '2', or 'all'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(period: &str, course: &str, status: &str, flag: &str) -> EnrollmentRecord {
        EnrollmentRecord {
            period: period.to_string(),
            course: course.to_string(),
            status: status.to_string(),
            acquisition_flag: flag.to_string(),
            shift: "NOITE".to_string(),
            modality: "PRESENCIAL".to_string(),
            ..EnrollmentRecord::default()
        }
    }

    #[test]
    fn empty_filter_passes_everything() {
        let filter = FilterSpec::default();
        assert!(filter.matches(&record("20261", "DIREITO", "MATRICULADO", "")));
        assert!(filter.matches(&EnrollmentRecord::default()));
    }

    #[test]
    fn constraints_compose_by_and() {
        let filter = FilterSpec {
            course: Some("DIREITO".to_string()),
            period: Some("20261".to_string()),
            ..FilterSpec::default()
        };
        assert!(filter.matches(&record("20261", "DIREITO", "MATRICULADO", "")));
        assert!(!filter.matches(&record("20261", "MEDICINA", "MATRICULADO", "")));
        assert!(!filter.matches(&record("20252", "DIREITO", "MATRICULADO", "")));
    }

    #[test]
    fn combined_result_equals_each_rule_evaluated_independently() {
        let records = [
            record("20261", "DIREITO", "MATRICULADO", "CAPTAÇÃO"),
            record("20252", "MEDICINA", "CANCELADO", ""),
            record("20261", "DIREITO", "ATIVO", ""),
            record("", "DIREITO", "MATRICULADO", ""),
        ];
        let filter = FilterSpec {
            course: Some("DIREITO".to_string()),
            parity: Some(PeriodParity::First),
            kind: EnrollmentKind::Acquisition,
            ..FilterSpec::default()
        };

        for r in &records {
            let course_only = FilterSpec {
                course: filter.course.clone(),
                ..FilterSpec::default()
            };
            let parity_only = FilterSpec {
                parity: filter.parity,
                ..FilterSpec::default()
            };
            let kind_only = FilterSpec {
                kind: filter.kind,
                ..FilterSpec::default()
            };
            let expected = course_only.matches(r) && parity_only.matches(r) && kind_only.matches(r);
            assert_eq!(filter.matches(r), expected);
        }
    }

    #[test]
    fn parity_rejects_records_without_period() {
        let filter = FilterSpec {
            parity: Some(PeriodParity::First),
            ..FilterSpec::default()
        };
        assert!(filter.matches(&record("20261", "DIREITO", "MATRICULADO", "")));
        assert!(!filter.matches(&record("20252", "DIREITO", "MATRICULADO", "")));
        assert!(!filter.matches(&record("", "DIREITO", "MATRICULADO", "")));
    }

    #[test]
    fn enrollment_kind_splits_on_acquisition_flag() {
        let acquisition = record("20261", "DIREITO", "MATRICULADO", "CAPTAÇÃO");
        let renewal = record("20261", "DIREITO", "MATRICULADO", "");
        let other_flag = record("20261", "DIREITO", "MATRICULADO", "VETERANO");

        let wants_acquisition = FilterSpec {
            kind: EnrollmentKind::Acquisition,
            ..FilterSpec::default()
        };
        assert!(wants_acquisition.matches(&acquisition));
        assert!(!wants_acquisition.matches(&renewal));
        assert!(!wants_acquisition.matches(&other_flag));

        let wants_renewal = FilterSpec {
            kind: EnrollmentKind::Renewal,
            ..FilterSpec::default()
        };
        assert!(!wants_renewal.matches(&acquisition));
        assert!(wants_renewal.matches(&renewal));
        assert!(wants_renewal.matches(&other_flag));
    }

    #[test]
    fn all_sentinel_deserializes_to_no_constraint() {
        let filter: FilterSpec = serde_json::from_value(serde_json::json!({
            "course": "all",
            "status": "",
            "shift": "NOITE",
            "parity": "all",
            "kind": "renewal",
        }))
        .expect("filter deserializes");

        assert_eq!(filter.course, None);
        assert_eq!(filter.status, None);
        assert_eq!(filter.shift.as_deref(), Some("NOITE"));
        assert_eq!(filter.parity, None);
        assert_eq!(filter.kind, EnrollmentKind::Renewal);
        assert_eq!(filter.period, None);
    }

    #[test]
    fn parity_sentinel_accepts_only_known_digits() {
        let filter: FilterSpec =
            serde_json::from_value(serde_json::json!({ "parity": "2" })).expect("parity parses");
        assert_eq!(filter.parity, Some(PeriodParity::Second));

        let error = serde_json::from_value::<FilterSpec>(serde_json::json!({ "parity": "3" }));
        assert!(error.is_err());
    }

    #[test]
    fn missing_fields_default_to_no_constraint() {
        let filter: FilterSpec = serde_json::from_value(serde_json::json!({})).expect("empty body");
        assert_eq!(filter, FilterSpec::default());
        assert_eq!(filter.kind, EnrollmentKind::All);
    }

    #[test]
    fn reference_period_never_constrains_the_predicate() {
        let filter = FilterSpec {
            reference_period: Some("20251".to_string()),
            ..FilterSpec::default()
        };
        assert!(filter.matches(&record("20261", "DIREITO", "MATRICULADO", "")));
    }
}
