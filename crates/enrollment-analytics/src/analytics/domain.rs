use serde::{Deserialize, Serialize};

/// Value of `acquisition_flag` that marks a newly-acquired student. Any other
/// value, including an empty one, denotes a continuing/re-enrolled student.
pub const ACQUISITION_FLAG: &str = "CAPTAÇÃO";

/// Enrollment confirmed for the period.
pub const STATUS_ENROLLED: &str = "MATRICULADO";
/// Web pre-enrollment awaiting confirmation.
pub const STATUS_PRE_ENROLLED_WEB: &str = "PRÉ-MATRICULA WEB";
/// Active student, counted toward retention.
pub const STATUS_ACTIVE: &str = "ATIVO";

/// Statuses counted as churn by the KPI aggregation. Matching is a
/// bidirectional substring test after uppercasing and trimming, so partial and
/// legacy status strings still register.
pub const CHURN_STATUSES: &[&str] = &[
    "TRANCADO",
    "CANCELADO",
    "ABANDONO",
    "TRANSFERENCIA PARA EAD",
    "TRANSFERENCIA EXTERNA",
    "TRANSFERENCIA INTERNA",
    "TRANSFERENCIA ENTRE UNIDADES",
    "EVADIDO",
    "DESISTENTE",
];

/// Narrower churn list used by the renewal ranking. Membership here is exact,
/// unlike [`CHURN_STATUSES`]. The two vocabularies are intentionally kept
/// separate.
pub const RENEWAL_CHURN_STATUSES: &[&str] = &[
    "TRANCADO",
    "CANCELADO",
    "ABANDONO",
    "TRANSFERENCIA PARA EAD",
    "TRANSFERENCIA EXTERNA",
    "TRANSFERENCIA ENTRE UNIDADES",
];

pub fn is_churn_status(status: &str) -> bool {
    let status = status.trim().to_uppercase();
    CHURN_STATUSES
        .iter()
        .copied()
        .any(|known| status.contains(known) || known.contains(status.as_str()))
}

/// One row per student-enrollment-period combination, as produced by the
/// import pipeline or fetched from the record store. All values are kept as
/// strings; classification fields drive the aggregations, identity and
/// contact fields are carried for listing screens only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrollmentRecord {
    pub unit_code: String,
    pub branch_code: String,
    pub branch_name: String,
    /// Canonical period code `YYYYP` with `P` in {1, 2}, e.g. `"20261"`.
    pub period: String,
    pub course: String,
    pub qualification: String,
    pub student_id: String,
    pub student_name: String,
    pub national_id: String,
    pub email: String,
    pub postal_code: String,
    pub street: String,
    pub number: String,
    pub district: String,
    pub phone1: String,
    pub phone2: String,
    /// `DD/MM/YYYY` after import normalization.
    pub enrollment_date: String,
    pub acquisition_flag: String,
    pub admission_type: String,
    pub shift: String,
    /// Period-within-course ordinal, e.g. `"3"`.
    pub academic_term: String,
    pub status: String,
    pub class_code: String,
    pub campus_code: String,
    pub campus: String,
    pub city: String,
    pub modality: String,
}

impl EnrollmentRecord {
    pub fn is_acquisition(&self) -> bool {
        self.acquisition_flag == ACQUISITION_FLAG
    }
}
