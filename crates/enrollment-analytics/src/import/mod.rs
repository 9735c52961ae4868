//! Spreadsheet ingestion: header-synonym mapping, date normalization, and
//! batch validation in front of the analytics engine.

mod mapping;
mod normalizer;
mod parser;

use crate::analytics::Dataset;
use mapping::Field;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Columns a batch must carry for the dashboard to mean anything.
const REQUIRED_FIELDS: &[Field] = &[Field::Period, Field::Status, Field::Course];

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read enrollment export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid enrollment export data: {0}")]
    Csv(#[from] csv::Error),
    #[error("the enrollment export has no usable rows")]
    Empty,
    #[error("missing required columns: {}", .0.join(", "))]
    MissingRequiredColumns(Vec<&'static str>),
}

/// Turns a raw enrollment export into a [`Dataset`], rejecting batches that
/// lack the mandatory classification columns.
pub struct EnrollmentImporter;

impl EnrollmentImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Dataset, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Dataset, ImportError> {
        let sheet = parser::parse_records(reader)?;

        let missing: Vec<&'static str> = REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| !sheet.mapped_fields.contains(field))
            .map(Field::column_label)
            .collect();
        if !missing.is_empty() {
            return Err(ImportError::MissingRequiredColumns(missing));
        }

        if sheet.records.is_empty() {
            return Err(ImportError::Empty);
        }

        let dataset = Dataset::from_records(sheet.records);
        info!(
            records = dataset.records.len(),
            periods = dataset.periods.len(),
            current_period = %dataset.current_period,
            "parsed enrollment export"
        );
        Ok(dataset)
    }
}
