use super::mapping::{field_for_header, Field};
use super::normalizer::normalize_header;
use crate::analytics::EnrollmentRecord;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::io::Read;

/// Days between the Excel date epoch (1899-12-30) and the Unix epoch.
const EXCEL_EPOCH_OFFSET_DAYS: i64 = 25569;

/// Parsed sheet: the surviving records plus which canonical columns the
/// header row actually mapped, for batch-level validation.
#[derive(Debug)]
pub(crate) struct ParsedSheet {
    pub(crate) records: Vec<EnrollmentRecord>,
    pub(crate) mapped_fields: Vec<Field>,
}

/// Reads a delimited export into enrollment records. Unknown columns are
/// skipped, enrollment dates are normalized to `DD/MM/YYYY`, and rows missing
/// the student id or the period are dropped, mirroring the bulk import
/// engine.
pub(crate) fn parse_records<R: Read>(reader: R) -> Result<ParsedSheet, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<Option<Field>> = csv_reader
        .headers()?
        .iter()
        .map(|header| field_for_header(&normalize_header(header)))
        .collect();
    let mapped_fields: Vec<Field> = columns.iter().filter_map(|field| *field).collect();

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let mut record = EnrollmentRecord::default();
        for (index, field) in columns.iter().enumerate() {
            let Some(field) = field else { continue };
            let value = row.get(index).unwrap_or_default().trim().to_string();
            field.assign(&mut record, value);
        }

        record.enrollment_date = normalize_enrollment_date(&record.enrollment_date);

        if record.student_id.is_empty() || record.period.is_empty() {
            continue;
        }
        records.push(record);
    }

    Ok(ParsedSheet {
        records,
        mapped_fields,
    })
}

/// Reformats an enrollment date to `DD/MM/YYYY`. Accepts Excel serial-day
/// numbers, ISO dates, day-first dates, and day-first datetimes; anything
/// unrecognized passes through verbatim.
pub(crate) fn normalize_enrollment_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    if let Ok(serial) = trimmed.parse::<f64>() {
        if serial > 0.0 {
            if let Some(date) = excel_serial_to_date(serial) {
                return date.format("%d/%m/%Y").to_string();
            }
        }
    }

    for date_format in ["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y", "%d/%m/%y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, date_format) {
            return date.format("%d/%m/%Y").to_string();
        }
    }

    for datetime_format in ["%Y-%m-%d %H:%M:%S", "%d/%m/%Y %H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, datetime_format) {
            return datetime.date().format("%d/%m/%Y").to_string();
        }
    }

    trimmed.to_string()
}

fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    let days = serial.trunc() as i64 - EXCEL_EPOCH_OFFSET_DAYS;
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(Duration::days(days))
}
