use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::domain::entities::record::{parse_date, FieldValue, Record};
use crate::usecase::ports::repo::RecordBatch;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Excel serial day number (1900 date system) to a timestamp, rounded to
/// the second.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let seconds = (serial * SECONDS_PER_DAY).round() as i64;
    epoch.checked_add_signed(Duration::seconds(seconds))
}

pub fn cell_to_field_value(cell: &Data) -> FieldValue {
    match cell {
        Data::String(v) => FieldValue::infer(v),
        Data::Float(v) => FieldValue::Number(*v),
        Data::Int(v) => FieldValue::Number(*v as f64),
        Data::Bool(v) => FieldValue::Bool(*v),
        Data::DateTime(v) => excel_serial_to_datetime(v.as_f64())
            .map(FieldValue::Date)
            .unwrap_or(FieldValue::Null),
        Data::DateTimeIso(v) => parse_date(v)
            .map(FieldValue::Date)
            .unwrap_or_else(|| FieldValue::text(v.as_str())),
        Data::DurationIso(v) => FieldValue::text(v.as_str()),
        Data::Error(v) => FieldValue::text(format!("{v:?}")),
        Data::Empty => FieldValue::Null,
    }
}

fn header_name(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

/// Reads one worksheet (the first one when `sheet` is `None`). The first row
/// holds the field names.
pub fn read_xlsx_records(xlsx_path: &Path, sheet: Option<&str>) -> Result<RecordBatch> {
    let mut workbook = open_workbook_auto(xlsx_path)
        .with_context(|| format!("failed to open xlsx: {}", xlsx_path.display()))?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .with_context(|| format!("xlsx has no worksheets: {}", xlsx_path.display()))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("failed to read sheet: {sheet_name}"))?;

    let mut rows = range.rows();
    let columns: Vec<String> = rows
        .next()
        .map(|header| header.iter().map(header_name).collect())
        .unwrap_or_default();
    if columns.iter().all(String::is_empty) {
        anyhow::bail!("xlsx header row is required (sheet: {sheet_name})")
    }

    let records = rows
        .filter(|row| row.iter().any(|cell| !matches!(cell, Data::Empty)))
        .map(|row| {
            columns
                .iter()
                .enumerate()
                .filter(|(_, name)| !name.is_empty())
                .map(|(col_idx, name)| {
                    let value = row
                        .get(col_idx)
                        .map(cell_to_field_value)
                        .unwrap_or(FieldValue::Null);
                    (name.clone(), value)
                })
                .collect::<Record>()
        })
        .collect();

    Ok(RecordBatch {
        columns: columns.into_iter().filter(|name| !name.is_empty()).collect(),
        records,
    })
}
