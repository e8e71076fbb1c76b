use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::domain::entities::record::{parse_date, FieldValue, Record};
use crate::usecase::ports::repo::RecordBatch;

pub fn read_json_records(json_path: &Path) -> Result<RecordBatch> {
    let raw = std::fs::read_to_string(json_path)
        .with_context(|| format!("failed to read json: {}", json_path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse json: {}", json_path.display()))?;
    records_from_json(value)
}

/// Converts a top-level array of objects. Columns are listed in the order
/// they are first seen across the array.
pub fn records_from_json(value: Value) -> Result<RecordBatch> {
    let Value::Array(items) = value else {
        anyhow::bail!("json export must be an array of objects")
    };

    let mut columns: Vec<String> = Vec::new();
    let mut records = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        let Value::Object(object) = item else {
            anyhow::bail!("json record {} is not an object", idx + 1)
        };

        let mut record = Record::new();
        for (name, value) in object {
            if !columns.contains(&name) {
                columns.push(name.clone());
            }
            record.insert(name, json_to_field_value(value));
        }
        records.push(record);
    }

    Ok(RecordBatch { columns, records })
}

pub fn json_to_field_value(value: Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(flag) => FieldValue::Bool(flag),
        Value::Number(number) => match number.as_f64() {
            Some(float) if is_exact(&number, float) => FieldValue::Number(float),
            _ => FieldValue::Text(number.to_string()),
        },
        // Strings keep their text unless they are timestamps; "0042" stays an id.
        Value::String(text) => match parse_date(&text) {
            Some(date) => FieldValue::Date(date),
            None if text.trim().is_empty() => FieldValue::Null,
            None => FieldValue::Text(text.trim().to_string()),
        },
        nested @ (Value::Array(_) | Value::Object(_)) => FieldValue::Text(nested.to_string()),
    }
}

fn is_exact(number: &serde_json::Number, float: f64) -> bool {
    if let Some(int) = number.as_i64() {
        return float as i128 == i128::from(int);
    }
    if let Some(int) = number.as_u64() {
        return float as i128 == i128::from(int);
    }
    true
}
