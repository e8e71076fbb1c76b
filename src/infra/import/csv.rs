use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::entities::record::{FieldValue, Record};
use crate::usecase::ports::repo::RecordBatch;

pub fn read_csv_records(csv_path: &Path) -> Result<RecordBatch> {
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(csv_path)
        .with_context(|| format!("failed to open csv: {}", csv_path.display()))?;
    read_csv_from(reader)
        .with_context(|| format!("failed to read csv: {}", csv_path.display()))
}

pub fn read_csv_from<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<RecordBatch> {
    let headers = reader
        .headers()
        .context("failed to read csv headers")?
        .clone();

    if headers.is_empty() || headers.iter().all(|name| name.trim().is_empty()) {
        anyhow::bail!("csv header is required")
    }

    let columns: Vec<String> = headers.iter().map(|name| name.trim().to_string()).collect();

    let mut records = Vec::new();
    for (row_idx, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("failed to parse csv record {}", row_idx + 1))?;
        let record: Record = columns
            .iter()
            .enumerate()
            .filter(|(_, name)| !name.is_empty())
            .map(|(col_idx, name)| {
                let value = row.get(col_idx).map(FieldValue::infer).unwrap_or(FieldValue::Null);
                (name.clone(), value)
            })
            .collect();
        records.push(record);
    }

    Ok(RecordBatch {
        columns: columns.into_iter().filter(|name| !name.is_empty()).collect(),
        records,
    })
}
