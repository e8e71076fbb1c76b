use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::domain::entities::record::Record;

pub fn write_csv<'a>(
    csv_path: &Path,
    columns: &[String],
    records: impl IntoIterator<Item = &'a Record>,
) -> Result<usize> {
    let writer = csv::Writer::from_path(csv_path)
        .with_context(|| format!("failed to create csv: {}", csv_path.display()))?;
    let written = write_csv_to(writer, columns, records)
        .with_context(|| format!("failed to write csv: {}", csv_path.display()))?;
    info!(path = %csv_path.display(), records = written, "exported csv");
    Ok(written)
}

pub fn write_csv_to<'a, W: std::io::Write>(
    mut writer: csv::Writer<W>,
    columns: &[String],
    records: impl IntoIterator<Item = &'a Record>,
) -> Result<usize> {
    writer
        .write_record(columns)
        .context("failed to write csv header")?;

    let mut written = 0;
    for record in records {
        let row = columns.iter().map(|column| {
            record
                .get(column)
                .map(|value| value.to_string())
                .unwrap_or_default()
        });
        writer
            .write_record(row)
            .with_context(|| format!("failed to write csv record {}", written + 1))?;
        written += 1;
    }

    writer.flush().context("failed to flush csv")?;
    Ok(written)
}
