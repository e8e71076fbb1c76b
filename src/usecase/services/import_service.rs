use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::domain::entities::collection::CollectionId;
use crate::domain::entities::profile::{ListProfile, RecordKind};
use crate::infra::import::csv::read_csv_records;
use crate::infra::import::json::read_json_records;
use crate::infra::import::xlsx::read_xlsx_records;
use crate::usecase::ports::repo::{NewCollectionMeta, RecordBatch, RecordRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportResult {
    pub collection_id: CollectionId,
    pub record_count: usize,
}

pub struct ImportService {
    repo: Arc<dyn RecordRepository>,
}

impl ImportService {
    pub fn new(repo: Arc<dyn RecordRepository>) -> Self {
        Self { repo }
    }

    pub fn import_file(&self, path: &Path, kind: RecordKind) -> Result<ImportResult> {
        let batch = read_record_file(path)?;
        validate_required_fields(&batch, &kind.profile())
            .with_context(|| format!("{} import rejected: {}", kind.label(), path.display()))?;

        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("imported")
            .to_string();
        let record_count = batch.records.len();
        let collection_id = self.repo.create_collection(
            NewCollectionMeta {
                kind,
                name,
                source_path: path.display().to_string(),
            },
            batch,
        )?;

        info!(
            collection_id = collection_id.0,
            kind = %kind,
            records = record_count,
            path = %path.display(),
            "imported records"
        );
        Ok(ImportResult {
            collection_id,
            record_count,
        })
    }
}

/// Reads a CSV, XLSX or JSON file by extension.
pub fn read_record_file(path: &Path) -> Result<RecordBatch> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "csv" => read_csv_records(path),
        "xlsx" | "xlsm" | "xls" | "ods" => read_xlsx_records(path, None),
        "json" => read_json_records(path),
        other => anyhow::bail!("unsupported import format: {other:?} ({})", path.display()),
    }
}

/// Every record must carry a value for each required field of the profile.
pub fn validate_required_fields(batch: &RecordBatch, profile: &ListProfile) -> Result<()> {
    for (idx, record) in batch.records.iter().enumerate() {
        if let Some(field) = profile.missing_required_field(record) {
            anyhow::bail!("record {} is missing required field `{field}`", idx + 1);
        }
    }
    Ok(())
}
