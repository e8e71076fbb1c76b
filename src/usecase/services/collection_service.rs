use std::sync::Arc;

use tracing::info;

use crate::domain::entities::collection::CollectionId;
use crate::domain::entities::profile::RecordKind;
use crate::usecase::ports::repo::{RecordBatch, RecordRepository, RepoError};
use crate::usecase::services::import_service::validate_required_fields;

pub struct CollectionService {
    repo: Arc<dyn RecordRepository>,
}

impl CollectionService {
    pub fn new(repo: Arc<dyn RecordRepository>) -> Self {
        Self { repo }
    }

    pub fn rename(&self, id: CollectionId, name: &str) -> Result<(), RepoError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RepoError::Message("collection name cannot be empty".to_string()));
        }
        self.repo.rename_collection(id, name.to_string())?;
        info!(collection_id = id.0, name, "renamed collection");
        Ok(())
    }

    /// Swaps the stored records for `data`, validated against `kind`.
    pub fn replace_records(
        &self,
        id: CollectionId,
        kind: RecordKind,
        data: RecordBatch,
    ) -> Result<(), RepoError> {
        validate_required_fields(&data, &kind.profile())?;
        let count = data.records.len();
        self.repo.replace_records(id, data)?;
        info!(collection_id = id.0, records = count, "replaced collection records");
        Ok(())
    }

    pub fn soft_delete(&self, id: CollectionId) -> Result<(), RepoError> {
        self.repo.soft_delete_collection(id)?;
        info!(collection_id = id.0, "soft-deleted collection");
        Ok(())
    }

    pub fn purge(&self, id: CollectionId) -> Result<(), RepoError> {
        self.repo.purge_collection(id)
    }
}
