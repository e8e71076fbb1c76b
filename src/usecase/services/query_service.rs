use std::sync::Arc;

use crate::domain::entities::collection::CollectionId;
use crate::domain::entities::record::Record;
use crate::usecase::controller::ListController;
use crate::usecase::ports::repo::{CollectionMeta, RecordRepository, RepoError};

/// One stored collection read back in full.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedCollection {
    pub meta: CollectionMeta,
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

pub struct QueryService {
    repo: Arc<dyn RecordRepository>,
}

impl QueryService {
    pub fn new(repo: Arc<dyn RecordRepository>) -> Self {
        Self { repo }
    }

    pub fn list_collections(&self, include_deleted: bool) -> Result<Vec<CollectionMeta>, RepoError> {
        self.repo.list_collections(include_deleted)
    }

    pub fn load_collection(&self, id: CollectionId) -> Result<LoadedCollection, RepoError> {
        let meta = self
            .repo
            .list_collections(true)?
            .into_iter()
            .find(|meta| meta.id == id)
            .ok_or_else(|| RepoError::Message(format!("collection #{} does not exist", id.0)))?;
        let columns = self.repo.load_columns(id)?;
        let records = self.repo.load_records(id)?;
        Ok(LoadedCollection {
            meta,
            columns,
            records,
        })
    }

    /// Loads a collection into `controller`, switching to the profile of the
    /// collection's kind. Returns the collection's columns.
    pub fn open_into(
        &self,
        id: CollectionId,
        controller: &mut ListController,
    ) -> Result<Vec<String>, RepoError> {
        let loaded = self.load_collection(id)?;
        controller.reset(loaded.meta.kind.profile(), loaded.records);
        Ok(loaded.columns)
    }

    /// Re-reads the records of the collection already shown, keeping the
    /// current criteria and sort.
    pub fn refresh(
        &self,
        id: CollectionId,
        controller: &mut ListController,
    ) -> Result<(), RepoError> {
        let records = self.repo.load_records(id)?;
        controller.replace_records(records);
        Ok(())
    }
}
