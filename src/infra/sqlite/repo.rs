use std::path::PathBuf;

use crate::domain::entities::collection::CollectionId;
use crate::domain::entities::record::Record;
use crate::infra::sqlite::queries::{
    create_collection, list_collections, load_columns, load_records, purge_collection,
    rename_collection, replace_records, soft_delete_collection,
};
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::repo::{
    CollectionMeta, NewCollectionMeta, RecordBatch, RecordRepository, RepoError,
};

pub struct SqliteRepo {
    pub db_path: PathBuf,
}

impl SqliteRepo {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

impl RecordRepository for SqliteRepo {
    fn init(&self) -> Result<(), RepoError> {
        init_db(&self.db_path).map_err(RepoError::from)
    }

    fn list_collections(&self, include_deleted: bool) -> Result<Vec<CollectionMeta>, RepoError> {
        list_collections(&self.db_path, include_deleted).map_err(RepoError::from)
    }

    fn load_columns(&self, id: CollectionId) -> Result<Vec<String>, RepoError> {
        load_columns(&self.db_path, id.0).map_err(RepoError::from)
    }

    fn load_records(&self, id: CollectionId) -> Result<Vec<Record>, RepoError> {
        load_records(&self.db_path, id.0).map_err(RepoError::from)
    }

    fn create_collection(
        &self,
        meta: NewCollectionMeta,
        data: RecordBatch,
    ) -> Result<CollectionId, RepoError> {
        let collection_id = create_collection(
            &self.db_path,
            meta.kind,
            &meta.name,
            &meta.source_path,
            &data.columns,
            &data.records,
        )?;

        Ok(CollectionId(collection_id))
    }

    fn replace_records(&self, id: CollectionId, data: RecordBatch) -> Result<(), RepoError> {
        replace_records(&self.db_path, id.0, &data.columns, &data.records).map_err(RepoError::from)
    }

    fn rename_collection(&self, id: CollectionId, name: String) -> Result<(), RepoError> {
        rename_collection(&self.db_path, id.0, &name).map_err(RepoError::from)
    }

    fn soft_delete_collection(&self, id: CollectionId) -> Result<(), RepoError> {
        soft_delete_collection(&self.db_path, id.0).map_err(RepoError::from)
    }

    fn purge_collection(&self, id: CollectionId) -> Result<(), RepoError> {
        purge_collection(&self.db_path, id.0).map_err(RepoError::from)
    }
}
