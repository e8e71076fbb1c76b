use crate::domain::entities::collection::CollectionId;
use crate::domain::entities::profile::RecordKind;
use crate::domain::entities::record::Record;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    Message(String),
}

impl std::fmt::Display for RepoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoError::Message(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for RepoError {}

impl From<anyhow::Error> for RepoError {
    fn from(err: anyhow::Error) -> Self {
        RepoError::Message(format!("{err:#}"))
    }
}

pub trait RecordRepository: Send + Sync {
    fn init(&self) -> Result<(), RepoError>;

    fn list_collections(&self, include_deleted: bool) -> Result<Vec<CollectionMeta>, RepoError>;
    fn load_columns(&self, id: CollectionId) -> Result<Vec<String>, RepoError>;
    fn load_records(&self, id: CollectionId) -> Result<Vec<Record>, RepoError>;

    fn create_collection(
        &self,
        meta: NewCollectionMeta,
        data: RecordBatch,
    ) -> Result<CollectionId, RepoError>;
    fn replace_records(&self, id: CollectionId, data: RecordBatch) -> Result<(), RepoError>;
    fn rename_collection(&self, id: CollectionId, name: String) -> Result<(), RepoError>;
    fn soft_delete_collection(&self, id: CollectionId) -> Result<(), RepoError>;
    fn purge_collection(&self, id: CollectionId) -> Result<(), RepoError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionMeta {
    pub id: CollectionId,
    pub kind: RecordKind,
    pub name: String,
    pub record_count: i64,
    pub source_path: String,
    pub deleted_at: Option<String>,
    pub imported_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCollectionMeta {
    pub kind: RecordKind,
    pub name: String,
    pub source_path: String,
}

/// Records plus the column order they were ingested with.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordBatch {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}
