pub mod collection_service;
pub mod export_service;
pub mod import_service;
pub mod query_service;
