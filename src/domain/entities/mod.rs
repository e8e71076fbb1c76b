pub mod collection;
pub mod list_query;
pub mod profile;
pub mod record;
