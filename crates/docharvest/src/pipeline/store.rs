use crate::db::{record_repo, Database, DatabaseError};
use crate::record::NewRecord;

/// What the scan pipeline needs from persistence.
pub trait RecordStore: Send + Sync {
    /// Whether a record already exists for this exact file name.
    fn exists(&self, source_file: &str) -> Result<bool, DatabaseError>;

    /// Persists a record and returns its id.
    fn create(&self, record: &NewRecord) -> Result<i64, DatabaseError>;
}

impl RecordStore for Database {
    fn exists(&self, source_file: &str) -> Result<bool, DatabaseError> {
        record_repo::exists_by_source_file(self, source_file)
    }

    fn create(&self, record: &NewRecord) -> Result<i64, DatabaseError> {
        record_repo::insert(self, record)
    }
}
