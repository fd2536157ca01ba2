//! Record store contract and its backends.
//!
//! The store is a document-style collection of employee records keyed by id.
//! Array operations are keyed by entry date. Match counts are reported so the
//! engine can decide between update and append.

use async_trait::async_trait;
use derive_more::Display;
use serde_json::Number;

use crate::model::employee::{AttendanceEntry, AttendancePatch, EmployeeRecord, PerformanceEntry};

pub mod memory;
pub mod mysql;

pub use memory::MemoryRecordStore;
pub use mysql::MySqlRecordStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Display)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[display(fmt = "duplicate key: {}", _0)]
    Duplicate(String),

    #[display(fmt = "database error: {}", _0)]
    Database(sqlx::Error),

    #[display(fmt = "store unavailable: {}", _0)]
    Unavailable(String),
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Database(err) => Some(err),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some("23000") {
                return StoreError::Duplicate(db_err.message().to_string());
            }
        }
        StoreError::Database(err)
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<EmployeeRecord>>;
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<EmployeeRecord>>;
    /// All records in insertion order.
    async fn list(&self) -> StoreResult<Vec<EmployeeRecord>>;
    async fn count(&self) -> StoreResult<u64>;
    async fn insert(&self, record: &EmployeeRecord) -> StoreResult<()>;

    /// Sets the role, returns how many records were actually modified.
    async fn set_role(&self, id: &str, role: &str) -> StoreResult<u64>;

    /// Applies `patch` to the attendance entry for `date`, returns the matched count.
    async fn update_attendance(
        &self,
        id: &str,
        date: &str,
        patch: &AttendancePatch,
    ) -> StoreResult<u64>;
    async fn push_attendance(&self, id: &str, entry: &AttendanceEntry) -> StoreResult<()>;
    async fn pull_attendance(&self, id: &str, date: &str) -> StoreResult<u64>;

    /// Sets the score of the performance entry for `date`, returns the matched count.
    async fn update_performance(&self, id: &str, date: &str, score: &Number) -> StoreResult<u64>;
    async fn push_performance(&self, id: &str, entry: &PerformanceEntry) -> StoreResult<()>;
    async fn pull_performance(&self, id: &str, date: &str) -> StoreResult<u64>;
}
