//! Storage traits and error types
//!
//! This module defines the trait interface for audit storage backends and
//! associated error types.

use crate::state::AuditStatus;
use crate::storage::{AuditRecord, AuditUpdate};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Audit not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid stored record: {0}")]
    InvalidRecord(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Storage lock poisoned")]
    Lock,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for audit storage backends
///
/// Implementations must be safe to share between concurrently running
/// audits; every method takes `&self`.
pub trait AuditStore: Send + Sync {
    /// Inserts a new `queued` audit with progress 0
    ///
    /// # Arguments
    ///
    /// * `url` - The normalized target URL
    /// * `email` - Optional contact email, already normalized
    ///
    /// # Returns
    ///
    /// The newly created record
    fn insert_audit(&self, url: &str, email: Option<&str>) -> StorageResult<AuditRecord>;

    /// Gets an audit by ID, or `None` if it does not exist
    fn get_audit(&self, id: Uuid) -> StorageResult<Option<AuditRecord>>;

    /// Applies a partial update
    ///
    /// Only the `Some` fields of `update` are written. Progress never moves
    /// backwards: the stored value becomes the larger of the two.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no audit has this ID.
    fn update_audit(&self, id: Uuid, update: &AuditUpdate) -> StorageResult<()>;

    /// Atomically moves a startable audit to `running`
    ///
    /// Succeeds only when the stored status is `queued` or `error`; the
    /// record is then reset to progress 5 with `step` as its current step
    /// and its previous error cleared.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - This caller now owns the run
    /// * `Ok(false)` - The audit is missing or not startable; nothing changed
    fn try_start(&self, id: Uuid, step: &str) -> StorageResult<bool>;

    /// Lists audits with the given status, oldest first
    fn list_audits_by_status(
        &self,
        status: AuditStatus,
        limit: usize,
    ) -> StorageResult<Vec<AuditRecord>>;
}
