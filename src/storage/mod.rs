//! Storage module for persisting audits
//!
//! This module handles all database operations for the audit pipeline:
//! - SQLite database initialization and schema management
//! - Audit record creation, lookup, and partial updates
//! - The atomic start guard that hands a record to exactly one runner
//! - Queue listing for the background worker

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteAuditStore;
pub use traits::{AuditStore, StorageError, StorageResult};

use crate::scoring::AuditScores;
use crate::state::AuditStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use uuid::Uuid;

/// Step shown while an audit waits in the queue
pub const QUEUED_STEP: &str = "Queued for analysis";

/// Step shown once an audit has finished
pub const COMPLETE_STEP: &str = "Complete";

/// Opens (or creates) the SQLite audit store at `path`
pub fn open_store(path: &Path) -> StorageResult<SqliteAuditStore> {
    SqliteAuditStore::new(path)
}

/// A persisted audit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditRecord {
    pub id: Uuid,
    pub url: String,
    pub email: Option<String>,
    pub status: AuditStatus,
    /// 0–100, never decreases within one run
    pub progress: u8,
    pub current_step: String,
    pub geo_score: Option<u32>,
    pub technical_score: Option<u32>,
    pub content_score: Option<u32>,
    pub visibility_score: Option<u32>,
    pub onpage_score: Option<u32>,
    pub overall_score: Option<u32>,
    pub overall_grade: Option<String>,
    pub teaser_data: Option<serde_json::Value>,
    pub full_data: Option<serde_json::Value>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl AuditRecord {
    /// Returns true if all five category scores are stored
    pub fn has_all_scores(&self) -> bool {
        [
            self.geo_score,
            self.technical_score,
            self.content_score,
            self.visibility_score,
            self.onpage_score,
        ]
        .iter()
        .all(Option::is_some)
    }
}

/// A partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditUpdate {
    pub status: Option<AuditStatus>,
    pub progress: Option<u8>,
    pub current_step: Option<String>,
    pub geo_score: Option<u32>,
    pub technical_score: Option<u32>,
    pub content_score: Option<u32>,
    pub visibility_score: Option<u32>,
    pub onpage_score: Option<u32>,
    pub overall_score: Option<u32>,
    pub overall_grade: Option<String>,
    pub teaser_data: Option<serde_json::Value>,
    pub full_data: Option<serde_json::Value>,
    pub error_message: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl AuditUpdate {
    /// Sets the current step only
    pub fn message(step: impl Into<String>) -> Self {
        Self {
            current_step: Some(step.into()),
            ..Self::default()
        }
    }

    /// Advances progress and sets the current step
    pub fn step(progress: u8, step: impl Into<String>) -> Self {
        Self {
            progress: Some(progress),
            current_step: Some(step.into()),
            ..Self::default()
        }
    }

    /// Marks the audit as failed
    pub fn failed(step: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            status: Some(AuditStatus::Error),
            progress: Some(100),
            current_step: Some(step.into()),
            error_message: Some(error_message.into()),
            ..Self::default()
        }
    }

    /// Marks the audit as complete with its scores and report payloads
    pub fn completed(
        scores: &AuditScores,
        teaser_data: serde_json::Value,
        full_data: serde_json::Value,
    ) -> Self {
        Self {
            status: Some(AuditStatus::Complete),
            progress: Some(100),
            current_step: Some(COMPLETE_STEP.to_string()),
            geo_score: Some(scores.geo),
            technical_score: Some(scores.technical),
            content_score: Some(scores.content),
            visibility_score: Some(scores.visibility),
            onpage_score: Some(scores.onpage),
            overall_score: Some(scores.overall),
            overall_grade: Some(scores.grade.to_string()),
            teaser_data: Some(teaser_data),
            full_data: Some(full_data),
            error_message: None,
            completed_at: Some(Utc::now()),
        }
    }
}
