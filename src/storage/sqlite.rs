//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the AuditStore trait.

use crate::state::AuditStatus;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{AuditStore, StorageError, StorageResult};
use crate::storage::{AuditRecord, AuditUpdate, QUEUED_STEP};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

const AUDIT_COLUMNS: &str = "id, url, email, status, progress, current_step, \
     geo_score, technical_score, content_score, visibility_score, onpage_score, \
     overall_score, overall_grade, teaser_data, full_data, error_message, \
     created_at, updated_at, completed_at";

/// SQLite storage backend
///
/// A single connection behind a mutex; statements are short and never held
/// across an await point.
pub struct SqliteAuditStore {
    conn: Mutex<Connection>,
}

impl SqliteAuditStore {
    /// Opens or creates the database at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database
    pub fn in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::Lock)
    }
}

impl AuditStore for SqliteAuditStore {
    fn insert_audit(&self, url: &str, email: Option<&str>) -> StorageResult<AuditRecord> {
        let id = Uuid::new_v4();
        let now = now();

        self.conn()?.execute(
            "INSERT INTO audits (id, url, email, status, progress, current_step, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6, ?6)",
            params![
                id.to_string(),
                url,
                email,
                AuditStatus::Queued.to_db_string(),
                QUEUED_STEP,
                format_timestamp(&now),
            ],
        )?;

        Ok(AuditRecord {
            id,
            url: url.to_string(),
            email: email.map(str::to_string),
            status: AuditStatus::Queued,
            progress: 0,
            current_step: QUEUED_STEP.to_string(),
            geo_score: None,
            technical_score: None,
            content_score: None,
            visibility_score: None,
            onpage_score: None,
            overall_score: None,
            overall_grade: None,
            teaser_data: None,
            full_data: None,
            error_message: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        })
    }

    fn get_audit(&self, id: Uuid) -> StorageResult<Option<AuditRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM audits WHERE id = ?1", AUDIT_COLUMNS))?;

        let row = stmt
            .query_row(params![id.to_string()], read_row)
            .optional()?;

        row.map(AuditRecord::try_from).transpose()
    }

    fn update_audit(&self, id: Uuid, update: &AuditUpdate) -> StorageResult<()> {
        let teaser_data = update
            .teaser_data
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let full_data = update
            .full_data
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let changed = self.conn()?.execute(
            "UPDATE audits SET
                status = COALESCE(?1, status),
                progress = MAX(progress, COALESCE(?2, progress)),
                current_step = COALESCE(?3, current_step),
                geo_score = COALESCE(?4, geo_score),
                technical_score = COALESCE(?5, technical_score),
                content_score = COALESCE(?6, content_score),
                visibility_score = COALESCE(?7, visibility_score),
                onpage_score = COALESCE(?8, onpage_score),
                overall_score = COALESCE(?9, overall_score),
                overall_grade = COALESCE(?10, overall_grade),
                teaser_data = COALESCE(?11, teaser_data),
                full_data = COALESCE(?12, full_data),
                error_message = COALESCE(?13, error_message),
                completed_at = COALESCE(?14, completed_at),
                updated_at = ?15
             WHERE id = ?16",
            params![
                update.status.map(|s| s.to_db_string()),
                update.progress,
                update.current_step,
                update.geo_score,
                update.technical_score,
                update.content_score,
                update.visibility_score,
                update.onpage_score,
                update.overall_score,
                update.overall_grade,
                teaser_data,
                full_data,
                update.error_message,
                update.completed_at.as_ref().map(format_timestamp),
                format_timestamp(&now()),
                id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(StorageError::NotFound(id));
        }

        Ok(())
    }

    fn try_start(&self, id: Uuid, step: &str) -> StorageResult<bool> {
        let changed = self.conn()?.execute(
            "UPDATE audits SET
                status = ?1,
                progress = 5,
                current_step = ?2,
                error_message = NULL,
                completed_at = NULL,
                updated_at = ?3
             WHERE id = ?4 AND status IN (?5, ?6)",
            params![
                AuditStatus::Running.to_db_string(),
                step,
                format_timestamp(&now()),
                id.to_string(),
                AuditStatus::Queued.to_db_string(),
                AuditStatus::Error.to_db_string(),
            ],
        )?;

        Ok(changed == 1)
    }

    fn list_audits_by_status(
        &self,
        status: AuditStatus,
        limit: usize,
    ) -> StorageResult<Vec<AuditRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM audits WHERE status = ?1 ORDER BY created_at, rowid LIMIT ?2",
            AUDIT_COLUMNS
        ))?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(params![status.to_db_string(), limit], read_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(AuditRecord::try_from).collect()
    }
}

/// Column values as stored, before parsing ids, timestamps, and JSON
struct AuditRow {
    id: String,
    url: String,
    email: Option<String>,
    status: String,
    progress: u8,
    current_step: String,
    geo_score: Option<u32>,
    technical_score: Option<u32>,
    content_score: Option<u32>,
    visibility_score: Option<u32>,
    onpage_score: Option<u32>,
    overall_score: Option<u32>,
    overall_grade: Option<String>,
    teaser_data: Option<String>,
    full_data: Option<String>,
    error_message: Option<String>,
    created_at: String,
    updated_at: String,
    completed_at: Option<String>,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<AuditRow> {
    Ok(AuditRow {
        id: row.get(0)?,
        url: row.get(1)?,
        email: row.get(2)?,
        status: row.get(3)?,
        progress: row.get(4)?,
        current_step: row.get(5)?,
        geo_score: row.get(6)?,
        technical_score: row.get(7)?,
        content_score: row.get(8)?,
        visibility_score: row.get(9)?,
        onpage_score: row.get(10)?,
        overall_score: row.get(11)?,
        overall_grade: row.get(12)?,
        teaser_data: row.get(13)?,
        full_data: row.get(14)?,
        error_message: row.get(15)?,
        created_at: row.get(16)?,
        updated_at: row.get(17)?,
        completed_at: row.get(18)?,
    })
}

impl TryFrom<AuditRow> for AuditRecord {
    type Error = StorageError;

    fn try_from(row: AuditRow) -> StorageResult<Self> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| StorageError::InvalidRecord(format!("id {}: {}", row.id, e)))?;
        let status = AuditStatus::from_db_string(&row.status).ok_or_else(|| {
            StorageError::InvalidRecord(format!("unknown status {} for {}", row.status, id))
        })?;

        Ok(AuditRecord {
            id,
            url: row.url,
            email: row.email,
            status,
            progress: row.progress,
            current_step: row.current_step,
            geo_score: row.geo_score,
            technical_score: row.technical_score,
            content_score: row.content_score,
            visibility_score: row.visibility_score,
            onpage_score: row.onpage_score,
            overall_score: row.overall_score,
            overall_grade: row.overall_grade,
            teaser_data: parse_json(row.teaser_data)?,
            full_data: parse_json(row.full_data)?,
            error_message: row.error_message,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
            completed_at: row.completed_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

/// Current time at the precision timestamps are stored with
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Fixed-width RFC 3339 so stored timestamps sort lexically
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(s: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StorageError::InvalidRecord(format!("timestamp {}: {}", s, e)))
}

fn parse_json(raw: Option<String>) -> StorageResult<Option<serde_json::Value>> {
    Ok(raw.map(|s| serde_json::from_str(&s)).transpose()?)
}
