//! Database schema definitions
//!
//! This module contains the SQL schema for the RankSight audit database.

/// SQL schema for the database
///
/// Timestamps are RFC 3339 text; JSON payloads are stored as text.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS audits (
    id TEXT PRIMARY KEY,
    url TEXT NOT NULL,
    email TEXT,
    status TEXT NOT NULL,
    progress INTEGER NOT NULL DEFAULT 0,
    current_step TEXT NOT NULL,
    geo_score INTEGER,
    technical_score INTEGER,
    content_score INTEGER,
    visibility_score INTEGER,
    onpage_score INTEGER,
    overall_score INTEGER,
    overall_grade TEXT,
    teaser_data TEXT,
    full_data TEXT,
    error_message TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    completed_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_audits_status ON audits(status, created_at);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
