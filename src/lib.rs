//! RankSight: search and AI-search readiness audits
//!
//! This crate fetches a handful of pages from a website, checks its
//! crawl-control files, probes page speed, and turns the findings into
//! category scores, letter grades, and a ranked list of issues.

pub mod config;
pub mod crawler;
pub mod pagespeed;
pub mod pipeline;
pub mod robots;
pub mod scoring;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for RankSight operations
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Audit not found: {0}")]
    NotFound(String),

    #[error("Audit {id} cannot be started while {status}")]
    NotStartable { id: String, status: state::AuditStatus },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Invalid hostname: {0}")]
    InvalidHostname(String),
}

/// Result type alias for RankSight operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlResult, PageRecord, SiteCrawler};
pub use pagespeed::{PageSpeedClient, PageSpeedProvider, PageSpeedResult};
pub use pipeline::{Orchestrator, Worker};
pub use scoring::{calculate_scores, AuditScores, Issue};
pub use state::AuditStatus;
pub use storage::{AuditRecord, AuditStore, SqliteAuditStore};
