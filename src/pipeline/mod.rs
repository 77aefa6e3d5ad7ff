//! Audit pipeline
//!
//! This module ties the crawler, page-speed probe, and scoring engine to
//! the audit store:
//! - Submission validation and queueing
//! - The per-audit state machine with its start guard
//! - Teaser and full report payloads
//! - A bounded-concurrency worker for queued audits

mod orchestrator;
mod report;
mod worker;

pub use orchestrator::{
    normalize_email, Orchestrator, CRAWLING_STEP, FAILURE_STEP, PAGE_SPEED_STEP, REPORT_STEP,
    SCORING_STEP, STARTING_STEP, UNREACHABLE_ERROR, UNREACHABLE_STEP,
};
pub use report::{
    report_date, CategorySummary, CrawlOverview, FullReport, PageOverview, TeaserCategories,
    TeaserData, TeaserIssue,
};
pub use worker::{Worker, WorkerReport};
