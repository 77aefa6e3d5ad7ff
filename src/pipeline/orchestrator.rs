//! Audit pipeline orchestration
//!
//! Drives one audit record through `queued → running → complete | error`,
//! persisting progress after every step so pollers can follow along.

use crate::config::Config;
use crate::crawler::{Crawl, SiteCrawler};
use crate::pagespeed::{PageSpeedClient, PageSpeedProvider};
use crate::pipeline::report::{FullReport, TeaserData};
use crate::scoring::{Scorer, ScoringEngine};
use crate::state::AuditStatus;
use crate::storage::{open_store, AuditRecord, AuditStore, AuditUpdate};
use crate::url::normalize_submission_url;
use crate::{AuditError, Result};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use url::Url;
use uuid::Uuid;

pub const STARTING_STEP: &str = "Starting analysis...";
pub const CRAWLING_STEP: &str = "Crawling your website...";
pub const PAGE_SPEED_STEP: &str = "Running PageSpeed analysis...";
pub const SCORING_STEP: &str = "Analyzing AI search readiness...";
pub const REPORT_STEP: &str = "Generating your report...";
pub const UNREACHABLE_STEP: &str =
    "Could not access your website. Please check the URL and try again.";
pub const UNREACHABLE_ERROR: &str = "Failed to fetch the website";
pub const FAILURE_STEP: &str = "An error occurred during analysis";

/// Runs audits against a store using injected crawl, page-speed, and
/// scoring capabilities
pub struct Orchestrator {
    store: Arc<dyn AuditStore>,
    crawler: Arc<dyn Crawl>,
    page_speed: Arc<dyn PageSpeedProvider>,
    scorer: Arc<dyn Scorer>,
    teaser_issue_count: usize,
    config_hash: Option<String>,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn AuditStore>,
        crawler: Arc<dyn Crawl>,
        page_speed: Arc<dyn PageSpeedProvider>,
        scorer: Arc<dyn Scorer>,
    ) -> Self {
        Self {
            store,
            crawler,
            page_speed,
            scorer,
            teaser_issue_count: 3,
            config_hash: None,
        }
    }

    /// Wires the production store, crawler, page-speed client, and scorer
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    /// * `config_hash` - Hash of the configuration file, recorded in reports
    pub fn from_config(config: &Config, config_hash: Option<String>) -> Result<Self> {
        let store = open_store(Path::new(&config.storage.database_path))?;
        let crawler = SiteCrawler::new(config)?;
        let page_speed = PageSpeedClient::new(&config.page_speed)?;
        let scorer = ScoringEngine::new(config.scoring.clone());

        Ok(Self::new(
            Arc::new(store),
            Arc::new(crawler),
            Arc::new(page_speed),
            Arc::new(scorer),
        )
        .with_teaser_issue_count(config.scoring.teaser_issue_count)
        .with_config_hash(config_hash))
    }

    pub fn with_teaser_issue_count(mut self, count: usize) -> Self {
        self.teaser_issue_count = count;
        self
    }

    pub fn with_config_hash(mut self, config_hash: Option<String>) -> Self {
        self.config_hash = config_hash;
        self
    }

    pub fn store(&self) -> &Arc<dyn AuditStore> {
        &self.store
    }

    /// Validates a submission and queues a new audit
    ///
    /// # Errors
    ///
    /// * `AuditError::Url` - The URL is empty, malformed, or has no dotted hostname
    /// * `AuditError::InvalidInput` - The email is malformed
    pub fn submit(&self, url: &str, email: Option<&str>) -> Result<AuditRecord> {
        let url = normalize_submission_url(url)?;
        let email = email.map(normalize_email).transpose()?;

        let record = self.store.insert_audit(url.as_str(), email.as_deref())?;
        tracing::info!("Queued audit {} for {}", record.id, record.url);
        Ok(record)
    }

    /// Returns the current record for an audit
    pub fn status(&self, id: Uuid) -> Result<AuditRecord> {
        self.store
            .get_audit(id)?
            .ok_or_else(|| AuditError::NotFound(id.to_string()))
    }

    /// Runs the pipeline for a queued or failed audit
    ///
    /// Pipeline failures are recorded on the audit rather than returned.
    ///
    /// # Returns
    ///
    /// * `Ok(AuditStatus::Complete)` - The audit finished and its scores are stored
    /// * `Ok(AuditStatus::Error)` - The audit failed; see its `error_message`
    /// * `Err(AuditError::NotFound)` - No audit has this ID
    /// * `Err(AuditError::NotStartable)` - The audit is running or complete; nothing changed
    pub async fn start(&self, id: Uuid) -> Result<AuditStatus> {
        let audit = self.status(id)?;

        if !audit.status.can_start() || !self.store.try_start(id, STARTING_STEP)? {
            let status = self
                .store
                .get_audit(id)?
                .map(|current| current.status)
                .unwrap_or(audit.status);
            tracing::info!("Audit {} not started: already {}", id, status);
            return Err(AuditError::NotStartable {
                id: id.to_string(),
                status,
            });
        }

        tracing::info!("Starting audit {} for {}", id, audit.url);

        match self.execute(&audit).await {
            Ok(status) => Ok(status),
            Err(e) => {
                tracing::error!("Audit {} failed: {}", id, e);
                self.store
                    .update_audit(id, &AuditUpdate::failed(FAILURE_STEP, e.to_string()))?;
                Ok(AuditStatus::Error)
            }
        }
    }

    async fn execute(&self, audit: &AuditRecord) -> Result<AuditStatus> {
        let id = audit.id;
        let url = Url::parse(&audit.url)?;

        self.store
            .update_audit(id, &AuditUpdate::step(10, CRAWLING_STEP))?;

        let store = Arc::clone(&self.store);
        let progress = move |message: &str| {
            if let Err(e) = store.update_audit(id, &AuditUpdate::message(message)) {
                tracing::warn!("Failed to record progress for audit {}: {}", id, e);
            }
        };

        let crawl = self.crawler.crawl(&url, &progress).await?;

        if crawl.pages.is_empty() {
            tracing::warn!("Audit {}: homepage {} unreachable", id, url);
            self.store
                .update_audit(id, &AuditUpdate::failed(UNREACHABLE_STEP, UNREACHABLE_ERROR))?;
            return Ok(AuditStatus::Error);
        }

        tracing::info!("Audit {}: crawled {} pages", id, crawl.pages.len());

        self.store
            .update_audit(id, &AuditUpdate::step(40, PAGE_SPEED_STEP))?;
        let speed = self.page_speed.analyze(&audit.url).await;

        self.store
            .update_audit(id, &AuditUpdate::step(65, SCORING_STEP))?;
        let scores = self.scorer.score(&crawl, &speed);

        self.store
            .update_audit(id, &AuditUpdate::step(80, REPORT_STEP))?;
        let teaser = TeaserData::build(
            id,
            &audit.url,
            &scores,
            self.teaser_issue_count,
            &Utc::now(),
        );
        let full = FullReport::build(&crawl, &speed, &scores, self.config_hash.clone());

        self.store.update_audit(
            id,
            &AuditUpdate::completed(
                &scores,
                serde_json::to_value(&teaser)?,
                serde_json::to_value(&full)?,
            ),
        )?;

        tracing::info!(
            "Audit {} complete: {} ({}/100, {} issues)",
            id,
            scores.grade,
            scores.overall,
            scores.stats.total_issues
        );

        Ok(AuditStatus::Complete)
    }
}

/// Validates and lowercases a contact email
///
/// The address only has to contain `@` and `.`.
pub fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim();
    if !email.contains('@') || !email.contains('.') {
        return Err(AuditError::InvalidInput(format!(
            "Please enter a valid email address: {}",
            email
        )));
    }
    Ok(email.to_lowercase())
}
