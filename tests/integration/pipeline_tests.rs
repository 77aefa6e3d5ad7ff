//! Integration tests for the audit pipeline
//!
//! The orchestrator runs against an in-memory store with substituted
//! crawl, page-speed, and scoring implementations so that state
//! transitions can be observed without network access.

use async_trait::async_trait;
use ranksight::crawler::{Crawl, CrawlResult, PageRecord, ProgressFn};
use ranksight::pagespeed::{PageSpeedProvider, PageSpeedResult};
use ranksight::pipeline::{
    Orchestrator, Worker, CRAWLING_STEP, FAILURE_STEP, UNREACHABLE_ERROR, UNREACHABLE_STEP,
};
use ranksight::scoring::{AuditScores, Scorer, ScoringEngine};
use ranksight::storage::{AuditStore, SqliteAuditStore, COMPLETE_STEP, QUEUED_STEP};
use ranksight::{AuditError, AuditStatus};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;
use uuid::Uuid;

fn sample_crawl(url: &Url) -> CrawlResult {
    let homepage = PageRecord {
        url: url.to_string(),
        status: 200,
        title: Some("Acme Plumbing | Emergency Repairs".to_string()),
        meta_description: Some("Licensed plumbers serving the metro area.".to_string()),
        word_count: 420,
        ..PageRecord::default()
    };

    CrawlResult {
        pages: vec![homepage],
        ssl: url.scheme() == "https",
        ..CrawlResult::default()
    }
}

/// Crawl stand-in that can be switched between reachable and unreachable
struct StubCrawler {
    reachable: AtomicBool,
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StubCrawler {
    fn new(reachable: bool) -> Arc<Self> {
        Self::with_delay(reachable, Duration::ZERO)
    }

    fn with_delay(reachable: bool, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            reachable: AtomicBool::new(reachable),
            delay,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Crawl for StubCrawler {
    async fn crawl(&self, url: &Url, progress: ProgressFn<'_>) -> ranksight::Result<CrawlResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        progress("Crawling homepage...");
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.reachable.load(Ordering::SeqCst) {
            Ok(sample_crawl(url))
        } else {
            Ok(CrawlResult::default())
        }
    }
}

/// Crawl stand-in that fails outright
struct BrokenCrawler;

#[async_trait]
impl Crawl for BrokenCrawler {
    async fn crawl(&self, _url: &Url, _progress: ProgressFn<'_>) -> ranksight::Result<CrawlResult> {
        Err(AuditError::InvalidInput("crawler exploded".to_string()))
    }
}

/// Records the stored progress and step around a progress callback
struct ProbeCrawler {
    store: Arc<SqliteAuditStore>,
    observed: Mutex<Vec<(u8, String)>>,
}

impl ProbeCrawler {
    fn snapshot(&self) {
        let running = self
            .store
            .list_audits_by_status(AuditStatus::Running, 10)
            .unwrap();
        let audit = &running[0];
        self.observed
            .lock()
            .unwrap()
            .push((audit.progress, audit.current_step.clone()));
    }
}

#[async_trait]
impl Crawl for ProbeCrawler {
    async fn crawl(&self, url: &Url, progress: ProgressFn<'_>) -> ranksight::Result<CrawlResult> {
        self.snapshot();
        progress("Crawling homepage...");
        self.snapshot();
        Ok(sample_crawl(url))
    }
}

#[derive(Default)]
struct StubPageSpeed {
    calls: AtomicUsize,
}

#[async_trait]
impl PageSpeedProvider for StubPageSpeed {
    async fn analyze(&self, _url: &str) -> PageSpeedResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        PageSpeedResult {
            score: 92,
            lcp: 1800.0,
            cls: 0.02,
            ..PageSpeedResult::default()
        }
    }
}

#[derive(Default)]
struct CountingScorer {
    inner: ScoringEngine,
    calls: AtomicUsize,
}

impl Scorer for CountingScorer {
    fn score(&self, crawl: &CrawlResult, speed: &PageSpeedResult) -> AuditScores {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.score(crawl, speed)
    }
}

struct Harness {
    store: Arc<SqliteAuditStore>,
    page_speed: Arc<StubPageSpeed>,
    scorer: Arc<CountingScorer>,
    orchestrator: Arc<Orchestrator>,
}

fn harness_with(crawler: Arc<dyn Crawl>) -> Harness {
    let store = Arc::new(SqliteAuditStore::in_memory().expect("Failed to open store"));
    harness_on(store, crawler)
}

fn harness_on(store: Arc<SqliteAuditStore>, crawler: Arc<dyn Crawl>) -> Harness {
    let page_speed = Arc::new(StubPageSpeed::default());
    let scorer = Arc::new(CountingScorer::default());

    let orchestrator = Orchestrator::new(
        store.clone(),
        crawler,
        page_speed.clone(),
        scorer.clone(),
    )
    .with_config_hash(Some("abc123".to_string()));

    Harness {
        store,
        page_speed,
        scorer,
        orchestrator: Arc::new(orchestrator),
    }
}

fn queue(harness: &Harness, url: &str) -> Uuid {
    harness
        .orchestrator
        .submit(url, Some("owner@acme.example"))
        .expect("Failed to queue audit")
        .id
}

#[tokio::test]
async fn test_successful_audit_completes() {
    let crawler = StubCrawler::new(true);
    let harness = harness_with(crawler.clone());
    let id = queue(&harness, "acme.example");

    let status = harness.orchestrator.start(id).await.unwrap();
    assert_eq!(status, AuditStatus::Complete);

    let audit = harness.orchestrator.status(id).unwrap();
    assert_eq!(audit.status, AuditStatus::Complete);
    assert_eq!(audit.progress, 100);
    assert_eq!(audit.current_step, COMPLETE_STEP);
    assert!(audit.has_all_scores());
    assert!(audit.overall_score.is_some());
    assert!(audit.overall_grade.is_some());
    assert!(audit.error_message.is_none());
    assert!(audit.completed_at.is_some());

    let teaser = audit.teaser_data.expect("teaser stored");
    assert_eq!(teaser["url"], "https://acme.example/");
    assert_eq!(teaser["auditId"], id.to_string());
    assert!(teaser["topIssues"].as_array().unwrap().len() <= 3);

    let full = audit.full_data.expect("full report stored");
    assert_eq!(full["configHash"], "abc123");
    assert_eq!(full["crawl"]["pagesAnalyzed"], 1);
    assert_eq!(full["pageSpeed"]["score"], 92);

    assert_eq!(crawler.calls(), 1);
    assert_eq!(harness.page_speed.calls.load(Ordering::SeqCst), 1);
    assert_eq!(harness.scorer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unreachable_site_fails_without_scoring() {
    let crawler = StubCrawler::new(false);
    let harness = harness_with(crawler.clone());
    let id = queue(&harness, "https://unreachable.example");

    let status = harness.orchestrator.start(id).await.unwrap();
    assert_eq!(status, AuditStatus::Error);

    let audit = harness.orchestrator.status(id).unwrap();
    assert_eq!(audit.status, AuditStatus::Error);
    assert_eq!(audit.progress, 100);
    assert_eq!(audit.current_step, UNREACHABLE_STEP);
    assert_eq!(audit.error_message.as_deref(), Some(UNREACHABLE_ERROR));
    assert!(audit.overall_score.is_none());
    assert!(audit.teaser_data.is_none());

    assert_eq!(crawler.calls(), 1);
    assert_eq!(harness.page_speed.calls.load(Ordering::SeqCst), 0);
    assert_eq!(harness.scorer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unexpected_failure_is_recorded() {
    let harness = harness_with(Arc::new(BrokenCrawler));
    let id = queue(&harness, "acme.example");

    let status = harness.orchestrator.start(id).await.unwrap();
    assert_eq!(status, AuditStatus::Error);

    let audit = harness.orchestrator.status(id).unwrap();
    assert_eq!(audit.current_step, FAILURE_STEP);
    assert_eq!(audit.progress, 100);
    assert!(audit
        .error_message
        .as_deref()
        .unwrap_or_default()
        .contains("crawler exploded"));
    assert_eq!(harness.page_speed.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_running_audit_is_not_restarted() {
    let crawler = StubCrawler::new(true);
    let harness = harness_with(crawler.clone());
    let id = queue(&harness, "acme.example");

    assert!(harness.store.try_start(id, "Starting analysis...").unwrap());
    let before = harness.orchestrator.status(id).unwrap();

    let err = harness.orchestrator.start(id).await.unwrap_err();
    assert!(matches!(
        err,
        AuditError::NotStartable {
            status: AuditStatus::Running,
            ..
        }
    ));

    let after = harness.orchestrator.status(id).unwrap();
    assert_eq!(before, after);
    assert_eq!(crawler.calls(), 0);
}

#[tokio::test]
async fn test_complete_audit_is_not_rerun() {
    let crawler = StubCrawler::new(true);
    let harness = harness_with(crawler.clone());
    let id = queue(&harness, "acme.example");

    harness.orchestrator.start(id).await.unwrap();
    let before = harness.orchestrator.status(id).unwrap();

    let err = harness.orchestrator.start(id).await.unwrap_err();
    assert!(matches!(
        err,
        AuditError::NotStartable {
            status: AuditStatus::Complete,
            ..
        }
    ));

    assert_eq!(harness.orchestrator.status(id).unwrap(), before);
    assert_eq!(crawler.calls(), 1);
}

#[tokio::test]
async fn test_failed_audit_can_be_rerun() {
    let crawler = StubCrawler::new(false);
    let harness = harness_with(crawler.clone());
    let id = queue(&harness, "acme.example");

    assert_eq!(
        harness.orchestrator.start(id).await.unwrap(),
        AuditStatus::Error
    );

    crawler.reachable.store(true, Ordering::SeqCst);
    assert_eq!(
        harness.orchestrator.start(id).await.unwrap(),
        AuditStatus::Complete
    );

    let audit = harness.orchestrator.status(id).unwrap();
    assert_eq!(audit.status, AuditStatus::Complete);
    assert!(audit.error_message.is_none());
    assert!(audit.has_all_scores());
    assert_eq!(crawler.calls(), 2);
}

#[tokio::test]
async fn test_concurrent_starts_run_once() {
    let crawler = StubCrawler::with_delay(true, Duration::from_millis(20));
    let harness = harness_with(crawler.clone());
    let id = queue(&harness, "acme.example");

    let (first, second) = tokio::join!(
        harness.orchestrator.start(id),
        harness.orchestrator.start(id)
    );

    let outcomes = [first, second];
    let completed = outcomes
        .iter()
        .filter(|r| matches!(r, Ok(AuditStatus::Complete)))
        .count();
    let rejected = outcomes
        .iter()
        .filter(|r| matches!(r, Err(AuditError::NotStartable { .. })))
        .count();

    assert_eq!(completed, 1);
    assert_eq!(rejected, 1);
    assert_eq!(crawler.calls(), 1);
}

#[tokio::test]
async fn test_crawl_progress_is_persisted() {
    let store = Arc::new(SqliteAuditStore::in_memory().unwrap());
    let probe = Arc::new(ProbeCrawler {
        store: store.clone(),
        observed: Mutex::new(Vec::new()),
    });
    let harness = harness_on(store, probe.clone());
    let id = queue(&harness, "acme.example");

    harness.orchestrator.start(id).await.unwrap();

    let observed = probe.observed.lock().unwrap().clone();
    assert_eq!(
        observed,
        vec![
            (10, CRAWLING_STEP.to_string()),
            (10, "Crawling homepage...".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_start_unknown_audit() {
    let harness = harness_with(StubCrawler::new(true));

    let err = harness.orchestrator.start(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AuditError::NotFound(_)));
}

#[tokio::test]
async fn test_submit_normalizes_input() {
    let harness = harness_with(StubCrawler::new(true));

    let audit = harness
        .orchestrator
        .submit("  Acme.Example/pricing ", Some(" Owner@Acme.Example "))
        .unwrap();

    assert_eq!(audit.url, "https://acme.example/pricing");
    assert_eq!(audit.email.as_deref(), Some("owner@acme.example"));
    assert_eq!(audit.status, AuditStatus::Queued);
    assert_eq!(audit.progress, 0);
    assert_eq!(audit.current_step, QUEUED_STEP);

    let stored = harness.orchestrator.status(audit.id).unwrap();
    assert_eq!(stored, audit);
}

#[tokio::test]
async fn test_submit_rejects_invalid_input() {
    let harness = harness_with(StubCrawler::new(true));

    assert!(matches!(
        harness.orchestrator.submit("localhost", None),
        Err(AuditError::Url(_))
    ));
    assert!(matches!(
        harness.orchestrator.submit("", None),
        Err(AuditError::Url(_))
    ));
    assert!(matches!(
        harness.orchestrator.submit("acme.example", Some("not-an-email")),
        Err(AuditError::InvalidInput(_))
    ));

    let queued = harness
        .store
        .list_audits_by_status(AuditStatus::Queued, 10)
        .unwrap();
    assert!(queued.is_empty());
}

#[tokio::test]
async fn test_worker_drains_queue_with_bounded_concurrency() {
    let crawler = StubCrawler::with_delay(true, Duration::from_millis(20));
    let harness = harness_with(crawler.clone());

    let ids: Vec<Uuid> = (0..5)
        .map(|i| queue(&harness, &format!("site{}.example", i)))
        .collect();

    // Already running audits are not picked up
    let busy = queue(&harness, "busy.example");
    assert!(harness.store.try_start(busy, "Starting analysis...").unwrap());

    let worker = Worker::new(harness.orchestrator.clone(), 2);
    let report = worker.run_pending().await.unwrap();

    assert_eq!(report.completed, 5);
    assert_eq!(report.failed, 0);
    assert_eq!(report.rejected, 0);
    assert_eq!(crawler.calls(), 5);
    assert!(crawler.max_in_flight.load(Ordering::SeqCst) <= 2);

    for id in ids {
        assert_eq!(
            harness.orchestrator.status(id).unwrap().status,
            AuditStatus::Complete
        );
    }

    let queued = harness
        .store
        .list_audits_by_status(AuditStatus::Queued, 10)
        .unwrap();
    assert!(queued.is_empty());
    assert_eq!(
        harness.orchestrator.status(busy).unwrap().status,
        AuditStatus::Running
    );
}

#[tokio::test]
async fn test_worker_counts_failures() {
    let crawler = StubCrawler::new(false);
    let harness = harness_with(crawler.clone());

    queue(&harness, "first.example");
    queue(&harness, "second.example");

    let report = Worker::new(harness.orchestrator.clone(), 4)
        .run_pending()
        .await
        .unwrap();

    assert_eq!(report.completed, 0);
    assert_eq!(report.failed, 2);
    let failed = harness
        .store
        .list_audits_by_status(AuditStatus::Error, 10)
        .unwrap();
    assert_eq!(failed.len(), 2);
}
