//! Audit scoring
//!
//! Turns a crawl and its page-speed measurements into five category scores,
//! a weighted overall score, letter grades, and a severity-sorted issue
//! list. Scoring is pure: the same inputs always produce the same output.

mod categories;
mod grade;
mod types;

pub use categories::{
    score_content, score_geo, score_onpage, score_technical, score_visibility, CategoryScore,
    STATISTIC_PATTERN,
};
pub use grade::Grade;
pub use types::{
    AuditScores, AuditStats, CategoryGrades, FixDifficulty, Issue, IssueCategory, Severity,
};

use crate::config::ScoringConfig;
use crate::crawler::CrawlResult;
use crate::pagespeed::PageSpeedResult;

pub const GEO_WEIGHT: f64 = 0.30;
pub const TECHNICAL_WEIGHT: f64 = 0.25;
pub const CONTENT_WEIGHT: f64 = 0.20;
pub const VISIBILITY_WEIGHT: f64 = 0.15;
pub const ONPAGE_WEIGHT: f64 = 0.10;

/// Scores an audit; implemented by `ScoringEngine` and by test doubles
pub trait Scorer: Send + Sync {
    fn score(&self, crawl: &CrawlResult, speed: &PageSpeedResult) -> AuditScores;
}

/// The configured scoring engine
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }
}

impl Scorer for ScoringEngine {
    fn score(&self, crawl: &CrawlResult, speed: &PageSpeedResult) -> AuditScores {
        calculate_scores_with(crawl, speed, &self.config)
    }
}

/// Scores an audit with the default thresholds
pub fn calculate_scores(crawl: &CrawlResult, speed: &PageSpeedResult) -> AuditScores {
    calculate_scores_with(crawl, speed, &ScoringConfig::default())
}

/// Scores an audit
///
/// # Arguments
///
/// * `crawl` - The crawl result; an empty page list is allowed
/// * `speed` - Page-speed measurements (possibly the fallback values)
/// * `config` - Heuristic thresholds
pub fn calculate_scores_with(
    crawl: &CrawlResult,
    speed: &PageSpeedResult,
    config: &ScoringConfig,
) -> AuditScores {
    let (geo, geo_issues) = score_geo(crawl).finish();
    let (technical, technical_issues) = score_technical(crawl, speed).finish();
    let (content, content_issues) = score_content(crawl).finish();
    let (visibility, visibility_issues) = score_visibility(crawl).finish();
    let (onpage, onpage_issues) = score_onpage(crawl, config).finish();

    let mut issues: Vec<Issue> = geo_issues
        .into_iter()
        .chain(technical_issues)
        .chain(content_issues)
        .chain(visibility_issues)
        .chain(onpage_issues)
        .collect();

    // Stable: equal severities keep detection order
    issues.sort_by_key(|issue| issue.severity);

    let overall = overall_score(geo, technical, content, visibility, onpage);
    let quick_wins = issues.iter().filter(|i| i.is_quick_win()).count();

    AuditScores {
        geo,
        technical,
        content,
        visibility,
        onpage,
        overall,
        grade: Grade::from_score(overall),
        category_grades: CategoryGrades {
            geo: Grade::from_score(geo),
            technical: Grade::from_score(technical),
            content: Grade::from_score(content),
            visibility: Grade::from_score(visibility),
            onpage: Grade::from_score(onpage),
        },
        stats: AuditStats {
            total_issues: issues.len(),
            pages_analyzed: crawl.pages.len(),
            quick_wins,
            est_traffic_loss: estimated_traffic_loss(overall),
        },
        issues,
    }
}

/// Weighted average of the category scores, rounded
pub fn overall_score(geo: u32, technical: u32, content: u32, visibility: u32, onpage: u32) -> u32 {
    let weighted = f64::from(geo) * GEO_WEIGHT
        + f64::from(technical) * TECHNICAL_WEIGHT
        + f64::from(content) * CONTENT_WEIGHT
        + f64::from(visibility) * VISIBILITY_WEIGHT
        + f64::from(onpage) * ONPAGE_WEIGHT;

    weighted.round().clamp(0.0, 100.0) as u32
}

/// Rough traffic-opportunity estimate shown in the teaser, e.g. `"+450%"`
pub fn estimated_traffic_loss(overall: u32) -> String {
    let loss = (100 - i64::from(overall.min(100))).max(10);
    format!("+{}%", loss * 15)
}
