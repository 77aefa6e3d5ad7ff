//! Report payloads stored with a completed audit
//!
//! `TeaserData` is the free summary; `FullReport` carries everything the
//! paid report renderer needs. Both serialize with camelCase keys.

use crate::crawler::{CrawlResult, Headings, ImageStats, LinkStats, PageRecord, RobotsMeta};
use crate::pagespeed::PageSpeedResult;
use crate::robots::RobotsSummary;
use crate::scoring::{AuditScores, AuditStats, Grade, Issue, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Human date shown on reports, e.g. "October 16, 2026"
pub fn report_date(at: &DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub score: u32,
    pub grade: Grade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeaserCategories {
    pub geo: CategorySummary,
    pub technical: CategorySummary,
    pub content: CategorySummary,
    pub visibility: CategorySummary,
    pub onpage: CategorySummary,
}

/// An issue as shown in the teaser; fix difficulty is withheld
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeaserIssue {
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub impact: String,
}

impl From<&Issue> for TeaserIssue {
    fn from(issue: &Issue) -> Self {
        Self {
            severity: issue.severity,
            title: issue.title.clone(),
            description: issue.description.clone(),
            impact: issue.impact.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeaserData {
    pub url: String,
    pub date: String,
    pub overall_score: u32,
    pub overall_grade: Grade,
    pub categories: TeaserCategories,
    /// The most severe issues, in sorted order
    pub top_issues: Vec<TeaserIssue>,
    pub stats: AuditStats,
    pub audit_id: Uuid,
}

impl TeaserData {
    /// Builds the teaser from a scored audit
    ///
    /// # Arguments
    ///
    /// * `audit_id` - The audit the teaser belongs to
    /// * `url` - The audited URL as submitted
    /// * `scores` - The audit's scores; issues must already be sorted
    /// * `issue_count` - How many top issues to include
    /// * `generated_at` - Timestamp rendered as the report date
    pub fn build(
        audit_id: Uuid,
        url: &str,
        scores: &AuditScores,
        issue_count: usize,
        generated_at: &DateTime<Utc>,
    ) -> Self {
        let summary = |score: u32, grade: Grade| CategorySummary { score, grade };
        let grades = &scores.category_grades;

        Self {
            url: url.to_string(),
            date: report_date(generated_at),
            overall_score: scores.overall,
            overall_grade: scores.grade,
            categories: TeaserCategories {
                geo: summary(scores.geo, grades.geo),
                technical: summary(scores.technical, grades.technical),
                content: summary(scores.content, grades.content),
                visibility: summary(scores.visibility, grades.visibility),
                onpage: summary(scores.onpage, grades.onpage),
            },
            top_issues: scores
                .issues
                .iter()
                .take(issue_count)
                .map(TeaserIssue::from)
                .collect(),
            stats: scores.stats.clone(),
            audit_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapOverview {
    pub exists: bool,
    pub url_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingOverview {
    pub h1: Vec<String>,
    pub h2_count: usize,
}

impl From<&Headings> for HeadingOverview {
    fn from(headings: &Headings) -> Self {
        Self {
            h1: headings.h1.clone(),
            h2_count: headings.h2.len(),
        }
    }
}

/// Per-page facts shown in the full report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageOverview {
    pub url: String,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub word_count: usize,
    pub is_thin_content: bool,
    pub has_faq_content: bool,
    pub schema_count: usize,
    pub images: ImageStats,
    pub links: LinkStats,
    pub headings: HeadingOverview,
    pub robots_meta: RobotsMeta,
}

impl From<&PageRecord> for PageOverview {
    fn from(page: &PageRecord) -> Self {
        Self {
            url: page.url.clone(),
            title: page.title.clone(),
            meta_description: page.meta_description.clone(),
            word_count: page.word_count,
            is_thin_content: page.is_thin_content,
            has_faq_content: page.has_faq_content,
            schema_count: page.schema_markup.len(),
            images: page.images,
            links: page.links,
            headings: HeadingOverview::from(&page.headings),
            robots_meta: page.robots_meta,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlOverview {
    pub pages_analyzed: usize,
    pub robots_txt: RobotsSummary,
    pub sitemap: SitemapOverview,
    pub ssl: bool,
    pub pages: Vec<PageOverview>,
}

impl From<&CrawlResult> for CrawlOverview {
    fn from(crawl: &CrawlResult) -> Self {
        Self {
            pages_analyzed: crawl.pages.len(),
            robots_txt: crawl.robots_txt.clone(),
            sitemap: SitemapOverview {
                exists: crawl.sitemap.exists,
                url_count: crawl.sitemap.url_count,
            },
            ssl: crawl.ssl,
            pages: crawl.pages.iter().map(PageOverview::from).collect(),
        }
    }
}

/// Everything the full report renderer consumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullReport {
    #[serde(rename = "onpage_score")]
    pub onpage_score: u32,
    pub crawl: CrawlOverview,
    pub page_speed: PageSpeedResult,
    pub scores: AuditScores,
    pub issues: Vec<Issue>,
    /// Hash of the configuration the audit ran with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_hash: Option<String>,
}

impl FullReport {
    pub fn build(
        crawl: &CrawlResult,
        page_speed: &PageSpeedResult,
        scores: &AuditScores,
        config_hash: Option<String>,
    ) -> Self {
        Self {
            onpage_score: scores.onpage,
            crawl: CrawlOverview::from(crawl),
            page_speed: page_speed.clone(),
            scores: scores.clone(),
            issues: scores.issues.clone(),
            config_hash,
        }
    }
}
