//! Data produced by a crawl
//!
//! Field names serialize in camelCase: the report renderer consumes these
//! shapes directly.

use crate::robots::RobotsSummary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pages with fewer visible words than this are thin content
pub const THIN_CONTENT_WORDS: usize = 300;

/// SEO and AI-search signals extracted from one fetched page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    pub url: String,
    pub status: u16,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    /// `og:*` property → content
    pub og_tags: BTreeMap<String, String>,
    pub canonical: Option<String>,
    pub headings: Headings,
    pub images: ImageStats,
    pub links: LinkStats,
    pub word_count: usize,
    pub is_thin_content: bool,
    pub has_faq_content: bool,
    /// Every JSON-LD block that parsed
    pub schema_markup: Vec<serde_json::Value>,
    pub robots_meta: RobotsMeta,
}

/// Heading text per level, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headings {
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,
    pub h4: Vec<String>,
    pub h5: Vec<String>,
    pub h6: Vec<String>,
}

impl Headings {
    /// Mutable access to a heading level (1–6)
    pub fn level_mut(&mut self, level: u8) -> Option<&mut Vec<String>> {
        match level {
            1 => Some(&mut self.h1),
            2 => Some(&mut self.h2),
            3 => Some(&mut self.h3),
            4 => Some(&mut self.h4),
            5 => Some(&mut self.h5),
            6 => Some(&mut self.h6),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageStats {
    pub total: usize,
    pub with_alt: usize,
    pub without_alt: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStats {
    pub internal: usize,
    pub external: usize,
}

/// Flags from `<meta name="robots">`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotsMeta {
    pub noindex: bool,
    pub nofollow: bool,
}

/// What the site's sitemap.xml contains
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapSummary {
    pub exists: bool,
    /// Every `<loc>` found, before capping
    pub url_count: usize,
    /// The first captured URLs
    pub urls: Vec<String>,
}

impl SitemapSummary {
    /// Summary for a site without a usable sitemap
    pub fn missing() -> Self {
        Self::default()
    }
}

/// Everything a crawl learned about a site
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResult {
    /// Fetched pages, homepage first; empty when the homepage failed
    pub pages: Vec<PageRecord>,
    pub robots_txt: RobotsSummary,
    pub sitemap: SitemapSummary,
    pub ssl: bool,
}

impl CrawlResult {
    /// The homepage record, if the homepage was fetched
    pub fn homepage(&self) -> Option<&PageRecord> {
        self.pages.first()
    }
}
