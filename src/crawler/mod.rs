//! Crawler module for auditing a website
//!
//! This module contains the crawl logic, including:
//! - HTTP fetching with a TLS downgrade retry
//! - HTML parsing into SEO and AI-search signals
//! - Sitemap discovery
//! - Bounded crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod sitemap;
mod types;

pub use coordinator::{select_secondary_pages, Crawl, ProgressFn, SiteCrawler};
pub use fetcher::{build_http_client, FetchError, FetchedPage, Fetcher};
pub use parser::{parse_page, ParsedPage, FAQ_HEADING_PATTERN};
pub use sitemap::{fetch_sitemap, parse_sitemap};
pub use types::{
    CrawlResult, Headings, ImageStats, LinkStats, PageRecord, RobotsMeta, SitemapSummary,
    THIN_CONTENT_WORDS,
};
