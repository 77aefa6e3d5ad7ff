use serde::Deserialize;

/// Main configuration structure for RankSight
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(rename = "page-speed", default)]
    pub page_speed: PageSpeedConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub worker: WorkerConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of pages fetched per audit, homepage included
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Per-request timeout for page, robots.txt, and sitemap fetches (milliseconds)
    #[serde(rename = "fetch-timeout-ms")]
    pub fetch_timeout_ms: u64,

    /// Maximum number of sitemap URLs kept in the crawl result
    #[serde(rename = "max-sitemap-urls")]
    pub max_sitemap_urls: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 10,
            fetch_timeout_ms: 10_000,
            max_sitemap_urls: 50,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `Mozilla/5.0 (compatible; Name/Version; +ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "Mozilla/5.0 (compatible; {}/{}; +{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "RankSight-Audit".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://seo.impulsestudios.cc".to_string(),
        }
    }
}

/// Page-speed probe configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PageSpeedConfig {
    /// PageSpeed Insights endpoint
    pub endpoint: String,

    /// Lighthouse strategy ("mobile" or "desktop")
    pub strategy: String,

    /// Request timeout (milliseconds)
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Optional API key appended as the `key` query parameter
    #[serde(rename = "api-key")]
    pub api_key: Option<String>,
}

impl Default for PageSpeedConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://www.googleapis.com/pagespeedonline/v5/runPagespeed".to_string(),
            strategy: "mobile".to_string(),
            timeout_ms: 30_000,
            api_key: None,
        }
    }
}

/// Persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// Background worker configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Maximum number of audits running at the same time
    #[serde(rename = "max-concurrent-audits")]
    pub max_concurrent_audits: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_audits: 4,
        }
    }
}

/// Tunable thresholds used by the scoring engine
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Homepage titles longer than this are flagged as truncated
    #[serde(rename = "title-max-length")]
    pub title_max_length: usize,

    /// Homepages with fewer internal links than this are flagged
    #[serde(rename = "min-internal-links")]
    pub min_internal_links: usize,

    /// Number of issues copied into the teaser payload
    #[serde(rename = "teaser-issue-count")]
    pub teaser_issue_count: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            title_max_length: 60,
            min_internal_links: 5,
            teaser_issue_count: 3,
        }
    }
}
