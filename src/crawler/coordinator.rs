//! Site crawl coordination
//!
//! A crawl is small and bounded: robots.txt and the sitemap are fetched
//! concurrently, then the homepage, then up to `max-pages - 1` internal
//! pages discovered on the homepage, one at a time. Individual page
//! failures never abort the crawl.

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::parse_page;
use crate::crawler::sitemap::fetch_sitemap;
use crate::crawler::types::CrawlResult;
use crate::robots::fetch_robots;
use crate::url::{is_asset_url, site_root};
use async_trait::async_trait;
use url::Url;

/// Callback receiving human-readable crawl progress messages
pub type ProgressFn<'a> = &'a (dyn Fn(&str) + Send + Sync);

/// Anything that can produce a `CrawlResult` for a URL
///
/// The orchestrator depends on this trait rather than on `SiteCrawler` so
/// tests can substitute a canned crawl.
#[async_trait]
pub trait Crawl: Send + Sync {
    /// Crawls the site at `url`, reporting progress through `progress`
    async fn crawl(&self, url: &Url, progress: ProgressFn<'_>) -> crate::Result<CrawlResult>;
}

/// The HTTP-backed site crawler
pub struct SiteCrawler {
    fetcher: Fetcher,
    config: CrawlerConfig,
}

impl SiteCrawler {
    /// Creates a crawler from the application configuration
    pub fn new(config: &Config) -> crate::Result<Self> {
        let fetcher = Fetcher::new(&config.crawler, &config.user_agent)?;
        Ok(Self::with_fetcher(fetcher, config.crawler.clone()))
    }

    /// Creates a crawler around an existing fetcher
    pub fn with_fetcher(fetcher: Fetcher, config: CrawlerConfig) -> Self {
        Self { fetcher, config }
    }

    /// Crawls a site
    ///
    /// # Progress messages
    ///
    /// 1. `Checking robots.txt and sitemap...`
    /// 2. `Crawling homepage...`
    /// 3. `Crawling page {i}/{n}...` for each secondary page, `i` starting at 2
    ///
    /// # Returns
    ///
    /// A `CrawlResult` whose `pages` is empty if the homepage could not be
    /// fetched. `ssl` reflects the scheme the homepage was finally served
    /// over, or the requested scheme when the homepage failed.
    pub async fn crawl_site(&self, start_url: &Url, progress: ProgressFn<'_>) -> CrawlResult {
        let root = site_root(start_url);

        progress("Checking robots.txt and sitemap...");
        let (robots_txt, sitemap) = tokio::join!(
            fetch_robots(&self.fetcher, &root),
            fetch_sitemap(&self.fetcher, &root, self.config.max_sitemap_urls),
        );

        progress("Crawling homepage...");
        let homepage = match self.fetcher.fetch(start_url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Homepage fetch failed for {}: {}", start_url, e);
                return CrawlResult {
                    pages: Vec::new(),
                    robots_txt,
                    sitemap,
                    ssl: start_url.scheme() == "https",
                };
            }
        };

        let ssl = homepage.final_url.scheme() == "https";
        let origin = site_root(&homepage.final_url);

        let parsed = parse_page(&homepage.body, &homepage.final_url, &origin);
        let mut home_record = parsed.record;
        home_record.status = homepage.status;

        let to_crawl = select_secondary_pages(parsed.internal_links, self.config.max_pages);
        tracing::debug!(
            "{} discovered {} secondary pages to crawl",
            homepage.final_url,
            to_crawl.len()
        );

        let total = to_crawl.len() + 1;
        let mut pages = Vec::with_capacity(total);
        pages.push(home_record);

        for (i, url) in to_crawl.iter().enumerate() {
            progress(&format!("Crawling page {}/{}...", i + 2, total));

            match self.fetcher.fetch(url).await {
                Ok(page) => {
                    let mut record = parse_page(&page.body, &page.final_url, &origin).record;
                    record.status = page.status;
                    pages.push(record);
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", url, e);
                }
            }
        }

        tracing::info!("Crawled {} of {} pages for {}", pages.len(), total, origin);

        CrawlResult {
            pages,
            robots_txt,
            sitemap,
            ssl,
        }
    }
}

#[async_trait]
impl Crawl for SiteCrawler {
    async fn crawl(&self, url: &Url, progress: ProgressFn<'_>) -> crate::Result<CrawlResult> {
        Ok(self.crawl_site(url, progress).await)
    }
}

/// Picks the secondary pages to crawl from homepage discovery order
///
/// Asset URLs are dropped, then the list is capped so that the homepage
/// plus the secondary pages never exceed `max_pages`.
pub fn select_secondary_pages(discovered: Vec<Url>, max_pages: usize) -> Vec<Url> {
    discovered
        .into_iter()
        .filter(|url| !is_asset_url(url))
        .take(max_pages.saturating_sub(1))
        .collect()
}
