//! Sitemap discovery
//!
//! Only `/sitemap.xml` at the site root is checked. Both `<urlset>` and
//! `<sitemapindex>` documents are understood; index entries are counted as
//! URLs without being followed.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::types::SitemapSummary;
use scraper::{Html, Selector};
use url::Url;

/// Fetches and summarizes `/sitemap.xml`
///
/// Any fetch failure is reported as a missing sitemap.
///
/// # Arguments
///
/// * `fetcher` - The page fetcher to use
/// * `site_root` - The site root URL (`scheme://host/`)
/// * `max_urls` - How many `<loc>` values to keep in the summary
pub async fn fetch_sitemap(fetcher: &Fetcher, site_root: &Url, max_urls: usize) -> SitemapSummary {
    let sitemap_url = match site_root.join("/sitemap.xml") {
        Ok(url) => url,
        Err(_) => return SitemapSummary::missing(),
    };

    match fetcher.fetch(&sitemap_url).await {
        Ok(page) => {
            let summary = parse_sitemap(&page.body, max_urls);
            tracing::debug!("{} lists {} URLs", sitemap_url, summary.url_count);
            summary
        }
        Err(e) => {
            tracing::debug!("No usable sitemap at {}: {}", sitemap_url, e);
            SitemapSummary::missing()
        }
    }
}

/// Parses sitemap XML into a summary
///
/// `url_count` counts every non-empty `<loc>` under `<url>` or `<sitemap>`;
/// `urls` keeps only the first `max_urls` of them. A fetched document with
/// no locations still counts as existing.
pub fn parse_sitemap(xml: &str, max_urls: usize) -> SitemapSummary {
    let document = Html::parse_document(xml);
    let mut locations = Vec::new();

    for css in ["url > loc", "sitemap > loc"] {
        if let Ok(selector) = Selector::parse(css) {
            locations.extend(
                document
                    .select(&selector)
                    .map(|el| el.text().collect::<String>().trim().to_string())
                    .filter(|loc| !loc.is_empty()),
            );
        }
    }

    let url_count = locations.len();
    locations.truncate(max_urls);

    SitemapSummary {
        exists: true,
        url_count,
        urls: locations,
    }
}
