//! Robots.txt handling module
//!
//! Audits don't obey robots.txt, they report on it: the summary records
//! whether the file exists and which of the tracked search and AI crawlers
//! it shuts out of the whole site.

mod parser;

pub use parser::{parse_robots, RobotsSummary, TRACKED_BOTS};

use crate::crawler::Fetcher;
use url::Url;

/// Fetches and summarizes robots.txt for a site
///
/// Any fetch failure (timeout, network error, non-2xx status) is reported as
/// a missing file rather than an error.
///
/// # Arguments
///
/// * `fetcher` - The page fetcher to use
/// * `site_root` - The site root URL (`scheme://host/`)
pub async fn fetch_robots(fetcher: &Fetcher, site_root: &Url) -> RobotsSummary {
    let robots_url = match site_root.join("/robots.txt") {
        Ok(url) => url,
        Err(_) => return RobotsSummary::missing(),
    };

    match fetcher.fetch(&robots_url).await {
        Ok(page) => {
            let summary = parse_robots(&page.body);
            tracing::debug!(
                "robots.txt at {} blocks {:?}",
                robots_url,
                summary.blocked_bots
            );
            summary
        }
        Err(e) => {
            tracing::debug!("No usable robots.txt at {}: {}", robots_url, e);
            RobotsSummary::missing()
        }
    }
}
