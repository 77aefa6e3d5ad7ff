//! URL handling module for RankSight
//!
//! This module provides submission-URL normalization, origin comparison, and
//! the small URL rewrites the crawler needs (fragment/query stripping, the
//! https → http downgrade, asset filtering).

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{same_origin, site_root};
pub use normalize::{downgrade_to_http, normalize_submission_url, strip_fragment_and_query};

use url::Url;

/// File extensions that are never crawled as pages
pub const ASSET_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "svg", "pdf", "zip", "css", "js"];

/// Returns true if the URL path ends in a binary or asset extension
///
/// Matching is case-insensitive and only considers the last path segment.
///
/// # Examples
///
/// ```
/// use ranksight::url::is_asset_url;
/// use url::Url;
///
/// assert!(is_asset_url(&Url::parse("https://example.com/logo.PNG").unwrap()));
/// assert!(!is_asset_url(&Url::parse("https://example.com/pricing").unwrap()));
/// ```
pub fn is_asset_url(url: &Url) -> bool {
    let last_segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");

    match last_segment.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_ascii_lowercase();
            ASSET_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}
