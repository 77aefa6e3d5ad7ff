use crate::{UrlError, UrlResult};
use url::Url;

/// Normalizes a user-submitted website address into an absolute URL
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; reject empty input
/// 2. Prefix `https://` when no http(s) scheme is present
/// 3. Parse the URL; reject if malformed
/// 4. Require an http or https scheme
/// 5. Require a hostname containing at least one dot
///
/// # Examples
///
/// ```
/// use ranksight::url::normalize_submission_url;
///
/// let url = normalize_submission_url("  example.com/pricing ").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/pricing");
///
/// assert!(normalize_submission_url("localhost").is_err());
/// ```
pub fn normalize_submission_url(input: &str) -> UrlResult<Url> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Parse("URL is required".to_string()));
    }

    let lower = trimmed.to_ascii_lowercase();
    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&candidate).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    let host = url.host_str().ok_or(UrlError::MissingDomain)?;
    if !host.contains('.') {
        return Err(UrlError::InvalidHostname(host.to_string()));
    }

    Ok(url)
}

/// Removes the fragment and query string from a URL
///
/// Internal links are deduplicated on this form.
pub fn strip_fragment_and_query(url: &Url) -> Url {
    let mut stripped = url.clone();
    stripped.set_fragment(None);
    stripped.set_query(None);
    stripped
}

/// Returns the `http://` equivalent of an `https://` URL
///
/// Returns None for any other scheme.
pub fn downgrade_to_http(url: &Url) -> Option<Url> {
    if url.scheme() != "https" {
        return None;
    }

    let mut downgraded = url.clone();
    downgraded.set_scheme("http").ok()?;
    Some(downgraded)
}
