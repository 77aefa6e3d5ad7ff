//! HTML parser for extracting SEO and AI-search signals
//!
//! Each extraction rule is independent of the others; the parser never
//! fails; missing or malformed markup simply yields empty values.

use crate::crawler::types::{
    Headings, ImageStats, LinkStats, PageRecord, RobotsMeta, THIN_CONTENT_WORDS,
};
use crate::url::{same_origin, strip_fragment_and_query};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use url::Url;

/// H2/H3 headings matching this pattern mark FAQ content
pub static FAQ_HEADING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)faq|question|q\s*&\s*a").expect("valid FAQ heading pattern"));

/// Lower-cased markup containing any of these marks FAQ content
pub const FAQ_MARKUP_NEEDLES: &[&str] = &["faq", "frequently asked"];

/// Schema.org types that mark FAQ content
pub const FAQ_SCHEMA_TYPES: &[&str] = &["FAQPage", "Question"];

/// Elements whose text never counts as visible words
const HIDDEN_TEXT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Link schemes that are neither internal nor external
const IGNORED_LINK_PREFIXES: &[&str] = &["mailto:", "tel:", "javascript:"];

/// A parsed page plus the internal links discovered on it
#[derive(Debug, Clone)]
pub struct ParsedPage {
    pub record: PageRecord,
    /// Same-origin links, fragment and query stripped, deduplicated,
    /// excluding the page itself, in document order
    pub internal_links: Vec<Url>,
}

/// Parses a fetched page into a `PageRecord`
///
/// The returned record has status 200; callers overwrite it with the real
/// response status.
///
/// # Arguments
///
/// * `html` - The raw page markup
/// * `page_url` - The page's URL, used to resolve relative links
/// * `site_root` - The audited site's root; links on its origin are internal
///
/// # Example
///
/// ```
/// use ranksight::crawler::parse_page;
/// use url::Url;
///
/// let html = r#"<html><head><title>Acme Plumbing</title></head>
///     <body><a href="/services">Services</a></body></html>"#;
/// let url = Url::parse("https://acme.example/").unwrap();
/// let parsed = parse_page(html, &url, &url);
/// assert_eq!(parsed.record.title.as_deref(), Some("Acme Plumbing"));
/// assert_eq!(parsed.record.links.internal, 1);
/// assert_eq!(parsed.internal_links[0].as_str(), "https://acme.example/services");
/// ```
pub fn parse_page(html: &str, page_url: &Url, site_root: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    let headings = extract_headings(&document);
    let schema_markup = extract_structured_data(&document, page_url);
    let (links, internal_links) = extract_links(&document, page_url, site_root);
    let word_count = visible_word_count(&document);
    let has_faq_content = detect_faq(&document, html, &headings, &schema_markup);

    let robots_content = meta_content(&document, "robots")
        .unwrap_or_default()
        .to_ascii_lowercase();

    let record = PageRecord {
        url: page_url.to_string(),
        status: 200,
        title: extract_title(&document),
        meta_description: meta_content(&document, "description"),
        og_tags: extract_og_tags(&document),
        canonical: extract_canonical(&document),
        headings,
        images: count_images(&document),
        links,
        word_count,
        is_thin_content: word_count < THIN_CONTENT_WORDS,
        has_faq_content,
        schema_markup,
        robots_meta: RobotsMeta {
            noindex: robots_content.contains("noindex"),
            nofollow: robots_content.contains("nofollow"),
        },
    };

    ParsedPage {
        record,
        internal_links,
    }
}

/// Selects all elements matching a CSS selector
fn select_all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Extracts the first `<title>` text
fn extract_title(document: &Html) -> Option<String> {
    select_all(document, "title")
        .first()
        .map(element_text)
        .filter(|s| !s.is_empty())
}

/// Returns the trimmed `content` of the first `<meta name=...>` with the given name
fn meta_content(document: &Html, name: &str) -> Option<String> {
    select_all(document, "meta[name]")
        .into_iter()
        .find(|el| {
            el.value()
                .attr("name")
                .is_some_and(|n| n.trim().eq_ignore_ascii_case(name))
        })
        .and_then(|el| el.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn extract_og_tags(document: &Html) -> BTreeMap<String, String> {
    let mut tags = BTreeMap::new();

    for el in select_all(document, "meta[property]") {
        let (Some(property), Some(content)) =
            (el.value().attr("property"), el.value().attr("content"))
        else {
            continue;
        };

        let property = property.trim().to_ascii_lowercase();
        let content = content.trim();
        if property.starts_with("og:") && !content.is_empty() {
            tags.insert(property, content.to_string());
        }
    }

    tags
}

fn extract_canonical(document: &Html) -> Option<String> {
    select_all(document, "link[rel][href]")
        .into_iter()
        .find(|el| {
            el.value().attr("rel").is_some_and(|rel| {
                rel.split_ascii_whitespace()
                    .any(|token| token.eq_ignore_ascii_case("canonical"))
            })
        })
        .and_then(|el| el.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Collects non-empty heading text per level, in document order
fn extract_headings(document: &Html) -> Headings {
    let mut headings = Headings::default();

    for level in 1..=6u8 {
        let texts: Vec<String> = select_all(document, &format!("h{}", level))
            .iter()
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect();

        if let Some(slot) = headings.level_mut(level) {
            *slot = texts;
        }
    }

    headings
}

/// Counts images; an image has alt text only if the attribute is non-blank
fn count_images(document: &Html) -> ImageStats {
    let mut stats = ImageStats::default();

    for img in select_all(document, "img") {
        stats.total += 1;
        if img.value().attr("alt").is_some_and(|alt| !alt.trim().is_empty()) {
            stats.with_alt += 1;
        } else {
            stats.without_alt += 1;
        }
    }

    stats
}

/// Counts internal/external links and builds the internal discovery list
fn extract_links(document: &Html, page_url: &Url, site_root: &Url) -> (LinkStats, Vec<Url>) {
    let own_url = strip_fragment_and_query(page_url);
    let mut stats = LinkStats::default();
    let mut discovered: Vec<Url> = Vec::new();

    for el in select_all(document, "a[href]") {
        let Some(resolved) = el.value().attr("href").and_then(|href| resolve_link(href, page_url))
        else {
            continue;
        };

        if same_origin(&resolved, site_root) {
            stats.internal += 1;

            let stripped = strip_fragment_and_query(&resolved);
            if stripped != own_url && !discovered.contains(&stripped) {
                discovered.push(stripped);
            }
        } else if matches!(resolved.scheme(), "http" | "https") {
            stats.external += 1;
        }
    }

    (stats, discovered)
}

/// Resolves an href against the page URL
///
/// Returns None for empty, fragment-only, `mailto:`, `tel:`, and
/// `javascript:` links, and for hrefs that fail to resolve.
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if IGNORED_LINK_PREFIXES
        .iter()
        .any(|prefix| lower.starts_with(prefix))
    {
        return None;
    }

    base_url.join(href).ok()
}

/// Counts whitespace-separated words in the visible body text
fn visible_word_count(document: &Html) -> usize {
    let Some(body) = select_all(document, "body").into_iter().next() else {
        return 0;
    };

    let mut text = String::new();
    for node in body.descendants() {
        let Some(chunk) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_TEXT_ELEMENTS.contains(&el.name()))
        });

        if !hidden {
            text.push_str(chunk);
        }
    }

    text.split_whitespace().count()
}

/// Parses every JSON-LD block independently; malformed blocks are skipped
fn extract_structured_data(document: &Html, page_url: &Url) -> Vec<Value> {
    select_all(document, "script[type]")
        .into_iter()
        .filter(|el| {
            el.value()
                .attr("type")
                .is_some_and(|t| t.trim().eq_ignore_ascii_case("application/ld+json"))
        })
        .filter_map(|el| {
            let raw = el.text().collect::<String>();
            match serde_json::from_str::<Value>(raw.trim()) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::debug!("Skipping malformed JSON-LD on {}: {}", page_url, e);
                    None
                }
            }
        })
        .collect()
}

/// Returns true if a JSON-LD value declares one of the given `@type`s anywhere
fn schema_declares_type(value: &Value, types: &[&str]) -> bool {
    match value {
        Value::Object(map) => {
            let own = match map.get("@type") {
                Some(Value::String(t)) => types.contains(&t.as_str()),
                Some(Value::Array(items)) => items
                    .iter()
                    .any(|item| item.as_str().is_some_and(|t| types.contains(&t))),
                _ => false,
            };
            own || map.values().any(|v| schema_declares_type(v, types))
        }
        Value::Array(items) => items.iter().any(|v| schema_declares_type(v, types)),
        _ => false,
    }
}

/// Permissive FAQ heuristic: any single signal is enough
fn detect_faq(document: &Html, html: &str, headings: &Headings, schema: &[Value]) -> bool {
    if schema
        .iter()
        .any(|block| schema_declares_type(block, FAQ_SCHEMA_TYPES))
    {
        return true;
    }

    let microdata = select_all(document, "[itemtype]").iter().any(|el| {
        el.value().attr("itemtype").is_some_and(|itemtype| {
            FAQ_SCHEMA_TYPES.iter().any(|t| itemtype.contains(t))
        })
    });
    if microdata {
        return true;
    }

    if !select_all(document, "details").is_empty() {
        return true;
    }

    let lower = html.to_lowercase();
    if FAQ_MARKUP_NEEDLES.iter().any(|needle| lower.contains(needle)) {
        return true;
    }

    headings
        .h2
        .iter()
        .chain(headings.h3.iter())
        .any(|heading| FAQ_HEADING_PATTERN.is_match(heading))
}
