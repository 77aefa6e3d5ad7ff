//! Per-category scoring rules
//!
//! Every category starts at 100 and loses points for each finding; each
//! finding also produces an `Issue`. Scores are clamped to 0–100.

use crate::config::ScoringConfig;
use crate::crawler::CrawlResult;
use crate::pagespeed::PageSpeedResult;
use crate::scoring::types::{FixDifficulty, Issue, IssueCategory, Severity};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Title or description text matching this counts as a quotable statistic
pub static STATISTIC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+%|\$\d+|\d+ (out of|percent|million|billion)")
        .expect("valid statistic pattern")
});

/// A category score being accumulated
#[derive(Debug)]
pub struct CategoryScore {
    category: IssueCategory,
    score: i64,
    issues: Vec<Issue>,
}

impl CategoryScore {
    fn new(category: IssueCategory) -> Self {
        Self {
            category,
            score: 100,
            issues: Vec::new(),
        }
    }

    fn penalize(
        &mut self,
        points: i64,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
        impact: impl Into<String>,
        fix_difficulty: FixDifficulty,
    ) {
        self.score -= points;
        self.issues.push(Issue::new(
            self.category,
            severity,
            title,
            description,
            impact,
            fix_difficulty,
        ));
    }

    /// The clamped score and the issues found, in detection order
    pub fn finish(self) -> (u32, Vec<Issue>) {
        (self.score.clamp(0, 100) as u32, self.issues)
    }
}

/// AI-search readiness: crawler access, structured data, FAQ content, statistics
pub fn score_geo(crawl: &CrawlResult) -> CategoryScore {
    let mut geo = CategoryScore::new(IssueCategory::Geo);
    let pages = &crawl.pages;

    if crawl.robots_txt.blocks_gpt_bot {
        geo.penalize(
            30,
            Severity::Critical,
            "Your robots.txt blocks GPTBot",
            "ChatGPT cannot crawl your website. You are completely invisible to ChatGPT Search.",
            "Invisible to 100M+ ChatGPT users",
            FixDifficulty::Easy,
        );
    }

    if crawl.robots_txt.blocks_claude_bot {
        geo.penalize(
            15,
            Severity::High,
            "Your robots.txt blocks ClaudeBot",
            "Claude AI cannot access your site content.",
            "Missing AI search traffic from Claude",
            FixDifficulty::Easy,
        );
    }

    if !pages.iter().any(|p| !p.schema_markup.is_empty()) {
        geo.penalize(
            25,
            Severity::Critical,
            "No structured data (Schema.org) found",
            "AI search engines cannot understand what your business does, offers, or where it's located.",
            "AI cannot categorize your business",
            FixDifficulty::Medium,
        );
    }

    if !pages.iter().any(|p| p.has_faq_content) {
        geo.penalize(
            15,
            Severity::Medium,
            "No FAQ or Q&A content detected",
            "FAQ content is the #1 format AI search engines cite. Without it, your content is less likely to be quoted.",
            "Lower AI citation probability",
            FixDifficulty::Easy,
        );
    }

    let has_statistics = pages.iter().any(|p| {
        let text = format!(
            "{} {}",
            p.title.as_deref().unwrap_or_default(),
            p.meta_description.as_deref().unwrap_or_default()
        );
        STATISTIC_PATTERN.is_match(&text)
    });
    if !has_statistics {
        geo.penalize(
            10,
            Severity::Low,
            "No quotable statistics found",
            "Content with specific numbers and statistics is 3x more likely to be cited by AI.",
            "Lower content citability",
            FixDifficulty::Easy,
        );
    }

    geo
}

/// Technical health: HTTPS, page speed, layout shift, crawl-control files
pub fn score_technical(crawl: &CrawlResult, speed: &PageSpeedResult) -> CategoryScore {
    let mut technical = CategoryScore::new(IssueCategory::Technical);

    if !crawl.ssl {
        technical.penalize(
            20,
            Severity::Critical,
            "No SSL certificate (HTTP only)",
            "Your site is not secure. Google penalizes HTTP sites and browsers show security warnings.",
            "Ranking penalty + user trust loss",
            FixDifficulty::Medium,
        );
    }

    if speed.score < 50 {
        let bounce = ((1.0 - f64::from(speed.score) / 100.0) * 50.0).round();
        technical.penalize(
            25,
            Severity::Critical,
            format!("Very slow page load (Performance: {}/100)", speed.score),
            format!(
                "Your site scored {}/100 on Google PageSpeed. LCP: {:.1}s (target: <2.5s).",
                speed.score,
                speed.lcp / 1000.0
            ),
            format!("~{}% of visitors leave before page loads", bounce),
            FixDifficulty::Hard,
        );
    } else if speed.score < 75 {
        technical.penalize(
            15,
            Severity::High,
            format!("Slow page load (Performance: {}/100)", speed.score),
            format!(
                "LCP: {:.1}s, FCP: {:.1}s. Google recommends LCP under 2.5s.",
                speed.lcp / 1000.0,
                speed.fcp / 1000.0
            ),
            "Slower pages rank lower and lose visitors",
            FixDifficulty::Medium,
        );
    }

    if speed.cls > 0.25 {
        technical.penalize(
            10,
            Severity::High,
            format!("High layout shift (CLS: {:.2})", speed.cls),
            "Elements jump around as your page loads, causing poor user experience.",
            "Core Web Vitals failure",
            FixDifficulty::Medium,
        );
    }

    if !crawl.robots_txt.exists {
        technical.penalize(
            5,
            Severity::Low,
            "No robots.txt file found",
            "A robots.txt file helps search engines crawl your site efficiently.",
            "Minor crawl efficiency issue",
            FixDifficulty::Easy,
        );
    }

    if !crawl.sitemap.exists {
        technical.penalize(
            10,
            Severity::Medium,
            "No sitemap.xml found",
            "A sitemap helps search engines discover all your pages. Without one, some pages may never be indexed.",
            "Pages may not be indexed",
            FixDifficulty::Easy,
        );
    }

    technical
}

/// Content quality: thin pages, descriptions, H1s, image alt text
pub fn score_content(crawl: &CrawlResult) -> CategoryScore {
    let mut content = CategoryScore::new(IssueCategory::Content);
    let pages = &crawl.pages;

    let thin: Vec<&str> = pages
        .iter()
        .filter(|p| p.is_thin_content)
        .map(|p| p.url.as_str())
        .collect();
    if !thin.is_empty() {
        let paths: Vec<String> = thin.iter().map(|url| url_path(url)).collect();
        let severity = if thin.len() > 3 {
            Severity::Critical
        } else {
            Severity::High
        };
        content.penalize(
            (thin.len() as i64 * 10).min(30),
            severity,
            format!("{} thin content page(s) (<300 words)", thin.len()),
            format!(
                "Pages with minimal content signal low quality to search engines. Affected: {}",
                paths.join(", ")
            ),
            "Pages may be considered low quality",
            FixDifficulty::Medium,
        );
    }

    let no_description = pages.iter().filter(|p| p.meta_description.is_none()).count();
    if no_description > 0 {
        content.penalize(
            (no_description as i64 * 5).min(20),
            Severity::Medium,
            format!("{} page(s) missing meta descriptions", no_description),
            "Search engines write your page descriptions for you, often poorly.",
            "Lower click-through rates from search results",
            FixDifficulty::Easy,
        );
    }

    let no_h1 = pages.iter().filter(|p| p.headings.h1.is_empty()).count();
    if no_h1 > 0 {
        content.penalize(
            (no_h1 as i64 * 5).min(15),
            Severity::Medium,
            format!("{} page(s) missing H1 headings", no_h1),
            "H1 tags tell search engines what your page is about.",
            "Weaker page topic signals",
            FixDifficulty::Easy,
        );
    }

    let total_images: usize = pages.iter().map(|p| p.images.total).sum();
    let missing_alt: usize = pages.iter().map(|p| p.images.without_alt).sum();
    if missing_alt > 0 && total_images > 0 {
        let ratio = missing_alt as f64 / total_images as f64;
        if ratio > 0.5 {
            content.penalize(
                15,
                Severity::High,
                format!("{} of {} images missing alt text", missing_alt, total_images),
                "Alt text helps search engines understand images and improves accessibility.",
                "Missing image search traffic + accessibility issues",
                FixDifficulty::Easy,
            );
        } else if ratio > 0.2 {
            content.penalize(
                8,
                Severity::Medium,
                format!("{} images missing alt text", missing_alt),
                "Some images lack descriptive alt text.",
                "Reduced image search visibility",
                FixDifficulty::Easy,
            );
        }
    }

    content
}

/// Search visibility: indexability, canonicals, Open Graph, sitemap coverage
pub fn score_visibility(crawl: &CrawlResult) -> CategoryScore {
    let mut visibility = CategoryScore::new(IssueCategory::Visibility);
    let pages = &crawl.pages;

    let noindex = pages.iter().filter(|p| p.robots_meta.noindex).count();
    if noindex > 0 && noindex as f64 / pages.len() as f64 > 0.5 {
        visibility.penalize(
            30,
            Severity::Critical,
            format!("{} page(s) blocked from indexing (noindex)", noindex),
            "These pages will never appear in search results.",
            "Pages invisible to search engines",
            FixDifficulty::Easy,
        );
    }

    let no_canonical = pages.iter().filter(|p| p.canonical.is_none()).count();
    if no_canonical as f64 > pages.len() as f64 / 2.0 && pages.len() > 1 {
        visibility.penalize(
            10,
            Severity::Low,
            "Most pages missing canonical tags",
            "Canonical tags prevent duplicate content issues.",
            "Potential duplicate content problems",
            FixDifficulty::Easy,
        );
    }

    let no_og = pages.iter().filter(|p| p.og_tags.is_empty()).count();
    if no_og > 0 {
        visibility.penalize(
            (no_og as i64 * 5).min(15),
            Severity::Low,
            format!("{} page(s) missing Open Graph tags", no_og),
            "OG tags control how your pages appear when shared on social media.",
            "Poor social media previews",
            FixDifficulty::Easy,
        );
    }

    if crawl.sitemap.exists && crawl.sitemap.url_count < pages.len() {
        visibility.penalize(
            10,
            Severity::Medium,
            "Sitemap doesn't include all pages",
            format!(
                "Your sitemap has {} URLs but we found {} pages.",
                crawl.sitemap.url_count,
                pages.len()
            ),
            "Some pages may not be discovered",
            FixDifficulty::Easy,
        );
    }

    if crawl.robots_txt.blocks_googlebot {
        visibility.penalize(
            40,
            Severity::Critical,
            "robots.txt blocks Googlebot",
            "Google cannot crawl your website at all. You are invisible to Google Search.",
            "Zero Google organic traffic",
            FixDifficulty::Easy,
        );
    }

    visibility
}

/// On-page SEO, judged on the homepage only
pub fn score_onpage(crawl: &CrawlResult, config: &ScoringConfig) -> CategoryScore {
    let mut onpage = CategoryScore::new(IssueCategory::Onpage);

    let Some(homepage) = crawl.homepage() else {
        return onpage;
    };

    match homepage.title.as_deref() {
        None => onpage.penalize(
            20,
            Severity::High,
            "Homepage missing title tag",
            "Title tags are the single most important on-page SEO element.",
            "Major ranking factor missing",
            FixDifficulty::Easy,
        ),
        Some(title) if title.chars().count() > config.title_max_length => {
            let length = title.chars().count();
            onpage.penalize(
                5,
                Severity::Low,
                "Homepage title too long",
                format!(
                    "Your title is {} characters. Google truncates titles over {} characters.",
                    length, config.title_max_length
                ),
                "Truncated search results",
                FixDifficulty::Easy,
            );
        }
        Some(_) => {}
    }

    let h1_count = homepage.headings.h1.len();
    if h1_count > 1 {
        onpage.penalize(
            10,
            Severity::Medium,
            format!("Multiple H1 tags on homepage ({})", h1_count),
            "Best practice is one H1 per page.",
            "Diluted page topic signal",
            FixDifficulty::Easy,
        );
    }

    if homepage.links.internal < config.min_internal_links {
        onpage.penalize(
            10,
            Severity::Medium,
            "Weak internal linking",
            format!(
                "Homepage has only {} internal links. More internal links help search engines discover content.",
                homepage.links.internal
            ),
            "Poor crawl depth",
            FixDifficulty::Easy,
        );
    }

    onpage
}

fn url_path(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| url.to_string())
}
