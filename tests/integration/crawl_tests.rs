//! Integration tests for the site crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use ranksight::config::{CrawlerConfig, UserAgentConfig};
use ranksight::crawler::{CrawlResult, Fetcher, SiteCrawler};
use std::sync::Mutex;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a crawler with a short timeout and the given page cap
fn create_test_crawler(max_pages: usize) -> SiteCrawler {
    let config = CrawlerConfig {
        max_pages,
        fetch_timeout_ms: 2_000,
        max_sitemap_urls: 50,
    };
    let fetcher =
        Fetcher::new(&config, &UserAgentConfig::default()).expect("Failed to build fetcher");
    SiteCrawler::with_fetcher(fetcher, config)
}

/// Crawls `start` and returns the result plus every progress message
async fn crawl_with_messages(crawler: &SiteCrawler, start: &str) -> (CrawlResult, Vec<String>) {
    let messages = Mutex::new(Vec::new());
    let progress = |message: &str| messages.lock().unwrap().push(message.to_string());

    let url = Url::parse(start).expect("Failed to parse start URL");
    let result = crawler.crawl_site(&url, &progress).await;

    (result, messages.into_inner().unwrap())
}

fn html_page(title: &str, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><head><title>{}</title></head><body>{}</body></html>",
            title, body
        ))
        .insert_header("content-type", "text/html")
}

async fn mount_get(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_get(
        &mock_server,
        "/robots.txt",
        ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /"),
    )
    .await;

    mount_get(
        &mock_server,
        "/sitemap.xml",
        ResponseTemplate::new(200).set_body_string(format!(
            "<urlset><url><loc>{0}/</loc></url><url><loc>{0}/about</loc></url></urlset>",
            base_url
        )),
    )
    .await;

    mount_get(
        &mock_server,
        "/",
        html_page(
            "Home",
            &format!(
                r#"<h1>Acme</h1>
                <a href="{}/about">About</a>
                <a href="/services?ref=nav">Services</a>
                <a href="/about#team">About again</a>
                <a href="https://partner.example/">Partner</a>"#,
                base_url
            ),
        ),
    )
    .await;

    mount_get(&mock_server, "/about", html_page("About", "About us")).await;
    mount_get(&mock_server, "/services", html_page("Services", "What we do")).await;

    let crawler = create_test_crawler(10);
    let (result, messages) = crawl_with_messages(&crawler, &format!("{}/", base_url)).await;

    assert_eq!(result.pages.len(), 3, "Expected homepage plus two pages");
    assert_eq!(result.pages[0].title.as_deref(), Some("Home"));
    assert_eq!(result.pages[0].links.internal, 3);
    assert_eq!(result.pages[0].links.external, 1);
    assert_eq!(result.pages[1].title.as_deref(), Some("About"));
    assert_eq!(result.pages[2].title.as_deref(), Some("Services"));
    assert!(result.pages.iter().all(|p| p.status == 200));

    assert!(result.robots_txt.exists);
    assert!(result.robots_txt.blocked_bots.is_empty());
    assert!(result.sitemap.exists);
    assert_eq!(result.sitemap.url_count, 2);

    // The mock server speaks plain http
    assert!(!result.ssl);

    assert_eq!(
        messages,
        vec![
            "Checking robots.txt and sitemap...",
            "Crawling homepage...",
            "Crawling page 2/3...",
            "Crawling page 3/3...",
        ]
    );
}

#[tokio::test]
async fn test_user_agent_identifies_crawler() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header(
            "user-agent",
            "Mozilla/5.0 (compatible; RankSight-Audit/1.0; +https://seo.impulsestudios.cc)",
        ))
        .respond_with(html_page("Home", "Hello"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let crawler = create_test_crawler(10);
    let (result, _) = crawl_with_messages(&crawler, &format!("{}/", mock_server.uri())).await;

    assert_eq!(result.pages.len(), 1);
}

#[tokio::test]
async fn test_robots_wildcard_block_is_reported_not_obeyed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_get(
        &mock_server,
        "/robots.txt",
        ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /"),
    )
    .await;

    mount_get(
        &mock_server,
        "/",
        html_page("Home", r#"<a href="/private">Private</a>"#),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/private"))
        .respond_with(html_page("Private", "Still audited"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let crawler = create_test_crawler(10);
    let (result, _) = crawl_with_messages(&crawler, &format!("{}/", base_url)).await;

    assert!(result.robots_txt.blocks_gpt_bot);
    assert!(result.robots_txt.blocks_claude_bot);
    assert!(result.robots_txt.blocks_bingbot);
    assert!(result.robots_txt.blocks_googlebot);
    assert_eq!(result.pages.len(), 2);
}

#[tokio::test]
async fn test_missing_robots_and_sitemap() {
    let mock_server = MockServer::start().await;

    // Unmatched routes answer 404
    mount_get(&mock_server, "/", html_page("Home", "Hello")).await;

    let crawler = create_test_crawler(10);
    let (result, _) = crawl_with_messages(&crawler, &format!("{}/", mock_server.uri())).await;

    assert!(!result.robots_txt.exists);
    assert!(!result.sitemap.exists);
    assert_eq!(result.sitemap.url_count, 0);
    assert_eq!(result.pages.len(), 1);
}

#[tokio::test]
async fn test_homepage_failure_returns_no_pages() {
    let mock_server = MockServer::start().await;

    mount_get(
        &mock_server,
        "/robots.txt",
        ResponseTemplate::new(200).set_body_string("User-agent: GPTBot\nDisallow: /"),
    )
    .await;
    mount_get(&mock_server, "/", ResponseTemplate::new(500)).await;

    let crawler = create_test_crawler(10);
    let (result, messages) =
        crawl_with_messages(&crawler, &format!("{}/", mock_server.uri())).await;

    assert!(result.pages.is_empty());
    assert!(result.homepage().is_none());
    // Robots findings survive a homepage failure
    assert!(result.robots_txt.blocks_gpt_bot);
    assert_eq!(
        messages,
        vec!["Checking robots.txt and sitemap...", "Crawling homepage..."]
    );
}

#[tokio::test]
async fn test_failed_secondary_page_is_skipped() {
    let mock_server = MockServer::start().await;

    mount_get(
        &mock_server,
        "/",
        html_page(
            "Home",
            r#"<a href="/broken">Broken</a><a href="/working">Working</a>"#,
        ),
    )
    .await;
    mount_get(&mock_server, "/broken", ResponseTemplate::new(404)).await;
    mount_get(&mock_server, "/working", html_page("Working", "Fine")).await;

    let crawler = create_test_crawler(10);
    let (result, messages) =
        crawl_with_messages(&crawler, &format!("{}/", mock_server.uri())).await;

    assert_eq!(result.pages.len(), 2);
    assert_eq!(result.pages[1].title.as_deref(), Some("Working"));
    assert!(messages.contains(&"Crawling page 3/3...".to_string()));
}

#[tokio::test]
async fn test_page_cap_and_asset_filtering() {
    let mock_server = MockServer::start().await;

    mount_get(
        &mock_server,
        "/",
        html_page(
            "Home",
            r#"<a href="/brochure.pdf">Brochure</a>
               <a href="/logo.png">Logo</a>
               <a href="/one">One</a>
               <a href="/two">Two</a>
               <a href="/three">Three</a>
               <a href="/four">Four</a>"#,
        ),
    )
    .await;

    for route in ["/one", "/two"] {
        mount_get(&mock_server, route, html_page(route, "Page")).await;
    }

    for route in ["/brochure.pdf", "/logo.png", "/three", "/four"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;
    }

    let crawler = create_test_crawler(3);
    let (result, _) = crawl_with_messages(&crawler, &format!("{}/", mock_server.uri())).await;

    assert_eq!(result.pages.len(), 3);
    assert_eq!(result.pages[1].title.as_deref(), Some("/one"));
    assert_eq!(result.pages[2].title.as_deref(), Some("/two"));
}

#[tokio::test]
async fn test_redirected_homepage_uses_final_url() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_get(
        &mock_server,
        "/",
        ResponseTemplate::new(301).insert_header("location", format!("{}/home", base_url).as_str()),
    )
    .await;
    mount_get(&mock_server, "/home", html_page("Home", r#"<a href="/home">Self</a>"#)).await;

    let crawler = create_test_crawler(10);
    let (result, _) = crawl_with_messages(&crawler, &format!("{}/", base_url)).await;

    assert_eq!(result.pages.len(), 1);
    assert_eq!(result.pages[0].url, format!("{}/home", base_url));
    // A link to the page itself is counted but not crawled again
    assert_eq!(result.pages[0].links.internal, 1);
}

#[tokio::test]
async fn test_tls_failure_falls_back_to_http() {
    let mock_server = MockServer::start().await;
    let address = mock_server.address();

    mount_get(&mock_server, "/", html_page("Plain", "Served without TLS")).await;

    // The mock only speaks http, so the https handshake fails
    let crawler = create_test_crawler(10);
    let (result, _) = crawl_with_messages(&crawler, &format!("https://{}/", address)).await;

    assert_eq!(result.pages.len(), 1);
    assert_eq!(result.pages[0].title.as_deref(), Some("Plain"));
    assert!(result.pages[0].url.starts_with("http://"));
    assert!(!result.ssl);
}
