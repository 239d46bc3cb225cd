//! Integration tests for the paginated crawl
//!
//! These tests use wiremock to serve canned search-result pages and
//! drive the full crawl cycle end-to-end.

use tempfile::TempDir;
use wallgrab::config::Config;
use wallgrab::crawler::build_crawl;
use wallgrab::{CrawlState, SearchFilter, WallgrabError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a results document reporting `current`/`total` with the given
/// item identifiers.
fn results_page(current: u32, total: u32, ids: &[&str]) -> String {
    let mut html = String::from("<html><body>");
    html.push_str(&format!(
        r#"<header class="thumb-listing-page-header"><h2>{} Wallpapers found / {total}</h2></header>"#,
        ids.len()
    ));
    html.push_str(r#"<section class="thumb-listing-page"><ul>"#);
    for id in ids {
        html.push_str(&format!(
            r#"<li><figure data-wallpaper-id="{id}"></figure></li>"#
        ));
    }
    html.push_str("</ul></section>");
    html.push_str(&format!(
        r#"<ul class="pagination"><li class="current">{current}</li></ul>"#
    ));
    html.push_str("</body></html>");
    html
}

/// Test config pointing at the mock server, with the session file in a
/// temp directory so no real state leaks between tests.
fn test_config(server: &MockServer, dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.site.base_url = server.uri();
    config.session.file_path = dir
        .path()
        .join("session.json")
        .to_string_lossy()
        .into_owned();
    config
}

async fn mount_page(server: &MockServer, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_three_page_crawl_yields_all_items_in_order() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let page1_ids: Vec<String> = (0..10).map(|i| format!("aa{i:04}")).collect();
    let page2_ids: Vec<String> = (0..10).map(|i| format!("bb{i:04}")).collect();
    let page3_ids: Vec<String> = (0..4).map(|i| format!("cc{i:04}")).collect();

    fn as_refs(ids: &[String]) -> Vec<&str> {
        ids.iter().map(String::as_str).collect()
    }
    mount_page(&server, 1, results_page(1, 3, &as_refs(&page1_ids))).await;
    mount_page(&server, 2, results_page(2, 3, &as_refs(&page2_ids))).await;
    mount_page(&server, 3, results_page(3, 3, &as_refs(&page3_ids))).await;

    // The crawl must stop after the final page without a further fetch.
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(4, 4, &[])))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(&server, &dir);
    let mut crawl = build_crawl(SearchFilter::new(), &config, None).unwrap();

    let items = crawl.collect_items(None).await.unwrap();
    assert_eq!(items.len(), 24);

    let expected: Vec<String> = page1_ids
        .iter()
        .chain(page2_ids.iter())
        .chain(page3_ids.iter())
        .cloned()
        .collect();
    let actual: Vec<String> = items.iter().map(|i| i.id().to_string()).collect();
    assert_eq!(actual, expected);

    assert_eq!(crawl.state(), CrawlState::Exhausted);
    assert!(matches!(crawl.next_item().await, Ok(None)));
}

#[tokio::test]
async fn test_single_page_without_header_terminates() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // No listing header at all: total pages resolves to 1.
    let body = r#"<html><body>
        <section class="thumb-listing-page"><ul>
            <li><figure data-wallpaper-id="zz0001"></figure></li>
        </ul></section>
        <ul class="pagination"><li class="current">1</li></ul>
    </body></html>"#;
    mount_page(&server, 1, body.to_string()).await;

    let config = test_config(&server, &dir);
    let mut crawl = build_crawl(SearchFilter::new(), &config, None).unwrap();

    let items = crawl.collect_items(None).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id(), "zz0001");
    assert_eq!(crawl.state(), CrawlState::Exhausted);
}

#[tokio::test]
async fn test_crawl_starts_at_the_filter_page() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, 2, results_page(2, 2, &["bb0001"])).await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(1, 2, &[])))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(&server, &dir);
    let mut filter = SearchFilter::new();
    filter.set_page(2).unwrap();
    let mut crawl = build_crawl(filter, &config, None).unwrap();

    let items = crawl.collect_items(None).await.unwrap();
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn test_crawl_started_beyond_the_last_page_yields_nothing() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // The document served for page 5 reports the result set has only
    // 3 pages. Its items must not be yielded.
    mount_page(&server, 5, results_page(5, 3, &["ee0001", "ee0002"])).await;

    let config = test_config(&server, &dir);
    let mut filter = SearchFilter::new();
    filter.set_page(5).unwrap();
    let mut crawl = build_crawl(filter, &config, None).unwrap();

    let items = crawl.collect_items(None).await.unwrap();
    assert!(items.is_empty());
    assert_eq!(crawl.state(), CrawlState::Exhausted);
    assert!(crawl.next_item().await.unwrap().is_none());
}

#[tokio::test]
async fn test_parsed_page_number_is_authoritative_across_gaps() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, 1, results_page(1, 4, &["aa0001"])).await;
    // The site skips its own numbering: the document served for page 2
    // reports itself as page 3. The next fetch must ask for page 4,
    // never page 3.
    mount_page(&server, 2, results_page(3, 4, &["bb0001"])).await;
    mount_page(&server, 4, results_page(4, 4, &["dd0001"])).await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(3, 4, &[])))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(&server, &dir);
    let mut crawl = build_crawl(SearchFilter::new(), &config, None).unwrap();

    let items = crawl.collect_items(None).await.unwrap();
    let ids: Vec<&str> = items.iter().map(|i| i.id()).collect();
    assert_eq!(ids, vec!["aa0001", "bb0001", "dd0001"]);
}

#[tokio::test]
async fn test_collect_items_respects_limit_without_extra_fetches() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        1,
        results_page(1, 2, &["aa0001", "aa0002", "aa0003"]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(2, 2, &[])))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(&server, &dir);
    let mut crawl = build_crawl(SearchFilter::new(), &config, None).unwrap();

    let items = crawl.collect_items(Some(2)).await.unwrap();
    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn test_http_error_surfaces_with_status() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = test_config(&server, &dir);
    let mut crawl = build_crawl(SearchFilter::new(), &config, None).unwrap();

    let err = crawl.next_item().await.unwrap_err();
    assert!(matches!(err, WallgrabError::HttpStatus { status: 503, .. }));
}

#[tokio::test]
async fn test_document_without_page_marker_is_parse_error() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>maintenance</body></html>"),
        )
        .mount(&server)
        .await;

    let config = test_config(&server, &dir);
    let mut crawl = build_crawl(SearchFilter::new(), &config, None).unwrap();

    let err = crawl.next_item().await.unwrap_err();
    assert!(matches!(err, WallgrabError::Parse(_)));
}

#[tokio::test]
async fn test_anonymous_crawl_never_touches_the_login_page() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    mount_page(&server, 1, results_page(1, 1, &["aa0001"])).await;

    let config = test_config(&server, &dir);
    // Default purity is safe-only, so no credentials are required and
    // none are attached even if a caller supplies them.
    let filter = SearchFilter::new();
    assert!(!filter.credentials_required());

    let credentials = wallgrab::session::Credentials {
        username: "alice".to_string(),
        password: "hunter2".to_string(),
    };
    let mut crawl = build_crawl(filter, &config, Some(credentials)).unwrap();
    let items = crawl.collect_items(None).await.unwrap();
    assert_eq!(items.len(), 1);
}
