// End-to-end crawls against a mock open directory server

use dirsweep_scanner::{
    Crawler, DirectoryPath, HttpPageParser, ListingFormat, PageParser, ScanError,
};
use std::time::Duration;
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn h5ai_page(rows: &[(&str, &str)]) -> String {
    let mut html = String::from(
        r#"<html><body><div id="fallback"><table><tr><th class="fb-n"><a href="?C=N;O=D">Name</a></th></tr>"#,
    );
    for (name, href) in rows {
        html.push_str(&format!(
            r#"<tr><td class="fb-i"></td><td class="fb-n"><a href="{}">{}</a></td><td class="fb-s">1 KB</td></tr>"#,
            href, name
        ));
    }
    html.push_str("</table></div></body></html>");
    html
}

async fn mount_page(server: &MockServer, at: &str, rows: &[(&str, &str)]) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(h5ai_page(rows)),
        )
        .mount(server)
        .await;
}

fn base_of(server: &MockServer) -> Url {
    Url::parse(&format!("{}/pub/", server.uri())).unwrap()
}

fn parser() -> HttpPageParser {
    HttpPageParser::new(&ListingFormat::H5ai, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_http_parser_reads_listing() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/pub/",
        &[("Parent Directory", "/"), ("docs", "docs/"), ("notes.txt", "notes.txt")],
    )
    .await;

    let entries = parser().fetch_listing(&base_of(&server)).await.unwrap();

    let hrefs: Vec<&str> = entries.iter().map(|e| e.href.as_str()).collect();
    assert_eq!(hrefs, vec!["/", "docs/", "notes.txt"]);
}

#[tokio::test]
async fn test_http_parser_reports_status_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pub/"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let result = parser().fetch_listing(&base_of(&server)).await;

    assert!(matches!(result, Err(ScanError::Status { status: 403, .. })));
}

#[tokio::test]
async fn test_http_parser_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pub/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(h5ai_page(&[]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let parser = HttpPageParser::new(&ListingFormat::H5ai, Duration::from_millis(200)).unwrap();
    let result = parser.fetch_listing(&base_of(&server)).await;

    assert!(matches!(result, Err(ScanError::HttpError(_))));
}

#[tokio::test]
async fn test_crawl_mock_open_directory() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/pub/",
        &[("Parent Directory", "/"), ("a", "a/"), ("b", "b/")],
    )
    .await;
    mount_page(&server, "/pub/a/", &[("Parent Directory", "/pub/"), ("x.txt", "x.txt")]).await;
    mount_page(
        &server,
        "/pub/b/",
        &[("Parent Directory", "/pub/"), ("y.txt", "y.txt"), ("z.txt", "z.txt"), ("gone", "gone/")],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/pub/b/gone/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let base = base_of(&server);
    let crawler = Crawler::new(base.clone(), parser()).with_max_concurrency(2);
    let results = crawler.crawl(&DirectoryPath::root()).await.unwrap();

    let mut found: Vec<(String, String)> = results
        .iter()
        .map(|r| (r.folder.clone(), r.url.clone()))
        .collect();
    found.sort();
    assert_eq!(
        found,
        vec![
            ("a".to_string(), format!("{}a/x.txt", base)),
            ("b".to_string(), format!("{}b/y.txt", base)),
            ("b".to_string(), format!("{}b/z.txt", base)),
        ]
    );
    assert_eq!(results.stats().directories_failed, 1);
}

#[tokio::test]
async fn test_crawl_unreachable_host_is_empty() {
    // Nothing listens on port 9 of the loopback interface
    let base = Url::parse("http://127.0.0.1:9/pub/").unwrap();
    let parser = HttpPageParser::new(&ListingFormat::Apache, Duration::from_secs(2)).unwrap();

    let results = Crawler::new(base, parser)
        .crawl(&DirectoryPath::root())
        .await
        .unwrap();

    assert!(results.is_empty());
    assert_eq!(results.stats().directories_failed, 1);
}
