use apexlogs_engine::{decode_page, PageFetchError, PageFetcher, PageSettings, ReqwestPageFetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn decode_respects_the_content_type_charset() {
    let bytes = b"caf\xe9"; // iso-8859-1
    let html = decode_page(bytes, Some("text/html; charset=ISO-8859-1")).unwrap();
    assert_eq!(html, "café");
}

#[test]
fn decode_strips_a_utf8_bom() {
    let bytes = b"\xEF\xBB\xBFhello";
    let html = decode_page(bytes, Some("text/html")).unwrap();
    assert_eq!(html, "hello");
}

#[test]
fn decode_falls_back_to_detection_without_a_charset() {
    let html = decode_page("plain ascii table".as_bytes(), None).unwrap();
    assert_eq!(html, "plain ascii table");
}

#[tokio::test]
async fn fetcher_returns_decoded_html() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<table></table>", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let fetcher = ReqwestPageFetcher::new(PageSettings::default());
    let page = fetcher.fetch(&format!("{}/jobs", server.uri())).await.unwrap();
    assert_eq!(page.html, "<table></table>");
}

#[tokio::test]
async fn fetcher_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = ReqwestPageFetcher::new(PageSettings::default());
    let err = fetcher
        .fetch(&format!("{}/gone", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, PageFetchError::HttpStatus(404)));
}

#[tokio::test]
async fn fetcher_rejects_oversized_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/big"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .set_body_string("0123456789abcdef"),
        )
        .mount(&server)
        .await;

    let settings = PageSettings {
        max_bytes: 8,
        ..PageSettings::default()
    };
    let fetcher = ReqwestPageFetcher::new(settings);
    let err = fetcher
        .fetch(&format!("{}/big", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, PageFetchError::TooLarge { max_bytes: 8 }));
}
