use std::sync::Arc;
use std::time::Duration;

use apexlogs_engine::{
    Credential, CredentialStore, DownloadLink, LookupEvent, LookupHandle, ToolingConfig,
};
use async_trait::async_trait;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param_contains};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct NoStore;

#[async_trait]
impl CredentialStore for NoStore {
    async fn credential_for_origin(&self, _origin: &Url) -> Option<Credential> {
        None
    }
}

async fn wait_for_event(handle: &LookupHandle) -> LookupEvent {
    for _ in 0..200 {
        if let Some(event) = handle.try_recv() {
            return event;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("no lookup event arrived");
}

#[tokio::test(flavor = "multi_thread")]
async fn a_request_resolves_into_labeled_links() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/data/v62.0/tooling/query"))
        .and(query_param_contains("q", "FROM AsyncApexJob"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [{
                "Id": "707xx0000004CisAAI",
                "CreatedById": "005xx",
                "CreatedDate": "2024-01-01T00:00:00Z",
                "CompletedDate": "2024-01-01T00:05:00Z"
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/data/v62.0/tooling/query"))
        .and(query_param_contains("q", "FROM ApexLog"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [{
                "Id": "07L1",
                "StartTime": "2024-01-01T00:01:00Z",
                "LogUserId": "005xx",
                "Operation": "BatchApex",
                "Status": "Success",
                "LogLength": 2048,
                "Request": "Api"
            }]
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let handle = LookupHandle::new(
        Url::parse(&server.uri()).unwrap(),
        Arc::new(NoStore),
        dir.path().to_path_buf(),
        ToolingConfig::default(),
    )
    .unwrap();

    handle.request("r1", "707xx0000004CisAAI");
    let LookupEvent::Resolved { key, result } = wait_for_event(&handle).await;
    assert_eq!(key, "r1");
    let links = result.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].label, "BatchApex (2.0 KB)");
    // No credential, so the link is the console fallback route.
    assert!(matches!(links[0].link, DownloadLink::Console(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn lookup_failures_arrive_as_row_messages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/data/v62.0/tooling/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"records": []})))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let handle = LookupHandle::new(
        Url::parse(&server.uri()).unwrap(),
        Arc::new(NoStore),
        dir.path().to_path_buf(),
        ToolingConfig::default(),
    )
    .unwrap();

    handle.request("r9", "707xx0000004CisAAI");
    let LookupEvent::Resolved { key, result } = wait_for_event(&handle).await;
    assert_eq!(key, "r9");
    let message = result.unwrap_err();
    assert!(message.contains("not found"), "message: {message}");
}
