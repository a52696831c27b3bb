use std::time::Duration;

use audit_core::{ClusterId, LinkRequestParams, LocalizationRequest, PageRecord};
use audit_engine::{AuditService, ClientSettings, FailureKind, ReqwestAuditClient};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ReqwestAuditClient {
    ReqwestAuditClient::new(ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    })
    .expect("client")
}

fn pages() -> Vec<PageRecord> {
    vec![
        PageRecord::new("https://a.example", "en", "Alpha"),
        PageRecord::new("https://b.example", "de", "Beta"),
    ]
}

#[tokio::test]
async fn fetch_pages_posts_url_array_and_unwraps_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fetch-pages/"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!(["https://a.example", "https://b.example"])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pages": [
                {"url": "https://a.example", "lang": "en", "content": "Alpha"},
                {"url": "https://b.example", "lang": "de", "content": "Beta"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let urls = vec!["https://a.example".to_string(), "https://b.example".to_string()];
    let fetched = client.fetch_pages(&urls).await.expect("fetch ok");

    assert_eq!(fetched, pages());
}

#[tokio::test]
async fn upload_sends_multipart_file_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"sitemap.xml\""))
        .and(body_string_contains("<urlset/>"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pages": [{"url": "https://a.example", "lang": null, "content": "Alpha"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let file = dir.path().join("sitemap.xml");
    std::fs::write(&file, "<urlset/>").unwrap();

    let uploaded = client_for(&server).upload(&file).await.expect("upload ok");
    assert_eq!(uploaded, vec![PageRecord::new("https://a.example", "", "Alpha")]);
}

#[tokio::test]
async fn upload_of_missing_file_is_an_io_failure() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let err = client_for(&server)
        .upload(&dir.path().join("absent.csv"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Io);
}

#[tokio::test]
async fn internal_links_pass_params_as_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/internal-links/"))
        .and(query_param("max_links_per_page", "5"))
        .and(query_param("same_language_only", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "suggested_links": [{
                "source_url": "https://a.example",
                "target_url": "https://b.example",
                "anchor_text": "Beta",
                "similarity": 0.83,
                "same_language": false
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = LinkRequestParams {
        max_links_per_page: 5,
        same_language_only: true,
    };
    let links = client_for(&server)
        .suggest_links(&pages(), params)
        .await
        .expect("links ok");

    assert_eq!(links.len(), 1);
    assert_eq!(links[0].similarity, 0.83);
    assert_eq!(links[0].anchor_text, "Beta");
}

#[tokio::test]
async fn cluster_ids_decode_from_numbers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cluster/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "clusters": {"0": ["https://a.example"], "1": ["https://b.example"]},
            "cluster_keywords": {"0": ["alpha"], "1": ["beta"]},
            "clustered_pages": [
                {"url": "https://a.example", "lang": "en", "content": "Alpha", "cluster": 0},
                {"url": "https://b.example", "lang": "de", "content": "Beta", "cluster": 1}
            ]
        })))
        .mount(&server)
        .await;

    let result = client_for(&server).cluster(&pages()).await.expect("cluster ok");

    assert_eq!(result.clustered_pages[1].cluster, ClusterId::from("1"));
    let order: Vec<&str> = result.clusters.keys().map(ClusterId::as_str).collect();
    assert_eq!(order, vec!["0", "1"]);
    assert!(result.validate().is_ok());
}

#[tokio::test]
async fn localization_check_posts_lists_and_threshold() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/localization-check/"))
        .and(body_json(json!({
            "originals": ["https://a.example/en"],
            "translations": ["https://a.example/de"],
            "threshold": 0.7
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "flagged_pairs": [{"original": "Hello", "translation": "Hallo", "similarity": 0.91}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = LocalizationRequest {
        originals: vec!["https://a.example/en".into()],
        translations: vec!["https://a.example/de".into()],
        threshold: 0.7,
    };
    let results = client_for(&server)
        .check_localization(&request)
        .await
        .expect("check ok");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].translation, "Hallo");
}

#[tokio::test]
async fn readiness_nulls_decode_as_absent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ai-readiness/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ai_readiness": [{
                "url": "https://a.example",
                "score": 64,
                "summary_similarity": null,
                "missing_headers": [],
                "llm_summary": null,
                "suggestions": ["Add headings"]
            }]
        })))
        .mount(&server)
        .await;

    let scores = client_for(&server)
        .score_readiness(&pages()[..1])
        .await
        .expect("scores ok");

    assert_eq!(scores[0].score, 64.0);
    assert_eq!(scores[0].summary_similarity, None);
    assert_eq!(scores[0].llm_summary, None);
}

#[tokio::test]
async fn error_detail_is_surfaced_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cluster/"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"detail": "Need at least 2 pages"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).cluster(&pages()).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(422));
    assert_eq!(err.message, "Need at least 2 pages");
}

#[tokio::test]
async fn status_without_detail_reports_the_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ai-readiness/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .score_readiness(&pages())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
    assert_eq!(err.message, "Request failed with status code 500");
}

#[tokio::test]
async fn malformed_envelope_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fetch-pages/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_pages(&["https://a.example".to_string()])
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn slow_service_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cluster/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"clusters": {}, "clustered_pages": []})),
        )
        .mount(&server)
        .await;

    let client = ReqwestAuditClient::new(ClientSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ClientSettings::default()
    })
    .expect("client");

    let err = client.cluster(&pages()).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn oversized_response_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fetch-pages/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("0123456789abcdef"))
        .mount(&server)
        .await;

    let client = ReqwestAuditClient::new(ClientSettings {
        base_url: server.uri(),
        max_response_bytes: 10,
        ..ClientSettings::default()
    })
    .expect("client");

    let err = client
        .fetch_pages(&["https://a.example".to_string()])
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(16)
        }
    );
}
