//! End-to-end tests: harvest from the mock catalog, relay to the mock API

use crate::support::{mount_three_page_catalog, test_config};
use catalog_relay::diagnostics::CaptureSink;
use catalog_relay::pipeline::PipelineReport;
use catalog_relay::relay::{RelaySummary, CREATE_COMMENT_METHOD};
use catalog_relay::{run_pipeline, RelayError};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_full_pipeline() {
    let catalog = MockServer::start().await;
    let api = MockServer::start().await;
    mount_three_page_catalog(&catalog).await;

    for article in ["SM-0001", "SM-0002", "SM-0003", "SM-0005"] {
        Mock::given(method("POST"))
            .and(path(CREATE_COMMENT_METHOD))
            .and(body_string_contains(format!("message={}", article)))
            .and(body_string_contains("owner_id=-45599639"))
            .and(body_string_contains("post_id=85065"))
            .and(body_string_contains("access_token=secret"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"response": {"comment_id": 1}})),
            )
            .expect(1)
            .mount(&api)
            .await;
    }

    let config = test_config(&catalog, &api);
    let sink = CaptureSink::new();

    let report = run_pipeline(&config, "secret", Arc::new(sink.clone()))
        .await
        .expect("pipeline should complete");

    assert_eq!(
        report,
        PipelineReport {
            harvested: 4,
            relay: RelaySummary { posted: 4, failed: 0 },
        }
    );
    // Only the item without an article is reported
    assert_eq!(sink.len(), 1);
}

#[tokio::test]
async fn test_pipeline_completes_when_everything_fails() {
    let catalog = MockServer::start().await;
    let api = MockServer::start().await;
    mount_three_page_catalog(&catalog).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&api)
        .await;

    let config = test_config(&catalog, &api);
    let sink = CaptureSink::new();

    let report = run_pipeline(&config, "secret", Arc::new(sink.clone()))
        .await
        .expect("failures are not fatal");

    assert_eq!(report.harvested, 4);
    assert_eq!(report.relay, RelaySummary { posted: 0, failed: 4 });
}

#[tokio::test]
async fn test_pipeline_with_unreachable_catalog_posts_nothing() {
    let catalog = MockServer::start().await;
    let api = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&api)
        .await;

    let mut config = test_config(&catalog, &api);
    config.catalog.start_url = "http://127.0.0.1:1/catalog/".to_string();
    let sink = CaptureSink::new();

    let report = run_pipeline(&config, "secret", Arc::new(sink.clone()))
        .await
        .unwrap();

    assert_eq!(report.harvested, 0);
    assert_eq!(report.relay.total(), 0);
    assert_eq!(sink.len(), 1);
}

#[tokio::test]
async fn test_pipeline_rejects_bad_post_reference() {
    let catalog = MockServer::start().await;
    let api = MockServer::start().await;

    let mut config = test_config(&catalog, &api);
    config.api.post = "wall-1".to_string();

    let result = run_pipeline(&config, "secret", Arc::new(CaptureSink::new())).await;
    assert!(matches!(result, Err(RelayError::Config(_))));
}
