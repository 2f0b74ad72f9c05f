//! Relay-phase tests: per-comment isolation and error classification

use crate::support::test_config;
use catalog_relay::diagnostics::{CaptureSink, Diagnostic};
use catalog_relay::pipeline::publish;
use catalog_relay::relay::{PostTarget, RelaySummary, CREATE_COMMENT_METHOD};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ok_reply() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"response": {"comment_id": 7}}))
}

fn error_reply(code: i64, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(json!({"error": {"error_code": code, "error_msg": message}}))
}

#[tokio::test]
async fn test_terminal_error_does_not_stop_batch() {
    let catalog = MockServer::start().await;
    let api = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CREATE_COMMENT_METHOD))
        .and(body_string_contains("message=SM-0002"))
        .respond_with(error_reply(15, "Access denied"))
        .expect(1)
        .mount(&api)
        .await;
    Mock::given(method("POST"))
        .and(path(CREATE_COMMENT_METHOD))
        .respond_with(ok_reply())
        .expect(2)
        .mount(&api)
        .await;

    let mut config = test_config(&catalog, &api);
    config.api.terminal_codes.push(15);
    let target = PostTarget::parse(&config.api.post).unwrap();
    let sink = CaptureSink::new();
    let articles = vec![
        "SM-0001".to_string(),
        "SM-0002".to_string(),
        "SM-0003".to_string(),
    ];

    let summary = publish(&config, &target, "token", &articles, Arc::new(sink.clone()))
        .await
        .unwrap();

    assert_eq!(summary, RelaySummary { posted: 2, failed: 1 });
    assert_eq!(
        sink.diagnostics(),
        vec![Diagnostic::CommentFailed {
            message: "SM-0002".to_string(),
            reason: "Access denied".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_default_terminal_code_is_not_retried() {
    let catalog = MockServer::start().await;
    let api = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(error_reply(5, "User authorization failed"))
        .expect(1)
        .mount(&api)
        .await;

    let config = test_config(&catalog, &api);
    let target = PostTarget::parse(&config.api.post).unwrap();
    let sink = CaptureSink::new();

    let summary = publish(
        &config,
        &target,
        "expired",
        &["SM-0001".to_string()],
        Arc::new(sink.clone()),
    )
    .await
    .unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(sink.len(), 1);
}

#[tokio::test]
async fn test_rate_limit_code_is_retried() {
    let catalog = MockServer::start().await;
    let api = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(error_reply(6, "Too many requests per second"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&api)
        .await;
    Mock::given(method("POST"))
        .respond_with(ok_reply())
        .expect(1)
        .mount(&api)
        .await;

    let config = test_config(&catalog, &api);
    let target = PostTarget::parse(&config.api.post).unwrap();
    let sink = CaptureSink::new();

    let summary = publish(
        &config,
        &target,
        "token",
        &["SM-0001".to_string()],
        Arc::new(sink.clone()),
    )
    .await
    .unwrap();

    assert_eq!(summary, RelaySummary { posted: 1, failed: 0 });
    assert!(sink.is_empty());
}
