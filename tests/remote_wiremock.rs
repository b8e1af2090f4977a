mod common;

use std::time::Duration;

use common::fixtures::{expected_request, prefill_body};
use serde_json::json;
use tgi_scorer::{RemoteScoringError, ScoringClient, TgiClient};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn generate_url(server: &MockServer) -> String {
    format!("{}/generate", server.uri())
}

#[tokio::test]
async fn test_score_parses_prefill() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate"))
        .and(body_json(expected_request("The quick brown fox")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "details": {
                "prefill": [
                    {"logprob": -1.2, "predicted_id": 15},
                    {"logprob": -0.3, "predicted_id": 7}
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = TgiClient::new();
    let response = client
        .score("The quick brown fox", &generate_url(&server))
        .await
        .unwrap();

    assert_eq!(response.logprobs(), &[Some(-1.2), Some(-0.3)]);
    assert_eq!(response.predicted_ids(), &[15, 7]);
}

#[tokio::test]
async fn test_score_keeps_null_first_logprob() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(prefill_body(&[(None, 3), (Some(-0.7), 4), (Some(-2.0), 9)])),
        )
        .mount(&server)
        .await;

    let response = TgiClient::new()
        .score("the quick brown", &generate_url(&server))
        .await
        .unwrap();

    assert_eq!(response.logprobs(), &[None, Some(-0.7), Some(-2.0)]);
    assert_eq!(response.predicted_ids(), &[3, 4, 9]);
    assert_eq!(response.continuation_logprob(1), Some(-2.7));
}

#[tokio::test]
async fn test_score_surfaces_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": "model overloaded"})),
        )
        .mount(&server)
        .await;

    let err = TgiClient::new()
        .score("anything", &generate_url(&server))
        .await
        .unwrap_err();

    assert!(matches!(err, RemoteScoringError::Server { .. }));
    assert_eq!(err.server_message(), Some("model overloaded"));
}

#[tokio::test]
async fn test_score_error_body_with_failure_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "error": "Input validation error: `inputs` must have less than 2048 tokens",
            "error_type": "validation"
        })))
        .mount(&server)
        .await;

    let err = TgiClient::new()
        .score("long", &generate_url(&server))
        .await
        .unwrap_err();

    assert!(
        err.server_message()
            .is_some_and(|m| m.starts_with("Input validation error"))
    );
}

#[tokio::test]
async fn test_score_malformed_body_reports_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = TgiClient::new()
        .score("x", &generate_url(&server))
        .await
        .unwrap_err();

    match err {
        RemoteScoringError::MalformedResponse { reason } => assert!(reason.contains("502")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_score_transport_failure_on_closed_port() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let url = format!("http://{addr}/generate");

    let err = TgiClient::new().score("x", &url).await.unwrap_err();
    assert!(matches!(err, RemoteScoringError::Transport(_)));
}

#[tokio::test]
async fn test_score_respects_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(prefill_body(&[(None, 1)]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = TgiClient::with_timeout(Duration::from_millis(100))
        .score("x", &generate_url(&server))
        .await
        .unwrap_err();

    match err {
        RemoteScoringError::Transport(e) => assert!(e.is_timeout()),
        other => panic!("unexpected error: {other}"),
    }
}
