//! HTTP workflow tests: request → pipeline → JSON reply.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use clinical_search::server::{
    serve_http_on, AppState, HEALTH_PATH, MEDICAL_QUERY_PATH, REQUEST_ID_HEADER,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use wiremock::MockServer;

use super::support::{dialysis_body, mount_chat, mount_terms, pipeline_for};

/// Serve the production pipeline (pointed at `upstream`) on a free port.
async fn spawn_service(upstream: &MockServer) -> String {
    let state = AppState::new(pipeline_for(upstream).into_dyn());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve_http_on(state, listener));
    format!("http://{addr}")
}

async fn post_query(base: &str, body: &Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{base}{MEDICAL_QUERY_PATH}"))
        .json(body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_http_query_end_to_end() {
    let upstream = MockServer::start().await;
    mount_terms(&upstream, dialysis_body()).await;
    mount_chat(&upstream, "Dialysis filters the blood when the kidneys fail.").await;
    let base = spawn_service(&upstream).await;

    let response = post_query(&base, &json!({"query": "What is dialysis?"})).await;

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let request_id = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap();
    assert!(uuid::Uuid::parse_str(&request_id).is_ok());

    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "query": "What is dialysis?",
            "response": "Dialysis filters the blood when the kidneys fail."
        })
    );
}

#[tokio::test]
async fn test_http_pipeline_failure_is_200_with_prefix() {
    let upstream = MockServer::start().await;
    mount_terms(&upstream, json!([0, [], null, []])).await;
    let base = spawn_service(&upstream).await;

    let response = post_query(&base, &json!({"query": "xyz-nonexistent"})).await;

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["query"], "xyz-nonexistent");
    assert_eq!(body["response"], "Clinical Data Error: No clinical data found");
}

#[tokio::test]
async fn test_http_blank_query_is_validation_error() {
    let upstream = MockServer::start().await;
    let base = spawn_service(&upstream).await;

    let response = post_query(&base, &json!({"query": "   "})).await;

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["response"], "Validation Error: Empty medical query");
}

#[tokio::test]
async fn test_http_wrong_shape_is_400() {
    let upstream = MockServer::start().await;
    let base = spawn_service(&upstream).await;

    let response = post_query(&base, &json!({"query": 42})).await;

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid request format");
    assert_eq!(body["example"]["query"], "What is dialysis?");
}

#[tokio::test]
async fn test_http_health() {
    let upstream = MockServer::start().await;
    let base = spawn_service(&upstream).await;

    let response = reqwest::get(format!("{base}{HEALTH_PATH}")).await.unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}
