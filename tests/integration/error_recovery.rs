//! Error recovery and edge case tests.
//!
//! Every upstream failure must come back as a prefixed string, and a
//! failed lookup must never reach the model.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use clinical_search::error::SearchErrorKind;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::support::{
    chat_body, config_for, dialysis_body, mount_chat, mount_terms, pipeline_for, pipeline_with,
    COMPLETIONS_PATH, SEARCH_PATH,
};

/// Mount a chat mock that fails the test if it is ever called.
async fn forbid_chat(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("unreachable")))
        .expect(0)
        .mount(server)
        .await;
}

/// Mount a chat mock answering with `template`.
async fn mount_chat_response(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_empty_query_makes_no_requests() {
    let server = MockServer::start().await;
    let search = pipeline_for(&server);

    for input in ["", "   ", "\n\t"] {
        assert_eq!(
            search.clinical_search(input).await,
            "Validation Error: Empty medical query"
        );
    }

    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_zero_matches_is_no_data() {
    let server = MockServer::start().await;
    mount_terms(&server, json!([0, [], null, []])).await;
    forbid_chat(&server).await;

    let answer = pipeline_for(&server).clinical_search("xyz-nonexistent").await;

    assert_eq!(answer, "Clinical Data Error: No clinical data found");
    assert_eq!(
        SearchErrorKind::classify(&answer),
        Some(SearchErrorKind::ClinicalData)
    );
}

#[tokio::test]
async fn test_lookup_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;
    forbid_chat(&server).await;

    let answer = pipeline_for(&server).clinical_search("dialysis").await;

    assert!(answer.starts_with("Clinical Data Error: API request failed: Status 500"));
    assert!(answer.contains("upstream down"));
}

#[tokio::test]
async fn test_lookup_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(dialysis_body())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    forbid_chat(&server).await;

    let mut config = config_for(&server);
    config.request.timeout = 1;
    let answer = pipeline_with(config).clinical_search("dialysis").await;

    assert_eq!(answer, "Clinical Data Error: API request timed out");
}

#[tokio::test]
async fn test_lookup_body_not_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;
    forbid_chat(&server).await;

    let answer = pipeline_for(&server).clinical_search("dialysis").await;

    assert!(answer
        .starts_with("Clinical Data Error: API request failed: Failed to decode response"));
}

#[tokio::test]
async fn test_lookup_broken_layout() {
    let server = MockServer::start().await;
    mount_terms(&server, json!([3, [], null, "oops"])).await;
    forbid_chat(&server).await;

    let answer = pipeline_for(&server).clinical_search("dialysis").await;

    assert_eq!(
        answer,
        "Clinical Data Error: Failed to process clinical data: record list is missing or not an array"
    );
}

#[test_case(401, "Authentication failed: invalid API key" ; "unauthorized")]
#[test_case(403, "Authentication failed: invalid API key" ; "forbidden")]
#[test_case(503, "Model unavailable: HuggingFaceH4/zephyr-7b-alpha" ; "unavailable")]
#[tokio::test]
async fn test_model_status_errors(status: u16, expected: &str) {
    let server = MockServer::start().await;
    mount_terms(&server, dialysis_body()).await;
    mount_chat_response(&server, ResponseTemplate::new(status)).await;

    let answer = pipeline_for(&server).clinical_search("dialysis").await;

    assert_eq!(
        answer,
        format!("System Error: Clinical search unavailable - {expected}")
    );
    assert_eq!(
        SearchErrorKind::classify(&answer),
        Some(SearchErrorKind::System)
    );
}

#[tokio::test]
async fn test_model_rate_limited() {
    let server = MockServer::start().await;
    mount_terms(&server, dialysis_body()).await;
    mount_chat_response(
        &server,
        ResponseTemplate::new(429).insert_header("retry-after", "30"),
    )
    .await;

    let answer = pipeline_for(&server).clinical_search("dialysis").await;

    assert_eq!(
        answer,
        "System Error: Clinical search unavailable - Rate limited: retry after 30s"
    );
}

#[tokio::test]
async fn test_model_empty_content_is_returned_verbatim() {
    for text in ["", "   "] {
        let server = MockServer::start().await;
        mount_terms(&server, dialysis_body()).await;
        mount_chat(&server, text).await;

        let answer = pipeline_for(&server).clinical_search("dialysis").await;

        assert_eq!(answer, text);
        assert_eq!(SearchErrorKind::classify(&answer), None);
    }
}

#[tokio::test]
async fn test_model_null_content() {
    let server = MockServer::start().await;
    mount_terms(&server, dialysis_body()).await;
    mount_chat_response(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": null}}]
        })),
    )
    .await;

    let answer = pipeline_for(&server).clinical_search("dialysis").await;

    assert_eq!(
        answer,
        "System Error: Clinical search unavailable - Unexpected response: No content in response"
    );
}

#[tokio::test]
async fn test_model_no_choices() {
    let server = MockServer::start().await;
    mount_terms(&server, dialysis_body()).await;
    mount_chat_response(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"choices": []})),
    )
    .await;

    let answer = pipeline_for(&server).clinical_search("dialysis").await;

    assert_eq!(
        SearchErrorKind::classify(&answer),
        Some(SearchErrorKind::System)
    );
}

#[tokio::test]
async fn test_recovers_after_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_terms(&server, dialysis_body()).await;
    mount_chat(&server, "Recovered.").await;

    let search = pipeline_for(&server);
    let first = search.clinical_search("dialysis").await;
    let second = search.clinical_search("dialysis").await;

    assert!(first.starts_with("Clinical Data Error:"));
    assert_eq!(second, "Recovered.");
}
