//! Pipeline workflow tests: lookup → prompt → model → answer.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use clinical_search::extract::QueryInput;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::support::{
    chat_body, config_for, dialysis_body, mount_chat, mount_terms, pipeline_for, pipeline_with,
    COMPLETIONS_PATH, SEARCH_PATH, TEST_API_KEY,
};

/// Decoded bodies of every chat request the server saw.
async fn chat_requests(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == COMPLETIONS_PATH)
        .map(|r| serde_json::from_slice(&r.body).expect("chat body is JSON"))
        .collect()
}

#[tokio::test]
async fn test_dialysis_query_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("terms", "What is dialysis?"))
        .and(query_param("df", "primary_name,icd10cm"))
        .and(query_param("maxList", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(dialysis_body()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(header("authorization", format!("Bearer {TEST_API_KEY}").as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_body("Dialysis replaces kidney function (N18.6, N19).")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let search = pipeline_for(&server);
    let answer = search.clinical_search("What is dialysis?").await;

    assert_eq!(answer, "Dialysis replaces kidney function (N18.6, N19).");
}

#[tokio::test]
async fn test_prompt_carries_query_and_normalized_data() {
    let server = MockServer::start().await;
    mount_terms(&server, dialysis_body()).await;
    mount_chat(&server, "ok").await;

    let search = pipeline_for(&server);
    search.clinical_search("dialysis").await;

    let requests = chat_requests(&server).await;
    assert_eq!(requests.len(), 1);
    let messages = requests[0]["messages"].as_array().expect("messages array");
    let user = messages.last().expect("user message");

    assert_eq!(user["role"], "user");
    assert_eq!(
        user["content"],
        concat!(
            "Question: dialysis\nData: ",
            r#"{"count":2,"results":["#,
            r#"{"primary_name":"End stage renal disease","icd10_codes":["N18.6"]},"#,
            r#"{"primary_name":"Kidney failure","icd10_codes":["N19"]}]}"#
        )
    );
}

#[tokio::test]
async fn test_request_uses_model_settings_and_persona() {
    let server = MockServer::start().await;
    mount_terms(&server, dialysis_body()).await;
    mount_chat(&server, "ok").await;

    let mut config = config_for(&server);
    config.model.id = "test-org/test-model".to_string();
    config.model.max_tokens = 256;
    config.agent.role = "Clinical Coder".to_string();
    let search = pipeline_with(config);
    search.clinical_search("gout").await;

    let requests = chat_requests(&server).await;
    let body = &requests[0];
    assert_eq!(body["model"], "test-org/test-model");
    assert_eq!(body["max_tokens"], 256);
    assert_eq!(body["messages"][0]["role"], "system");
    assert!(body["messages"][0]["content"]
        .as_str()
        .unwrap()
        .starts_with("You are a Clinical Coder."));
}

#[tokio::test]
async fn test_max_list_setting_reaches_lookup() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("maxList", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(dialysis_body()))
        .expect(1)
        .mount(&server)
        .await;
    mount_chat(&server, "ok").await;

    let mut config = config_for(&server);
    config.nih_api.params.max_list = 3;
    let answer = pipeline_with(config).clinical_search("kidney").await;

    assert_eq!(answer, "ok");
}

#[tokio::test]
async fn test_tool_arguments_are_unwrapped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("terms", "asthma"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            1,
            ["J45.909"],
            null,
            [["Asthma", "[{\"code\":\"J45.909\"}]"]]
        ])))
        .expect(3)
        .mount(&server)
        .await;
    mount_chat(&server, "Asthma narrows the airways.").await;

    let search = pipeline_for(&server);

    for args in [
        json!({"query": "asthma"}),
        json!({"query": {"query": "  asthma  "}}),
        json!("{\"query\": \"asthma\"}"),
    ] {
        let answer = search
            .clinical_search(QueryInput::from_tool_args(args))
            .await;
        assert_eq!(answer, "Asthma narrows the airways.");
    }
}

#[tokio::test]
async fn test_unreadable_code_field_keeps_record() {
    let server = MockServer::start().await;
    mount_terms(&server, json!([1, [], null, [["Gout", 42]]])).await;
    mount_chat(&server, "ok").await;

    let answer = pipeline_for(&server).clinical_search("gout").await;
    assert_eq!(answer, "ok");

    let requests = chat_requests(&server).await;
    let prompt = requests[0]["messages"][1]["content"].as_str().unwrap();
    assert!(prompt.contains(r#"{"primary_name":"Gout","icd10_codes":[]}"#));
}

#[tokio::test]
async fn test_unreadable_name_keeps_other_records() {
    let server = MockServer::start().await;
    mount_terms(
        &server,
        json!([2, [], null, [["Gout", "{\"code\":\"M10.9\"}"], [null, ""]]]),
    )
    .await;
    mount_chat(&server, "ok").await;

    let answer = pipeline_for(&server).clinical_search("gout").await;
    assert_eq!(answer, "ok");

    let requests = chat_requests(&server).await;
    let prompt = requests[0]["messages"][1]["content"].as_str().unwrap();
    assert!(prompt.contains(
        r#"[{"primary_name":"Gout","icd10_codes":["M10.9"]},{"primary_name":"","icd10_codes":[]}]"#
    ));
}

#[tokio::test]
async fn test_concurrent_queries_share_one_pipeline() {
    let server = MockServer::start().await;
    mount_terms(&server, dialysis_body()).await;
    mount_chat(&server, "shared").await;

    let search = pipeline_for(&server);
    let (a, b, c) = tokio::join!(
        search.clinical_search("dialysis"),
        search.clinical_search("kidney failure"),
        search.clinical_search("renal disease"),
    );

    assert_eq!(a, "shared");
    assert_eq!(b, "shared");
    assert_eq!(c, "shared");
    assert_eq!(chat_requests(&server).await.len(), 3);
}
