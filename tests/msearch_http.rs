//! Wire-contract tests for the multi-search submission path.
//!
//! The mock endpoint enforces the service's batch validation: a submission
//! whose final body line is not newline-terminated is rejected with HTTP 400
//! and the documented reason; a valid submission is answered with one
//! response entry per (header, body) pair.

use opensearch_demo::{ClientConfig, Error, FieldRegistry, MultiSearchRequest, SearchClient};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

struct MsearchResponder;

impl Respond for MsearchResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body = String::from_utf8_lossy(&request.body);

        if !body.ends_with('\n') {
            return ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "root_cause": [{
                        "type": "illegal_argument_exception",
                        "reason": "The msearch request must be terminated by a newline [\n]"
                    }],
                    "type": "illegal_argument_exception",
                    "reason": "The msearch request must be terminated by a newline [\n]"
                },
                "status": 400
            }));
        }

        let pairs = body.lines().count() / 2;
        let responses: Vec<Value> = (0..pairs)
            .map(|_| json!({ "status": 200, "hits": { "total": { "value": 0 }, "hits": [] } }))
            .collect();

        ResponseTemplate::new(200).set_body_json(json!({ "took": 1, "responses": responses }))
    }
}

async fn msearch_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/_msearch"))
        .respond_with(MsearchResponder)
        .mount(&server)
        .await;
    server
}

async fn client_for(server: &MockServer) -> SearchClient {
    SearchClient::connect(ClientConfig::new(server.uri()))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_structured_submission_yields_one_response_per_descriptor() {
    let server = msearch_server().await;
    let client = client_for(&server).await;

    let registry = FieldRegistry::demo();
    let request = MultiSearchRequest::build(&["index1", "index2", "index3"], "AA", &registry);

    let response = client.msearch(&request).await.unwrap();
    assert_eq!(response.responses.len(), 3);
}

#[tokio::test]
async fn test_duplicate_indices_get_separate_responses() {
    let server = msearch_server().await;
    let client = client_for(&server).await;

    let registry = FieldRegistry::demo();
    let request = MultiSearchRequest::build(&["index1", "index1"], "AA", &registry);

    let response = client.msearch(&request).await.unwrap();
    assert_eq!(response.responses.len(), 2);
}

#[tokio::test]
async fn test_raw_submission_equivalent_to_structured() {
    let server = msearch_server().await;
    let client = client_for(&server).await;

    // Hand-assembled batch carrying the same field knowledge as the
    // registry; must stay in sync with FieldRegistry::demo().
    let raw = concat!(
        "{\"index\":\"index1\",\"search_type\":\"dfs_query_then_fetch\"}\n",
        "{\"track_scores\":true,\"query\":{\"multi_match\":",
        "{\"query\":\"AA\",\"type\":\"bool_prefix\",\"fields\":[\"field11\"],\"operator\":\"and\"}}}\n",
        "{\"index\":\"index2\",\"search_type\":\"dfs_query_then_fetch\"}\n",
        "{\"track_scores\":true,\"query\":{\"multi_match\":",
        "{\"query\":\"AA\",\"type\":\"bool_prefix\",\"fields\":[\"field21\",\"field22\"],\"operator\":\"and\"}}}\n",
        "{\"index\":\"index3\",\"search_type\":\"dfs_query_then_fetch\"}\n",
        "{\"track_scores\":true,\"query\":{\"multi_match\":",
        "{\"query\":\"AA\",\"type\":\"bool_prefix\",\"fields\":[\"field31\"],\"operator\":\"and\"}}}\n",
    );

    let registry = FieldRegistry::demo();
    let request = MultiSearchRequest::build(&["index1", "index2", "index3"], "AA", &registry);
    assert_eq!(request.to_ndjson().unwrap(), raw);

    let structured = client.msearch(&request).await.unwrap();
    let raw_response = client.msearch_raw(raw.to_string()).await.unwrap();
    assert_eq!(structured.responses.len(), raw_response.responses.len());
    assert_eq!(raw_response.responses.len(), 3);
}

#[tokio::test]
async fn test_missing_trailing_newline_rejected() {
    let server = msearch_server().await;
    let client = client_for(&server).await;

    let registry = FieldRegistry::demo();
    let request = MultiSearchRequest::build(&["index1", "index2", "index3"], "AA", &registry);

    let mut body = request.to_ndjson().unwrap();
    body.pop();

    match client.msearch_raw(body).await {
        Err(Error::Api {
            status,
            error_type,
            reason,
        }) => {
            assert_eq!(status, 400);
            assert_eq!(error_type, "illegal_argument_exception");
            assert!(reason.contains("must be terminated by a newline"));
        }
        other => panic!("expected a 400 rejection, got {other:?}"),
    }
}
