//! Endpoint-level tests driven through the router with `oneshot`; nothing
//! here touches the network.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;
use websearch_api::server::{router, AppState};
use websearch_api::types::{SearchResponse, SearchResult};
use websearch_api::{SearchConfig, Searcher};

fn test_app() -> axum::Router {
    let searcher = Searcher::new(SearchConfig::default()).expect("client should build");
    router(Arc::new(AppState {
        searcher,
        max_results: 10,
    }))
}

fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = hyper::body::to_bytes(response.into_body())
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

fn sample_envelope() -> SearchResponse {
    SearchResponse::new(
        "test query",
        vec![
            SearchResult {
                title: "Test Title 1".to_string(),
                url: "https://example1.com".to_string(),
                description: "Test description 1".to_string(),
                position: 1,
            },
            SearchResult {
                title: "Test Title 2".to_string(),
                url: "https://example2.com".to_string(),
                description: "Test description 2".to_string(),
                position: 2,
            },
        ],
    )
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "OK");
}

#[tokio::test]
async fn empty_query_is_rejected() {
    let response = test_app()
        .oneshot(json_request("/api/search", serde_json::json!({"query": ""})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn whitespace_query_is_rejected() {
    let response = test_app()
        .oneshot(json_request(
            "/api/search",
            serde_json::json!({"query": "   "}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_query_is_rejected() {
    let response = test_app()
        .oneshot(json_request("/api/search", serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn bare_search_route_validates_too() {
    let response = test_app()
        .oneshot(json_request("/search", serde_json::json!({"query": ""})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn csv_export_returns_attachment_with_one_row_per_result() {
    let envelope = sample_envelope();
    let response = test_app()
        .oneshot(json_request(
            "/api/export/csv",
            serde_json::json!({ "results": envelope }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE].to_str().unwrap(),
        "text/csv"
    );
    assert!(response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("attachment"));

    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Position,Title,URL,Description");
    assert!(lines[1].starts_with("1,Test Title 1,"));
    assert!(lines[2].starts_with("2,Test Title 2,"));
}

#[tokio::test]
async fn json_export_round_trips_the_envelope() {
    let envelope = sample_envelope();
    let response = test_app()
        .oneshot(json_request(
            "/api/export/json",
            serde_json::json!({ "results": envelope }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE].to_str().unwrap(),
        "application/json"
    );
    assert!(response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("attachment"));

    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let reparsed: SearchResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(reparsed, envelope);
}

#[tokio::test]
async fn unsupported_export_format_is_rejected() {
    let response = test_app()
        .oneshot(json_request(
            "/api/export/xml",
            serde_json::json!({ "results": sample_envelope() }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Unsupported export format");
}
