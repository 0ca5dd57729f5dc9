//! Integration tests for the bundled UI, static assets and /health.

mod common;

use axum::body::Body;
use http::{header, Request, StatusCode};
use tower::ServiceExt;

use common::{parse_body, setup_app, StubClient};

async fn get(app: axum::Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1_048_576)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

#[tokio::test]
async fn test_index_serves_html() {
    let app = setup_app(StubClient::new(&[]), &["m"]);

    let response = get(app, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/html; charset=utf-8"
    );
    let html = body_text(response).await;
    assert!(html.contains("<title>prom2grafana</title>"));
}

#[tokio::test]
async fn test_static_assets_served_with_content_type() {
    for (uri, content_type) in [
        ("/static/style.css", "text/css"),
        ("/static/app.js", "javascript"),
    ] {
        let app = setup_app(StubClient::new(&[]), &["m"]);
        let response = get(app, uri).await;

        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        let header = response.headers().get(header::CONTENT_TYPE).unwrap();
        assert!(
            header.to_str().unwrap().contains(content_type),
            "{} served as {:?}",
            uri,
            header
        );
        assert!(!body_text(response).await.is_empty());
    }
}

#[tokio::test]
async fn test_missing_static_asset_is_404() {
    let app = setup_app(StubClient::new(&[]), &["m"]);

    let (status, json) = parse_body(get(app, "/static/missing.png").await).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Not found");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = setup_app(StubClient::new(&[]), &["m"]);

    let (status, json) = parse_body(get(app, "/index.html").await).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Not found");
}

#[tokio::test]
async fn test_health_lists_models_in_order() {
    let app = setup_app(StubClient::new(&[]), &["primary", "backup"]);

    let (status, json) = parse_body(get(app, "/health").await).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "prom2grafana");
    assert_eq!(json["models"], serde_json::json!(["primary", "backup"]));
}

#[tokio::test]
async fn test_request_ids_are_unique() {
    let app = setup_app(StubClient::new(&[]), &["m"]);

    let first = get(app.clone(), "/health").await;
    let second = get(app, "/health").await;

    let first_id = first.headers().get("x-request-id").unwrap().to_str().unwrap().to_string();
    let second_id = second.headers().get("x-request-id").unwrap().to_str().unwrap().to_string();
    assert_eq!(first_id.len(), 36, "expected a UUID: {}", first_id);
    assert_ne!(first_id, second_id);
}

#[tokio::test]
async fn test_error_responses_carry_request_id() {
    let app = setup_app(StubClient::new(&[]), &["m"]);

    let response = get(app, "/convert").await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(response.headers().get("x-request-id").is_some());
}
