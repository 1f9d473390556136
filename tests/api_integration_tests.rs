//! Integration Tests for API Endpoints
//!
//! Tests the full request/response cycle: store a record, then stat and
//! read the file rendered from it.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use template_vfs::{api::create_router, AppState, KeyConfig, KeyGenerator, MemoryDataStore, TemplateStore};

// == Helper Functions ==

const TTL: Duration = Duration::from_secs(300);

const REDIRECT: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>{{.Title}}</title>
</head>
<body>
    <h1>{{.Caption}}</h1>
<script>
    window.location.href = "{{.Url}}"
</script>
</body>
</html>
"#;

fn create_test_app() -> (TempDir, Router) {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("default.tmpl"), "{{.Caption}}").unwrap();
    std::fs::create_dir_all(dir.path().join("example")).unwrap();
    std::fs::write(dir.path().join("example/redirect.tmpl"), REDIRECT).unwrap();

    let keys = KeyConfig {
        alphabet: "1234567890abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ".to_string(),
        format: "X".repeat(32),
        pattern: "[0-9a-zA-Z]{32}".to_string(),
    };
    let state = AppState::new(
        Arc::new(TemplateStore::new(dir.path(), TTL, 100).unwrap()),
        Arc::new(MemoryDataStore::new(TTL, 100)),
        Arc::new(KeyGenerator::new(keys).unwrap()),
    )
    .unwrap();
    (dir, create_router(state))
}

async fn body_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX).await.unwrap().to_vec()
}

async fn body_to_json(body: Body) -> Value {
    serde_json::from_slice(&body_bytes(body).await).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> axum::response::Response {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.clone().oneshot(request.body(body).unwrap()).await.unwrap()
}

async fn put_record(app: &Router, body: &str) -> String {
    let response = send(app, "PUT", "/data", Some(body)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    json["key"].as_str().unwrap().to_string()
}

// == Data Endpoint Tests ==

#[tokio::test]
async fn test_put_data_returns_key_and_ttl() {
    let (_dir, app) = create_test_app();

    let response = send(&app, "PUT", "/data", Some(r#"{"payload":{"Caption":"hi"},"ttl":60}"#)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["key"].as_str().unwrap().len(), 32);
    assert_eq!(json["ttl"], 60);
}

#[tokio::test]
async fn test_put_data_default_ttl() {
    let (_dir, app) = create_test_app();

    let response = send(&app, "PUT", "/data", Some(r#"{"payload":{}}"#)).await;
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["ttl"], 300);
}

#[tokio::test]
async fn test_put_data_invalid_key() {
    let (_dir, app) = create_test_app();

    let response = send(&app, "PUT", "/data", Some(r#"{"payload":{},"key":"short"}"#)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_put_data_malformed_body() {
    let (_dir, app) = create_test_app();

    let response = send(&app, "PUT", "/data", Some(r#"{"nopayload":1"#)).await;
    assert!(response.status().is_client_error());
}

// == Stat / Read Tests ==

#[tokio::test]
async fn test_stat_and_read_default_template() {
    let (_dir, app) = create_test_app();
    let key = put_record(&app, r#"{"payload":{"Caption":"hi"}}"#).await;

    let response = send(&app, "GET", &format!("/stat/{}.html", key), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let stat = body_to_json(response.into_body()).await;
    assert_eq!(stat["size"], 2);
    assert_eq!(stat["is_dir"], false);
    assert_eq!(stat["name"], format!("{}.html", key));

    let response = send(&app, "GET", &format!("/files/{}.html", key), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_LENGTH], "2");
    assert!(response.headers().contains_key(header::LAST_MODIFIED));
    assert_eq!(body_bytes(response.into_body()).await, b"hi".to_vec());
}

#[tokio::test]
async fn test_read_nested_template() {
    let (_dir, app) = create_test_app();
    let key = put_record(
        &app,
        r#"{"payload":{"Title":"Title","Caption":"Caption","Url":"https://example.com"}}"#,
    )
    .await;

    let response = send(&app, "GET", &format!("/files/example/redirect/{}.html", key), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = String::from_utf8(body_bytes(response.into_body()).await).unwrap();
    assert!(html.contains("<title>Title</title>"));
    assert!(html.contains(r#"window.location.href = "https://example.com""#));
}

#[tokio::test]
async fn test_read_with_offset() {
    let (_dir, app) = create_test_app();
    let key = put_record(&app, r#"{"payload":{"Caption":"hello"}}"#).await;

    let response = send(&app, "GET", &format!("/files/{}.txt?offset=3", key), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response.into_body()).await, b"lo".to_vec());
}

#[tokio::test]
async fn test_read_offset_past_end() {
    let (_dir, app) = create_test_app();
    let key = put_record(&app, r#"{"payload":{"Caption":"hi"}}"#).await;

    let response = send(&app, "GET", &format!("/files/{}.html?offset=3", key), None).await;
    assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
}

#[tokio::test]
async fn test_stat_directory_probe() {
    let (_dir, app) = create_test_app();

    let response = send(&app, "GET", "/stat/example/redirect", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let stat = body_to_json(response.into_body()).await;
    assert_eq!(stat["size"], 0);
    assert_eq!(stat["is_dir"], true);
}

#[tokio::test]
async fn test_missing_template_is_unavailable() {
    let (_dir, app) = create_test_app();
    let key = put_record(&app, r#"{"payload":{"Caption":"hi"}}"#).await;

    let response = send(&app, "GET", &format!("/stat/nowhere/{}.html", key), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"], "file unavailable");
}

#[tokio::test]
async fn test_traversal_is_unavailable() {
    let (_dir, app) = create_test_app();
    let key = put_record(&app, r#"{"payload":{"Caption":"hi"}}"#).await;

    let response = send(&app, "GET", &format!("/files/../../etc/{}.html", key), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_render_error_is_unavailable() {
    let (_dir, app) = create_test_app();
    let key = put_record(&app, r#"{"payload":{"Title":"no caption"}}"#).await;

    let response = send(&app, "GET", &format!("/files/{}.html", key), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_expired_record_is_unavailable() {
    let (_dir, app) = create_test_app();
    let key = put_record(&app, r#"{"payload":{"Caption":"hi"},"ttl":0}"#).await;

    let response = send(&app, "GET", &format!("/files/{}.html", key), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == Unsupported Operation Tests ==

#[tokio::test]
async fn test_mutations_not_allowed() {
    let (_dir, app) = create_test_app();
    let key = put_record(&app, r#"{"payload":{"Caption":"hi"}}"#).await;
    let path = format!("/files/{}.html", key);

    let response = send(&app, "DELETE", &path, None).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = send(&app, "PUT", &path, Some("{}")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = send(&app, "GET", "/dirs/example", None).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    // Still served afterwards
    let response = send(&app, "GET", &path, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// == Stats Tests ==

#[tokio::test]
async fn test_stats_track_both_caches() {
    let (_dir, app) = create_test_app();
    let key = put_record(&app, r#"{"payload":{"Caption":"hi"}}"#).await;

    send(&app, "GET", &format!("/files/{}.html", key), None).await;
    send(&app, "GET", &format!("/files/{}.html", key), None).await;

    let response = send(&app, "GET", "/stats", None).await;
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["templates"]["total_entries"], 1);
    assert_eq!(json["templates"]["hits"], 1);
    assert_eq!(json["templates"]["misses"], 1);
    assert_eq!(json["templates"]["hit_rate"], 0.5);
    assert_eq!(json["data"]["hits"], 2);
    assert_eq!(json["data"]["hit_rate"], 1.0);
}

// == Real Socket Test ==

#[tokio::test]
async fn test_download_over_http() {
    let (_dir, app) = create_test_app();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::new();
    let put: Value = client
        .put(format!("http://{}/data", addr))
        .json(&serde_json::json!({"payload": {"Caption": "downloaded"}}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let key = put["key"].as_str().unwrap();

    let body = client
        .get(format!("http://{}/files/{}.html", addr, key))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "downloaded");

    server.abort();
}
