//! End-to-end HTTP tests against an in-memory store

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use shelf_app::Application;
use shelf_kernel::settings::{DatabaseSettings, Settings};
use tower::ServiceExt;

async fn app() -> Router {
    let settings = Settings {
        database: DatabaseSettings::in_memory(),
        ..Settings::default()
    };
    Application::build(settings)
        .await
        .expect("application should assemble")
        .router()
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(raw) => {
            builder = builder.header("content-type", "application/json");
            Body::from(raw.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

#[tokio::test]
async fn dune_scenario() {
    let router = app().await;

    let (status, created) = send(
        &router,
        "POST",
        "/api/books",
        Some(r#"{"title":"Dune","author":"Herbert"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        created,
        json!({"id": 1, "title": "Dune", "author": "Herbert", "is_available": true})
    );

    let (status, toggled) = send(&router, "PUT", "/api/books/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        toggled,
        json!({"id": 1, "title": "Dune", "author": "Herbert", "is_available": false})
    );

    let (status, listed) = send(&router, "GET", "/api/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        listed,
        json!([{"id": 1, "title": "Dune", "author": "Herbert", "is_available": false}])
    );
}

#[tokio::test]
async fn empty_catalog_lists_empty_array() {
    let router = app().await;
    let (status, listed) = send(&router, "GET", "/api/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn missing_author_is_rejected_and_not_stored() {
    let router = app().await;

    let (status, body) = send(&router, "POST", "/api/books", Some(r#"{"title":"Dune"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(body["error"]["details"][0]["field"], "author");

    let (_, listed) = send(&router, "GET", "/api/books", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let router = app().await;
    let (status, body) = send(&router, "POST", "/api/books", Some("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn toggle_unknown_id_is_not_found() {
    let router = app().await;

    let (status, body) = send(&router, "PUT", "/api/books/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
    assert_eq!(body["error"]["message"], "book 99 not found");

    let (_, listed) = send(&router, "GET", "/api/books", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn non_numeric_id_is_bad_request() {
    let router = app().await;
    let (status, body) = send(&router, "PUT", "/api/books/dune", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn get_single_book() {
    let router = app().await;
    send(
        &router,
        "POST",
        "/api/books",
        Some(r#"{"title":"Emma","author":"Austen"}"#),
    )
    .await;

    let (status, book) = send(&router, "GET", "/api/books/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book["title"], "Emma");

    let (status, _) = send(&router, "GET", "/api/books/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_and_docs_are_served() {
    let router = app().await;

    let (status, body) = send(&router, "GET", "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_string()));

    let (status, spec) = send(&router, "GET", "/docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(spec["paths"]["/api/books"]["post"].is_object());
    assert!(spec["paths"]["/api/books/{id}"]["put"].is_object());
}

#[tokio::test]
async fn cors_preflight_allows_any_origin() {
    let router = app().await;
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/books/1")
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "PUT")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}
