//! Health endpoint and middleware stack tests.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get, test_app};
use tower::ServiceExt;

#[tokio::test]
async fn test_health_ok() {
    let (app, _store) = test_app();

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_degraded_when_store_unreachable() {
    let (app, store) = test_app();
    store.set_unhealthy(true);

    let json = body_json(get(app, "/health").await).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
}

/// Every response carries an `x-request-id`.
#[tokio::test]
async fn test_request_id_is_set() {
    let (app, _store) = test_app();

    let response = get(app, "/health").await;
    assert!(response.headers().contains_key("x-request-id"));
}

/// A caller-provided request id is echoed back.
#[tokio::test]
async fn test_request_id_is_propagated() {
    let (app, _store) = test_app();

    let request = Request::get("/health")
        .header("x-request-id", "abc-123")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.headers().get("x-request-id").unwrap(), "abc-123");
}

/// Explicit origins allow credentials so the session cookies are sent.
#[tokio::test]
async fn test_cors_preflight_allows_credentials() {
    let (app, _store) = test_app();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/me-cookie")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "GET")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    let headers = response.headers();
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        headers.get("access-control-allow-credentials").unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _store) = test_app();

    let response = get(app, "/api/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
