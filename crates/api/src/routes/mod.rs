pub mod auth;
pub mod health;

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::{CorsOrigins, ServerConfig};
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /loginJSON  /loginOAuth  /logout  /refresh-token   session lifecycle
/// /me  /me-cookie                                    current user
/// /register                                          account creation
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(auth::router())
}

/// Build the full application: routes plus the middleware stack.
///
/// Shared by `main` and the integration tests so both exercise the same
/// layers (CORS, request ID, timeout, tracing, panic recovery).
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config);
    let timeout = Duration::from_secs(state.config.request_timeout_secs);
    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        // Health check at root level (not under /api).
        .merge(health::router())
        .nest("/api", api_routes())
        // -- Middleware stack (applied bottom-up) --
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// Build the CORS middleware layer from server configuration.
///
/// A wildcard allows any origin without credentials; an explicit list
/// allows credentials so the session cookies are sent.
///
/// # Panics
///
/// Panics if a configured origin is not a valid header value, so
/// misconfiguration fails at startup.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(3600));

    match &config.cors_origins {
        CorsOrigins::Any => layer.allow_origin(Any),
        CorsOrigins::List(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .map(|o| {
                    o.parse()
                        .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
                })
                .collect();
            layer.allow_origin(origins).allow_credentials(true)
        }
    }
}
