//! Route definitions for login, session, and registration endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Auth routes, mounted under `/api`.
///
/// ```text
/// POST /loginJSON      -> login_json     (sets cookies)
/// POST /loginOAuth     -> login_oauth    (form body, no cookies)
/// POST /logout         -> logout         (clears cookies)
/// POST /refresh-token  -> refresh_token  (refresh cookie)
/// GET  /me             -> me             (Bearer token)
/// GET  /me-cookie      -> me_cookie      (session cookies)
/// POST /register       -> register
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/loginJSON", post(auth::login_json))
        .route("/loginOAuth", post(auth::login_oauth))
        .route("/logout", post(auth::logout))
        .route("/refresh-token", post(auth::refresh_token))
        .route("/me", get(auth::me))
        .route("/me-cookie", get(auth::me_cookie))
        .route("/register", post(auth::register))
}
