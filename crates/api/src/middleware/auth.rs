//! Bearer-token route guard.

use agenda_db::models::user::User;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::auth::jwt::{verify_token, TokenKind};
use crate::auth::AuthError;
use crate::error::AppError;
use crate::state::AppState;

/// The user behind a valid access token in the `Authorization` header.
///
/// ```ignore
/// async fn me(BearerUser(user): BearerUser) -> AppResult<Json<MeResponse>> { .. }
/// ```
///
/// Rejects with 401 when the header is missing, malformed, or carries an
/// expired/invalid/refresh token, and with 404 when the token's subject has
/// since been deleted.
#[derive(Debug, Clone)]
pub struct BearerUser(pub User);

impl FromRequestParts<AppState> for BearerUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthError::Unauthorized)?;

        let claims = verify_token(token, TokenKind::Access, &state.config.jwt)
            .map_err(AuthError::from)?;

        let user = state
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or(AuthError::NotFound(claims.sub))?;

        Ok(BearerUser(user))
    }
}

/// The token part of `Authorization: Bearer <token>`, if present.
///
/// The scheme is matched case-insensitively, so `bearer <token>` (the
/// `token_type` the login endpoints return) is accepted too.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = header.trim_start().split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim()).filter(|t| !t.is_empty())
}
