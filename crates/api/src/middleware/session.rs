//! Cookie-session route guard.
//!
//! Composes the session boundary, the refresh coordinator, and the credential
//! store: read both cookies, establish a token chain (refreshing once if the
//! access cookie is unusable), then load the user by the verified subject.

use agenda_db::models::user::User;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};

use crate::auth::cookies::{read_cookie, SessionCookies, ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME};
use crate::auth::session::{resolve_session, SessionError};
use crate::auth::AuthError;
use crate::error::AppError;
use crate::state::AppState;

/// The user behind the request's session cookies.
///
/// When the access cookie had to be renewed, `renewed` holds the new cookies
/// and the handler must include them in its response:
///
/// ```ignore
/// async fn me_cookie(session: CookieUser) -> AppResult<impl IntoResponse> {
///     Ok((session.renewed, Json(UserResponse::from(&session.user))))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CookieUser {
    pub user: User,
    pub renewed: Option<SessionCookies>,
}

/// Rejection for [`CookieUser`]: the error response, plus cleared cookies
/// when a bad refresh token was presented.
#[derive(Debug)]
pub struct SessionRejection {
    pub error: AppError,
    pub clear: Option<SessionCookies>,
}

impl From<AppError> for SessionRejection {
    fn from(error: AppError) -> Self {
        Self { error, clear: None }
    }
}

impl From<AuthError> for SessionRejection {
    fn from(error: AuthError) -> Self {
        AppError::from(error).into()
    }
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        (self.clear, self.error).into_response()
    }
}

impl FromRequestParts<AppState> for CookieUser {
    type Rejection = SessionRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let config = &state.config;
        let access = read_cookie(&parts.headers, ACCESS_COOKIE_NAME);
        let refresh = read_cookie(&parts.headers, REFRESH_COOKIE_NAME);

        let session = match resolve_session(access.as_deref(), refresh.as_deref(), &config.jwt) {
            Ok(session) => session,
            Err(SessionError::Unauthorized { clear_cookies }) => {
                return Err(SessionRejection {
                    error: AuthError::Unauthorized.into(),
                    clear: clear_cookies.then(|| SessionCookies::clear(&config.cookies)),
                });
            }
            Err(SessionError::Issue(e)) => {
                return Err(AppError::InternalError(format!("Token generation failed: {e}")).into());
            }
        };

        let user_id = session.claims.sub;
        let user = state
            .users
            .find_by_id(user_id)
            .await
            .map_err(AppError::from)?
            .ok_or(AuthError::NotFound(user_id))?;

        let renewed = session.renewed.map(|pair| {
            tracing::info!(user_id, "Session refreshed from refresh cookie");
            SessionCookies::issue(&pair, &config.jwt, &config.cookies)
        });

        Ok(CookieUser { user, renewed })
    }
}
