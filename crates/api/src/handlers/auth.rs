//! Handlers for login, logout, token refresh, identity, and registration.

use agenda_core::error::CoreError;
use agenda_core::types::DbId;
use agenda_core::validation::{normalize_nickname, validate_password_strength, MIN_PASSWORD_LENGTH};
use agenda_db::models::user::{CreateUser, User, UserResponse};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use crate::auth::cookies::{read_cookie, SessionCookies, REFRESH_COOKIE_NAME};
use crate::auth::jwt::{issue_token_pair, TokenIdentity, TokenPair};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::{refresh_session, SessionError};
use crate::auth::AuthError;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::BearerUser;
use crate::middleware::session::{CookieUser, SessionRejection};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /loginJSON`.
///
/// Both fields default to empty so a missing password is reported as bad
/// credentials rather than as a malformed body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub password: String,
}

/// Form body for `POST /loginOAuth` (OAuth2 password grant field names).
#[derive(Debug, Deserialize)]
pub struct OAuthLoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for `POST /register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub nickname: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Always `"bearer"`.
    pub token_type: &'static str,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "bearer",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub message: &'static str,
    pub user_id: DbId,
}

/// Minimal identity returned by `GET /me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: DbId,
    pub nickname: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/loginJSON
///
/// Verify nickname + password, then set both session cookies and echo the
/// tokens in the body.
pub async fn login_json(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<(SessionCookies, Json<TokenResponse>)> {
    let user = authenticate(&state, &input.nickname, &input.password).await?;
    let pair = issue_pair_for(&state, &user)?;

    let config = &state.config;
    // Setting both names overwrites any previous session; no separate clear is sent.
    let cookies = SessionCookies::issue(&pair, &config.jwt, &config.cookies);
    Ok((cookies, Json(pair.into())))
}

/// POST /api/loginOAuth
///
/// Same credential check as [`login_json`], from an OAuth2 password form.
/// Tokens are only returned in the body; no cookies are set.
pub async fn login_oauth(
    State(state): State<AppState>,
    Form(input): Form<OAuthLoginForm>,
) -> AppResult<Json<TokenResponse>> {
    let user = authenticate(&state, &input.username, &input.password).await?;
    let pair = issue_pair_for(&state, &user)?;
    Ok(Json(pair.into()))
}

/// POST /api/logout
///
/// Always succeeds. Only the client's cookies are removed; tokens already
/// issued remain valid until they expire.
pub async fn logout(State(state): State<AppState>) -> (SessionCookies, Json<MessageResponse>) {
    (
        SessionCookies::clear(&state.config.cookies),
        Json(MessageResponse {
            message: "Logged out",
        }),
    )
}

/// POST /api/refresh-token
///
/// Exchange the refresh cookie for a new cookie pair.
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(SessionCookies, Json<RefreshResponse>), SessionRejection> {
    let config = &state.config;
    let refresh = read_cookie(&headers, REFRESH_COOKIE_NAME).ok_or(AuthError::Unauthorized)?;

    let (claims, pair) = match refresh_session(&refresh, &config.jwt) {
        Ok(refreshed) => refreshed,
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

    tracing::info!(user_id = claims.sub, "Tokens refreshed");

    Ok((
        SessionCookies::issue(&pair, &config.jwt, &config.cookies),
        Json(RefreshResponse {
            message: "Tokens refreshed",
            user_id: claims.sub,
        }),
    ))
}

/// GET /api/me
pub async fn me(BearerUser(user): BearerUser) -> Json<MeResponse> {
    Json(MeResponse {
        id: user.id,
        nickname: user.nickname,
    })
}

/// GET /api/me-cookie
///
/// Cookie-authenticated user record. Renewed cookies ride along when the
/// access cookie had to be refreshed.
pub async fn me_cookie(session: CookieUser) -> (Option<SessionCookies>, Json<UserResponse>) {
    (session.renewed, Json(UserResponse::from(&session.user)))
}

/// POST /api/register
///
/// Create a user. Duplicate nicknames are a 400, not a 409.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let nickname = normalize_nickname(&input.nickname).map_err(CoreError::Validation)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(CoreError::Validation)?;

    if state.users.find_by_nickname(nickname).await?.is_some() {
        return Err(AuthError::DuplicateUser.into());
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let create = CreateUser {
        nickname: nickname.to_string(),
        password_hash,
    };
    // A concurrent registration can still win the race to the unique index.
    let user = match state.users.create(&create).await {
        Ok(user) => user,
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            return Err(AuthError::DuplicateUser.into());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = user.id, nickname = %user.nickname, "User registered");

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Look up `nickname` and check `password` against its stored hash.
///
/// Unknown nickname, empty password, and wrong password are all reported
/// as the same [`AuthError::InvalidCredentials`].
async fn authenticate(state: &AppState, nickname: &str, password: &str) -> AppResult<User> {
    let nickname = nickname.trim();
    if nickname.is_empty() || password.is_empty() {
        tracing::warn!(nickname, "Login rejected: missing credentials");
        return Err(AuthError::InvalidCredentials.into());
    }

    let Some(user) = state.users.find_by_nickname(nickname).await? else {
        tracing::warn!(nickname, "Login rejected: unknown nickname");
        return Err(AuthError::InvalidCredentials.into());
    };

    let password_valid = verify_password(password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::warn!(nickname, "Login rejected: wrong password");
        return Err(AuthError::InvalidCredentials.into());
    }

    tracing::info!(user_id = user.id, "User logged in");
    Ok(user)
}

fn issue_pair_for(state: &AppState, user: &User) -> AppResult<TokenPair> {
    let identity = TokenIdentity {
        user_id: user.id,
        nickname: user.nickname.clone(),
    };
    issue_token_pair(&identity, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))
}
