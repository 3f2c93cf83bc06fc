//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- access/refresh token issuing and verification.
//! - [`cookies`] -- the session cookies carrying those tokens.
//! - [`session`] -- the refresh coordinator deciding when to re-issue.

pub mod cookies;
pub mod jwt;
pub mod password;
pub mod session;

use agenda_core::error::CoreError;
use agenda_core::types::DbId;

use crate::auth::jwt::TokenError;
use crate::error::AppError;

/// Every way an authentication step can fail, as seen by a client.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    TokenInvalid,

    /// No usable token chain was presented.
    #[error("Not authenticated")]
    Unauthorized,

    /// The token was fine but its subject no longer exists.
    #[error("User {0} not found")]
    NotFound(DbId),

    #[error("User already exists")]
    DuplicateUser,
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthError::TokenExpired,
            TokenError::Invalid => AuthError::TokenInvalid,
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotFound(id) => AppError::Core(CoreError::NotFound { entity: "User", id }),
            AuthError::DuplicateUser => AppError::BadRequest(err.to_string()),
            AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::TokenInvalid
            | AuthError::Unauthorized => AppError::Core(CoreError::Unauthorized(err.to_string())),
        }
    }
}
