//! Token issuer and verifier.
//!
//! Both access and refresh tokens are HS256-signed JWTs carrying the same
//! identity ([`TokenIdentity`]) plus a `typ` claim naming their purpose. A
//! token is only accepted in the slot matching its kind, so a refresh token
//! replayed as an access token is rejected as invalid.
//!
//! There is no revocation: nothing server-side records issued tokens, and a
//! token stays valid until its `exp` passes. Logout only removes the client's
//! copies.

use agenda_core::types::DbId;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which slot a token was minted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived credential for a single request window.
    Access,
    /// Longer-lived credential used only to mint a new pair.
    Refresh,
}

/// The caller-supplied part of the claims: who the token speaks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIdentity {
    pub user_id: DbId,
    pub nickname: String,
}

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    pub nickname: String,
    /// Token purpose; checked on every verification.
    pub typ: TokenKind,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4), so two tokens issued in the same
    /// second never collide.
    pub jti: String,
}

impl Claims {
    /// Build claims for `identity` expiring after the lifetime configured for `kind`.
    pub fn new(identity: &TokenIdentity, kind: TokenKind, config: &JwtConfig) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: identity.user_id,
            nickname: identity.nickname.clone(),
            typ: kind,
            exp: now + config.lifetime_secs(kind),
            iat: now,
            jti: Uuid::new_v4().to_string(),
        }
    }

    pub fn identity(&self) -> TokenIdentity {
        TokenIdentity {
            user_id: self.sub,
            nickname: self.nickname.clone(),
        }
    }
}

/// An access token and a refresh token minted together.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Why a presented token was rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,
    /// Bad signature, malformed payload, wrong algorithm, or wrong kind.
    #[error("Invalid token")]
    Invalid,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        }
    }
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in minutes (default: 15).
    pub access_token_expiry_mins: i64,
    /// Refresh token lifetime in days (default: 7).
    pub refresh_token_expiry_days: i64,
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;
/// Default refresh token expiry in days.
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 7;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `15`    |
    /// | `JWT_REFRESH_EXPIRY_DAYS`  | no       | `7`     |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty, or if an expiry is not
    /// a positive integer small enough for `exp` to stay within `i64`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let secret = lookup("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = lookup("JWT_ACCESS_EXPIRY_MINS")
            .map(|v| v.parse().expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64"))
            .unwrap_or(DEFAULT_ACCESS_EXPIRY_MINS);
        check_lifetime(access_token_expiry_mins, 60, "JWT_ACCESS_EXPIRY_MINS");

        let refresh_token_expiry_days: i64 = lookup("JWT_REFRESH_EXPIRY_DAYS")
            .map(|v| v.parse().expect("JWT_REFRESH_EXPIRY_DAYS must be a valid i64"))
            .unwrap_or(DEFAULT_REFRESH_EXPIRY_DAYS);
        check_lifetime(refresh_token_expiry_days, 24 * 60 * 60, "JWT_REFRESH_EXPIRY_DAYS");

        Self {
            secret,
            access_token_expiry_mins,
            refresh_token_expiry_days,
        }
    }

    /// Lifetime of a token of the given kind, in seconds.
    pub fn lifetime_secs(&self, kind: TokenKind) -> i64 {
        match kind {
            TokenKind::Access => self.access_token_expiry_mins * 60,
            TokenKind::Refresh => self.refresh_token_expiry_days * 24 * 60 * 60,
        }
    }
}

/// Startup check that `value` units of `unit_secs` is positive and that an
/// `exp` computed from it cannot overflow.
fn check_lifetime(value: i64, unit_secs: i64, var: &str) {
    assert!(value > 0, "{var} must be positive");
    value
        .checked_mul(unit_secs)
        .and_then(|secs| chrono::Utc::now().timestamp().checked_add(secs))
        .unwrap_or_else(|| panic!("{var} is too large"));
}

/// Sign arbitrary claims with the configured secret.
pub fn encode_claims(
    claims: &Claims,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Issue an access token (default lifetime 15 minutes).
pub fn issue_access_token(
    identity: &TokenIdentity,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode_claims(&Claims::new(identity, TokenKind::Access, config), config)
}

/// Issue a refresh token (default lifetime 7 days).
pub fn issue_refresh_token(
    identity: &TokenIdentity,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode_claims(&Claims::new(identity, TokenKind::Refresh, config), config)
}

/// Issue a fresh access + refresh pair for the same identity.
pub fn issue_token_pair(
    identity: &TokenIdentity,
    config: &JwtConfig,
) -> Result<TokenPair, jsonwebtoken::errors::Error> {
    Ok(TokenPair {
        access_token: issue_access_token(identity, config)?,
        refresh_token: issue_refresh_token(identity, config)?,
    })
}

/// Decode `token`, checking signature, expiry, and that it was minted as `expected`.
///
/// Expiry is checked with zero leeway: a token is expired from the second
/// after its `exp`.
pub fn verify_token(
    token: &str,
    expected: TokenKind,
    config: &JwtConfig,
) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    if token_data.claims.typ != expected {
        return Err(TokenError::Invalid);
    }
    Ok(token_data.claims)
}
