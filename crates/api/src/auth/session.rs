//! Refresh coordinator.
//!
//! Decides, from the two cookie values alone, whether a request is
//! authenticated and whether a fresh token pair has to be handed back.
//! No I/O happens here; loading the user is the route guard's job.

use crate::auth::jwt::{issue_token_pair, verify_token, Claims, JwtConfig, TokenKind, TokenPair};

/// A request that established a usable token chain.
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    /// Claims of whichever token authenticated the request.
    pub claims: Claims,
    /// Set when the access token was unusable and the refresh token was
    /// exchanged; the caller must overwrite both cookies with it.
    pub renewed: Option<TokenPair>,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No usable token chain. `clear_cookies` is set when a refresh token
    /// was presented but rejected, so the client is forced to log in again.
    #[error("Not authenticated")]
    Unauthorized { clear_cookies: bool },

    #[error("Failed to issue tokens: {0}")]
    Issue(#[from] jsonwebtoken::errors::Error),
}

/// Run the per-request state machine over the access and refresh cookies.
///
/// 1. A valid access token authenticates the request as-is.
/// 2. Otherwise, with no refresh token the request is unauthorized.
/// 3. A rejected refresh token is unauthorized and clears both cookies.
/// 4. A valid refresh token mints a new pair from its own claims.
///
/// Exactly one refresh attempt is made.
pub fn resolve_session(
    access: Option<&str>,
    refresh: Option<&str>,
    config: &JwtConfig,
) -> Result<ResolvedSession, SessionError> {
    if let Some(access) = access {
        match verify_token(access, TokenKind::Access, config) {
            Ok(claims) => {
                return Ok(ResolvedSession {
                    claims,
                    renewed: None,
                })
            }
            Err(reason) => tracing::debug!(%reason, "Access cookie rejected, trying refresh"),
        }
    }

    let Some(refresh) = refresh else {
        return Err(SessionError::Unauthorized {
            clear_cookies: false,
        });
    };

    let (claims, pair) = refresh_session(refresh, config)?;
    Ok(ResolvedSession {
        claims,
        renewed: Some(pair),
    })
}

/// Exchange a refresh token for a brand new access + refresh pair.
///
/// The previous tokens are not revoked; they stay valid until they expire.
pub fn refresh_session(
    refresh: &str,
    config: &JwtConfig,
) -> Result<(Claims, TokenPair), SessionError> {
    let claims = verify_token(refresh, TokenKind::Refresh, config).map_err(|reason| {
        tracing::debug!(%reason, "Refresh token rejected");
        SessionError::Unauthorized {
            clear_cookies: true,
        }
    })?;

    let pair = issue_token_pair(&claims.identity(), config)?;
    Ok((claims, pair))
}
