//! Session boundary: the two token cookies and how they are written and read.
//!
//! Both cookies are `HttpOnly; SameSite=Lax; Path=/`, with `Secure` added
//! when [`CookieConfig::secure`] is set. Their `Max-Age` mirrors the lifetime
//! of the token they carry.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponseParts, ResponseParts};

use crate::auth::jwt::{JwtConfig, TokenKind, TokenPair};
use crate::error::AppError;

pub const ACCESS_COOKIE_NAME: &str = "access_token";
pub const REFRESH_COOKIE_NAME: &str = "refresh_token";

const EPOCH_EXPIRES: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// Cookie attributes that vary per deployment.
#[derive(Debug, Clone, Default)]
pub struct CookieConfig {
    /// Add the `Secure` attribute (default: `false`, for local HTTP).
    pub secure: bool,
}

impl CookieConfig {
    /// Reads `SECURE_COOKIES`; only `true` (any case) or `1` enables it.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let secure = lookup("SECURE_COOKIES")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1"))
            .unwrap_or(false);
        Self { secure }
    }

    fn attributes(&self) -> &'static str {
        if self.secure {
            "HttpOnly; SameSite=Lax; Secure"
        } else {
            "HttpOnly; SameSite=Lax"
        }
    }
}

/// A batch of `Set-Cookie` headers for both session cookies.
///
/// Returned from handlers as a response part: `(cookies, Json(body))`.
#[derive(Debug, Clone)]
pub struct SessionCookies {
    set_cookies: Vec<String>,
}

impl SessionCookies {
    /// Set both cookies to the tokens in `pair`.
    ///
    /// Writing a cookie under an existing name replaces it, so this also
    /// discards whatever session the client held before.
    pub fn issue(pair: &TokenPair, jwt: &JwtConfig, config: &CookieConfig) -> Self {
        let attrs = config.attributes();
        Self {
            set_cookies: vec![
                format!(
                    "{ACCESS_COOKIE_NAME}={}; Path=/; Max-Age={}; {attrs}",
                    pair.access_token,
                    jwt.lifetime_secs(TokenKind::Access)
                ),
                format!(
                    "{REFRESH_COOKIE_NAME}={}; Path=/; Max-Age={}; {attrs}",
                    pair.refresh_token,
                    jwt.lifetime_secs(TokenKind::Refresh)
                ),
            ],
        }
    }

    /// Expire both cookies immediately.
    pub fn clear(config: &CookieConfig) -> Self {
        let attrs = config.attributes();
        Self {
            set_cookies: [ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME]
                .iter()
                .map(|name| format!("{name}=; Path=/; Max-Age=0; Expires={EPOCH_EXPIRES}; {attrs}"))
                .collect(),
        }
    }

    /// The raw `Set-Cookie` header values, in emission order.
    pub fn header_values(&self) -> &[String] {
        &self.set_cookies
    }
}

impl IntoResponseParts for SessionCookies {
    type Error = AppError;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        for cookie in self.set_cookies {
            let value = HeaderValue::from_str(&cookie)
                .map_err(|e| AppError::InternalError(format!("Invalid cookie value: {e}")))?;
            res.headers_mut().append(SET_COOKIE, value);
        }
        Ok(res)
    }
}

/// Find a cookie by name across every `Cookie` header.
///
/// An empty value is treated as absent, which is what a cleared cookie
/// looks like if a client echoes it back.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
