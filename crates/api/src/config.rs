use crate::auth::cookies::CookieConfig;
use crate::auth::jwt::JwtConfig;

/// Which browser origins may call the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// `*`: any origin, but never with credentials.
    Any,
    /// An explicit allow-list; credentials (cookies) are permitted.
    List(Vec<String>),
}

impl CorsOrigins {
    /// Parse a comma-separated `CORS_ORIGINS` value.
    ///
    /// A lone `*` means [`CorsOrigins::Any`]; mixing `*` with explicit
    /// origins is rejected since browsers refuse wildcard + credentials.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let origins: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        match origins.as_slice() {
            [] => Err("CORS_ORIGINS must not be empty".into()),
            [only] if only == "*" => Ok(CorsOrigins::Any),
            list if list.iter().any(|o| o == "*") => {
                Err("CORS_ORIGINS cannot mix '*' with explicit origins".into())
            }
            list => Ok(CorsOrigins::List(list.to_vec())),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins (default: `*`).
    pub cors_origins: CorsOrigins,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Session cookie attributes.
    pub cookies: CookieConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default   |
    /// |------------------------|-----------|
    /// | `HOST`                 | `0.0.0.0` |
    /// | `PORT`                 | `8000`    |
    /// | `CORS_ORIGINS`         | `*`       |
    /// | `REQUEST_TIMEOUT_SECS` | `30`      |
    /// | `SECURE_COOKIES`       | `false`   |
    ///
    /// JWT settings are read by [`JwtConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics on any malformed value; configuration errors stop startup.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());

        let port: u16 = lookup("PORT")
            .unwrap_or_else(|| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = CorsOrigins::parse(&lookup("CORS_ORIGINS").unwrap_or_else(|| "*".into()))
            .unwrap_or_else(|e| panic!("Invalid CORS_ORIGINS: {e}"));

        let request_timeout_secs: u64 = lookup("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_lookup(&lookup);
        let cookies = CookieConfig::from_lookup(&lookup);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            cookies,
        }
    }
}
