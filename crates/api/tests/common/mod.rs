//! Shared helpers for the HTTP integration tests.
//!
//! The router is built exactly as in production; only the credential store
//! is swapped for [`MemoryUserStore`], so these tests need no database.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use agenda_api::auth::cookies::CookieConfig;
use agenda_api::auth::jwt::JwtConfig;
use agenda_api::auth::password::hash_password;
use agenda_api::config::{CorsOrigins, ServerConfig};
use agenda_api::routes;
use agenda_api::state::AppState;
use agenda_core::types::DbId;
use agenda_db::models::user::{CreateUser, User};
use agenda_db::store::UserStore;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// In-memory credential store
// ---------------------------------------------------------------------------

/// A [`UserStore`] backed by a `Vec`, with ids assigned from 1.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
    next_id: AtomicI64,
    unhealthy: AtomicBool,
}

impl MemoryUserStore {
    /// Remove a user, simulating deletion after tokens were issued.
    pub fn remove(&self, id: DbId) {
        self.users.lock().unwrap().retain(|u| u.id != id);
    }

    pub fn set_unhealthy(&self, unhealthy: bool) {
        self.unhealthy.store(unhealthy, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, sqlx::Error> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, sqlx::Error> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.nickname == nickname)
            .cloned())
    }

    async fn create(&self, input: &CreateUser) -> Result<User, sqlx::Error> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.nickname == input.nickname) {
            return Err(sqlx::Error::Protocol("duplicate nickname".into()));
        }
        let now = chrono::Utc::now();
        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            nickname: input.nickname.clone(),
            password_hash: input.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        if self.unhealthy.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

pub const TEST_SECRET: &str = "integration-test-secret-with-enough-bytes";

/// Build a test `ServerConfig` with an explicit CORS origin and insecure cookies.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: CorsOrigins::List(vec!["http://localhost:5173".to_string()]),
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        cookies: CookieConfig { secure: false },
    }
}

/// Build the full application router around the given store.
pub fn build_test_app(store: Arc<MemoryUserStore>) -> Router {
    build_app_with_store(store)
}

/// Same as [`build_test_app`] for any credential store.
pub fn build_app_with_store(users: Arc<dyn UserStore>) -> Router {
    let state = AppState {
        users,
        config: Arc::new(test_config()),
    };
    routes::build_app(state)
}

/// A fresh store plus the app serving it.
pub fn test_app() -> (Router, Arc<MemoryUserStore>) {
    let store = Arc::new(MemoryUserStore::default());
    (build_test_app(Arc::clone(&store)), store)
}

/// Insert a user with a real Argon2 hash of `password`.
pub async fn seed_user(store: &MemoryUserStore, nickname: &str, password: &str) -> User {
    let input = CreateUser {
        nickname: nickname.to_string(),
        password_hash: hash_password(password).expect("hashing should succeed"),
    };
    store.create(&input).await.expect("seeding should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should be handled")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_with_cookies(app: Router, uri: &str, cookies: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header(COOKIE, cookies)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_form(app: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::post(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_with_cookies(app: Router, uri: &str, cookies: Option<&str>) -> Response<Body> {
    let mut builder = Request::post(uri);
    if let Some(cookies) = cookies {
        builder = builder.header(COOKIE, cookies);
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// All `Set-Cookie` header values, in order.
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

/// The value a `Set-Cookie` list assigns to `name`, if any.
pub fn cookie_value(set_cookies: &[String], name: &str) -> Option<String> {
    set_cookies.iter().find_map(|c| {
        let (pair, _) = c.split_once(';').unwrap_or((c.as_str(), ""));
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

/// Whether `set_cookies` expires both session cookies.
pub fn clears_both_cookies(set_cookies: &[String]) -> bool {
    ["access_token", "refresh_token"].iter().all(|name| {
        set_cookies
            .iter()
            .any(|c| c.starts_with(&format!("{name}=;")) && c.contains("Max-Age=0"))
    })
}
