//! Registration and error mapping against a live PostgreSQL credential store.

mod common;

use std::sync::Arc;

use agenda_api::error::AppError;
use agenda_core::types::DbId;
use agenda_db::models::user::{CreateUser, User};
use agenda_db::repositories::UserRepo;
use agenda_db::store::{PgUserStore, UserStore};
use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::{body_json, build_app_with_store, post_json};
use serde_json::json;
use sqlx::PgPool;

/// A [`PgUserStore`] whose nickname lookup never finds anything, so the
/// handler's pre-check passes and the insert hits the unique index, as when
/// two registrations for the same nickname run concurrently.
struct LookupMissStore(PgUserStore);

#[async_trait]
impl UserStore for LookupMissStore {
    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, sqlx::Error> {
        self.0.find_by_id(id).await
    }

    async fn find_by_nickname(&self, _nickname: &str) -> Result<Option<User>, sqlx::Error> {
        Ok(None)
    }

    async fn create(&self, input: &CreateUser) -> Result<User, sqlx::Error> {
        self.0.create(input).await
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        self.0.health_check().await
    }
}

fn new_user(nickname: &str) -> CreateUser {
    CreateUser {
        nickname: nickname.to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_then_login_against_postgres(pool: PgPool) {
    let app = build_app_with_store(Arc::new(PgUserStore::new(pool)));

    let body = json!({ "nickname": "bob", "password": "hunter22" });
    let response = post_json(app.clone(), "/api/register", body.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json(app.clone(), "/api/register", body.clone()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(app, "/api/loginJSON", body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// A duplicate that slips past the lookup is still reported as a duplicate.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_duplicate_caught_by_unique_index(pool: PgPool) {
    UserRepo::create(&pool, &new_user("alice")).await.unwrap();
    let app = build_app_with_store(Arc::new(LookupMissStore(PgUserStore::new(pool.clone()))));

    let body = json!({ "nickname": "alice", "password": "secret1" });
    let response = post_json(app, "/api/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "User already exists");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

/// Unique violations on `uq_*` constraints outside registration render as 409.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_unique_violation_maps_to_conflict(pool: PgPool) {
    UserRepo::create(&pool, &new_user("alice")).await.unwrap();
    let err = UserRepo::create(&pool, &new_user("alice"))
        .await
        .expect_err("duplicate insert must fail");

    let response = AppError::Database(err).into_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("uq_users_nickname"));
}
