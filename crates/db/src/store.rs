//! The credential store seam.
//!
//! HTTP handlers and route guards reach user records only through
//! [`UserStore`], so the auth flow can be exercised against any backend.
//! [`PgUserStore`] is the production implementation.

use agenda_core::types::DbId;
use async_trait::async_trait;

use crate::models::user::{CreateUser, User};
use crate::repositories::UserRepo;
use crate::DbPool;

/// Persisted user records, keyed by id and by unique nickname.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, sqlx::Error>;

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, sqlx::Error>;

    /// Insert a user whose password is already hashed.
    async fn create(&self, input: &CreateUser) -> Result<User, sqlx::Error>;

    /// Confirm the backing store is reachable.
    async fn health_check(&self) -> Result<(), sqlx::Error>;
}

/// [`UserStore`] over a PostgreSQL pool, delegating to [`UserRepo`].
#[derive(Clone)]
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, sqlx::Error> {
        UserRepo::find_by_id(&self.pool, id).await
    }

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, sqlx::Error> {
        UserRepo::find_by_nickname(&self.pool, nickname).await
    }

    async fn create(&self, input: &CreateUser) -> Result<User, sqlx::Error> {
        let user = UserRepo::create(&self.pool, input).await?;
        tracing::debug!(user_id = user.id, "User row inserted");
        Ok(user)
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }
}
