//! Repository interfaces
//!
//! The core never talks to a database directly. It goes through these
//! async traits, implemented by the PostgreSQL adapter (`postgres`) and the
//! in-process adapter (`memory`). Consistency of concurrent writes
//! (unique emails, atomic revocation) is the adapter's job.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::RefreshTokenRecord;
use crate::error::AppError;

/// A registered user, as held by the user store
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub hashed_password: String,
    /// Set by the payment provider webhook
    pub is_chirpy_red: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Chirp {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub user_id: Uuid,
}

/// Refresh token row to insert; the plaintext token never gets here
#[derive(Debug, Clone)]
pub struct NewRefreshToken {
    pub token_hash: String,
    pub user_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Fails with `DatabaseError::UniqueConstraintViolation` on a taken email
    async fn create(&self, email: &str, hashed_password: &str) -> Result<User, AppError>;

    /// Replace email and password hash; `DatabaseError::NotFound` if the user is gone
    async fn update_credentials(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<User, AppError>;

    /// Set the upgraded flag; returns `false` for an unknown user
    async fn upgrade(&self, id: Uuid) -> Result<bool, AppError>;

    /// Remove every user together with their chirps and refresh tokens
    async fn delete_all(&self) -> Result<u64, AppError>;
}

#[async_trait]
pub trait ChirpStore: Send + Sync {
    async fn create(&self, user_id: Uuid, body: &str) -> Result<Chirp, AppError>;

    async fn find(&self, id: Uuid) -> Result<Option<Chirp>, AppError>;

    /// Returns `false` when nothing was deleted
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

/// Persistence contract for refresh tokens, keyed by SHA-256 digest
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    async fn insert(&self, token: NewRefreshToken) -> Result<(), AppError>;

    async fn find(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;

    /// Stamp `revoked_at` unless already set; returns `false` for an unknown token
    async fn revoke(&self, token_hash: &str, revoked_at: DateTime<Utc>) -> Result<bool, AppError>;
}

/// The set of stores handed to request handlers
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserStore>,
    pub chirps: Arc<dyn ChirpStore>,
    pub refresh_tokens: Arc<dyn RefreshTokenStore>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(postgres::PgStore::new(pool));
        Self {
            users: store.clone(),
            chirps: store.clone(),
            refresh_tokens: store,
        }
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(memory::InMemoryStore::new());
        Self {
            users: store.clone(),
            chirps: store.clone(),
            refresh_tokens: store,
        }
    }
}
