mod admin;
mod auth;
mod chirps;
mod health_check;
mod users;
mod webhooks;

pub use admin::{metrics, reset};
pub use auth::{login, refresh, revoke};
pub use chirps::{create_chirp, delete_chirp, get_chirp};
pub use health_check::health_check;
pub use users::{create_user, update_user};
pub use webhooks::polka_webhook;

use actix_web::web;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{hash_password_with_cost, verify_credentials, DecoyDigest};
use crate::error::AppError;
use crate::store::User;

/// Email + password body shared by registration, login and credential updates
#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a user; the password hash never leaves the store layer
#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub is_chirpy_red: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at,
            updated_at: user.updated_at,
            email: user.email,
            is_chirpy_red: user.is_chirpy_red,
        }
    }
}

// bcrypt is CPU-bound; keep it off the async workers
async fn hash_off_thread(password: String, cost: u32) -> Result<String, AppError> {
    web::block(move || hash_password_with_cost(&password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
}

/// `stored` is `None` for an unknown account; the decoy is checked instead
async fn verify_off_thread(
    password: String,
    stored: Option<String>,
    decoy: web::Data<DecoyDigest>,
) -> Result<bool, AppError> {
    web::block(move || verify_credentials(&password, stored.as_deref(), &decoy))
        .await
        .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))
}
