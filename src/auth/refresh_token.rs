/// Refresh Token Management
///
/// Refresh tokens are:
/// - 32 bytes from the operating system CSPRNG, hex-encoded (64 chars)
/// - Hashed with SHA-256 before they reach the store (never store plaintext)
/// - Reusable until they expire or are explicitly revoked (no rotation)
/// - Never deleted; revocation only stamps `revoked_at`
///
/// State machine: `Active` -> `Revoked` (explicit write) or
/// `Active` -> `Expired` (derived from the clock). Both are terminal.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{AppError, AuthError};
use crate::store::{NewRefreshToken, RefreshTokenStore};

/// Random bytes per refresh token
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// A refresh token as persisted by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub user_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTokenState {
    Active,
    Revoked,
    Expired,
}

impl RefreshTokenRecord {
    /// Lifecycle state at `now`; revocation wins over expiry
    pub fn state_at(&self, now: DateTime<Utc>) -> RefreshTokenState {
        if self.revoked_at.is_some() {
            RefreshTokenState::Revoked
        } else if self.expires_at <= now {
            RefreshTokenState::Expired
        } else {
            RefreshTokenState::Active
        }
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.state_at(now) == RefreshTokenState::Active
    }
}

/// Generate a new refresh token
///
/// # Errors
/// Returns `AppError::Internal` if the OS random source fails; this is
/// not retried.
pub fn generate_refresh_token() -> Result<String, AppError> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AppError::Internal(format!("Random source failed: {}", e)))?;
    Ok(hex::encode(bytes))
}

/// SHA-256 hex digest used as the store key for a refresh token
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Generate a refresh token for `user_id` and persist it as `Active`
///
/// Returns the plaintext token; only its digest is stored.
pub async fn issue_refresh_token(
    store: &dyn RefreshTokenStore,
    user_id: Uuid,
    ttl: Duration,
) -> Result<String, AppError> {
    let token = generate_refresh_token()?;
    let issued_at = Utc::now();

    store
        .insert(NewRefreshToken {
            token_hash: hash_token(&token),
            user_id,
            issued_at,
            expires_at: issued_at + ttl,
        })
        .await?;

    tracing::debug!(user_id = %user_id, "Refresh token issued");
    Ok(token)
}

/// Look up the stored record for a plaintext token (pure read)
pub async fn lookup_refresh_token(
    store: &dyn RefreshTokenStore,
    token: &str,
) -> Result<Option<RefreshTokenRecord>, AppError> {
    store.find(&hash_token(token)).await
}

/// Revoke a refresh token
///
/// Revoking an already revoked token succeeds and keeps the original
/// `revoked_at`.
///
/// # Errors
/// `AuthError::RefreshTokenInvalid` when the token is unknown, or a store
/// error.
pub async fn revoke_refresh_token(
    store: &dyn RefreshTokenStore,
    token: &str,
) -> Result<(), AppError> {
    let found = store.revoke(&hash_token(token), Utc::now()).await?;
    if !found {
        tracing::warn!("Attempt to revoke unknown refresh token");
        return Err(AppError::Auth(AuthError::RefreshTokenInvalid));
    }

    Ok(())
}
