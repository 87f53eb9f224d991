/// Authorization Guard
///
/// The only entry point request handlers use: resolves who is calling,
/// exchanges refresh tokens, and decides ownership and webhook access.
/// Token internals never leave this module; callers get an identity or an
/// `AuthError`.

use actix_web::http::header::HeaderMap;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::auth::credentials::{extract_api_key, extract_bearer};
use crate::auth::jwt::{issue_access_token, verify_access_token};
use crate::auth::refresh_token::{lookup_refresh_token, RefreshTokenState};
use crate::error::{AppError, AuthError};
use crate::store::RefreshTokenStore;

/// Resolve the caller's identity from `Authorization: Bearer <access token>`
pub fn resolve_session(headers: &HeaderMap, secret: &str) -> Result<Uuid, AuthError> {
    let token = extract_bearer(headers)?;
    verify_access_token(&token, secret)
}

/// Outcome of a successful refresh exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshedSession {
    pub user_id: Uuid,
    pub access_token: String,
}

/// Exchange a refresh token for a fresh access token
///
/// The refresh token stays active; concurrent exchanges with the same
/// token each mint their own access token.
///
/// # Errors
/// `AuthError::RefreshTokenInvalid` when the token is unknown, revoked or
/// expired; store and signing failures pass through unchanged.
pub async fn refresh_session(
    refresh_token: &str,
    store: &dyn RefreshTokenStore,
    secret: &str,
    access_ttl: Duration,
) -> Result<RefreshedSession, AppError> {
    let record = lookup_refresh_token(store, refresh_token)
        .await?
        .ok_or(AuthError::RefreshTokenInvalid)?;

    let state = record.state_at(Utc::now());
    if state != RefreshTokenState::Active {
        tracing::warn!(user_id = %record.user_id, state = ?state, "Refresh token rejected");
        return Err(AuthError::RefreshTokenInvalid.into());
    }

    let access_token = issue_access_token(record.user_id, secret, access_ttl)?;
    Ok(RefreshedSession {
        user_id: record.user_id,
        access_token,
    })
}

/// Allow only when the requester is the resource owner
pub fn authorize_ownership(requester: Uuid, owner: Uuid) -> Result<(), AuthError> {
    if requester == owner {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

/// Allow only when `Authorization: ApiKey <key>` matches `configured_key` exactly
pub fn authorize_webhook(headers: &HeaderMap, configured_key: &str) -> Result<(), AuthError> {
    let key = extract_api_key(headers)?;
    if key == configured_key {
        Ok(())
    } else {
        Err(AuthError::InvalidApiKey)
    }
}
