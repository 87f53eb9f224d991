/// Session Routes
///
/// Login, access token refresh and refresh token revocation. Refresh and
/// revoke take the refresh token as `Authorization: Bearer <refresh token>`.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;

use super::{verify_off_thread, CredentialsRequest, UserResponse};
use crate::auth::{
    extract_bearer, issue_access_token, issue_refresh_token, refresh_session,
    revoke_refresh_token, DecoyDigest,
};
use crate::configuration::AuthSettings;
use crate::error::{AppError, AuthError, ErrorContext};
use crate::store::Repositories;

/// Login response: the user plus a fresh session
#[derive(Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub token: String,
    pub refresh_token: String,
}

/// POST /api/login
///
/// # Errors
/// - 401: Unknown email or wrong password (indistinguishable)
/// - 500: Store, signing or random source failure
pub async fn login(
    form: web::Json<CredentialsRequest>,
    repos: web::Data<Repositories>,
    auth: web::Data<AuthSettings>,
    decoy: web::Data<DecoyDigest>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_login");
    let CredentialsRequest { email, password } = form.into_inner();

    let user = repos.users.find_by_email(email.trim()).await?;
    let stored = user.as_ref().map(|u| u.hashed_password.clone());

    // Unknown emails pay the same bcrypt cost as wrong passwords
    let matched = verify_off_thread(password, stored, decoy).await?;
    let user = match user {
        Some(user) if matched => user,
        _ => {
            let err = AppError::Auth(AuthError::InvalidCredentials);
            context.log_error(&err);
            return Err(err);
        }
    };

    let token = issue_access_token(user.id, &auth.jwt_secret, auth.access_token_ttl())?;
    let refresh_token = issue_refresh_token(
        repos.refresh_tokens.as_ref(),
        user.id,
        auth.refresh_token_ttl(),
    )
    .await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.id,
        "User logged in successfully"
    );

    Ok(HttpResponse::Ok().json(LoginResponse {
        user: UserResponse::from(user),
        token,
        refresh_token,
    }))
}

/// POST /api/refresh
///
/// Exchange a refresh token for a new access token. The presented refresh
/// token stays valid; a new refresh token is issued alongside.
///
/// # Errors
/// - 401: Missing, unknown, revoked or expired refresh token
pub async fn refresh(
    req: HttpRequest,
    repos: web::Data<Repositories>,
    auth: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_refresh");
    let presented = extract_bearer(req.headers())?;

    let session = refresh_session(
        &presented,
        repos.refresh_tokens.as_ref(),
        &auth.jwt_secret,
        auth.access_token_ttl(),
    )
    .await?;
    let refresh_token = issue_refresh_token(
        repos.refresh_tokens.as_ref(),
        session.user_id,
        auth.refresh_token_ttl(),
    )
    .await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %session.user_id,
        "Access token refreshed"
    );

    Ok(HttpResponse::Ok().json(RefreshResponse {
        token: session.access_token,
        refresh_token,
    }))
}

/// POST /api/revoke
///
/// # Errors
/// - 401: Missing header or unknown refresh token
pub async fn revoke(
    req: HttpRequest,
    repos: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_revoke");
    let presented = extract_bearer(req.headers())?;

    revoke_refresh_token(repos.refresh_tokens.as_ref(), &presented).await?;

    tracing::info!(request_id = %context.request_id, "Refresh token revoked");
    Ok(HttpResponse::NoContent().finish())
}
