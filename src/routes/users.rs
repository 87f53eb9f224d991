/// User Routes
///
/// Registration and credential updates.

use actix_web::{web, HttpResponse};

use super::{hash_off_thread, CredentialsRequest, UserResponse};
use crate::configuration::AuthSettings;
use crate::error::{AppError, ErrorContext};
use crate::extractors::AuthenticatedUser;
use crate::store::Repositories;
use crate::validators::{is_valid_email, is_valid_password};

/// POST /api/users
///
/// Register a new user. The password is stored only as a bcrypt digest.
///
/// # Errors
/// - 400: Invalid email or password
/// - 409: Email already registered
/// - 500: Hashing or store failure
pub async fn create_user(
    form: web::Json<CredentialsRequest>,
    repos: web::Data<Repositories>,
    auth: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_registration");
    let CredentialsRequest { email, password } = form.into_inner();

    let email = is_valid_email(&email)?;
    is_valid_password(&password)?;
    let hashed_password = hash_off_thread(password, auth.bcrypt_cost).await?;

    let user = repos
        .users
        .create(&email, &hashed_password)
        .await
        .map_err(|e| {
            context.log_error(&e);
            e
        })?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.id,
        "User registered successfully"
    );

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// PUT /api/users
///
/// Replace the authenticated user's email and password.
///
/// # Errors
/// - 401: Missing or invalid access token
/// - 400: Invalid email or password
/// - 409: Email taken by another user
pub async fn update_user(
    user: AuthenticatedUser,
    form: web::Json<CredentialsRequest>,
    repos: web::Data<Repositories>,
    auth: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("update_credentials").with_user_id(user.id());
    let CredentialsRequest { email, password } = form.into_inner();

    let email = is_valid_email(&email)?;
    is_valid_password(&password)?;
    let hashed_password = hash_off_thread(password, auth.bcrypt_cost).await?;

    let updated = repos
        .users
        .update_credentials(user.id(), &email, &hashed_password)
        .await
        .map_err(|e| {
            context.log_error(&e);
            e
        })?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %updated.id,
        "User credentials updated"
    );

    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}
