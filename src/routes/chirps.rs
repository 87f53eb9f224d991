/// Chirp Routes
///
/// Creation and deletion require an access token; deletion additionally
/// requires ownership.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::authorize_ownership;
use crate::error::{AppError, DatabaseError, ErrorContext};
use crate::extractors::AuthenticatedUser;
use crate::store::{Chirp, Repositories};
use crate::validators::clean_chirp_body;

#[derive(Deserialize)]
pub struct NewChirpRequest {
    pub body: String,
}

#[derive(Serialize)]
pub struct ChirpResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub user_id: Uuid,
}

impl From<Chirp> for ChirpResponse {
    fn from(chirp: Chirp) -> Self {
        Self {
            id: chirp.id,
            created_at: chirp.created_at,
            updated_at: chirp.updated_at,
            body: chirp.body,
            user_id: chirp.user_id,
        }
    }
}

fn chirp_not_found() -> AppError {
    AppError::Database(DatabaseError::NotFound("Chirp not found".to_string()))
}

/// POST /api/chirps
pub async fn create_chirp(
    user: AuthenticatedUser,
    form: web::Json<NewChirpRequest>,
    repos: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let body = clean_chirp_body(&form.body)?;
    let chirp = repos.chirps.create(user.id(), &body).await?;

    tracing::info!(user_id = %user.id(), chirp_id = %chirp.id, "Chirp created");
    Ok(HttpResponse::Created().json(ChirpResponse::from(chirp)))
}

/// GET /api/chirps/{chirp_id}
pub async fn get_chirp(
    path: web::Path<Uuid>,
    repos: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let chirp = repos
        .chirps
        .find(path.into_inner())
        .await?
        .ok_or_else(chirp_not_found)?;

    Ok(HttpResponse::Ok().json(ChirpResponse::from(chirp)))
}

/// DELETE /api/chirps/{chirp_id}
///
/// # Errors
/// - 401: Missing or invalid access token
/// - 403: Caller is not the author
/// - 404: No such chirp
pub async fn delete_chirp(
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    repos: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = path.into_inner();
    let context = ErrorContext::new("delete_chirp").with_user_id(user.id());

    let chirp = repos.chirps.find(chirp_id).await?.ok_or_else(chirp_not_found)?;

    if let Err(denied) = authorize_ownership(user.id(), chirp.user_id) {
        let err = AppError::from(denied);
        context.log_error(&err);
        return Err(err);
    }

    if !repos.chirps.delete(chirp_id).await? {
        return Err(chirp_not_found());
    }

    tracing::info!(
        request_id = %context.request_id,
        chirp_id = %chirp_id,
        "Chirp deleted"
    );
    Ok(HttpResponse::NoContent().finish())
}
