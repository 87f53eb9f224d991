/// Payment Provider Webhook
///
/// The provider authenticates with `Authorization: ApiKey <key>`. Only the
/// `user.upgraded` event has an effect; everything else is acknowledged.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::authorize_webhook;
use crate::configuration::AuthSettings;
use crate::error::{AppError, DatabaseError, ValidationError};
use crate::store::Repositories;

const USER_UPGRADED: &str = "user.upgraded";

#[derive(Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    pub data: Option<WebhookData>,
}

#[derive(Deserialize)]
pub struct WebhookData {
    pub user_id: Uuid,
}

/// POST /api/polka/webhooks
///
/// The key is checked before the payload is parsed.
///
/// # Errors
/// - 401: Missing, malformed or wrong API key
/// - 400: Unparseable payload, or `user.upgraded` without a user id
/// - 404: `user.upgraded` for an unknown user
pub async fn polka_webhook(
    req: HttpRequest,
    payload: web::Bytes,
    repos: web::Data<Repositories>,
    auth: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    authorize_webhook(req.headers(), &auth.polka_key)?;

    let event: WebhookEvent = serde_json::from_slice(&payload)
        .map_err(|_| ValidationError::InvalidFormat("webhook payload".to_string()))?;

    if event.event != USER_UPGRADED {
        tracing::debug!(event = %event.event, "Ignoring webhook event");
        return Ok(HttpResponse::NoContent().finish());
    }

    let user_id = event
        .data
        .map(|data| data.user_id)
        .ok_or_else(|| ValidationError::EmptyField("data.user_id".to_string()))?;

    if !repos.users.upgrade(user_id).await? {
        return Err(AppError::Database(DatabaseError::NotFound(
            "User not found".to_string(),
        )));
    }

    tracing::info!(user_id = %user_id, "User upgraded");
    Ok(HttpResponse::NoContent().finish())
}
