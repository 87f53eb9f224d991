//! Request extractors for authentication

use std::future::{ready, Ready};

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use uuid::Uuid;

use crate::auth::resolve_session;
use crate::configuration::AuthSettings;
use crate::error::AppError;

/// Identity of the caller, resolved from `Authorization: Bearer <access token>`
///
/// Handlers that take this argument reject unauthenticated requests with
/// `401` before their body runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub Uuid);

impl AuthenticatedUser {
    pub fn id(&self) -> Uuid {
        self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.app_data::<web::Data<AuthSettings>>() {
            Some(settings) => resolve_session(req.headers(), &settings.jwt_secret)
                .map(AuthenticatedUser)
                .map_err(AppError::from),
            None => Err(AppError::Internal("auth settings are not registered".to_string())),
        };

        if let Ok(user) = &result {
            tracing::debug!(user_id = %user.0, "Session resolved");
        }

        ready(result)
    }
}
