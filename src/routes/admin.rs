use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::configuration::ApplicationSettings;
use crate::error::{AppError, AuthError};
use crate::metrics::HitCounter;
use crate::store::Repositories;

#[derive(Serialize)]
pub struct MetricsResponse {
    pub hits: u64,
}

/// GET /admin/metrics
pub async fn metrics(counter: web::Data<HitCounter>) -> HttpResponse {
    HttpResponse::Ok().json(MetricsResponse {
        hits: counter.hits(),
    })
}

/// POST /admin/reset
///
/// Development only: drops every user (with their chirps and refresh
/// tokens) and zeroes the hit counter.
pub async fn reset(
    app: web::Data<ApplicationSettings>,
    repos: web::Data<Repositories>,
    counter: web::Data<HitCounter>,
) -> Result<HttpResponse, AppError> {
    if !app.is_dev() {
        tracing::warn!(platform = %app.platform, "Reset attempted outside dev");
        return Err(AuthError::Forbidden.into());
    }

    let removed = repos.users.delete_all().await?;
    counter.reset();

    tracing::info!(removed, "Store reset");
    Ok(HttpResponse::Ok().json(serde_json::json!({ "removed_users": removed })))
}
