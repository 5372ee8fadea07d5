//! Health check endpoints for the relay.
//!
//! Both routes answer 200 regardless of configuration, so platform liveness checks
//! stay green even when the inference key is missing.

use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;

use crate::AppState;

/// Plain-text liveness check at `GET /`.
#[tracing::instrument]
pub async fn root() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("DeepScan AI Backend is Running!")
}

/// Returns a JSON response indicating the API is healthy.
///
/// # Example
/// ```json
/// { "status": "ok", "mode": "forward", "timestamp": "2025-01-15T10:30:00Z" }
/// ```
#[tracing::instrument(skip(app_state))]
pub async fn health_check(app_state: web::Data<AppState>) -> impl Responder {
    tracing::info!("Health check endpoint called");
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "mode": app_state.settings.mode,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
