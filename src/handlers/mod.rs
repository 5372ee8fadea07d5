//! Handler module organization for the relay API.
//!
//! This module re-exports the health and analyze handlers and wires them to routes.

pub mod analyze;
pub mod health;

use actix_web::web;

/// Registers all relay endpoints.
///
/// ```text
/// GET  /              - plain-text liveness check
/// GET  /api/health    - JSON health status
/// POST /api/analyze   - deepfake analysis
/// ```
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health::root)).service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .route("/analyze", web::post().to(analyze::analyze)),
    );
}
