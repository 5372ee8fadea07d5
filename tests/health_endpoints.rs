//! Tests for the liveness endpoints.
//!
//! These must answer 200 whatever the configuration looks like.

use actix_web::{App, http::StatusCode, test, web};
use deepscan::{AnalyzeMode, AppState, Settings, handlers};

fn state(mode: AnalyzeMode) -> AppState {
    AppState::new(Settings {
        mode,
        gemini_api_key: None,
        ..Settings::default()
    })
    .expect("failed to build app state")
}

#[actix_web::test]
async fn test_root_reports_running() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(AnalyzeMode::Forward)))
            .configure(handlers::configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"DeepScan AI Backend is Running!");
}

#[actix_web::test]
async fn test_health_is_ok_without_api_key() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(AnalyzeMode::Simulate)))
            .configure(handlers::configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["mode"], "simulate");
    assert!(body["timestamp"].is_string());
}
