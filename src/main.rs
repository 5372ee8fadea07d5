//! Main entry point for the DeepScan relay server.
//!
//! Loads configuration once, sets up structured logging, and serves the health and
//! analyze routes until Ctrl-C.

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use deepscan::{AnalyzeMode, AppState, Settings, get_subscriber, handlers, init_subscriber, telemetry};
use dotenv::dotenv;
use tracing_actix_web::TracingLogger;

/// Main entry point. Configures and runs the Actix Web server.
///
/// - Loads environment variables from `.env`.
/// - Reads [`Settings`] and builds the shared [`AppState`].
/// - Initializes Bunyan JSON tracing on stdout.
/// - Registers routes with CORS and request logging middleware.
/// - Stops gracefully on Ctrl-C.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let subscriber = get_subscriber("deepscan".to_string(), "info".to_string(), std::io::stdout);
    init_subscriber(subscriber)?;

    let settings = Settings::from_env()?;
    if settings.gemini_api_key.is_none() && settings.mode == AnalyzeMode::Forward {
        tracing::warn!("GEMINI_API_KEY is not set; analyze requests will fail until it is configured");
    }
    tracing::info!(?settings, "configuration loaded");

    let bind_addr = (settings.host.clone(), settings.port);
    let app_state = AppState::new(settings)?;

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(Cors::permissive())
            .wrap(telemetry::RequestLoggingMiddleware::new())
            .wrap(TracingLogger::default())
            .configure(handlers::configure_routes)
    })
    .bind(bind_addr.clone())?
    .run();

    tracing::info!(host = %bind_addr.0, port = bind_addr.1, "DeepScan server is listening");

    let srv_handle = server.handle();

    let server_task = tokio::spawn(server);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Shutdown signal received");
            srv_handle.stop(true).await;
        }
        res = server_task => {
            if let Err(e) = res {
                tracing::error!("Server task failed: {}", e);
            }
        }
    }

    Ok(())
}
