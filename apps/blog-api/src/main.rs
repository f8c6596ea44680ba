//! # Blog API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use blog_api::config::AppConfig;
use blog_api::configure_app;
use blog_api::observability::RequestIdMiddleware;
use blog_api::state::AppState;
use blog_api::telemetry::{TelemetryConfig, init_telemetry};
use blog_core::ports::{PasswordService, TokenService};
use blog_infra::auth::{Argon2PasswordService, JwtTokenService};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!("Starting Blog API Server on {}:{}", config.host, config.port);

    let state = AppState::new(config.database.as_ref(), config.pagination).await;
    let token_service: Arc<dyn TokenService> = Arc::new(JwtTokenService::from_env());
    let password_service: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(RequestIdMiddleware)
            .configure(configure_app(
                state.clone(),
                token_service.clone(),
                password_service.clone(),
            ))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
