//! # Blog API
//!
//! Actix-web application: posts owned by their authors, readable by anyone,
//! written through bearer-token accounts.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;

use actix_web::web;
use std::sync::Arc;

use blog_core::ports::{PasswordService, TokenService};

use state::AppState;

/// Register shared services and every route on an `App`.
pub fn configure_app(
    state: AppState,
    token_service: Arc<dyn TokenService>,
    password_service: Arc<dyn PasswordService>,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(state))
            .app_data(web::Data::new(token_service))
            .app_data(web::Data::new(password_service));
        handlers::configure_routes(cfg);
    }
}
