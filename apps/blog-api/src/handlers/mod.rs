//! HTTP handlers and route configuration.

mod auth;
mod health;
mod homepage;
mod posts;
mod render;
mod users;

use actix_web::web;

use crate::middleware::error::{AppError, AppResult};

/// Parse a raw request body as JSON.
///
/// Handlers read the body themselves: permission checks run before the
/// payload is looked at, and field errors come back as one field-keyed map.
pub(crate) fn parse_json(body: &web::Bytes) -> AppResult<serde_json::Value> {
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("JSON parse error - {e}")))
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Public routes
    cfg.route("/homepage", web::get().to(homepage::homepage))
    .route("/health", web::get().to(health::health_check))
    // Posts
    .service(
        web::resource("/posts")
            .route(web::get().to(posts::list_posts))
            .route(web::post().to(posts::create_post)),
    )
    .service(
        web::resource("/posts/{post_id}")
            .name(render::POST_DETAIL_ROUTE)
            .route(web::get().to(posts::get_post))
            .route(web::put().to(posts::update_post))
            .route(web::delete().to(posts::delete_post)),
    )
    .route("/current_user/", web::get().to(users::current_user_posts))
    .route("/list_post/", web::get().to(posts::list_posts_for_author))
    // Auth routes
    .service(
        web::scope("/auth")
            .route("/signup", web::post().to(auth::signup))
            .route("/login", web::post().to(auth::login)),
    );
}
