//! Homepage greeting.

use actix_web::HttpResponse;

use blog_core::permissions::AllowAny;
use blog_shared::dto::MessageResponse;

use crate::middleware::auth::Caller;
use crate::middleware::error::AppResult;

/// GET /homepage
pub async fn homepage(caller: Caller) -> AppResult<HttpResponse> {
    caller.authorize(&AllowAny)?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Hello, World!")))
}
