//! Handlers about the calling user.

use actix_web::{HttpRequest, HttpResponse, web};

use blog_core::domain::PostQuery;
use blog_core::permissions::IsAuthenticated;
use blog_shared::dto::CurrentUserPostsResponse;

use super::render;
use crate::middleware::auth::Caller;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /current_user/
///
/// The caller's account with links to each of their posts.
pub async fn current_user_posts(
    req: HttpRequest,
    state: web::Data<AppState>,
    caller: Caller,
) -> AppResult<HttpResponse> {
    caller.authorize(&IsAuthenticated)?;
    let identity = caller.required()?;

    // A valid token can outlive its account.
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User no longer exists.".to_string()))?;

    let posts = state
        .posts
        .list(&PostQuery::all().by_author_id(user.id))
        .await?;
    let links = posts
        .iter()
        .map(|post| render::post_url(&req, post.id))
        .collect::<AppResult<Vec<_>>>()?;

    Ok(HttpResponse::Ok().json(CurrentUserPostsResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        posts: links,
    }))
}
