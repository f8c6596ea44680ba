//! Domain to wire conversions.

use actix_web::HttpRequest;

use blog_core::domain::{Post, User};
use blog_core::pagination::{PAGE_QUERY_PARAM, PAGE_SIZE_QUERY_PARAM, PageWindow};
use blog_shared::dto::{PostResponse, UserResponse};

use crate::middleware::error::{AppError, AppResult};

/// Route name of the post item endpoint, used to build links.
pub const POST_DETAIL_ROUTE: &str = "post_detail";

pub fn post(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        content: post.content,
        author: post.author.username,
        created_at: post.created_at.to_rfc3339(),
    }
}

pub fn posts(posts: Vec<Post>) -> Vec<PostResponse> {
    posts.into_iter().map(post).collect()
}

pub fn user(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        created_at: user.created_at.to_rfc3339(),
    }
}

/// Absolute URL of a post's item endpoint.
pub fn post_url(req: &HttpRequest, post_id: i64) -> AppResult<String> {
    req.url_for(POST_DETAIL_ROUTE, [post_id.to_string()])
        .map(|url| url.to_string())
        .map_err(|e| AppError::Internal(format!("cannot build post url: {e}")))
}

/// Absolute URLs of the neighbouring pages of `window`, `(next, previous)`.
///
/// The page size is only repeated when the client chose one.
pub fn page_links(
    req: &HttpRequest,
    window: &PageWindow,
    explicit_size: bool,
) -> (Option<String>, Option<String>) {
    let info = req.connection_info();
    let base = format!("{}://{}{}", info.scheme(), info.host(), req.path());
    let link = |number: u64| {
        if explicit_size {
            format!(
                "{base}?{PAGE_QUERY_PARAM}={number}&{PAGE_SIZE_QUERY_PARAM}={}",
                window.size
            )
        } else {
            format!("{base}?{PAGE_QUERY_PARAM}={number}")
        }
    };

    (
        window.next_number().map(link),
        window.previous_number().map(link),
    )
}
