//! Post collection, post item and posts-by-author handlers.

use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use blog_core::domain::{Post, PostFields, PostQuery};
use blog_core::error::{DomainError, RepoError};
use blog_core::permissions::{AuthorOrReadOnly, IsAuthenticated, IsAuthenticatedOrReadOnly};
use blog_shared::dto::PaginatedResponse;

use super::{parse_json, render};
use crate::middleware::auth::Caller;
use crate::middleware::error::AppResult;
use crate::state::AppState;

const COLLECTION_POLICY: IsAuthenticatedOrReadOnly = IsAuthenticatedOrReadOnly;
const ITEM_POLICY: AuthorOrReadOnly = AuthorOrReadOnly;
const BY_AUTHOR_POLICY: IsAuthenticated = IsAuthenticated;

#[derive(Debug, Deserialize)]
pub struct PageParams {
    page: Option<String>,
    page_size: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuthorParams {
    username: Option<String>,
}

async fn find_post(state: &AppState, post_id: i64) -> AppResult<Post> {
    state.posts.find_by_id(post_id).await?.ok_or_else(|| {
        DomainError::NotFound {
            entity_type: "post",
            id: post_id,
        }
        .into()
    })
}

/// GET /posts
///
/// The whole collection, unless `page` or `page_size` asks for one page.
pub async fn list_posts(
    req: HttpRequest,
    state: web::Data<AppState>,
    caller: Caller,
    params: web::Query<PageParams>,
) -> AppResult<HttpResponse> {
    caller.authorize(&COLLECTION_POLICY)?;

    let query = PostQuery::all();
    let request = state
        .pagination
        .page_request(params.page.as_deref(), params.page_size.as_deref())?;

    let Some(request) = request else {
        let posts = state.posts.list(&query).await?;
        return Ok(HttpResponse::Ok().json(render::posts(posts)));
    };

    let count = state.posts.count(&query).await?;
    let window = request.locate(count)?;
    let posts = state.posts.list(&query.with_slice(window.slice())).await?;
    let (next, previous) = render::page_links(&req, &window, params.page_size.is_some());

    Ok(HttpResponse::Ok().json(PaginatedResponse {
        count,
        next,
        previous,
        results: render::posts(posts),
    }))
}

/// POST /posts
pub async fn create_post(
    state: web::Data<AppState>,
    caller: Caller,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    caller.authorize(&COLLECTION_POLICY)?;
    let identity = caller.required()?;

    let fields = PostFields::from_json(&parse_json(&body)?)?;
    let post = state.posts.create(identity.as_author(), fields).await?;

    tracing::info!(post_id = post.id, author = %post.author.username, "Post created");
    Ok(HttpResponse::Created().json(render::post(post)))
}

/// GET /posts/{post_id}
pub async fn get_post(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    caller.authorize(&ITEM_POLICY)?;

    let post = find_post(&state, path.into_inner()).await?;
    caller.authorize_object(&ITEM_POLICY, &post)?;

    Ok(HttpResponse::Ok().json(render::post(post)))
}

/// PUT /posts/{post_id}
///
/// Full replacement of title and content; only the author may do it.
pub async fn update_post(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<i64>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    caller.authorize(&ITEM_POLICY)?;

    let post = find_post(&state, path.into_inner()).await?;
    caller.authorize_object(&ITEM_POLICY, &post)?;

    let fields = PostFields::from_json(&parse_json(&body)?)?;
    let updated = state.posts.update(post.id, fields).await?;

    tracing::info!(post_id = updated.id, "Post updated");
    Ok(HttpResponse::Ok().json(render::post(updated)))
}

/// DELETE /posts/{post_id}
///
/// A missing post answers 404 with an empty body.
pub async fn delete_post(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    caller.authorize(&ITEM_POLICY)?;

    let post_id = path.into_inner();
    let Some(post) = state.posts.find_by_id(post_id).await? else {
        return Ok(HttpResponse::NotFound().finish());
    };
    caller.authorize_object(&ITEM_POLICY, &post)?;

    match state.posts.delete(post.id).await {
        Ok(()) => {}
        Err(RepoError::NotFound) => return Ok(HttpResponse::NotFound().finish()),
        Err(e) => return Err(e.into()),
    }

    tracing::info!(post_id, "Post deleted successfully.");
    Ok(HttpResponse::NoContent().finish())
}

/// GET /list_post/?username=
///
/// Posts by one author, or every post when `username` is absent or empty.
pub async fn list_posts_for_author(
    state: web::Data<AppState>,
    caller: Caller,
    params: web::Query<AuthorParams>,
) -> AppResult<HttpResponse> {
    caller.authorize(&BY_AUTHOR_POLICY)?;

    let query = match params.username.as_deref() {
        Some(username) if !username.is_empty() => PostQuery::all().by_username(username),
        _ => PostQuery::all(),
    };
    let posts = state.posts.list(&query).await?;

    Ok(HttpResponse::Ok().json(render::posts(posts)))
}
