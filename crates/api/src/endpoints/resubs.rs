//! Resub endpoints, including posts addressed through their resub.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use repost_common::AppResult;
use repost_core::{CreatePostInput, CreateResubInput, Resolver, ResubView, UpdateResubInput};
use serde::Serialize;

use super::posts::PostResponse;
use crate::{
    extractors::{AuthUser, Json, Pagination, Path, Query},
    middleware::AppState,
    response::{ApiResponse, no_content},
};

/// Resub response.
#[derive(Debug, Serialize)]
pub struct ResubResponse {
    pub name: String,
    pub description: Option<String>,
    pub owner_username: String,
    pub created: String,
    pub edited: Option<String>,
}

impl From<ResubView> for ResubResponse {
    fn from(view: ResubView) -> Self {
        Self {
            name: view.resub.name,
            description: view.resub.description,
            owner_username: view.owner_username,
            created: view.resub.created.to_rfc3339(),
            edited: view.resub.edited.map(|t| t.to_rfc3339()),
        }
    }
}

/// List resubs, newest first.
async fn list(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<ResubResponse>>> {
    let resubs = state
        .resub_service
        .list(page.limit(), page.offset())
        .await?;
    Ok(ApiResponse::ok(resubs.into_iter().map(Into::into).collect()))
}

/// Create a resub owned by the caller.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateResubInput>,
) -> AppResult<ApiResponse<ResubResponse>> {
    let resub = state.resub_service.create(&user, input).await?;
    Ok(ApiResponse::created(resub.into()))
}

async fn show(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<ApiResponse<ResubResponse>> {
    let resub = state.resolver.resolve_resub(&name).await?;
    let view = state.resub_service.view(resub).await?;
    Ok(ApiResponse::ok(view.into()))
}

/// Edit a resub. Owner only.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(input): Json<UpdateResubInput>,
) -> AppResult<ApiResponse<ResubResponse>> {
    let resub = state.resolver.resolve_resub(&name).await?;
    let resub = Resolver::resolve_user_owned_resub(resub, &user)?;
    let view = state.resub_service.update(resub, input).await?;
    Ok(ApiResponse::ok(view.into()))
}

/// Delete a resub. Owner only.
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<StatusCode> {
    let resub = state.resolver.resolve_resub(&name).await?;
    let resub = Resolver::resolve_user_owned_resub(resub, &user)?;
    state.resub_service.delete(resub).await?;
    Ok(no_content())
}

/// Posts in a resub, newest first.
async fn list_posts(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<PostResponse>>> {
    let resub = state.resolver.resolve_resub(&name).await?;
    let posts = state
        .post_service
        .list_by_resub(&resub, page.limit(), page.offset())
        .await?;
    Ok(ApiResponse::ok(posts.into_iter().map(Into::into).collect()))
}

/// Submit a post to a resub.
async fn create_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(input): Json<CreatePostInput>,
) -> AppResult<ApiResponse<PostResponse>> {
    let resub = state.resolver.resolve_resub(&name).await?;
    let post = state.post_service.create(&user, &resub, input).await?;
    Ok(ApiResponse::created(post.into()))
}

/// A post, only if it belongs to the named resub.
async fn show_post(
    State(state): State<AppState>,
    Path((name, post_id)): Path<(String, i32)>,
) -> AppResult<ApiResponse<PostResponse>> {
    let resub = state.resolver.resolve_resub(&name).await?;
    let post = state.resolver.resolve_post_in_resub(&resub, post_id).await?;
    let view = state.post_service.view(post).await?;
    Ok(ApiResponse::ok(view.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{resub}", get(show).patch(update).delete(delete))
        .route("/{resub}/posts", get(list_posts).post(create_post))
        .route("/{resub}/posts/{post_id}", get(show_post))
}
