//! Users endpoints.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use repost_common::AppResult;
use repost_core::{CreateUserInput, UpdateUserInput};
use repost_db::entities::user;
use serde::Serialize;

use super::{comments::CommentResponse, posts::PostResponse, resubs::ResubResponse};
use crate::{
    extractors::{AuthUser, Json, Pagination, Path, Query},
    middleware::AppState,
    response::{ApiResponse, no_content},
};

/// Public view of a user.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub bio: String,
    pub avatar_url: Option<String>,
    pub created: String,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            username: user.username,
            bio: user.bio,
            avatar_url: user.avatar_url,
            created: user.created.to_rfc3339(),
        }
    }
}

/// Register a new user.
async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.create(input).await?;
    Ok(ApiResponse::created(user.into()))
}

/// Get the authenticated user.
async fn me(AuthUser(user): AuthUser) -> ApiResponse<UserResponse> {
    ApiResponse::ok(user.into())
}

async fn update_me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateUserInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.update(user, input).await?;
    Ok(ApiResponse::ok(user.into()))
}

async fn delete_me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<StatusCode> {
    state.user_service.delete(user).await?;
    Ok(no_content())
}

async fn show(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.resolver.resolve_user(&username).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Resubs owned by a user.
async fn resubs(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<ResubResponse>>> {
    let user = state.resolver.resolve_user(&username).await?;
    let resubs = state
        .resub_service
        .list_by_owner(&user, page.limit(), page.offset())
        .await?;
    Ok(ApiResponse::ok(resubs.into_iter().map(Into::into).collect()))
}

/// Posts written by a user.
async fn posts(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<PostResponse>>> {
    let user = state.resolver.resolve_user(&username).await?;
    let posts = state
        .post_service
        .list_by_author(&user, page.limit(), page.offset())
        .await?;
    Ok(ApiResponse::ok(posts.into_iter().map(Into::into).collect()))
}

/// Comments written by a user.
async fn comments(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<CommentResponse>>> {
    let user = state.resolver.resolve_user(&username).await?;
    let comments = state
        .comment_service
        .list_by_author(&user, page.limit(), page.offset())
        .await?;
    Ok(ApiResponse::ok(
        comments.into_iter().map(Into::into).collect(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::post(create))
        .route("/me", get(me).patch(update_me).delete(delete_me))
        .route("/{username}", get(show))
        .route("/{username}/resubs", get(resubs))
        .route("/{username}/posts", get(posts))
        .route("/{username}/comments", get(comments))
}
