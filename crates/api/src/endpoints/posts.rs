//! Post endpoints addressed by post id.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch},
};
use repost_common::AppResult;
use repost_core::{CreateCommentInput, PostView, Resolver, UpdatePostInput, Vote, VoteView};
use serde::Serialize;

use super::comments::CommentResponse;
use crate::{
    extractors::{AuthUser, Json, Pagination, Path, Query},
    middleware::AppState,
    response::{ApiResponse, no_content},
};

/// Post response.
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: i32,
    pub parent_resub_name: String,
    pub title: String,
    pub url: Option<String>,
    pub content: Option<String>,
    pub author_username: String,
    pub created: String,
    pub edited: Option<String>,
    pub votes: i64,
}

impl From<PostView> for PostResponse {
    fn from(view: PostView) -> Self {
        Self {
            id: view.post.id,
            parent_resub_name: view.parent_resub_name,
            title: view.post.title,
            url: view.post.url,
            content: view.post.content,
            author_username: view.author_username,
            created: view.post.created.to_rfc3339(),
            edited: view.post.edited.map(|t| t.to_rfc3339()),
            votes: view.votes,
        }
    }
}

/// One active vote.
#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub voter_username: String,
    pub vote: i32,
}

impl From<VoteView> for VoteResponse {
    fn from(view: VoteView) -> Self {
        Self {
            voter_username: view.voter_username,
            vote: view.vote,
        }
    }
}

async fn show(
    State(state): State<AppState>,
    Path(post_id): Path<i32>,
) -> AppResult<ApiResponse<PostResponse>> {
    let post = state.resolver.resolve_post(post_id).await?;
    let view = state.post_service.view(post).await?;
    Ok(ApiResponse::ok(view.into()))
}

/// Edit a post. Author only.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<i32>,
    Json(input): Json<UpdatePostInput>,
) -> AppResult<ApiResponse<PostResponse>> {
    let post = state.resolver.resolve_post(post_id).await?;
    let post = Resolver::resolve_user_owned_post(post, &user)?;
    let view = state.post_service.update(post, input).await?;
    Ok(ApiResponse::ok(view.into()))
}

/// Delete a post. Author or resub owner.
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<i32>,
) -> AppResult<StatusCode> {
    let post = state.resolver.resolve_post(post_id).await?;
    let post = state
        .resolver
        .resolve_post_owner_or_resub_owner(post, &user)
        .await?;
    state.post_service.delete(post).await?;
    Ok(no_content())
}

/// Vote `1`/`upvote`, `0`/`novote` or `-1`/`downvote`.
async fn vote(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((post_id, vote)): Path<(i32, String)>,
) -> AppResult<ApiResponse<PostResponse>> {
    let vote: Vote = vote.parse()?;
    let post = state.resolver.resolve_post(post_id).await?;
    let view = state.post_service.vote(post, &user, vote).await?;
    Ok(ApiResponse::ok(view.into()))
}

/// Active votes on a post.
async fn list_votes(
    State(state): State<AppState>,
    Path(post_id): Path<i32>,
) -> AppResult<ApiResponse<Vec<VoteResponse>>> {
    let post = state.resolver.resolve_post(post_id).await?;
    let voters = state.post_service.voters(&post).await?;
    Ok(ApiResponse::ok(voters.into_iter().map(Into::into).collect()))
}

/// Every comment under a post, oldest first.
async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<i32>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<CommentResponse>>> {
    let post = state.resolver.resolve_post(post_id).await?;
    let comments = state
        .comment_service
        .list_by_post(&post, page.limit(), page.offset())
        .await?;
    Ok(ApiResponse::ok(
        comments.into_iter().map(Into::into).collect(),
    ))
}

/// Comment on a post.
async fn create_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<i32>,
    Json(input): Json<CreateCommentInput>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let post = state.resolver.resolve_post(post_id).await?;
    let comment = state
        .comment_service
        .create_on_post(&user, &post, input)
        .await?;
    Ok(ApiResponse::created(comment.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{post_id}", get(show).patch(update).delete(delete))
        .route("/{post_id}/vote/{vote}", patch(vote))
        .route("/{post_id}/votes", get(list_votes))
        .route(
            "/{post_id}/comments",
            get(list_comments).post(create_comment),
        )
}
