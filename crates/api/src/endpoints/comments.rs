//! Comment endpoints addressed by comment id.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch},
};
use repost_common::AppResult;
use repost_core::{CommentView, CreateCommentInput, Resolver, UpdateCommentInput, Vote};
use serde::Serialize;

use super::posts::VoteResponse;
use crate::{
    extractors::{AuthUser, Json, Path},
    middleware::AppState,
    response::{ApiResponse, no_content},
};

/// Comment response.
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: i32,
    pub parent_resub_name: String,
    pub parent_post_id: i32,
    pub parent_comment_id: Option<i32>,
    pub content: String,
    pub author_username: String,
    pub created: String,
    pub edited: Option<String>,
    pub votes: i64,
}

impl From<CommentView> for CommentResponse {
    fn from(view: CommentView) -> Self {
        Self {
            id: view.comment.id,
            parent_resub_name: view.parent_resub_name,
            parent_post_id: view.comment.parent_post_id,
            parent_comment_id: view.comment.parent_comment_id,
            content: view.comment.content,
            author_username: view.author_username,
            created: view.comment.created.to_rfc3339(),
            edited: view.comment.edited.map(|t| t.to_rfc3339()),
            votes: view.votes,
        }
    }
}

async fn show(
    State(state): State<AppState>,
    Path(comment_id): Path<i32>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let comment = state.resolver.resolve_comment(comment_id).await?;
    let view = state.comment_service.view(comment).await?;
    Ok(ApiResponse::ok(view.into()))
}

/// Reply to a comment.
async fn reply(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<i32>,
    Json(input): Json<CreateCommentInput>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let parent = state.resolver.resolve_comment(comment_id).await?;
    let view = state.comment_service.reply(&user, &parent, input).await?;
    Ok(ApiResponse::created(view.into()))
}

/// Edit a comment. Author only.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<i32>,
    Json(input): Json<UpdateCommentInput>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let comment = state.resolver.resolve_comment(comment_id).await?;
    let comment = Resolver::resolve_user_owned_comment(comment, &user)?;
    let view = state.comment_service.update(comment, input).await?;
    Ok(ApiResponse::ok(view.into()))
}

/// Delete a comment and its replies. Author or resub owner.
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<i32>,
) -> AppResult<StatusCode> {
    let comment = state.resolver.resolve_comment(comment_id).await?;
    let comment = state
        .resolver
        .resolve_comment_owner_or_resub_owner(comment, &user)
        .await?;
    state.comment_service.delete(comment).await?;
    Ok(no_content())
}

async fn vote(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((comment_id, vote)): Path<(i32, String)>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let vote: Vote = vote.parse()?;
    let comment = state.resolver.resolve_comment(comment_id).await?;
    let view = state.comment_service.vote(comment, &user, vote).await?;
    Ok(ApiResponse::ok(view.into()))
}

/// Active votes on a comment.
async fn list_votes(
    State(state): State<AppState>,
    Path(comment_id): Path<i32>,
) -> AppResult<ApiResponse<Vec<VoteResponse>>> {
    let comment = state.resolver.resolve_comment(comment_id).await?;
    let voters = state.comment_service.voters(&comment).await?;
    Ok(ApiResponse::ok(voters.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{comment_id}",
            get(show).post(reply).patch(update).delete(delete),
        )
        .route("/{comment_id}/vote/{vote}", patch(vote))
        .route("/{comment_id}/votes", get(list_votes))
}
