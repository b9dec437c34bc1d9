//! Authentication endpoints.

use axum::{Json, Router, extract::State, routing::post};
use repost_common::AppResult;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::Form,
    middleware::{AppState, USER_SCOPE},
};

/// OAuth2 password-grant form.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
    /// Accepted for client compatibility; only the password grant exists.
    #[serde(default)]
    pub grant_type: Option<String>,
    /// Accepted for client compatibility; tokens always carry the user scope.
    #[serde(default)]
    pub scope: Option<String>,
}

/// Bearer token response.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

/// Exchange a username and password for a bearer token.
async fn token(
    State(state): State<AppState>,
    Form(req): Form<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let user = state
        .user_service
        .authenticate(&req.username, &req.password)
        .await?;

    let access_token = state.tokens.issue(&user.username, &[USER_SCOPE])?;
    tracing::info!(user_id = user.id, "Issued access token");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/token", post(token))
}
