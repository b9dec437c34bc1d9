//! API middleware.

#![allow(missing_docs)]

use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use repost_common::{AppError, TokenIssuer};
use repost_core::{CommentService, PostService, Resolver, ResubService, UserService};

/// Scope every login token carries and every authenticated route requires.
pub const USER_SCOPE: &str = "user";

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub resub_service: ResubService,
    pub post_service: PostService,
    pub comment_service: CommentService,
    pub resolver: Resolver,
    pub tokens: TokenIssuer,
}

/// Why a request that presented credentials is not authenticated.
#[derive(Debug, Clone)]
pub struct AuthFailure(pub AppError);

/// Authentication middleware.
///
/// Resolves a bearer token into a user and stores it in the request
/// extensions. A rejected token is stored as [`AuthFailure`] instead, so
/// public routes still succeed and only [`crate::extractors::AuthUser`]
/// reports the failure.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(header) = req.headers().get(AUTHORIZATION) {
        let token = header
            .to_str()
            .ok()
            .and_then(bearer_token)
            .map(ToString::to_string);

        let outcome = match token {
            Some(token) => {
                state
                    .resolver
                    .resolve_current_user(&token, &[USER_SCOPE])
                    .await
            }
            None => Err(AppError::Unauthorized(
                "Expected 'Authorization: Bearer <token>'".to_string(),
            )),
        };

        match outcome {
            Ok(user) => {
                tracing::debug!(user_id = user.id, "Authenticated request");
                req.extensions_mut().insert(user);
            }
            Err(err) => {
                tracing::debug!(error = %err, "Rejected credentials");
                req.extensions_mut().insert(AuthFailure(err));
            }
        }
    }

    next.run(req).await
}

fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Bearer"), None);
    }
}
