//! API endpoints.

#![allow(missing_docs)]

mod auth;
mod comments;
mod posts;
mod resubs;
mod users;

use axum::Router;

use crate::middleware::AppState;

pub use comments::CommentResponse;
pub use posts::PostResponse;
pub use resubs::ResubResponse;
pub use users::UserResponse;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/resubs", resubs::router())
        .nest("/posts", posts::router())
        .nest("/comments", comments::router())
}
