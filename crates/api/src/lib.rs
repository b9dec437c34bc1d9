//! HTTP API layer for repost.
//!
//! - **Endpoints**: `/auth`, `/users`, `/resubs`, `/posts`, `/comments`
//! - **Extractors**: authenticated user, pagination
//! - **Middleware**: bearer token resolution
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

use axum::Router;

pub use endpoints::router;
use middleware::{AppState, auth_middleware};

/// The API mounted under `/api`, with authentication applied.
///
/// Transport layers (tracing, CORS) are added by the server.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}
