//! Repost server entry point.

use std::sync::Arc;

use axum::http::HeaderValue;
use repost_api::middleware::AppState;
use repost_common::{Config, TokenIssuer, config::CorsConfig};
use repost_core::{CommentService, PostService, Resolver, ResubService, UserService};
use repost_db::repositories::{
    CommentRepository, CommentVoteRepository, PostRepository, PostVoteRepository,
    ResubRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

/// CORS for the configured origins. Credentials are allowed, so methods and
/// headers mirror the preflight request instead of using a wildcard.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repost=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting repost server...");

    let config = Config::load()?;
    let tokens = TokenIssuer::new(&config.auth)?;

    let db = Arc::new(repost_db::init(&config).await?);
    info!("Connected to database");

    info!("Running database migrations...");
    repost_db::migrate(&db).await?;
    info!("Migrations completed");

    // Repositories
    let user_repo = UserRepository::new(Arc::clone(&db));
    let resub_repo = ResubRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let post_vote_repo = PostVoteRepository::new(Arc::clone(&db));
    let comment_vote_repo = CommentVoteRepository::new(Arc::clone(&db));

    // Services
    let state = AppState {
        user_service: UserService::new(user_repo.clone()),
        resub_service: ResubService::new(resub_repo.clone(), user_repo.clone()),
        post_service: PostService::new(
            post_repo.clone(),
            post_vote_repo,
            user_repo.clone(),
            resub_repo.clone(),
        ),
        comment_service: CommentService::new(
            comment_repo.clone(),
            comment_vote_repo,
            user_repo.clone(),
            resub_repo.clone(),
        ),
        resolver: Resolver::new(user_repo, resub_repo, post_repo, comment_repo, tokens.clone()),
        tokens,
    };

    let app = repost_api::app(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
