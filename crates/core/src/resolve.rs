//! Entity resolution chain.
//!
//! Each step turns an identifier into a loaded row or fails with the first
//! applicable error. Steps never write. Handlers compose them in dependency
//! order (user, resub, post, comment) before calling into a service.
//!
//! Posts and comments are addressed by id alone on the flat routes; the id is
//! authoritative. Where a path names a resub as well,
//! [`Resolver::resolve_post_in_resub`] checks that the post belongs to it.

use repost_common::{AppError, AppResult, TokenIssuer};
use repost_db::{
    entities::{comment, post, resub, user},
    repositories::{CommentRepository, PostRepository, ResubRepository, UserRepository},
};

/// Loads and access-checks entities named by a request.
#[derive(Clone)]
pub struct Resolver {
    user_repo: UserRepository,
    resub_repo: ResubRepository,
    post_repo: PostRepository,
    comment_repo: CommentRepository,
    tokens: TokenIssuer,
}

impl Resolver {
    /// Create a new resolver.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        resub_repo: ResubRepository,
        post_repo: PostRepository,
        comment_repo: CommentRepository,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            user_repo,
            resub_repo,
            post_repo,
            comment_repo,
            tokens,
        }
    }

    /// Look up a user by username.
    pub async fn resolve_user(&self, username: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User '{username}' not found")))
    }

    /// Authorize a bearer token and load its subject.
    ///
    /// A valid token whose user has since been deleted is `Unauthorized`.
    pub async fn resolve_current_user(
        &self,
        token: &str,
        required_scopes: &[&str],
    ) -> AppResult<user::Model> {
        let username = self.tokens.authorize(token, required_scopes)?;

        self.user_repo
            .find_by_username(&username)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Token subject no longer exists".to_string()))
    }

    /// Look up a resub by name.
    pub async fn resolve_resub(&self, name: &str) -> AppResult<resub::Model> {
        self.resub_repo
            .find_by_name(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Resub '{name}' not found")))
    }

    /// Require `current_user` to own `resub`.
    pub fn resolve_user_owned_resub(
        resub: resub::Model,
        current_user: &user::Model,
    ) -> AppResult<resub::Model> {
        if resub.owner_id != current_user.id {
            return Err(AppError::Forbidden(format!(
                "You do not own resub '{}'",
                resub.name
            )));
        }
        Ok(resub)
    }

    /// Look up a post by id.
    pub async fn resolve_post(&self, post_id: i32) -> AppResult<post::Model> {
        self.post_repo
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {post_id} not found")))
    }

    /// Look up a post by id and require it to live in `resub`.
    pub async fn resolve_post_in_resub(
        &self,
        resub: &resub::Model,
        post_id: i32,
    ) -> AppResult<post::Model> {
        let post = self.resolve_post(post_id).await?;
        if post.parent_resub_id != resub.id {
            return Err(AppError::NotFound(format!(
                "Post {post_id} not found in resub '{}'",
                resub.name
            )));
        }
        Ok(post)
    }

    /// Require `current_user` to be the author of `post`.
    pub fn resolve_user_owned_post(
        post: post::Model,
        current_user: &user::Model,
    ) -> AppResult<post::Model> {
        if post.author_id != current_user.id {
            return Err(AppError::Forbidden(format!(
                "You are not the author of post {}",
                post.id
            )));
        }
        Ok(post)
    }

    /// Require `current_user` to be the author of `post` or the owner of its resub.
    pub async fn resolve_post_owner_or_resub_owner(
        &self,
        post: post::Model,
        current_user: &user::Model,
    ) -> AppResult<post::Model> {
        if post.author_id == current_user.id
            || self
                .owns_resub(post.parent_resub_id, current_user)
                .await?
        {
            return Ok(post);
        }
        Err(AppError::Forbidden(format!(
            "Only the author or the resub owner can modify post {}",
            post.id
        )))
    }

    /// Look up a comment by id.
    pub async fn resolve_comment(&self, comment_id: i32) -> AppResult<comment::Model> {
        self.comment_repo
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment {comment_id} not found")))
    }

    /// Require `current_user` to be the author of `comment`.
    pub fn resolve_user_owned_comment(
        comment: comment::Model,
        current_user: &user::Model,
    ) -> AppResult<comment::Model> {
        if comment.author_id != current_user.id {
            return Err(AppError::Forbidden(format!(
                "You are not the author of comment {}",
                comment.id
            )));
        }
        Ok(comment)
    }

    /// Require `current_user` to be the author of `comment` or the owner of its resub.
    pub async fn resolve_comment_owner_or_resub_owner(
        &self,
        comment: comment::Model,
        current_user: &user::Model,
    ) -> AppResult<comment::Model> {
        if comment.author_id == current_user.id
            || self
                .owns_resub(comment.parent_resub_id, current_user)
                .await?
        {
            return Ok(comment);
        }
        Err(AppError::Forbidden(format!(
            "Only the author or the resub owner can modify comment {}",
            comment.id
        )))
    }

    async fn owns_resub(&self, resub_id: i32, current_user: &user::Model) -> AppResult<bool> {
        let resub = self
            .resub_repo
            .find_by_id(resub_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Resub {resub_id} not found")))?;
        Ok(resub.owner_id == current_user.id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use repost_common::config::AuthConfig;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;

    fn test_user(id: i32, username: &str) -> user::Model {
        user::Model {
            id,
            username: username.to_string(),
            hashed_password: String::new(),
            bio: String::new(),
            avatar_url: None,
            created: Utc::now().into(),
        }
    }

    fn test_resub(id: i32, name: &str, owner_id: i32) -> resub::Model {
        resub::Model {
            id,
            name: name.to_string(),
            description: None,
            owner_id,
            created: Utc::now().into(),
            edited: None,
        }
    }

    fn test_post(id: i32, resub_id: i32, author_id: i32) -> post::Model {
        post::Model {
            id,
            title: "hi".to_string(),
            url: None,
            content: None,
            author_id,
            parent_resub_id: resub_id,
            created: Utc::now().into(),
            edited: None,
        }
    }

    fn test_comment(id: i32, author_id: i32) -> comment::Model {
        comment::Model {
            id,
            content: "nice".to_string(),
            author_id,
            parent_resub_id: 1,
            parent_post_id: 1,
            parent_comment_id: None,
            created: Utc::now().into(),
            edited: None,
        }
    }

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&AuthConfig {
            jwt_secret: "test-secret".to_string(),
            ..AuthConfig::default()
        })
        .unwrap()
    }

    fn resolver(db: DatabaseConnection) -> Resolver {
        let db = Arc::new(db);
        Resolver::new(
            UserRepository::new(db.clone()),
            ResubRepository::new(db.clone()),
            PostRepository::new(db.clone()),
            CommentRepository::new(db),
            issuer(),
        )
    }

    #[tokio::test]
    async fn test_resolve_user_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let result = resolver(db).resolve_user("ghost").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_resolve_current_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_user(1, "alice")]])
            .into_connection();

        let token = issuer().issue("alice", &["user"]).unwrap();
        let user = resolver(db)
            .resolve_current_user(&token, &["user"])
            .await
            .unwrap();
        assert_eq!(user.id, 1);
    }

    #[tokio::test]
    async fn test_resolve_current_user_deleted_account() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let token = issuer().issue("alice", &["user"]).unwrap();
        let result = resolver(db).resolve_current_user(&token, &["user"]).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_resolve_current_user_token_failures() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let resolver = resolver(db);

        let expired = issuer()
            .issue_with_ttl("alice", Duration::minutes(-5), &["user"])
            .unwrap();
        assert!(matches!(
            resolver.resolve_current_user(&expired, &["user"]).await,
            Err(AppError::Unauthorized(_))
        ));

        assert!(matches!(
            resolver.resolve_current_user("garbage", &["user"]).await,
            Err(AppError::BadRequest(_))
        ));

        let unscoped = issuer().issue("alice", &[]).unwrap();
        assert!(matches!(
            resolver.resolve_current_user(&unscoped, &["user"]).await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_user_owned_resub_gate() {
        let alice = test_user(1, "alice");
        let bob = test_user(2, "bob");

        for (resub, user, allowed) in [
            (test_resub(1, "cats", 1), &alice, true),
            (test_resub(1, "cats", 1), &bob, false),
            (test_resub(2, "dogs", 2), &alice, false),
            (test_resub(2, "dogs", 2), &bob, true),
        ] {
            let result = Resolver::resolve_user_owned_resub(resub, user);
            if allowed {
                assert!(result.is_ok());
            } else {
                assert!(matches!(result, Err(AppError::Forbidden(_))));
            }
        }
    }

    #[test]
    fn test_user_owned_post_and_comment() {
        let alice = test_user(1, "alice");
        let bob = test_user(2, "bob");

        assert!(Resolver::resolve_user_owned_post(test_post(1, 1, 1), &alice).is_ok());
        assert!(matches!(
            Resolver::resolve_user_owned_post(test_post(1, 1, 1), &bob),
            Err(AppError::Forbidden(_))
        ));
        assert!(Resolver::resolve_user_owned_comment(test_comment(1, 2), &bob).is_ok());
        assert!(matches!(
            Resolver::resolve_user_owned_comment(test_comment(1, 2), &alice),
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_post_in_other_resub_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_post(5, 2, 1)]])
            .into_connection();

        let result = resolver(db)
            .resolve_post_in_resub(&test_resub(1, "cats", 1), 5)
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_post_author_skips_resub_lookup() {
        // No query results: the author check must short-circuit.
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let post = resolver(db)
            .resolve_post_owner_or_resub_owner(test_post(1, 1, 2), &test_user(2, "bob"))
            .await
            .unwrap();
        assert_eq!(post.id, 1);
    }

    #[tokio::test]
    async fn test_resub_owner_may_moderate_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_resub(1, "cats", 1)]])
            .into_connection();

        let result = resolver(db)
            .resolve_post_owner_or_resub_owner(test_post(1, 1, 2), &test_user(1, "alice"))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_stranger_cannot_moderate_comment() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_resub(1, "cats", 1)]])
            .into_connection();

        let result = resolver(db)
            .resolve_comment_owner_or_resub_owner(test_comment(1, 2), &test_user(3, "carol"))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
