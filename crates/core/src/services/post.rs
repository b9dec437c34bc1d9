//! Post service.

use chrono::Utc;
use repost_common::{AppError, AppResult};
use repost_db::{
    entities::{post, resub, user},
    repositories::{PostRepository, PostVoteRepository, ResubRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::deserialize_some;
use crate::{
    views::{Names, PostView, VoteView, distinct},
    vote::Vote,
};

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    vote_repo: PostVoteRepository,
    user_repo: UserRepository,
    resub_repo: ResubRepository,
}

/// Input for creating a post.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 300))]
    pub title: String,

    #[validate(length(max = 2048))]
    pub url: Option<String>,

    #[validate(length(max = 40000))]
    pub content: Option<String>,
}

/// Input for editing a post. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePostInput {
    #[validate(length(min = 1, max = 300))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "deserialize_some")]
    #[validate(length(max = 2048))]
    pub url: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_some")]
    #[validate(length(max = 40000))]
    pub content: Option<Option<String>>,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        vote_repo: PostVoteRepository,
        user_repo: UserRepository,
        resub_repo: ResubRepository,
    ) -> Self {
        Self {
            post_repo,
            vote_repo,
            user_repo,
            resub_repo,
        }
    }

    /// Create a post by `author` in `resub`.
    pub async fn create(
        &self,
        author: &user::Model,
        resub: &resub::Model,
        input: CreatePostInput,
    ) -> AppResult<PostView> {
        input.validate()?;

        let model = post::ActiveModel {
            title: Set(input.title),
            url: Set(input.url),
            content: Set(input.content),
            author_id: Set(author.id),
            parent_resub_id: Set(resub.id),
            ..Default::default()
        };

        let post = self.post_repo.create(model).await?;
        tracing::info!(post_id = post.id, resub = %resub.name, author_id = author.id, "Post created");

        Ok(PostView {
            post,
            author_username: author.username.clone(),
            parent_resub_name: resub.name.clone(),
            votes: 0,
        })
    }

    /// Attach author, resub name and vote total to `post`.
    pub async fn view(&self, post: post::Model) -> AppResult<PostView> {
        let mut views = self.views(vec![post]).await?;
        views
            .pop()
            .ok_or_else(|| AppError::Internal("Empty post view".to_string()))
    }

    /// List posts in `resub`, newest first.
    pub async fn list_by_resub(
        &self,
        resub: &resub::Model,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<PostView>> {
        let posts = self.post_repo.find_by_resub(resub.id, limit, offset).await?;
        self.views(posts).await
    }

    /// List posts by `author`, newest first.
    pub async fn list_by_author(
        &self,
        author: &user::Model,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<PostView>> {
        let posts = self
            .post_repo
            .find_by_author(author.id, limit, offset)
            .await?;
        self.views(posts).await
    }

    /// Apply a partial update to `post`.
    pub async fn update(&self, post: post::Model, input: UpdatePostInput) -> AppResult<PostView> {
        input.validate()?;

        let mut active: post::ActiveModel = post.into();

        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(url) = input.url {
            active.url = Set(url);
        }
        if let Some(content) = input.content {
            active.content = Set(content);
        }
        active.edited = Set(Some(Utc::now().into()));

        let post = self.post_repo.update(active).await?;
        self.view(post).await
    }

    /// Delete `post`; its comments and votes go with it.
    pub async fn delete(&self, post: post::Model) -> AppResult<()> {
        let post_id = post.id;
        self.post_repo.delete(post).await?;
        tracing::info!(post_id, "Post deleted");
        Ok(())
    }

    /// Set `voter`'s vote on `post` and return the post with its new total.
    pub async fn vote(
        &self,
        post: post::Model,
        voter: &user::Model,
        vote: Vote,
    ) -> AppResult<PostView> {
        self.vote_repo
            .set_vote(post.id, voter.id, vote.value())
            .await?;
        tracing::debug!(post_id = post.id, voter_id = voter.id, %vote, "Post vote recorded");
        self.view(post).await
    }

    /// Active votes on `post` with voter usernames.
    pub async fn voters(&self, post: &post::Model) -> AppResult<Vec<VoteView>> {
        let votes = self.vote_repo.find_voters(post.id).await?;
        let voter_ids = distinct(votes.iter().map(|v| v.author_id));
        let names = Names::new(self.user_repo.find_by_ids(&voter_ids).await?, vec![]);

        votes
            .into_iter()
            .map(|v| {
                Ok(VoteView {
                    voter_username: names.username(v.author_id)?,
                    vote: v.vote,
                })
            })
            .collect()
    }

    async fn views(&self, posts: Vec<post::Model>) -> AppResult<Vec<PostView>> {
        let post_ids: Vec<i32> = posts.iter().map(|p| p.id).collect();
        let totals = self.vote_repo.totals(&post_ids).await?;

        let author_ids = distinct(posts.iter().map(|p| p.author_id));
        let resub_ids = distinct(posts.iter().map(|p| p.parent_resub_id));
        let names = Names::new(
            self.user_repo.find_by_ids(&author_ids).await?,
            self.resub_repo.find_by_ids(&resub_ids).await?,
        );

        posts
            .into_iter()
            .map(|post| {
                Ok(PostView {
                    author_username: names.username(post.author_id)?,
                    parent_resub_name: names.resub_name(post.parent_resub_id)?,
                    votes: totals.get(&post.id).copied().unwrap_or(0),
                    post,
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use maplit::btreemap;
    use repost_db::entities::post_vote;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Value};
    use std::{collections::BTreeMap, sync::Arc};

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
            url: Some("https://example.com".to_string()),
            content: Some("hello".to_string()),
            author_id,
            parent_resub_id: resub_id,
            created: Utc::now().into(),
            edited: None,
        }
    }

    fn total_row(post_id: i32, votes: i64) -> BTreeMap<&'static str, Value> {
        btreemap! {
            "subject_id" => Value::Int(Some(post_id)),
            "votes" => Value::BigInt(Some(votes)),
        }
    }

    fn exec_ok() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    fn service(db: DatabaseConnection) -> PostService {
        let db = Arc::new(db);
        PostService::new(
            PostRepository::new(db.clone()),
            PostVoteRepository::new(db.clone()),
            UserRepository::new(db.clone()),
            ResubRepository::new(db),
        )
    }

    /// Queue the three lookups a single-post view performs.
    fn with_view(db: MockDatabase, totals: Vec<BTreeMap<&'static str, Value>>) -> MockDatabase {
        db.append_query_results([totals])
            .append_query_results([[test_user(1, "alice")]])
            .append_query_results([[test_resub(1, "cats", 1)]])
    }

    #[tokio::test]
    async fn test_create_post_starts_at_zero_votes() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_post(1, 1, 1)]])
            .into_connection();

        let view = service(db)
            .create(
                &test_user(1, "alice"),
                &test_resub(1, "cats", 1),
                CreatePostInput {
                    title: "hi".to_string(),
                    url: None,
                    content: Some("hello".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(view.votes, 0);
        assert_eq!(view.author_username, "alice");
        assert_eq!(view.parent_resub_name, "cats");
    }

    #[tokio::test]
    async fn test_create_rejects_empty_title() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(db)
            .create(
                &test_user(1, "alice"),
                &test_resub(1, "cats", 1),
                CreatePostInput {
                    title: String::new(),
                    url: None,
                    content: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_vote_returns_recomputed_total() {
        let db = with_view(
            MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([exec_ok()]),
            vec![total_row(1, 1)],
        )
        .into_connection();

        let view = service(db)
            .vote(test_post(1, 1, 1), &test_user(1, "alice"), Vote::Up)
            .await
            .unwrap();

        assert_eq!(view.votes, 1);
        assert_eq!(view.post.id, 1);
    }

    #[tokio::test]
    async fn test_retracted_vote_total_is_zero() {
        let db = with_view(
            MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([exec_ok()]),
            vec![],
        )
        .into_connection();

        let view = service(db)
            .vote(test_post(1, 1, 1), &test_user(1, "alice"), Vote::None)
            .await
            .unwrap();

        assert_eq!(view.votes, 0);
    }

    #[tokio::test]
    async fn test_voters_lists_active_votes() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[
                post_vote::Model {
                    post_id: 1,
                    author_id: 1,
                    vote: 1,
                },
                post_vote::Model {
                    post_id: 1,
                    author_id: 2,
                    vote: -1,
                },
            ]])
            .append_query_results([[test_user(1, "alice"), test_user(2, "bob")]])
            .into_connection();

        let voters = service(db).voters(&test_post(1, 1, 1)).await.unwrap();

        assert_eq!(
            voters,
            vec![
                VoteView {
                    voter_username: "alice".to_string(),
                    vote: 1,
                },
                VoteView {
                    voter_username: "bob".to_string(),
                    vote: -1,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_update_keeps_unspecified_fields() {
        let original = test_post(1, 1, 1);
        let updated = post::Model {
            title: "renamed".to_string(),
            edited: Some(Utc::now().into()),
            ..original.clone()
        };
        let db = with_view(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[updated]]),
            vec![],
        )
        .into_connection();

        let input: UpdatePostInput = serde_json::from_str(r#"{"title": "renamed"}"#).unwrap();
        let view = service(db).update(original, input).await.unwrap();

        assert_eq!(view.post.title, "renamed");
        assert_eq!(view.post.url.as_deref(), Some("https://example.com"));
        assert_eq!(view.post.content.as_deref(), Some("hello"));
        assert!(view.post.edited.is_some());
    }

    #[tokio::test]
    async fn test_list_by_resub_batches_lookups() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_post(2, 1, 2), test_post(1, 1, 1)]])
            .append_query_results([[total_row(1, 3)]])
            .append_query_results([[test_user(1, "alice"), test_user(2, "bob")]])
            .append_query_results([[test_resub(1, "cats", 1)]])
            .into_connection();

        let views = service(db)
            .list_by_resub(&test_resub(1, "cats", 1), 50, 0)
            .await
            .unwrap();

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].author_username, "bob");
        assert_eq!(views[0].votes, 0);
        assert_eq!(views[1].author_username, "alice");
        assert_eq!(views[1].votes, 3);
    }

    #[tokio::test]
    async fn test_empty_listing_runs_one_query() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<post::Model>::new()])
            .into_connection();

        let views = service(db)
            .list_by_author(&test_user(1, "alice"), 50, 0)
            .await
            .unwrap();

        assert!(views.is_empty());
    }
}
