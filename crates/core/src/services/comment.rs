//! Comment service.

use chrono::Utc;
use repost_common::{AppError, AppResult};
use repost_db::{
    entities::{comment, post, user},
    repositories::{CommentRepository, CommentVoteRepository, ResubRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use crate::{
    views::{CommentView, Names, VoteView, distinct},
    vote::Vote,
};

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    vote_repo: CommentVoteRepository,
    user_repo: UserRepository,
    resub_repo: ResubRepository,
}

/// Input for creating a comment or reply.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentInput {
    #[validate(length(min = 1, max = 10000))]
    pub content: String,
}

/// Input for editing a comment.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCommentInput {
    #[validate(length(min = 1, max = 10000))]
    pub content: Option<String>,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(
        comment_repo: CommentRepository,
        vote_repo: CommentVoteRepository,
        user_repo: UserRepository,
        resub_repo: ResubRepository,
    ) -> Self {
        Self {
            comment_repo,
            vote_repo,
            user_repo,
            resub_repo,
        }
    }

    /// Comment directly on `post`.
    pub async fn create_on_post(
        &self,
        author: &user::Model,
        post: &post::Model,
        input: CreateCommentInput,
    ) -> AppResult<CommentView> {
        self.insert(author, post.parent_resub_id, post.id, None, input)
            .await
    }

    /// Reply to `parent`. The reply inherits the parent's resub and post.
    pub async fn reply(
        &self,
        author: &user::Model,
        parent: &comment::Model,
        input: CreateCommentInput,
    ) -> AppResult<CommentView> {
        self.insert(
            author,
            parent.parent_resub_id,
            parent.parent_post_id,
            Some(parent.id),
            input,
        )
        .await
    }

    async fn insert(
        &self,
        author: &user::Model,
        parent_resub_id: i32,
        parent_post_id: i32,
        parent_comment_id: Option<i32>,
        input: CreateCommentInput,
    ) -> AppResult<CommentView> {
        input.validate()?;

        let model = comment::ActiveModel {
            content: Set(input.content),
            author_id: Set(author.id),
            parent_resub_id: Set(parent_resub_id),
            parent_post_id: Set(parent_post_id),
            parent_comment_id: Set(parent_comment_id),
            ..Default::default()
        };

        let comment = self.comment_repo.create(model).await?;
        tracing::info!(
            comment_id = comment.id,
            post_id = parent_post_id,
            author_id = author.id,
            "Comment created"
        );
        self.view(comment).await
    }

    /// Attach author, resub name and vote total to `comment`.
    pub async fn view(&self, comment: comment::Model) -> AppResult<CommentView> {
        let mut views = self.views(vec![comment]).await?;
        views
            .pop()
            .ok_or_else(|| AppError::Internal("Empty comment view".to_string()))
    }

    /// List every comment under `post`, oldest first.
    pub async fn list_by_post(
        &self,
        post: &post::Model,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<CommentView>> {
        let comments = self.comment_repo.find_by_post(post.id, limit, offset).await?;
        self.views(comments).await
    }

    /// List comments by `author`, newest first.
    pub async fn list_by_author(
        &self,
        author: &user::Model,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<CommentView>> {
        let comments = self
            .comment_repo
            .find_by_author(author.id, limit, offset)
            .await?;
        self.views(comments).await
    }

    /// Apply a partial update to `comment`.
    pub async fn update(
        &self,
        comment: comment::Model,
        input: UpdateCommentInput,
    ) -> AppResult<CommentView> {
        input.validate()?;

        let mut active: comment::ActiveModel = comment.into();
        if let Some(content) = input.content {
            active.content = Set(content);
        }
        active.edited = Set(Some(Utc::now().into()));

        let comment = self.comment_repo.update(active).await?;
        self.view(comment).await
    }

    /// Delete `comment` and its replies.
    pub async fn delete(&self, comment: comment::Model) -> AppResult<()> {
        let comment_id = comment.id;
        self.comment_repo.delete(comment).await?;
        tracing::info!(comment_id, "Comment deleted");
        Ok(())
    }

    /// Set `voter`'s vote on `comment` and return the comment with its new total.
    pub async fn vote(
        &self,
        comment: comment::Model,
        voter: &user::Model,
        vote: Vote,
    ) -> AppResult<CommentView> {
        self.vote_repo
            .set_vote(comment.id, voter.id, vote.value())
            .await?;
        tracing::debug!(comment_id = comment.id, voter_id = voter.id, %vote, "Comment vote recorded");
        self.view(comment).await
    }

    /// Active votes on `comment` with voter usernames.
    pub async fn voters(&self, comment: &comment::Model) -> AppResult<Vec<VoteView>> {
        let votes = self.vote_repo.find_voters(comment.id).await?;
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

    async fn views(&self, comments: Vec<comment::Model>) -> AppResult<Vec<CommentView>> {
        let comment_ids: Vec<i32> = comments.iter().map(|c| c.id).collect();
        let totals = self.vote_repo.totals(&comment_ids).await?;

        let author_ids = distinct(comments.iter().map(|c| c.author_id));
        let resub_ids = distinct(comments.iter().map(|c| c.parent_resub_id));
        let names = Names::new(
            self.user_repo.find_by_ids(&author_ids).await?,
            self.resub_repo.find_by_ids(&resub_ids).await?,
        );

        comments
            .into_iter()
            .map(|comment| {
                Ok(CommentView {
                    author_username: names.username(comment.author_id)?,
                    parent_resub_name: names.resub_name(comment.parent_resub_id)?,
                    votes: totals.get(&comment.id).copied().unwrap_or(0),
                    comment,
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
    use repost_db::entities::{comment_vote, resub};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Value};
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

    fn test_resub() -> resub::Model {
        resub::Model {
            id: 3,
            name: "cats".to_string(),
            description: None,
            owner_id: 1,
            created: Utc::now().into(),
            edited: None,
        }
    }

    fn test_post() -> post::Model {
        post::Model {
            id: 7,
            title: "hi".to_string(),
            url: None,
            content: None,
            author_id: 1,
            parent_resub_id: 3,
            created: Utc::now().into(),
            edited: None,
        }
    }

    fn test_comment(id: i32, parent_comment_id: Option<i32>) -> comment::Model {
        comment::Model {
            id,
            content: "nice".to_string(),
            author_id: 1,
            parent_resub_id: 3,
            parent_post_id: 7,
            parent_comment_id,
            created: Utc::now().into(),
            edited: None,
        }
    }

    fn service(db: DatabaseConnection) -> CommentService {
        let db = Arc::new(db);
        CommentService::new(
            CommentRepository::new(db.clone()),
            CommentVoteRepository::new(db.clone()),
            UserRepository::new(db.clone()),
            ResubRepository::new(db),
        )
    }

    fn with_view(db: MockDatabase) -> MockDatabase {
        db.append_query_results([Vec::<std::collections::BTreeMap<&str, Value>>::new()])
            .append_query_results([[test_user(1, "alice")]])
            .append_query_results([[test_resub()]])
    }

    #[tokio::test]
    async fn test_top_level_comment_copies_post_parents() {
        let db = Arc::new(
            with_view(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([[test_comment(1, None)]]),
            )
            .into_connection(),
        );
        let service = CommentService::new(
            CommentRepository::new(db.clone()),
            CommentVoteRepository::new(db.clone()),
            UserRepository::new(db.clone()),
            ResubRepository::new(db.clone()),
        );

        let view = service
            .create_on_post(
                &test_user(1, "alice"),
                &test_post(),
                CreateCommentInput {
                    content: "nice".to_string(),
                },
            )
            .await
            .unwrap();
        drop(service);

        assert_eq!(view.parent_resub_name, "cats");
        assert_eq!(view.comment.parent_comment_id, None);

        let log = Arc::try_unwrap(db).ok().unwrap().into_transaction_log();
        let insert = &log[0].statements()[0];
        assert!(insert.sql.starts_with(r#"INSERT INTO "comments""#));
        let values = insert.values.as_ref().unwrap();
        assert!(values.0.contains(&Value::Int(Some(3))));
        assert!(values.0.contains(&Value::Int(Some(7))));
    }

    #[tokio::test]
    async fn test_reply_points_at_parent() {
        let db = with_view(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_comment(2, Some(1))]]),
        )
        .into_connection();

        let view = service(db)
            .reply(
                &test_user(1, "alice"),
                &test_comment(1, None),
                CreateCommentInput {
                    content: "agreed".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(view.comment.parent_comment_id, Some(1));
        assert_eq!(view.comment.parent_post_id, 7);
    }

    #[tokio::test]
    async fn test_empty_content_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(db)
            .create_on_post(
                &test_user(1, "alice"),
                &test_post(),
                CreateCommentInput {
                    content: String::new(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_downvote_total() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[btreemap! {
                "subject_id" => Value::Int(Some(1)),
                "votes" => Value::BigInt(Some(-1)),
            }]])
            .append_query_results([[test_user(1, "alice")]])
            .append_query_results([[test_resub()]])
            .into_connection();

        let view = service(db)
            .vote(test_comment(1, None), &test_user(2, "bob"), Vote::Down)
            .await
            .unwrap();

        assert_eq!(view.votes, -1);
    }

    #[tokio::test]
    async fn test_voters_after_retraction_is_empty() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<comment_vote::Model>::new()])
            .into_connection();

        let voters = service(db).voters(&test_comment(1, None)).await.unwrap();
        assert!(voters.is_empty());
    }

    #[tokio::test]
    async fn test_update_sets_edited() {
        let original = test_comment(1, None);
        let updated = comment::Model {
            content: "edited".to_string(),
            edited: Some(Utc::now().into()),
            ..original.clone()
        };
        let db = with_view(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[updated]]),
        )
        .into_connection();

        let view = service(db)
            .update(
                original,
                UpdateCommentInput {
                    content: Some("edited".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(view.comment.content, "edited");
        assert!(view.comment.edited.is_some());
    }
}
