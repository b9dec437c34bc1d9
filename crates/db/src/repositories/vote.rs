//! Vote repositories for posts and comments.
//!
//! A vote row exists only while the voter holds a nonzero vote. Setting a
//! vote is a single statement: an upsert for ±1, a delete for 0.

use std::{collections::HashMap, sync::Arc};

use crate::entities::{CommentVote, PostVote, comment_vote, post_vote};
use repost_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter, QuerySelect, Set,
    sea_query::{Expr, OnConflict},
};

use super::write_err;

/// Summed votes for one subject.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct VoteTotal {
    /// Post or comment ID.
    pub subject_id: i32,
    /// `SUM(vote)`; `None` only for an empty aggregate.
    pub votes: Option<i64>,
}

fn totals_map(rows: Vec<VoteTotal>) -> HashMap<i32, i64> {
    rows.into_iter()
        .map(|row| (row.subject_id, row.votes.unwrap_or(0)))
        .collect()
}

/// Post vote repository.
#[derive(Clone)]
pub struct PostVoteRepository {
    db: Arc<DatabaseConnection>,
}

impl PostVoteRepository {
    /// Create a new post vote repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record `vote` for (post, voter). Zero removes any existing row.
    pub async fn set_vote(&self, post_id: i32, voter_id: i32, vote: i32) -> AppResult<()> {
        if vote == 0 {
            PostVote::delete_many()
                .filter(post_vote::Column::PostId.eq(post_id))
                .filter(post_vote::Column::AuthorId.eq(voter_id))
                .exec(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Ok(());
        }

        let model = post_vote::ActiveModel {
            post_id: Set(post_id),
            author_id: Set(voter_id),
            vote: Set(vote),
        };

        PostVote::insert(model)
            .on_conflict(
                OnConflict::columns([post_vote::Column::PostId, post_vote::Column::AuthorId])
                    .update_column(post_vote::Column::Vote)
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| write_err(e, "Vote"))?;
        Ok(())
    }

    /// List every active vote on a post.
    pub async fn find_voters(&self, post_id: i32) -> AppResult<Vec<post_vote::Model>> {
        PostVote::find()
            .filter(post_vote::Column::PostId.eq(post_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Sums of votes for several posts. Posts without votes are absent.
    pub async fn totals(&self, post_ids: &[i32]) -> AppResult<HashMap<i32, i64>> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = PostVote::find()
            .select_only()
            .column_as(post_vote::Column::PostId, "subject_id")
            .column_as(Expr::col(post_vote::Column::Vote).sum(), "votes")
            .filter(post_vote::Column::PostId.is_in(post_ids.to_vec()))
            .group_by(post_vote::Column::PostId)
            .into_model::<VoteTotal>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(totals_map(rows))
    }
}

/// Comment vote repository.
#[derive(Clone)]
pub struct CommentVoteRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentVoteRepository {
    /// Create a new comment vote repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record `vote` for (comment, voter). Zero removes any existing row.
    pub async fn set_vote(&self, comment_id: i32, voter_id: i32, vote: i32) -> AppResult<()> {
        if vote == 0 {
            CommentVote::delete_many()
                .filter(comment_vote::Column::CommentId.eq(comment_id))
                .filter(comment_vote::Column::AuthorId.eq(voter_id))
                .exec(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Ok(());
        }

        let model = comment_vote::ActiveModel {
            comment_id: Set(comment_id),
            author_id: Set(voter_id),
            vote: Set(vote),
        };

        CommentVote::insert(model)
            .on_conflict(
                OnConflict::columns([
                    comment_vote::Column::CommentId,
                    comment_vote::Column::AuthorId,
                ])
                .update_column(comment_vote::Column::Vote)
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| write_err(e, "Vote"))?;
        Ok(())
    }

    /// List every active vote on a comment.
    pub async fn find_voters(&self, comment_id: i32) -> AppResult<Vec<comment_vote::Model>> {
        CommentVote::find()
            .filter(comment_vote::Column::CommentId.eq(comment_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Sums of votes for several comments. Comments without votes are absent.
    pub async fn totals(&self, comment_ids: &[i32]) -> AppResult<HashMap<i32, i64>> {
        if comment_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = CommentVote::find()
            .select_only()
            .column_as(comment_vote::Column::CommentId, "subject_id")
            .column_as(Expr::col(comment_vote::Column::Vote).sum(), "votes")
            .filter(comment_vote::Column::CommentId.is_in(comment_ids.to_vec()))
            .group_by(comment_vote::Column::CommentId)
            .into_model::<VoteTotal>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(totals_map(rows))
    }
}
