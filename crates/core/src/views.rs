//! Entities joined with the fields clients see but that are not stored on the row.

use std::collections::HashMap;

use repost_common::{AppError, AppResult};
use repost_db::entities::{comment, post, resub, user};

/// A resub with its owner's username.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct ResubView {
    pub resub: resub::Model,
    pub owner_username: String,
}

/// A post with its author, parent resub name and vote total.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct PostView {
    pub post: post::Model,
    pub author_username: String,
    pub parent_resub_name: String,
    pub votes: i64,
}

/// A comment with its author, parent resub name and vote total.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct CommentView {
    pub comment: comment::Model,
    pub author_username: String,
    pub parent_resub_name: String,
    pub votes: i64,
}

/// One active vote with the voter's username.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct VoteView {
    pub voter_username: String,
    pub vote: i32,
}

/// Lookup tables used while assembling views for a batch of rows.
pub(crate) struct Names {
    users: HashMap<i32, String>,
    resubs: HashMap<i32, String>,
}

impl Names {
    pub(crate) fn new(users: Vec<user::Model>, resubs: Vec<resub::Model>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id, u.username)).collect(),
            resubs: resubs.into_iter().map(|r| (r.id, r.name)).collect(),
        }
    }

    pub(crate) fn username(&self, id: i32) -> AppResult<String> {
        self.users
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::Internal(format!("Dangling user reference {id}")))
    }

    pub(crate) fn resub_name(&self, id: i32) -> AppResult<String> {
        self.resubs
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::Internal(format!("Dangling resub reference {id}")))
    }
}

/// Distinct ids in first-seen order.
pub(crate) fn distinct(ids: impl IntoIterator<Item = i32>) -> Vec<i32> {
    let mut out: Vec<i32> = Vec::new();
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}
