//! Repositories: one per table, thin wrappers over sea-orm queries.

mod comment;
mod post;
mod resub;
mod user;
mod vote;

pub use comment::CommentRepository;
pub use post::PostRepository;
pub use resub::ResubRepository;
pub use user::UserRepository;
pub use vote::{CommentVoteRepository, PostVoteRepository, VoteTotal};

use repost_common::AppError;
use sea_orm::{DbErr, SqlErr};

/// Map an insert/update failure onto the error taxonomy.
///
/// Unique-key violations are `Conflict`. A missing foreign-key target or an
/// update whose row has vanished is `NotFound`.
pub(crate) fn write_err(e: DbErr, what: &str) -> AppError {
    if matches!(e, DbErr::RecordNotUpdated) {
        return AppError::NotFound(format!("{what} no longer exists"));
    }
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict(format!("{what} already exists"))
        }
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            AppError::NotFound(format!("{what} refers to a row that no longer exists"))
        }
        _ => AppError::Database(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vanished_row_is_not_found() {
        assert!(matches!(
            write_err(DbErr::RecordNotUpdated, "Post"),
            AppError::NotFound(_)
        ));
    }

    #[test]
    fn test_other_errors_stay_database() {
        assert!(matches!(
            write_err(DbErr::Custom("boom".to_string()), "Post"),
            AppError::Database(_)
        ));
    }
}
