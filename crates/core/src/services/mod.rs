//! Business logic services.

pub mod comment;
pub mod post;
pub mod resub;
pub mod user;

pub use comment::{CommentService, CreateCommentInput, UpdateCommentInput};
pub use post::{CreatePostInput, PostService, UpdatePostInput};
pub use resub::{CreateResubInput, ResubService, UpdateResubInput};
pub use user::{CreateUserInput, UpdateUserInput, UserService};

use serde::{Deserialize, Deserializer};
use validator::ValidationError;

/// Deserialize a present field as `Some`, so that `Option<Option<T>>`
/// tells an explicit `null` apart from an absent field.
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

fn validate_identifier(value: &str, allow_dash: bool) -> Result<(), ValidationError> {
    let ok = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || (allow_dash && c == '-'));
    if ok {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_characters"))
    }
}

/// Usernames that collide with fixed routes under `/api/users`.
const RESERVED_USERNAMES: &[&str] = &["me"];

/// Usernames: ASCII letters, digits, `_` and `-`, and not reserved.
pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    if RESERVED_USERNAMES.contains(&value) {
        return Err(ValidationError::new("reserved"));
    }
    validate_identifier(value, true)
}

/// Resub names: ASCII letters, digits and `_`.
pub fn validate_resub_name(value: &str) -> Result<(), ValidationError> {
    validate_identifier(value, false)
}
