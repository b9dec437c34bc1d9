//! Database entities.

pub mod comment;
pub mod comment_vote;
pub mod post;
pub mod post_vote;
pub mod resub;
pub mod user;

pub use comment::Entity as Comment;
pub use comment_vote::Entity as CommentVote;
pub use post::Entity as Post;
pub use post_vote::Entity as PostVote;
pub use resub::Entity as Resub;
pub use user::Entity as User;
