//! Core business logic for repost.
//!
//! - [`resolve`]: the resolution chain that turns path identifiers and bearer
//!   tokens into loaded, access-checked entities
//! - [`services`]: create/update/delete and voting for users, resubs, posts and comments
//! - [`views`]: entities joined with the derived fields clients see

pub mod resolve;
pub mod services;
pub mod views;
pub mod vote;

pub use resolve::Resolver;
pub use services::*;
pub use views::{CommentView, PostView, ResubView, VoteView};
pub use vote::Vote;
