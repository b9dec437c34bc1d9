//! Common utilities and shared types for repost.
//!
//! This crate provides foundational components used across all repost crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Credentials**: Password hashing and bearer token issuance via [`TokenIssuer`]
//!
//! # Example
//!
//! ```no_run
//! use repost_common::{AppResult, Config, TokenIssuer};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let tokens = TokenIssuer::new(&config.auth)?;
//!     let token = tokens.issue("alice", &["user"])?;
//!     println!("Issued token: {}", token);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod crypto;
pub mod error;

pub use config::Config;
pub use crypto::{
    Claims, TokenError, TokenIssuer, hash_password, verify_dummy_password, verify_password,
};
pub use error::{AppError, AppResult};
