//! User service.

use repost_common::{AppError, AppResult, hash_password, verify_dummy_password, verify_password};
use repost_db::{entities::user, repositories::UserRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::{deserialize_some, validate_username};

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

/// Input for creating a new user.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 32), custom(function = "validate_username"))]
    pub username: String,

    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

/// Input for updating a user. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[validate(length(max = 2000))]
    pub bio: Option<String>,

    /// `Some(None)` clears the avatar.
    #[serde(default, deserialize_with = "deserialize_some")]
    #[validate(length(max = 1024))]
    pub avatar_url: Option<Option<String>>,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Register a new user.
    pub async fn create(&self, input: CreateUserInput) -> AppResult<user::Model> {
        input.validate()?;

        if self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Username '{}' is already taken",
                input.username
            )));
        }

        let hashed_password = hash_password(&input.password)?;

        let model = user::ActiveModel {
            username: Set(input.username),
            hashed_password: Set(hashed_password),
            bio: Set(String::new()),
            avatar_url: Set(None),
            ..Default::default()
        };

        let user = self.user_repo.create(model).await?;
        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Check a username/password pair.
    ///
    /// Unknown usernames and wrong passwords fail identically.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<user::Model> {
        let rejected = || AppError::Unauthorized("Incorrect username or password".to_string());

        let Some(user) = self.user_repo.find_by_username(username).await? else {
            verify_dummy_password(password);
            return Err(rejected());
        };

        if !verify_password(password, &user.hashed_password)? {
            return Err(rejected());
        }

        Ok(user)
    }

    /// Apply a partial update to `user`.
    pub async fn update(&self, user: user::Model, input: UpdateUserInput) -> AppResult<user::Model> {
        input.validate()?;

        let mut active: user::ActiveModel = user.into();

        if let Some(bio) = input.bio {
            active.bio = Set(bio);
        }
        if let Some(avatar_url) = input.avatar_url {
            active.avatar_url = Set(avatar_url);
        }

        self.user_repo.update(active).await
    }

    /// Delete `user` along with everything they own.
    pub async fn delete(&self, user: user::Model) -> AppResult<()> {
        let user_id = user.id;
        self.user_repo.delete(user).await?;
        tracing::info!(user_id, "User deleted");
        Ok(())
    }
}
