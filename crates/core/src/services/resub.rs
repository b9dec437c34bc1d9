//! Resub service.

use chrono::Utc;
use repost_common::{AppError, AppResult};
use repost_db::{
    entities::{resub, user},
    repositories::{ResubRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::{deserialize_some, validate_resub_name};
use crate::views::{Names, ResubView, distinct};

/// Resub service for business logic.
#[derive(Clone)]
pub struct ResubService {
    resub_repo: ResubRepository,
    user_repo: UserRepository,
}

/// Input for creating a resub.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateResubInput {
    #[validate(length(min = 1, max = 32), custom(function = "validate_resub_name"))]
    pub name: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Input for editing a resub. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateResubInput {
    /// `Some(None)` clears the description.
    #[serde(default, deserialize_with = "deserialize_some")]
    #[validate(length(max = 2000))]
    pub description: Option<Option<String>>,

    /// Transfer ownership to this user.
    pub new_owner_username: Option<String>,
}

impl ResubService {
    /// Create a new resub service.
    #[must_use]
    pub const fn new(resub_repo: ResubRepository, user_repo: UserRepository) -> Self {
        Self {
            resub_repo,
            user_repo,
        }
    }

    /// Create a resub owned by `owner`.
    pub async fn create(
        &self,
        owner: &user::Model,
        input: CreateResubInput,
    ) -> AppResult<ResubView> {
        input.validate()?;

        if self.resub_repo.find_by_name(&input.name).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Resub '{}' already exists",
                input.name
            )));
        }

        let model = resub::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            owner_id: Set(owner.id),
            ..Default::default()
        };

        let resub = self.resub_repo.create(model).await?;
        tracing::info!(resub = %resub.name, owner_id = owner.id, "Resub created");

        Ok(ResubView {
            resub,
            owner_username: owner.username.clone(),
        })
    }

    /// Attach the owner's username to `resub`.
    pub async fn view(&self, resub: resub::Model) -> AppResult<ResubView> {
        let mut views = self.views(vec![resub]).await?;
        views
            .pop()
            .ok_or_else(|| AppError::Internal("Empty resub view".to_string()))
    }

    /// List resubs, newest first.
    pub async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<ResubView>> {
        let resubs = self.resub_repo.find_recent(limit, offset).await?;
        self.views(resubs).await
    }

    /// List resubs owned by `owner`, newest first.
    pub async fn list_by_owner(
        &self,
        owner: &user::Model,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<ResubView>> {
        let resubs = self.resub_repo.find_by_owner(owner.id, limit, offset).await?;
        Ok(resubs
            .into_iter()
            .map(|resub| ResubView {
                resub,
                owner_username: owner.username.clone(),
            })
            .collect())
    }

    /// Apply a partial update to `resub`.
    ///
    /// The caller must already have checked ownership.
    pub async fn update(
        &self,
        resub: resub::Model,
        input: UpdateResubInput,
    ) -> AppResult<ResubView> {
        input.validate()?;

        let new_owner = match input.new_owner_username {
            Some(ref username) => Some(
                self.user_repo
                    .find_by_username(username)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("User '{username}' not found")))?,
            ),
            None => None,
        };

        let mut active: resub::ActiveModel = resub.into();

        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(ref owner) = new_owner {
            active.owner_id = Set(owner.id);
        }
        active.edited = Set(Some(Utc::now().into()));

        let resub = self.resub_repo.update(active).await?;

        match new_owner {
            Some(owner) => {
                tracing::info!(resub = %resub.name, owner_id = owner.id, "Resub ownership transferred");
                Ok(ResubView {
                    resub,
                    owner_username: owner.username,
                })
            }
            None => self.view(resub).await,
        }
    }

    /// Delete `resub`; its posts and comments go with it.
    pub async fn delete(&self, resub: resub::Model) -> AppResult<()> {
        let name = resub.name.clone();
        self.resub_repo.delete(resub).await?;
        tracing::info!(resub = %name, "Resub deleted");
        Ok(())
    }

    async fn views(&self, resubs: Vec<resub::Model>) -> AppResult<Vec<ResubView>> {
        let owner_ids = distinct(resubs.iter().map(|r| r.owner_id));
        let names = Names::new(self.user_repo.find_by_ids(&owner_ids).await?, vec![]);

        resubs
            .into_iter()
            .map(|resub| {
                Ok(ResubView {
                    owner_username: names.username(resub.owner_id)?,
                    resub,
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
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

    fn test_resub(id: i32, name: &str, owner_id: i32, description: Option<&str>) -> resub::Model {
        resub::Model {
            id,
            name: name.to_string(),
            description: description.map(ToString::to_string),
            owner_id,
            created: Utc::now().into(),
            edited: None,
        }
    }

    fn service(db: sea_orm::DatabaseConnection) -> ResubService {
        let db = Arc::new(db);
        ResubService::new(ResubRepository::new(db.clone()), UserRepository::new(db))
    }

    #[tokio::test]
    async fn test_create_resub() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<resub::Model>::new()])
            .append_query_results([[test_resub(1, "cats", 1, None)]])
            .into_connection();

        let view = service(db)
            .create(
                &test_user(1, "alice"),
                CreateResubInput {
                    name: "cats".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(view.resub.name, "cats");
        assert_eq!(view.owner_username, "alice");
    }

    #[tokio::test]
    async fn test_create_duplicate_name_conflicts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_resub(1, "cats", 2, None)]])
            .into_connection();

        let result = service(db)
            .create(
                &test_user(1, "alice"),
                CreateResubInput {
                    name: "cats".to_string(),
                    description: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_name() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(db)
            .create(
                &test_user(1, "alice"),
                CreateResubInput {
                    name: "cats and dogs".to_string(),
                    description: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_transfer_leaves_description_untouched() {
        let original = test_resub(1, "cats", 1, Some("A"));
        let transferred = resub::Model {
            owner_id: 2,
            edited: Some(Utc::now().into()),
            ..original.clone()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_user(2, "bob")]])
            .append_query_results([[transferred]])
            .into_connection();
        let db = Arc::new(db);
        let service = ResubService::new(
            ResubRepository::new(db.clone()),
            UserRepository::new(db.clone()),
        );

        let view = service
            .update(
                original,
                UpdateResubInput {
                    description: None,
                    new_owner_username: Some("bob".to_string()),
                },
            )
            .await
            .unwrap();
        drop(service);

        assert_eq!(view.owner_username, "bob");
        assert_eq!(view.resub.description.as_deref(), Some("A"));

        // The UPDATE must only assign the changed columns.
        let log = Arc::try_unwrap(db).ok().unwrap().into_transaction_log();
        let update_sql = &log[1].statements()[0].sql;
        assert!(update_sql.starts_with(r#"UPDATE "resubs""#));
        assert!(update_sql.contains(r#""owner_id""#));
        assert!(update_sql.contains(r#""edited""#));
        assert!(!update_sql.contains(r#""description" ="#));
    }

    #[tokio::test]
    async fn test_transfer_to_unknown_user_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let result = service(db)
            .update(
                test_resub(1, "cats", 1, Some("A")),
                UpdateResubInput {
                    description: None,
                    new_owner_username: Some("ghost".to_string()),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_attaches_owner_names() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[
                test_resub(2, "dogs", 2, None),
                test_resub(1, "cats", 1, None),
            ]])
            .append_query_results([[test_user(1, "alice"), test_user(2, "bob")]])
            .into_connection();

        let views = service(db).list(50, 0).await.unwrap();

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].owner_username, "bob");
        assert_eq!(views[1].owner_username, "alice");
    }
}
