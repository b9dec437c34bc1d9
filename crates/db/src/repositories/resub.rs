//! Resub repository.

use std::sync::Arc;

use crate::entities::{Resub, resub};
use repost_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use super::write_err;

/// Resub repository for database operations.
#[derive(Clone)]
pub struct ResubRepository {
    db: Arc<DatabaseConnection>,
}

impl ResubRepository {
    /// Create a new resub repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a resub by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<resub::Model>> {
        Resub::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a resub by its unique name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<resub::Model>> {
        Resub::find()
            .filter(resub::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find resubs by IDs.
    pub async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<resub::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Resub::find()
            .filter(resub::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List resubs, newest first.
    pub async fn find_recent(&self, limit: u64, offset: u64) -> AppResult<Vec<resub::Model>> {
        Resub::find()
            .order_by_desc(resub::Column::Created)
            .order_by_desc(resub::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List resubs owned by a user, newest first.
    pub async fn find_by_owner(
        &self,
        owner_id: i32,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<resub::Model>> {
        Resub::find()
            .filter(resub::Column::OwnerId.eq(owner_id))
            .order_by_desc(resub::Column::Created)
            .order_by_desc(resub::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new resub.
    pub async fn create(&self, model: resub::ActiveModel) -> AppResult<resub::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| write_err(e, "Resub"))
    }

    /// Update a resub.
    pub async fn update(&self, model: resub::ActiveModel) -> AppResult<resub::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| write_err(e, "Resub"))
    }

    /// Delete a resub.
    pub async fn delete(&self, resub: resub::Model) -> AppResult<()> {
        resub
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
