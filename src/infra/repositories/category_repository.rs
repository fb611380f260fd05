//! Category repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use super::base::{soft_delete, SoftDelete};
use super::entities::category::{self, ActiveModel, Entity as CategoryEntity};
use super::entities::set_lifecycle;
use crate::domain::{Category, Lifecycle};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All live categories ordered by name
    async fn list(&self) -> AppResult<Vec<Category>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>>;

    /// Insert; `Conflict` when a live category has the same name
    async fn create(&self, name: String, actor: Option<Uuid>) -> AppResult<Category>;

    /// Rename a live category; `NotFound` if missing or deleted
    async fn rename(&self, id: Uuid, name: String, actor: Uuid) -> AppResult<Category>;

    async fn soft_delete(&self, id: Uuid, actor: Uuid) -> AppResult<bool>;
}

pub struct CategoryStore {
    db: DatabaseConnection,
}

impl CategoryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for CategoryStore {
    async fn list(&self) -> AppResult<Vec<Category>> {
        let models = CategoryEntity::find()
            .filter(CategoryEntity::not_deleted())
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        let model = CategoryEntity::find_by_id(id)
            .filter(CategoryEntity::not_deleted())
            .one(&self.db)
            .await?;
        Ok(model.map(Category::from))
    }

    async fn create(&self, name: String, actor: Option<Uuid>) -> AppResult<Category> {
        let mut active = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            ..Default::default()
        };
        set_lifecycle!(active, Lifecycle::created(actor));

        let model = active
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_db_unique(e, "Category"))?;
        Ok(Category::from(model))
    }

    async fn rename(&self, id: Uuid, name: String, actor: Uuid) -> AppResult<Category> {
        let existing = CategoryEntity::find_by_id(id)
            .filter(CategoryEntity::not_deleted())
            .one(&self.db)
            .await?
            .ok_or_not_found()?;

        let mut active = existing.into_active_model();
        active.name = Set(name);
        active.updated_by = Set(Some(actor));
        active.updated_at = Set(Some(chrono::Utc::now()));

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| AppError::from_db_unique(e, "Category"))?;
        Ok(Category::from(model))
    }

    async fn soft_delete(&self, id: Uuid, actor: Uuid) -> AppResult<bool> {
        soft_delete::<CategoryEntity, _>(&self.db, id, actor).await
    }
}
