//! User repository implementation with soft delete support.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::base::{fetch_page, soft_delete, SoftDelete};
use super::entities::set_lifecycle;
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{Lifecycle, NewUser, User};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// By default, all query methods exclude soft-deleted records.
/// Use `*_with_deleted` variants to include them.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find active user by ID (excludes soft-deleted)
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by ID including soft-deleted
    async fn find_by_id_with_deleted(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find active user by email address (excludes soft-deleted)
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Whether any user, deleted or not, holds this email
    async fn email_taken(&self, email: &str) -> AppResult<bool>;

    /// Users by id including soft-deleted, for joins onto history
    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>>;

    /// Insert a new user
    async fn create(&self, user: NewUser, created_by: Option<Uuid>) -> AppResult<User>;

    /// Page through active users, newest first
    async fn list(&self, params: PaginationParams) -> AppResult<(Vec<User>, u64)>;

    /// Soft delete; `false` if the user was missing or already deleted
    async fn soft_delete(&self, id: Uuid, actor: Uuid) -> AppResult<bool>;
}

/// Concrete implementation of UserRepository with soft delete
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(models: Vec<user::Model>) -> AppResult<Vec<User>> {
    models.into_iter().map(User::try_from).collect()
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        UserEntity::find_by_id(id)
            .filter(UserEntity::not_deleted())
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_id_with_deleted(&self, id: Uuid) -> AppResult<Option<User>> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .filter(UserEntity::not_deleted())
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn email_taken(&self, email: &str) -> AppResult<bool> {
        let existing = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(existing.is_some())
    }

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = UserEntity::find()
            .filter(user::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        to_domain(models)
    }

    async fn create(&self, new_user: NewUser, created_by: Option<Uuid>) -> AppResult<User> {
        let mut active = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            name: Set(new_user.name),
            role: Set(new_user.role.as_str().to_string()),
            ..Default::default()
        };
        set_lifecycle!(active, Lifecycle::created(created_by));

        let model = active
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_db_unique(e, "Email"))?;
        User::try_from(model)
    }

    async fn list(&self, params: PaginationParams) -> AppResult<(Vec<User>, u64)> {
        let select = UserEntity::find()
            .filter(UserEntity::not_deleted())
            .order_by_desc(user::Column::CreatedAt)
            .order_by_desc(user::Column::Id);
        let (models, total) = fetch_page(&self.db, select, &params).await?;
        Ok((to_domain(models)?, total))
    }

    async fn soft_delete(&self, id: Uuid, actor: Uuid) -> AppResult<bool> {
        soft_delete::<UserEntity, _>(&self.db, id, actor).await
    }
}
