//! Bookmark repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::base::{fetch_page, soft_delete_where, SoftDelete};
use super::entities::bookmark::{ActiveModel, Column, Entity as BookmarkEntity};
use super::entities::set_lifecycle;
use crate::domain::{Bookmark, BookmarkChanges, BookmarkStatus, Lifecycle};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BookmarkRepository: Send + Sync {
    /// The live bookmark for the pair, if any
    async fn find_active(&self, user_id: Uuid, job_id: Uuid) -> AppResult<Option<Bookmark>>;

    /// Insert a `saved` bookmark; `Conflict` when a live one already exists
    async fn create(
        &self,
        user_id: Uuid,
        job_id: Uuid,
        notes: Option<String>,
        reminder_date: Option<NaiveDate>,
    ) -> AppResult<Bookmark>;

    /// Apply changes to a live bookmark by id
    async fn update(&self, id: Uuid, changes: BookmarkChanges, actor: Uuid) -> AppResult<Bookmark>;

    async fn list_by_user(
        &self,
        user_id: Uuid,
        status: Option<BookmarkStatus>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Bookmark>, u64)>;

    /// Subset of `job_ids` the user has a live bookmark on
    async fn bookmarked_job_ids(&self, user_id: Uuid, job_ids: Vec<Uuid>) -> AppResult<Vec<Uuid>>;

    /// Flip the live bookmark for the pair (if any) to `applied`
    async fn mark_applied(&self, user_id: Uuid, job_id: Uuid) -> AppResult<()>;

    /// Soft-delete the live bookmark for the pair; returns rows affected
    async fn soft_delete_pair(&self, user_id: Uuid, job_id: Uuid) -> AppResult<u64>;
}

pub struct BookmarkStore {
    db: DatabaseConnection,
}

impl BookmarkStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn pair(user_id: Uuid, job_id: Uuid) -> Condition {
    Condition::all()
        .add(Column::UserId.eq(user_id))
        .add(Column::JobId.eq(job_id))
}

#[async_trait]
impl BookmarkRepository for BookmarkStore {
    async fn find_active(&self, user_id: Uuid, job_id: Uuid) -> AppResult<Option<Bookmark>> {
        BookmarkEntity::find()
            .filter(pair(user_id, job_id))
            .filter(BookmarkEntity::not_deleted())
            .one(&self.db)
            .await?
            .map(Bookmark::try_from)
            .transpose()
    }

    async fn create(
        &self,
        user_id: Uuid,
        job_id: Uuid,
        notes: Option<String>,
        reminder_date: Option<NaiveDate>,
    ) -> AppResult<Bookmark> {
        let mut active = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            job_id: Set(job_id),
            notes: Set(notes),
            status: Set(BookmarkStatus::Saved.as_str().to_string()),
            reminder_date: Set(reminder_date),
            ..Default::default()
        };
        set_lifecycle!(active, Lifecycle::created(Some(user_id)));

        let model = active
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_db_unique(e, "Bookmark"))?;
        Bookmark::try_from(model)
    }

    async fn update(&self, id: Uuid, changes: BookmarkChanges, actor: Uuid) -> AppResult<Bookmark> {
        let existing = BookmarkEntity::find_by_id(id)
            .filter(BookmarkEntity::not_deleted())
            .one(&self.db)
            .await?
            .ok_or_not_found()?;

        let mut active = existing.into_active_model();
        if let Some(notes) = changes.notes {
            active.notes = Set(Some(notes).filter(|n| !n.is_empty()));
        }
        if let Some(status) = changes.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(reminder_date) = changes.reminder_date {
            active.reminder_date = Set(Some(reminder_date));
        }
        active.updated_by = Set(Some(actor));
        active.updated_at = Set(Some(chrono::Utc::now()));

        let model = active.update(&self.db).await?;
        Bookmark::try_from(model)
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        status: Option<BookmarkStatus>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Bookmark>, u64)> {
        let mut select = BookmarkEntity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(BookmarkEntity::not_deleted());
        if let Some(status) = status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }
        let select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);
        let (models, total) = fetch_page(&self.db, select, &params).await?;
        let bookmarks = models
            .into_iter()
            .map(Bookmark::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((bookmarks, total))
    }

    async fn bookmarked_job_ids(&self, user_id: Uuid, job_ids: Vec<Uuid>) -> AppResult<Vec<Uuid>> {
        if job_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = BookmarkEntity::find()
            .select_only()
            .column(Column::JobId)
            .filter(Column::UserId.eq(user_id))
            .filter(Column::JobId.is_in(job_ids))
            .filter(BookmarkEntity::not_deleted())
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await?;
        Ok(ids)
    }

    async fn mark_applied(&self, user_id: Uuid, job_id: Uuid) -> AppResult<()> {
        BookmarkEntity::update_many()
            .col_expr(Column::Status, Expr::value(BookmarkStatus::Applied.as_str()))
            .col_expr(Column::UpdatedBy, Expr::value(Some(user_id)))
            .col_expr(Column::UpdatedAt, Expr::value(Some(chrono::Utc::now())))
            .filter(pair(user_id, job_id))
            .filter(BookmarkEntity::not_deleted())
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn soft_delete_pair(&self, user_id: Uuid, job_id: Uuid) -> AppResult<u64> {
        soft_delete_where::<BookmarkEntity, _>(&self.db, pair(user_id, job_id), user_id).await
    }
}
