//! Application repository.
//!
//! At most one live application per (job, applicant) is guaranteed by the
//! `uq_applications_active_job_user` partial index; an insert that loses the
//! race surfaces as `Conflict`.

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::base::{fetch_page, soft_delete, SoftDelete};
use super::entities::application::{self, ActiveModel, Column, Entity as ApplicationEntity};
use super::entities::set_lifecycle;
use crate::domain::{Application, ApplicationStatus, Lifecycle, NewApplication, StatusChange};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Application>>;

    /// The live application of `user_id` to `job_id`, if any
    async fn find_active(&self, job_id: Uuid, user_id: Uuid) -> AppResult<Option<Application>>;

    /// Insert a `pending` application; `Conflict` on a duplicate live pair
    async fn create(&self, application: NewApplication) -> AppResult<Application>;

    async fn list_by_user(
        &self,
        user_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Application>, u64)>;

    async fn list_by_job(
        &self,
        job_id: Uuid,
        status: Option<ApplicationStatus>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Application>, u64)>;

    /// Write `change` only if the row is still live and in `expected` state.
    /// `None` means another writer got there first.
    async fn update_status(
        &self,
        id: Uuid,
        expected: ApplicationStatus,
        change: StatusChange,
        actor: Uuid,
    ) -> AppResult<Option<Application>>;

    async fn soft_delete(&self, id: Uuid, actor: Uuid) -> AppResult<bool>;
}

pub struct ApplicationStore {
    db: DatabaseConnection,
}

impl ApplicationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(models: Vec<application::Model>) -> AppResult<Vec<Application>> {
    models.into_iter().map(Application::try_from).collect()
}

#[async_trait]
impl ApplicationRepository for ApplicationStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Application>> {
        ApplicationEntity::find_by_id(id)
            .filter(ApplicationEntity::not_deleted())
            .one(&self.db)
            .await?
            .map(Application::try_from)
            .transpose()
    }

    async fn find_active(&self, job_id: Uuid, user_id: Uuid) -> AppResult<Option<Application>> {
        ApplicationEntity::find()
            .filter(Column::JobId.eq(job_id))
            .filter(Column::UserId.eq(user_id))
            .filter(ApplicationEntity::not_deleted())
            .one(&self.db)
            .await?
            .map(Application::try_from)
            .transpose()
    }

    async fn create(&self, new_app: NewApplication) -> AppResult<Application> {
        let now = chrono::Utc::now();
        let mut active = ActiveModel {
            id: Set(Uuid::new_v4()),
            job_id: Set(new_app.job_id),
            user_id: Set(new_app.user_id),
            status: Set(ApplicationStatus::Pending.as_str().to_string()),
            resume_url: Set(new_app.resume_url),
            cover_letter: Set(new_app.cover_letter),
            expected_salary: Set(new_app.expected_salary),
            interview_date: Set(None),
            interview_notes: Set(None),
            rejection_reason: Set(None),
            application_date: Set(now),
            ..Default::default()
        };
        let mut lifecycle = Lifecycle::created(Some(new_app.user_id));
        lifecycle.created_at = now;
        set_lifecycle!(active, lifecycle);

        let model = active
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_db_unique(e, "Application"))?;
        Application::try_from(model)
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Application>, u64)> {
        let select = ApplicationEntity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(ApplicationEntity::not_deleted())
            .order_by_desc(Column::ApplicationDate)
            .order_by_desc(Column::Id);
        let (models, total) = fetch_page(&self.db, select, &params).await?;
        Ok((to_domain(models)?, total))
    }

    async fn list_by_job(
        &self,
        job_id: Uuid,
        status: Option<ApplicationStatus>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Application>, u64)> {
        let mut select = ApplicationEntity::find()
            .filter(Column::JobId.eq(job_id))
            .filter(ApplicationEntity::not_deleted());
        if let Some(status) = status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }
        let select = select
            .order_by_desc(Column::ApplicationDate)
            .order_by_desc(Column::Id);
        let (models, total) = fetch_page(&self.db, select, &params).await?;
        Ok((to_domain(models)?, total))
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: ApplicationStatus,
        change: StatusChange,
        actor: Uuid,
    ) -> AppResult<Option<Application>> {
        let result = ApplicationEntity::update_many()
            .col_expr(Column::Status, Expr::value(change.status.as_str()))
            .col_expr(Column::InterviewDate, Expr::value(change.interview_date))
            .col_expr(Column::InterviewNotes, Expr::value(change.interview_notes))
            .col_expr(Column::RejectionReason, Expr::value(change.rejection_reason))
            .col_expr(Column::UpdatedBy, Expr::value(Some(actor)))
            .col_expr(Column::UpdatedAt, Expr::value(Some(chrono::Utc::now())))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(expected.as_str()))
            .filter(ApplicationEntity::not_deleted())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn soft_delete(&self, id: Uuid, actor: Uuid) -> AppResult<bool> {
        soft_delete::<ApplicationEntity, _>(&self.db, id, actor).await
    }
}
