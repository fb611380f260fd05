//! Application database entity for SeaORM.

use sea_orm::entity::prelude::*;

use super::lifecycle_of;
use crate::domain::{Application, ApplicationStatus};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "applications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub resume_url: String,
    #[sea_orm(column_type = "Text")]
    pub cover_letter: String,
    pub expected_salary: Option<i64>,
    pub interview_date: Option<DateTimeUtc>,
    #[sea_orm(column_type = "Text", nullable)]
    pub interview_notes: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub rejection_reason: Option<String>,
    pub application_date: DateTimeUtc,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_by: Option<Uuid>,
    pub updated_at: Option<DateTimeUtc>,
    pub deleted_by: Option<Uuid>,
    pub deleted_at: Option<DateTimeUtc>,
    pub is_deleted: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Application {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status: ApplicationStatus = model.status.parse().map_err(|_| {
            AppError::internal(format!("Stored application status '{}' is invalid", model.status))
        })?;
        Ok(Application {
            id: model.id,
            lifecycle: lifecycle_of!(model),
            job_id: model.job_id,
            user_id: model.user_id,
            status,
            resume_url: model.resume_url,
            cover_letter: model.cover_letter,
            expected_salary: model.expected_salary,
            interview_date: model.interview_date,
            interview_notes: model.interview_notes,
            rejection_reason: model.rejection_reason,
            application_date: model.application_date,
        })
    }
}
