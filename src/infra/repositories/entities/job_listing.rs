//! Job listing database entity for SeaORM.

use sea_orm::entity::prelude::*;

use super::lifecycle_of;
use crate::domain::{JobListing, JobType};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "job_listings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub employer_id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub requirements: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub responsibilities: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub benefits: Option<String>,
    pub job_type: String,
    pub vacancies: i32,
    pub location: String,
    pub salary: Option<i64>,
    pub deadline: Date,
    pub is_active: bool,
    pub is_premium: bool,
    pub view_count: i64,
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

impl TryFrom<Model> for JobListing {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let job_type: JobType = model.job_type.parse().map_err(|_| {
            AppError::internal(format!("Stored job type '{}' is invalid", model.job_type))
        })?;
        Ok(JobListing {
            id: model.id,
            lifecycle: lifecycle_of!(model),
            employer_id: model.employer_id,
            category_id: model.category_id,
            title: model.title,
            description: model.description,
            requirements: model.requirements,
            responsibilities: model.responsibilities,
            benefits: model.benefits,
            job_type,
            vacancies: model.vacancies,
            location: model.location,
            salary: model.salary,
            deadline: model.deadline,
            is_active: model.is_active,
            is_premium: model.is_premium,
            view_count: model.view_count,
        })
    }
}
