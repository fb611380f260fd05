//! Bookmark database entity for SeaORM.

use sea_orm::entity::prelude::*;

use super::lifecycle_of;
use crate::domain::{Bookmark, BookmarkStatus};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bookmarks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: Uuid,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub status: String,
    pub reminder_date: Option<Date>,
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

impl TryFrom<Model> for Bookmark {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status: BookmarkStatus = model.status.parse().map_err(|_| {
            AppError::internal(format!("Stored bookmark status '{}' is invalid", model.status))
        })?;
        Ok(Bookmark {
            id: model.id,
            lifecycle: lifecycle_of!(model),
            user_id: model.user_id,
            job_id: model.job_id,
            notes: model.notes,
            status,
            reminder_date: model.reminder_date,
        })
    }
}
