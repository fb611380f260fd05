//! Shared query helpers for all repositories.
//!
//! Every table embeds the same lifecycle columns, so soft-delete and the
//! "live rows only" filter are written once here and wired to each entity
//! through [`SoftDelete`].

use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, SimpleExpr},
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Select,
};
use uuid::Uuid;

use super::entities;
use crate::errors::AppResult;
use crate::types::PaginationParams;

/// Lifecycle columns touched by a soft delete.
#[derive(Debug, Clone, Copy)]
pub(crate) enum LifecycleColumn {
    IsDeleted,
    DeletedBy,
    DeletedAt,
    UpdatedBy,
    UpdatedAt,
}

/// Entities carrying the lifecycle columns.
pub(crate) trait SoftDelete: EntityTrait {
    fn id_column() -> Self::Column;

    fn lifecycle_column(column: LifecycleColumn) -> Self::Column;

    /// `is_deleted = false`
    fn not_deleted() -> SimpleExpr {
        Self::lifecycle_column(LifecycleColumn::IsDeleted).eq(false)
    }
}

macro_rules! impl_soft_delete {
    ($($module:ident),+ $(,)?) => {$(
        impl SoftDelete for entities::$module::Entity {
            fn id_column() -> Self::Column {
                entities::$module::Column::Id
            }

            fn lifecycle_column(column: LifecycleColumn) -> Self::Column {
                use entities::$module::Column;
                match column {
                    LifecycleColumn::IsDeleted => Column::IsDeleted,
                    LifecycleColumn::DeletedBy => Column::DeletedBy,
                    LifecycleColumn::DeletedAt => Column::DeletedAt,
                    LifecycleColumn::UpdatedBy => Column::UpdatedBy,
                    LifecycleColumn::UpdatedAt => Column::UpdatedAt,
                }
            }
        }
    )+};
}

impl_soft_delete!(user, category, job_listing, application, bookmark);

/// Soft-delete every live row matching `condition`; returns rows affected.
pub(crate) async fn soft_delete_where<E, C>(
    db: &C,
    condition: Condition,
    actor: Uuid,
) -> AppResult<u64>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    let now = Utc::now();
    let result = E::update_many()
        .col_expr(E::lifecycle_column(LifecycleColumn::IsDeleted), Expr::value(true))
        .col_expr(E::lifecycle_column(LifecycleColumn::DeletedBy), Expr::value(actor))
        .col_expr(E::lifecycle_column(LifecycleColumn::DeletedAt), Expr::value(now))
        .col_expr(E::lifecycle_column(LifecycleColumn::UpdatedBy), Expr::value(actor))
        .col_expr(E::lifecycle_column(LifecycleColumn::UpdatedAt), Expr::value(now))
        .filter(condition)
        .filter(E::not_deleted())
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Soft-delete one live row by id. `false` when it was missing or already deleted.
pub(crate) async fn soft_delete<E, C>(db: &C, id: Uuid, actor: Uuid) -> AppResult<bool>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    let affected =
        soft_delete_where::<E, C>(db, Condition::all().add(E::id_column().eq(id)), actor).await?;
    Ok(affected > 0)
}

/// Run a select as one page plus the total count of matching rows.
pub(crate) async fn fetch_page<'db, E, C>(
    db: &'db C,
    select: Select<E>,
    params: &PaginationParams,
) -> AppResult<(Vec<E::Model>, u64)>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: Sync + 'db,
{
    // The paginator multiplies page by size unchecked
    params.offset()?;
    let paginator = select.paginate(db, params.limit());
    let total = paginator.num_items().await?;
    let data = paginator.fetch_page(params.page - 1).await?;
    Ok((data, total))
}
