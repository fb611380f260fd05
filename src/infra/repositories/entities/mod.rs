//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.
//! Every table carries the same flattened lifecycle columns.

pub mod application;
pub mod bookmark;
pub mod category;
pub mod job_listing;
pub mod user;

/// Build a domain [`Lifecycle`](crate::domain::Lifecycle) from a model's
/// lifecycle columns.
macro_rules! lifecycle_of {
    ($model:expr) => {
        $crate::domain::Lifecycle {
            created_by: $model.created_by,
            created_at: $model.created_at,
            updated_by: $model.updated_by,
            updated_at: $model.updated_at,
            deleted_by: $model.deleted_by,
            deleted_at: $model.deleted_at,
            is_deleted: $model.is_deleted,
        }
    };
}

pub(crate) use lifecycle_of;

/// Unpack a domain lifecycle into `Set` values for an active model.
macro_rules! set_lifecycle {
    ($active:expr, $lifecycle:expr) => {{
        let lifecycle = $lifecycle;
        $active.created_by = sea_orm::Set(lifecycle.created_by);
        $active.created_at = sea_orm::Set(lifecycle.created_at);
        $active.updated_by = sea_orm::Set(lifecycle.updated_by);
        $active.updated_at = sea_orm::Set(lifecycle.updated_at);
        $active.deleted_by = sea_orm::Set(lifecycle.deleted_by);
        $active.deleted_at = sea_orm::Set(lifecycle.deleted_at);
        $active.is_deleted = sea_orm::Set(lifecycle.is_deleted);
    }};
}

pub(crate) use set_lifecycle;
