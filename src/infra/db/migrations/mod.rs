//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240101_000002_create_categories_table;
mod m20240101_000003_create_job_listings_table;
mod m20240101_000004_create_applications_table;
mod m20240101_000005_create_bookmarks_table;
mod m20240102_000001_add_active_unique_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_categories_table::Migration),
            Box::new(m20240101_000003_create_job_listings_table::Migration),
            Box::new(m20240101_000004_create_applications_table::Migration),
            Box::new(m20240101_000005_create_bookmarks_table::Migration),
            Box::new(m20240102_000001_add_active_unique_indexes::Migration),
        ]
    }
}

/// Lifecycle columns shared by every table.
#[derive(DeriveIden)]
pub(crate) enum Lifecycle {
    CreatedBy,
    CreatedAt,
    UpdatedBy,
    UpdatedAt,
    DeletedBy,
    DeletedAt,
    IsDeleted,
}

/// Append the lifecycle columns to a table definition.
pub(crate) fn with_lifecycle(table: &mut TableCreateStatement) -> &mut TableCreateStatement {
    table
        .col(ColumnDef::new(Lifecycle::CreatedBy).uuid().null())
        .col(
            ColumnDef::new(Lifecycle::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(ColumnDef::new(Lifecycle::UpdatedBy).uuid().null())
        .col(
            ColumnDef::new(Lifecycle::UpdatedAt)
                .timestamp_with_time_zone()
                .null(),
        )
        .col(ColumnDef::new(Lifecycle::DeletedBy).uuid().null())
        .col(
            ColumnDef::new(Lifecycle::DeletedAt)
                .timestamp_with_time_zone()
                .null(),
        )
        .col(
            ColumnDef::new(Lifecycle::IsDeleted)
                .boolean()
                .not_null()
                .default(false),
        )
}
