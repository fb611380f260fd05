//! Migration: Uniqueness among non-deleted rows.
//!
//! Soft-deleted rows stay in the table, so plain unique constraints would
//! block re-applying or re-adding a category name. Partial indexes only
//! cover live rows. SeaQuery has no builder for the `WHERE` clause, so the
//! statements are raw SQL understood by both Postgres and SQLite.

use sea_orm_migration::prelude::*;

const INDEXES: &[(&str, &str, &str)] = &[
    ("uq_applications_active_job_user", "applications", "job_id, user_id"),
    ("uq_bookmarks_active_user_job", "bookmarks", "user_id, job_id"),
    ("uq_categories_active_name", "categories", "name"),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for (name, table, columns) in INDEXES {
            db.execute_unprepared(&format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS {name} ON {table} ({columns}) WHERE is_deleted = FALSE"
            ))
            .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for (name, _, _) in INDEXES {
            db.execute_unprepared(&format!("DROP INDEX IF EXISTS {name}"))
                .await?;
        }
        Ok(())
    }
}
