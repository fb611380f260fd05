//! Migration: Create bookmarks table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;
use super::m20240101_000003_create_job_listings_table::JobListings;
use super::with_lifecycle;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                with_lifecycle(
                    Table::create()
                        .table(Bookmarks::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Bookmarks::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Bookmarks::UserId).uuid().not_null())
                        .col(ColumnDef::new(Bookmarks::JobId).uuid().not_null())
                        .col(ColumnDef::new(Bookmarks::Notes).text().null())
                        .col(
                            ColumnDef::new(Bookmarks::Status)
                                .string_len(16)
                                .not_null()
                                .default("saved"),
                        )
                        .col(ColumnDef::new(Bookmarks::ReminderDate).date().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_bookmarks_user_id")
                                .from(Bookmarks::Table, Bookmarks::UserId)
                                .to(Users::Table, Users::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_bookmarks_job_id")
                                .from(Bookmarks::Table, Bookmarks::JobId)
                                .to(JobListings::Table, JobListings::Id),
                        ),
                )
                .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookmarks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Bookmarks {
    Table,
    Id,
    UserId,
    JobId,
    Notes,
    Status,
    ReminderDate,
}
