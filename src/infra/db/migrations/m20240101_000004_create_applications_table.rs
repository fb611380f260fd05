//! Migration: Create applications table.

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
                        .table(Applications::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Applications::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Applications::JobId).uuid().not_null())
                        .col(ColumnDef::new(Applications::UserId).uuid().not_null())
                        .col(
                            ColumnDef::new(Applications::Status)
                                .string_len(16)
                                .not_null()
                                .default("pending"),
                        )
                        .col(ColumnDef::new(Applications::ResumeUrl).string().not_null())
                        .col(ColumnDef::new(Applications::CoverLetter).text().not_null())
                        .col(ColumnDef::new(Applications::ExpectedSalary).big_integer().null())
                        .col(
                            ColumnDef::new(Applications::InterviewDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(Applications::InterviewNotes).text().null())
                        .col(ColumnDef::new(Applications::RejectionReason).text().null())
                        .col(
                            ColumnDef::new(Applications::ApplicationDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_applications_job_id")
                                .from(Applications::Table, Applications::JobId)
                                .to(JobListings::Table, JobListings::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_applications_user_id")
                                .from(Applications::Table, Applications::UserId)
                                .to(Users::Table, Users::Id),
                        ),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_applications_user_id")
                    .table(Applications::Table)
                    .col(Applications::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Applications::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Applications {
    Table,
    Id,
    JobId,
    UserId,
    Status,
    ResumeUrl,
    CoverLetter,
    ExpectedSalary,
    InterviewDate,
    InterviewNotes,
    RejectionReason,
    ApplicationDate,
}
