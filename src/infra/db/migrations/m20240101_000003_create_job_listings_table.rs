//! Migration: Create job_listings table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;
use super::m20240101_000002_create_categories_table::Categories;
use super::{with_lifecycle, Lifecycle};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                with_lifecycle(
                    Table::create()
                        .table(JobListings::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(JobListings::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(JobListings::EmployerId).uuid().not_null())
                        .col(ColumnDef::new(JobListings::CategoryId).uuid().null())
                        .col(ColumnDef::new(JobListings::Title).string_len(200).not_null())
                        .col(ColumnDef::new(JobListings::Description).text().not_null())
                        .col(ColumnDef::new(JobListings::Requirements).text().null())
                        .col(ColumnDef::new(JobListings::Responsibilities).text().null())
                        .col(ColumnDef::new(JobListings::Benefits).text().null())
                        .col(ColumnDef::new(JobListings::JobType).string_len(16).not_null())
                        .col(
                            ColumnDef::new(JobListings::Vacancies)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(ColumnDef::new(JobListings::Location).string().not_null())
                        .col(ColumnDef::new(JobListings::Salary).big_integer().null())
                        .col(ColumnDef::new(JobListings::Deadline).date().not_null())
                        .col(
                            ColumnDef::new(JobListings::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(JobListings::IsPremium)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(JobListings::ViewCount)
                                .big_integer()
                                .not_null()
                                .default(0),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_job_listings_employer_id")
                                .from(JobListings::Table, JobListings::EmployerId)
                                .to(Users::Table, Users::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_job_listings_category_id")
                                .from(JobListings::Table, JobListings::CategoryId)
                                .to(Categories::Table, Categories::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        ),
                )
                .to_owned(),
            )
            .await?;

        // Seeker-facing listing scans filter on these three together
        manager
            .create_index(
                Index::create()
                    .name("idx_job_listings_visibility")
                    .table(JobListings::Table)
                    .col(Lifecycle::IsDeleted)
                    .col(JobListings::IsActive)
                    .col(JobListings::Deadline)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_job_listings_employer_id")
                    .table(JobListings::Table)
                    .col(JobListings::EmployerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JobListings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum JobListings {
    Table,
    Id,
    EmployerId,
    CategoryId,
    Title,
    Description,
    Requirements,
    Responsibilities,
    Benefits,
    JobType,
    Vacancies,
    Location,
    Salary,
    Deadline,
    IsActive,
    IsPremium,
    ViewCount,
}
