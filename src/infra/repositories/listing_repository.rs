//! Job listing repository: storage, filtered paging and the view counter.

use async_trait::async_trait;
use sea_orm::{
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Select, Set,
};
use uuid::Uuid;

use super::base::{fetch_page, soft_delete, SoftDelete};
use super::entities::job_listing::{self, ActiveModel, Column, Entity as ListingEntity};
use super::entities::set_lifecycle;
use crate::domain::{
    JobListing, Lifecycle, ListingFilter, ListingPatch, ListingSort, NewListing, Visibility,
};
use crate::errors::{AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Live (non-deleted) listing by id, whatever its active/expired state
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<JobListing>>;

    /// Listing by id including soft-deleted rows (audit path)
    async fn find_by_id_with_deleted(&self, id: Uuid) -> AppResult<Option<JobListing>>;

    /// Listings by id including soft-deleted, for joins
    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<JobListing>>;

    async fn create(&self, employer_id: Uuid, listing: NewListing) -> AppResult<JobListing>;

    /// Apply a partial update to a live listing; `NotFound` if missing
    async fn update(&self, id: Uuid, patch: ListingPatch, actor: Uuid) -> AppResult<JobListing>;

    /// One page of listings matching `filter`, plus the total match count
    async fn list(
        &self,
        filter: ListingFilter,
        params: PaginationParams,
    ) -> AppResult<(Vec<JobListing>, u64)>;

    /// Atomically bump the view counter of a live listing
    async fn increment_views(&self, id: Uuid) -> AppResult<()>;

    async fn soft_delete(&self, id: Uuid, actor: Uuid) -> AppResult<bool>;
}

pub struct ListingStore {
    db: DatabaseConnection,
}

impl ListingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(models: Vec<job_listing::Model>) -> AppResult<Vec<JobListing>> {
    models.into_iter().map(JobListing::try_from).collect()
}

/// `%term%` with LIKE wildcards in the term escaped.
fn contains_pattern(term: &str) -> LikeExpr {
    let escaped = term
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    LikeExpr::new(format!("%{}%", escaped)).escape('\\')
}

/// Case-insensitive substring match that behaves the same on Postgres and SQLite.
fn lower_contains(column: Column, term: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(contains_pattern(term))
}

fn filtered(filter: &ListingFilter) -> Select<ListingEntity> {
    let mut select = ListingEntity::find().filter(ListingEntity::not_deleted());

    if let Visibility::Open(today) = filter.visibility {
        select = select
            .filter(Column::IsActive.eq(true))
            .filter(Column::Deadline.gte(today));
    }
    if let Some(category_id) = filter.category_id {
        select = select.filter(Column::CategoryId.eq(category_id));
    }
    if let Some(job_type) = filter.job_type {
        select = select.filter(Column::JobType.eq(job_type.as_str()));
    }
    if let Some(location) = &filter.location {
        select = select.filter(lower_contains(Column::Location, location));
    }
    if let Some(employer_id) = filter.employer_id {
        select = select.filter(Column::EmployerId.eq(employer_id));
    }
    if let Some(is_active) = filter.is_active {
        select = select.filter(Column::IsActive.eq(is_active));
    }
    if let Some(min) = filter.salary_min {
        select = select.filter(Column::Salary.gte(min));
    }
    if let Some(max) = filter.salary_max {
        select = select.filter(Column::Salary.lte(max));
    }
    if let Some(term) = &filter.search {
        select = select.filter(
            Condition::any()
                .add(lower_contains(Column::Title, term))
                .add(lower_contains(Column::Description, term))
                .add(lower_contains(Column::Location, term)),
        );
    }

    let select = match filter.sort {
        ListingSort::Newest => select,
        ListingSort::Deadline => select.order_by_asc(Column::Deadline),
        ListingSort::Premium => select.order_by_desc(Column::IsPremium),
    };
    // Id breaks ties so pages never overlap
    select
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
}

#[async_trait]
impl ListingRepository for ListingStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<JobListing>> {
        ListingEntity::find_by_id(id)
            .filter(ListingEntity::not_deleted())
            .one(&self.db)
            .await?
            .map(JobListing::try_from)
            .transpose()
    }

    async fn find_by_id_with_deleted(&self, id: Uuid) -> AppResult<Option<JobListing>> {
        ListingEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(JobListing::try_from)
            .transpose()
    }

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<JobListing>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = ListingEntity::find()
            .filter(Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        to_domain(models)
    }

    async fn create(&self, employer_id: Uuid, listing: NewListing) -> AppResult<JobListing> {
        let mut active = ActiveModel {
            id: Set(Uuid::new_v4()),
            employer_id: Set(employer_id),
            category_id: Set(listing.category_id),
            title: Set(listing.title),
            description: Set(listing.description),
            requirements: Set(listing.requirements),
            responsibilities: Set(listing.responsibilities),
            benefits: Set(listing.benefits),
            job_type: Set(listing.job_type.as_str().to_string()),
            vacancies: Set(listing.vacancies),
            location: Set(listing.location),
            salary: Set(listing.salary),
            deadline: Set(listing.deadline),
            is_active: Set(listing.is_active),
            is_premium: Set(listing.is_premium),
            view_count: Set(0),
            ..Default::default()
        };
        set_lifecycle!(active, Lifecycle::created(Some(employer_id)));

        let model = active.insert(&self.db).await?;
        JobListing::try_from(model)
    }

    async fn update(&self, id: Uuid, patch: ListingPatch, actor: Uuid) -> AppResult<JobListing> {
        let existing = ListingEntity::find_by_id(id)
            .filter(ListingEntity::not_deleted())
            .one(&self.db)
            .await?
            .ok_or_not_found()?;

        let mut active = existing.into_active_model();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        // An empty string clears the optional text sections
        if let Some(requirements) = patch.requirements {
            active.requirements = Set(Some(requirements).filter(|s| !s.is_empty()));
        }
        if let Some(responsibilities) = patch.responsibilities {
            active.responsibilities = Set(Some(responsibilities).filter(|s| !s.is_empty()));
        }
        if let Some(benefits) = patch.benefits {
            active.benefits = Set(Some(benefits).filter(|s| !s.is_empty()));
        }
        if let Some(location) = patch.location {
            active.location = Set(location);
        }
        if let Some(job_type) = patch.job_type {
            active.job_type = Set(job_type.as_str().to_string());
        }
        if let Some(deadline) = patch.deadline {
            active.deadline = Set(deadline);
        }
        if let Some(vacancies) = patch.vacancies {
            active.vacancies = Set(vacancies);
        }
        if let Some(salary) = patch.salary {
            active.salary = Set(salary);
        }
        if let Some(category_id) = patch.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(is_active) = patch.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(is_premium) = patch.is_premium {
            active.is_premium = Set(is_premium);
        }
        active.updated_by = Set(Some(actor));
        active.updated_at = Set(Some(chrono::Utc::now()));

        let model = active.update(&self.db).await?;
        JobListing::try_from(model)
    }

    async fn list(
        &self,
        filter: ListingFilter,
        params: PaginationParams,
    ) -> AppResult<(Vec<JobListing>, u64)> {
        let (models, total) = fetch_page(&self.db, filtered(&filter), &params).await?;
        Ok((to_domain(models)?, total))
    }

    async fn increment_views(&self, id: Uuid) -> AppResult<()> {
        ListingEntity::update_many()
            .col_expr(Column::ViewCount, Expr::col(Column::ViewCount).add(1))
            .filter(Column::Id.eq(id))
            .filter(ListingEntity::not_deleted())
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid, actor: Uuid) -> AppResult<bool> {
        soft_delete::<ListingEntity, _>(&self.db, id, actor).await
    }
}
