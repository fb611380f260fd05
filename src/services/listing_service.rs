//! Job listing service.
//!
//! Public reads see only open listings (active, undeleted, deadline not
//! passed). Management reads and every mutation go through the ownership
//! policy first.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::listing::today;
use crate::domain::{
    policy, Identity, JobListing, ListingChanges, ListingFilter, ListingInput, ListingResponse,
    UserRole, Visibility,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait ListingService: Send + Sync {
    /// Post a new listing owned by the calling employer
    async fn create(&self, identity: &Identity, input: ListingInput) -> AppResult<JobListing>;

    /// Single listing; counts a view for anonymous and job seeker readers
    async fn get(&self, viewer: Option<&Identity>, id: Uuid) -> AppResult<ListingResponse>;

    /// Paged open listings matching `filter`
    async fn list(
        &self,
        viewer: Option<&Identity>,
        filter: ListingFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<ListingResponse>>;

    /// Paged case-insensitive search over title, description and location
    async fn search(
        &self,
        viewer: Option<&Identity>,
        term: Option<String>,
        params: PaginationParams,
    ) -> AppResult<Paginated<ListingResponse>>;

    /// Management list: an employer's own listings, or any employer's for admins
    async fn list_mine(
        &self,
        identity: &Identity,
        employer_id: Option<Uuid>,
        is_active: Option<bool>,
        params: PaginationParams,
    ) -> AppResult<Paginated<ListingResponse>>;

    async fn update(
        &self,
        identity: &Identity,
        id: Uuid,
        changes: ListingChanges,
    ) -> AppResult<JobListing>;

    async fn delete(&self, identity: &Identity, id: Uuid) -> AppResult<()>;

    /// Admin view that still returns soft-deleted listings
    async fn audit(&self, identity: &Identity, id: Uuid) -> AppResult<ListingResponse>;
}

pub struct ListingManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ListingManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn check_category(&self, category_id: Option<Uuid>) -> AppResult<()> {
        let Some(category_id) = category_id else {
            return Ok(());
        };
        match self.uow.categories().find_by_id(category_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::validation(
                "categoryId does not reference an existing category",
            )),
        }
    }

    /// Flag which listings the viewing job seeker has bookmarked.
    async fn annotate(
        &self,
        viewer: Option<&Identity>,
        listings: Vec<JobListing>,
    ) -> AppResult<Vec<ListingResponse>> {
        let seeker = viewer.filter(|v| v.role == UserRole::JobSeeker);
        let bookmarked: Option<HashSet<Uuid>> = match seeker {
            Some(seeker) => {
                let ids = listings.iter().map(|l| l.id).collect();
                let marked = self.uow.bookmarks().bookmarked_job_ids(seeker.id, ids).await?;
                Some(marked.into_iter().collect())
            }
            None => None,
        };

        Ok(listings
            .into_iter()
            .map(|listing| {
                let flag = bookmarked.as_ref().map(|set| set.contains(&listing.id));
                ListingResponse::from(listing).with_bookmark(flag)
            })
            .collect())
    }

    async fn page(
        &self,
        viewer: Option<&Identity>,
        filter: ListingFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<ListingResponse>> {
        let (listings, total) = self.uow.listings().list(filter, params).await?;
        let data = self.annotate(viewer, listings).await?;
        Ok(Paginated::new(data, params, total))
    }
}

#[async_trait]
impl<U: UnitOfWork> ListingService for ListingManager<U> {
    async fn create(&self, identity: &Identity, input: ListingInput) -> AppResult<JobListing> {
        policy::require_role(identity, &[UserRole::Employer])?;

        // The owner must still be a live employer account
        let owner = self.uow.users().find_by_id(identity.id).await?;
        if !matches!(owner, Some(ref u) if u.role == UserRole::Employer) {
            return Err(AppError::Forbidden);
        }

        let listing = input.parse(today())?;
        if listing.is_premium && !identity.is_admin() {
            return Err(AppError::Forbidden);
        }
        self.check_category(listing.category_id).await?;

        let created = self.uow.listings().create(identity.id, listing).await?;
        tracing::info!(job_id = %created.id, employer_id = %identity.id, "Listing created");
        Ok(created)
    }

    async fn get(&self, viewer: Option<&Identity>, id: Uuid) -> AppResult<ListingResponse> {
        let mut listing = self.uow.listings().find_by_id(id).await?.ok_or_not_found()?;

        let privileged =
            viewer.is_some_and(|v| v.is_admin() || listing.is_owned_by(v.id));
        if !listing.is_active && !privileged {
            return Err(AppError::NotFound);
        }

        let seeker = viewer.filter(|v| v.role == UserRole::JobSeeker);
        let counts_view = viewer.is_none() || seeker.is_some();

        let listings = self.uow.listings();
        let bookmarks = self.uow.bookmarks();
        let count_view = async {
            if counts_view {
                listings.increment_views(id).await?;
            }
            Ok::<_, AppError>(())
        };
        let bookmark_lookup = async {
            match seeker {
                Some(s) => Ok(Some(bookmarks.find_active(s.id, id).await?.is_some())),
                None => Ok::<_, AppError>(None),
            }
        };
        let ((), is_bookmarked) = futures::try_join!(count_view, bookmark_lookup)?;

        if counts_view {
            listing.view_count += 1;
        }
        Ok(ListingResponse::from(listing).with_bookmark(is_bookmarked))
    }

    async fn list(
        &self,
        viewer: Option<&Identity>,
        filter: ListingFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<ListingResponse>> {
        let filter = ListingFilter {
            visibility: Visibility::Open(today()),
            is_active: None,
            ..filter
        }
        .normalized()?;
        self.page(viewer, filter, params).await
    }

    async fn search(
        &self,
        viewer: Option<&Identity>,
        term: Option<String>,
        params: PaginationParams,
    ) -> AppResult<Paginated<ListingResponse>> {
        let filter = ListingFilter {
            search: term,
            ..ListingFilter::open(today())
        }
        .normalized()?;
        self.page(viewer, filter, params).await
    }

    async fn list_mine(
        &self,
        identity: &Identity,
        employer_id: Option<Uuid>,
        is_active: Option<bool>,
        params: PaginationParams,
    ) -> AppResult<Paginated<ListingResponse>> {
        policy::require_role(identity, &[UserRole::Employer, UserRole::Admin])?;

        let employer_id = if identity.is_admin() {
            employer_id
        } else {
            Some(identity.id)
        };
        let filter = ListingFilter {
            employer_id,
            is_active,
            ..ListingFilter::undeleted()
        };
        self.page(Some(identity), filter, params).await
    }

    async fn update(
        &self,
        identity: &Identity,
        id: Uuid,
        changes: ListingChanges,
    ) -> AppResult<JobListing> {
        let listing = self.uow.listings().find_by_id(id).await?.ok_or_not_found()?;
        policy::can_manage_listing(identity, &listing)?;

        let patch = changes.parse(today())?;
        let premium_changed = patch
            .is_premium
            .is_some_and(|premium| premium != listing.is_premium);
        if premium_changed && !identity.is_admin() {
            return Err(AppError::Forbidden);
        }
        self.check_category(patch.category_id.flatten()).await?;

        let updated = self.uow.listings().update(id, patch, identity.id).await?;
        tracing::info!(job_id = %id, actor = %identity.id, "Listing updated");
        Ok(updated)
    }

    async fn delete(&self, identity: &Identity, id: Uuid) -> AppResult<()> {
        let listing = self.uow.listings().find_by_id(id).await?.ok_or_not_found()?;
        policy::can_manage_listing(identity, &listing)?;

        let deleted = self.uow.listings().soft_delete(id, identity.id).await?;
        deleted.then_some(()).ok_or_not_found()?;

        tracing::info!(job_id = %id, actor = %identity.id, "Listing deleted");
        Ok(())
    }

    async fn audit(&self, identity: &Identity, id: Uuid) -> AppResult<ListingResponse> {
        policy::require_admin(identity)?;
        self.uow
            .listings()
            .find_by_id_with_deleted(id)
            .await?
            .map(ListingResponse::from)
            .ok_or_not_found()
    }
}
