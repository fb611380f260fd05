//! Bookmark registry service.
//!
//! A seeker holds at most one live bookmark per listing. Adding again
//! updates the existing one; removing is idempotent.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::bookmark::normalize_notes;
use crate::domain::{
    policy, Bookmark, BookmarkChanges, BookmarkInput, BookmarkResponse, BookmarkStatus, Identity,
    ListingSummary, UserRole,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait BookmarkService: Send + Sync {
    /// Save a listing, or refresh the existing bookmark for it
    async fn add(
        &self,
        identity: &Identity,
        job_id: Uuid,
        input: BookmarkInput,
    ) -> AppResult<BookmarkResponse>;

    async fn update(
        &self,
        identity: &Identity,
        job_id: Uuid,
        changes: BookmarkChanges,
    ) -> AppResult<BookmarkResponse>;

    /// Soft delete the bookmark for the listing; no-op when there is none
    async fn remove(&self, identity: &Identity, job_id: Uuid) -> AppResult<()>;

    async fn list(
        &self,
        identity: &Identity,
        status: Option<BookmarkStatus>,
        params: PaginationParams,
    ) -> AppResult<Paginated<BookmarkResponse>>;

    async fn is_bookmarked(&self, identity: &Identity, job_id: Uuid) -> AppResult<bool>;
}

pub struct BookmarkManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> BookmarkManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    fn seeker_only(identity: &Identity) -> AppResult<()> {
        policy::require_role(identity, &[UserRole::JobSeeker])
    }

    /// Fold a repeated add into the live bookmark.
    async fn refresh(
        &self,
        identity: &Identity,
        existing: Bookmark,
        notes: Option<String>,
        input: &BookmarkInput,
    ) -> AppResult<Bookmark> {
        policy::require_bookmark_owner(identity, &existing)?;
        let changes = BookmarkChanges {
            notes,
            status: (existing.status == BookmarkStatus::Archived).then_some(BookmarkStatus::Saved),
            reminder_date: input.reminder_date,
        };
        self.uow
            .bookmarks()
            .update(existing.id, changes, identity.id)
            .await
    }
}

#[async_trait]
impl<U: UnitOfWork> BookmarkService for BookmarkManager<U> {
    async fn add(
        &self,
        identity: &Identity,
        job_id: Uuid,
        input: BookmarkInput,
    ) -> AppResult<BookmarkResponse> {
        Self::seeker_only(identity)?;
        let job = self
            .uow
            .listings()
            .find_by_id(job_id)
            .await?
            .ok_or_not_found()?;
        let notes = normalize_notes(input.notes.clone())?;

        let bookmarks = self.uow.bookmarks();
        let bookmark = match bookmarks.find_active(identity.id, job_id).await? {
            Some(existing) => self.refresh(identity, existing, notes, &input).await?,
            None => {
                match bookmarks
                    .create(identity.id, job_id, notes.clone(), input.reminder_date)
                    .await
                {
                    Ok(created) => created,
                    // Lost an insert race: the winner's row becomes ours to update
                    Err(AppError::Conflict(_)) => {
                        let existing = bookmarks
                            .find_active(identity.id, job_id)
                            .await?
                            .ok_or_not_found()?;
                        self.refresh(identity, existing, notes, &input).await?
                    }
                    Err(e) => return Err(e),
                }
            }
        };

        tracing::info!(bookmark_id = %bookmark.id, job_id = %job_id, user_id = %identity.id, "Bookmark saved");
        Ok(BookmarkResponse::from(bookmark).with_job(Some(ListingSummary::from(&job))))
    }

    async fn update(
        &self,
        identity: &Identity,
        job_id: Uuid,
        changes: BookmarkChanges,
    ) -> AppResult<BookmarkResponse> {
        Self::seeker_only(identity)?;
        let existing = self
            .uow
            .bookmarks()
            .find_active(identity.id, job_id)
            .await?
            .ok_or_not_found()?;
        policy::require_bookmark_owner(identity, &existing)?;

        // Blank notes clear the field
        let notes = match changes.notes {
            Some(raw) => Some(normalize_notes(Some(raw))?.unwrap_or_default()),
            None => None,
        };
        let changes = BookmarkChanges { notes, ..changes };

        let updated = self
            .uow
            .bookmarks()
            .update(existing.id, changes, identity.id)
            .await?;
        let job = self
            .uow
            .listings()
            .find_by_id_with_deleted(job_id)
            .await?;

        tracing::info!(bookmark_id = %updated.id, user_id = %identity.id, "Bookmark updated");
        Ok(BookmarkResponse::from(updated).with_job(job.as_ref().map(ListingSummary::from)))
    }

    async fn remove(&self, identity: &Identity, job_id: Uuid) -> AppResult<()> {
        Self::seeker_only(identity)?;
        let removed = self
            .uow
            .bookmarks()
            .soft_delete_pair(identity.id, job_id)
            .await?;
        if removed > 0 {
            tracing::info!(job_id = %job_id, user_id = %identity.id, "Bookmark removed");
        }
        Ok(())
    }

    async fn list(
        &self,
        identity: &Identity,
        status: Option<BookmarkStatus>,
        params: PaginationParams,
    ) -> AppResult<Paginated<BookmarkResponse>> {
        Self::seeker_only(identity)?;
        let (bookmarks, total) = self
            .uow
            .bookmarks()
            .list_by_user(identity.id, status, params)
            .await?;

        let job_ids = bookmarks.iter().map(|b| b.job_id).collect();
        let jobs: HashMap<Uuid, ListingSummary> = self
            .uow
            .listings()
            .find_many(job_ids)
            .await?
            .iter()
            .map(|listing| (listing.id, ListingSummary::from(listing)))
            .collect();

        let data = bookmarks
            .into_iter()
            .map(|bookmark| {
                let job = jobs.get(&bookmark.job_id).cloned();
                BookmarkResponse::from(bookmark).with_job(job)
            })
            .collect();
        Ok(Paginated::new(data, params, total))
    }

    async fn is_bookmarked(&self, identity: &Identity, job_id: Uuid) -> AppResult<bool> {
        Self::seeker_only(identity)?;
        Ok(self
            .uow
            .bookmarks()
            .find_active(identity.id, job_id)
            .await?
            .is_some())
    }
}
