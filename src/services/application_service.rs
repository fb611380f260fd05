//! Application workflow service.
//!
//! Seekers apply and withdraw; the employer owning the job (or an admin)
//! moves the application through its status pipeline. Status writes are
//! conditional on the state they were planned from, so two reviewers racing
//! on the same application cannot both win.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::listing::today;
use crate::domain::{
    policy, ApplicationResponse, ApplicationStatus, Identity, ListingSummary, NewApplication,
    StatusChange, StatusExtra, TransitionPlan, UserRole, UserSummary,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

/// Submission fields supplied by the applicant.
#[derive(Debug, Clone)]
pub struct Submission {
    pub job_id: Uuid,
    pub resume_url: String,
    pub cover_letter: String,
    pub expected_salary: Option<i64>,
}

#[async_trait]
pub trait ApplicationService: Send + Sync {
    /// Apply to an open listing; at most one live application per job
    async fn apply(
        &self,
        identity: &Identity,
        submission: Submission,
    ) -> AppResult<ApplicationResponse>;

    /// The caller's own applications, newest first, with listing summaries
    async fn list_mine(
        &self,
        identity: &Identity,
        params: PaginationParams,
    ) -> AppResult<Paginated<ApplicationResponse>>;

    /// Applications to one job (owning employer or admin)
    async fn list_for_job(
        &self,
        identity: &Identity,
        job_id: Uuid,
        status: Option<ApplicationStatus>,
        params: PaginationParams,
    ) -> AppResult<Paginated<ApplicationResponse>>;

    async fn get(&self, identity: &Identity, id: Uuid) -> AppResult<ApplicationResponse>;

    async fn update_status(
        &self,
        identity: &Identity,
        id: Uuid,
        status: ApplicationStatus,
        extra: StatusExtra,
    ) -> AppResult<ApplicationResponse>;

    /// Soft delete (applicant or admin); the seeker may apply again afterwards
    async fn withdraw(&self, identity: &Identity, id: Uuid) -> AppResult<()>;
}

pub struct ApplicationManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ApplicationManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Listing summaries by id, deleted listings included and flagged.
    async fn summaries(&self, job_ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, ListingSummary>> {
        let listings = self.uow.listings().find_many(job_ids).await?;
        Ok(listings
            .iter()
            .map(|listing| (listing.id, ListingSummary::from(listing)))
            .collect())
    }

    async fn applicants(&self, user_ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, UserSummary>> {
        let users = self.uow.users().find_many(user_ids).await?;
        Ok(users
            .iter()
            .map(|user| (user.id, UserSummary::from(user)))
            .collect())
    }
}

#[async_trait]
impl<U: UnitOfWork> ApplicationService for ApplicationManager<U> {
    async fn apply(
        &self,
        identity: &Identity,
        submission: Submission,
    ) -> AppResult<ApplicationResponse> {
        policy::require_role(identity, &[UserRole::JobSeeker])?;
        let new_app = NewApplication::new(
            identity.id,
            submission.job_id,
            &submission.resume_url,
            &submission.cover_letter,
            submission.expected_salary,
        )?;

        let job = self
            .uow
            .listings()
            .find_by_id(new_app.job_id)
            .await?
            .ok_or_not_found()?;
        if !job.is_open_on(today()) {
            return Err(AppError::validation(
                "This listing is no longer accepting applications",
            ));
        }

        if self
            .uow
            .applications()
            .find_active(job.id, identity.id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Application"));
        }

        // The partial unique index still catches a concurrent duplicate
        let application = self.uow.applications().create(new_app).await?;
        self.uow.bookmarks().mark_applied(identity.id, job.id).await?;

        tracing::info!(
            application_id = %application.id,
            job_id = %job.id,
            applicant = %identity.id,
            "Application submitted"
        );
        Ok(ApplicationResponse::from(application).with_job(Some(ListingSummary::from(&job))))
    }

    async fn list_mine(
        &self,
        identity: &Identity,
        params: PaginationParams,
    ) -> AppResult<Paginated<ApplicationResponse>> {
        policy::require_role(identity, &[UserRole::JobSeeker])?;

        let (applications, total) = self
            .uow
            .applications()
            .list_by_user(identity.id, params)
            .await?;
        let jobs = self
            .summaries(applications.iter().map(|a| a.job_id).collect())
            .await?;

        let data = applications
            .into_iter()
            .map(|app| {
                let job = jobs.get(&app.job_id).cloned();
                ApplicationResponse::from(app).with_job(job)
            })
            .collect();
        Ok(Paginated::new(data, params, total))
    }

    async fn list_for_job(
        &self,
        identity: &Identity,
        job_id: Uuid,
        status: Option<ApplicationStatus>,
        params: PaginationParams,
    ) -> AppResult<Paginated<ApplicationResponse>> {
        let job = self
            .uow
            .listings()
            .find_by_id(job_id)
            .await?
            .ok_or_not_found()?;
        policy::can_review_applications(identity, &job)?;

        let (applications, total) = self
            .uow
            .applications()
            .list_by_job(job_id, status, params)
            .await?;
        let applicants = self
            .applicants(applications.iter().map(|a| a.user_id).collect())
            .await?;

        let data = applications
            .into_iter()
            .map(|app| {
                let applicant = applicants.get(&app.user_id).cloned();
                ApplicationResponse::from(app).with_applicant(applicant)
            })
            .collect();
        Ok(Paginated::new(data, params, total))
    }

    async fn get(&self, identity: &Identity, id: Uuid) -> AppResult<ApplicationResponse> {
        let application = self
            .uow
            .applications()
            .find_by_id(id)
            .await?
            .ok_or_not_found()?;
        let job = self
            .uow
            .listings()
            .find_by_id_with_deleted(application.job_id)
            .await?;
        policy::can_view_application(identity, &application, job.as_ref().map(|j| j.employer_id))?;

        Ok(ApplicationResponse::from(application).with_job(job.as_ref().map(ListingSummary::from)))
    }

    async fn update_status(
        &self,
        identity: &Identity,
        id: Uuid,
        status: ApplicationStatus,
        extra: StatusExtra,
    ) -> AppResult<ApplicationResponse> {
        let application = self
            .uow
            .applications()
            .find_by_id(id)
            .await?
            .ok_or_not_found()?;

        // Ownership survives the listing's soft delete
        match self
            .uow
            .listings()
            .find_by_id_with_deleted(application.job_id)
            .await?
        {
            Some(job) => policy::can_review_applications(identity, &job)?,
            None => policy::require_admin(identity)?,
        }

        let plan = application.status.plan_transition(status)?;
        let change = StatusChange::build(&application, status, extra)?;

        let updated = self
            .uow
            .applications()
            .update_status(id, application.status, change, identity.id)
            .await?;
        let Some(updated) = updated else {
            // Another writer changed or withdrew it since it was read
            let current = self
                .uow
                .applications()
                .find_by_id(id)
                .await?
                .ok_or_not_found()?;
            tracing::warn!(
                application_id = %id,
                expected = %application.status,
                found = %current.status,
                "Concurrent status update"
            );
            return Err(AppError::invalid_transition(current.status, status));
        };

        if plan == TransitionPlan::Move {
            tracing::info!(
                application_id = %id,
                from = %application.status,
                to = %status,
                actor = %identity.id,
                "Application status changed"
            );
        }
        Ok(ApplicationResponse::from(updated))
    }

    async fn withdraw(&self, identity: &Identity, id: Uuid) -> AppResult<()> {
        let application = self
            .uow
            .applications()
            .find_by_id(id)
            .await?
            .ok_or_not_found()?;
        policy::can_withdraw_application(identity, &application)?;

        let deleted = self.uow.applications().soft_delete(id, identity.id).await?;
        deleted.then_some(()).ok_or_not_found()?;

        tracing::info!(application_id = %id, actor = %identity.id, "Application withdrawn");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Application, JobListing, JobType, Lifecycle};
    use crate::infra::{
        MockApplicationRepository, MockBookmarkRepository, MockListingRepository, MockPersistence,
    };
    use chrono::{Duration, Utc};

    fn job(owner: Uuid) -> JobListing {
        JobListing {
            id: Uuid::new_v4(),
            employer_id: owner,
            category_id: None,
            title: "QA Analyst".into(),
            description: "Break things".into(),
            requirements: None,
            responsibilities: None,
            benefits: None,
            job_type: JobType::Contract,
            vacancies: 1,
            location: "Porto".into(),
            salary: None,
            deadline: today() + Duration::days(1),
            is_active: true,
            is_premium: false,
            view_count: 0,
            lifecycle: Lifecycle::created(Some(owner)),
        }
    }

    fn application(job_id: Uuid, applicant: Uuid, status: ApplicationStatus) -> Application {
        Application {
            id: Uuid::new_v4(),
            job_id,
            user_id: applicant,
            status,
            resume_url: "https://cv.example/s.pdf".into(),
            cover_letter: "Hire me".into(),
            expected_salary: None,
            interview_date: None,
            interview_notes: None,
            rejection_reason: None,
            application_date: Utc::now(),
            lifecycle: Lifecycle::created(Some(applicant)),
        }
    }

    fn submission(job_id: Uuid) -> Submission {
        Submission {
            job_id,
            resume_url: "https://cv.example/s.pdf".into(),
            cover_letter: "Hire me".into(),
            expected_salary: Some(40_000),
        }
    }

    fn service(uow: MockPersistence) -> ApplicationManager<MockPersistence> {
        ApplicationManager::new(Arc::new(uow))
    }

    fn listings_with(job: JobListing) -> MockListingRepository {
        let mut listings = MockListingRepository::new();
        let live = job.clone();
        listings
            .expect_find_by_id()
            .returning(move |_| Ok(Some(live.clone())));
        listings
            .expect_find_by_id_with_deleted()
            .returning(move |_| Ok(Some(job.clone())));
        listings
    }

    #[tokio::test]
    async fn employers_cannot_apply() {
        let employer = Identity::new(Uuid::new_v4(), UserRole::Employer);
        let err = service(MockPersistence::default())
            .apply(&employer, submission(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn second_application_conflicts() {
        let seeker = Identity::new(Uuid::new_v4(), UserRole::JobSeeker);
        let job = job(Uuid::new_v4());
        let existing = application(job.id, seeker.id, ApplicationStatus::Pending);
        let mut applications = MockApplicationRepository::new();
        applications
            .expect_find_active()
            .returning(move |_, _| Ok(Some(existing.clone())));
        applications.expect_create().never();

        let err = service(MockPersistence {
            listings: Arc::new(listings_with(job.clone())),
            applications: Arc::new(applications),
            ..Default::default()
        })
        .apply(&seeker, submission(job.id))
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn expired_listing_rejects_applications() {
        let seeker = Identity::new(Uuid::new_v4(), UserRole::JobSeeker);
        let mut job = job(Uuid::new_v4());
        job.deadline = today() - Duration::days(1);

        let err = service(MockPersistence {
            listings: Arc::new(listings_with(job.clone())),
            ..Default::default()
        })
        .apply(&seeker, submission(job.id))
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn applying_marks_the_bookmark_applied() {
        let seeker = Identity::new(Uuid::new_v4(), UserRole::JobSeeker);
        let job = job(Uuid::new_v4());
        let job_id = job.id;
        let mut applications = MockApplicationRepository::new();
        applications.expect_find_active().returning(|_, _| Ok(None));
        applications.expect_create().returning(|new_app| {
            Ok(application(new_app.job_id, new_app.user_id, ApplicationStatus::Pending))
        });
        let mut bookmarks = MockBookmarkRepository::new();
        bookmarks
            .expect_mark_applied()
            .withf(move |user, job| *user == seeker.id && *job == job_id)
            .times(1)
            .returning(|_, _| Ok(()));

        let response = service(MockPersistence {
            listings: Arc::new(listings_with(job)),
            applications: Arc::new(applications),
            bookmarks: Arc::new(bookmarks),
            ..Default::default()
        })
        .apply(&seeker, submission(job_id))
        .await
        .unwrap();
        assert_eq!(response.status, ApplicationStatus::Pending);
        assert!(!response.listing_removed);
    }

    #[tokio::test]
    async fn only_job_owner_or_admin_updates_status() {
        let owner = Uuid::new_v4();
        let job = job(owner);
        let app = application(job.id, Uuid::new_v4(), ApplicationStatus::Pending);

        let other_employer = Identity::new(Uuid::new_v4(), UserRole::Employer);
        let applicant = Identity::new(app.user_id, UserRole::JobSeeker);
        for caller in [other_employer, applicant] {
            let mut applications = MockApplicationRepository::new();
            let stored = app.clone();
            applications
                .expect_find_by_id()
                .returning(move |_| Ok(Some(stored.clone())));
            applications.expect_update_status().never();

            let err = service(MockPersistence {
                listings: Arc::new(listings_with(job.clone())),
                applications: Arc::new(applications),
                ..Default::default()
            })
            .update_status(&caller, app.id, ApplicationStatus::Shortlisted, StatusExtra::default())
            .await
            .unwrap_err();
            assert!(matches!(err, AppError::Forbidden));
        }
    }

    #[tokio::test]
    async fn terminal_application_cannot_move() {
        let owner = Identity::new(Uuid::new_v4(), UserRole::Employer);
        let job = job(owner.id);
        let app = application(job.id, Uuid::new_v4(), ApplicationStatus::Accepted);
        let mut applications = MockApplicationRepository::new();
        applications
            .expect_find_by_id()
            .returning(move |_| Ok(Some(app.clone())));
        applications.expect_update_status().never();

        let err = service(MockPersistence {
            listings: Arc::new(listings_with(job)),
            applications: Arc::new(applications),
            ..Default::default()
        })
        .update_status(&owner, Uuid::new_v4(), ApplicationStatus::Rejected, StatusExtra::default())
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn lost_race_reports_current_state() {
        let owner = Identity::new(Uuid::new_v4(), UserRole::Employer);
        let job = job(owner.id);
        let pending = application(job.id, Uuid::new_v4(), ApplicationStatus::Pending);
        let mut rejected = pending.clone();
        rejected.status = ApplicationStatus::Rejected;

        let mut applications = MockApplicationRepository::new();
        let mut reads = vec![rejected, pending].into_iter();
        applications
            .expect_find_by_id()
            .times(2)
            .returning(move |_| Ok(reads.next_back()));
        applications
            .expect_update_status()
            .withf(|_, expected, change, _| {
                *expected == ApplicationStatus::Pending
                    && change.status == ApplicationStatus::Accepted
            })
            .returning(|_, _, _, _| Ok(None));

        let err = service(MockPersistence {
            listings: Arc::new(listings_with(job)),
            applications: Arc::new(applications),
            ..Default::default()
        })
        .update_status(&owner, Uuid::new_v4(), ApplicationStatus::Accepted, StatusExtra::default())
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidTransition { ref from, .. } if from == "rejected"
        ));
    }

    #[tokio::test]
    async fn employer_cannot_withdraw() {
        let owner = Identity::new(Uuid::new_v4(), UserRole::Employer);
        let app = application(Uuid::new_v4(), Uuid::new_v4(), ApplicationStatus::Pending);
        let mut applications = MockApplicationRepository::new();
        applications
            .expect_find_by_id()
            .returning(move |_| Ok(Some(app.clone())));
        applications.expect_soft_delete().never();

        let err = service(MockPersistence {
            applications: Arc::new(applications),
            ..Default::default()
        })
        .withdraw(&owner, Uuid::new_v4())
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn own_applications_flag_removed_listings() {
        let seeker = Identity::new(Uuid::new_v4(), UserRole::JobSeeker);
        let mut removed = job(Uuid::new_v4());
        removed.lifecycle.soft_delete(removed.employer_id);
        let app = application(removed.id, seeker.id, ApplicationStatus::Pending);

        let mut applications = MockApplicationRepository::new();
        applications
            .expect_list_by_user()
            .returning(move |_, _| Ok((vec![app.clone()], 1)));
        let mut listings = MockListingRepository::new();
        listings
            .expect_find_many()
            .returning(move |_| Ok(vec![removed.clone()]));

        let page = service(MockPersistence {
            applications: Arc::new(applications),
            listings: Arc::new(listings),
            ..Default::default()
        })
        .list_mine(&seeker, PaginationParams::default())
        .await
        .unwrap();
        assert_eq!(page.total, 1);
        assert!(page.data[0].listing_removed);
    }
}
