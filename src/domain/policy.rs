//! Authorization policy.
//!
//! Stateless checks deciding whether an [`Identity`] may act on an entity.
//! Every mutating service operation calls one of these before touching
//! storage. Failures are always an explicit `Forbidden`.

use uuid::Uuid;

use super::{Application, Bookmark, Identity, JobListing, UserRole};
use crate::errors::{AppError, AppResult};

fn deny(identity: &Identity, action: &str) -> AppError {
    tracing::warn!(
        actor = %identity.id,
        role = %identity.role,
        action = action,
        "Authorization denied"
    );
    AppError::Forbidden
}

/// Fail unless the caller's role is one of `allowed`.
pub fn require_role(identity: &Identity, allowed: &[UserRole]) -> AppResult<()> {
    if allowed.contains(&identity.role) {
        Ok(())
    } else {
        Err(deny(identity, "role gate"))
    }
}

/// Pass for admins or the resource owner.
pub fn require_owner_or_admin(identity: &Identity, owner_id: Uuid) -> AppResult<()> {
    if identity.is_admin() || identity.id == owner_id {
        Ok(())
    } else {
        Err(deny(identity, "owner gate"))
    }
}

pub fn require_admin(identity: &Identity) -> AppResult<()> {
    require_role(identity, &[UserRole::Admin])
}

/// Update, delete or view the management details of a listing.
pub fn can_manage_listing(identity: &Identity, listing: &JobListing) -> AppResult<()> {
    require_owner_or_admin(identity, listing.employer_id)
}

/// Change an application's status or list a job's applications: the
/// employer owning the job, or an admin.
pub fn can_review_applications(identity: &Identity, job: &JobListing) -> AppResult<()> {
    require_owner_or_admin(identity, job.employer_id)
}

/// Withdraw (soft-delete) an application: the applicant or an admin.
/// Employers act through status updates instead.
pub fn can_withdraw_application(identity: &Identity, application: &Application) -> AppResult<()> {
    require_owner_or_admin(identity, application.user_id)
}

/// View a single application: applicant, owning employer or admin.
pub fn can_view_application(
    identity: &Identity,
    application: &Application,
    job_owner: Option<Uuid>,
) -> AppResult<()> {
    if identity.is_admin()
        || identity.id == application.user_id
        || job_owner == Some(identity.id)
    {
        Ok(())
    } else {
        Err(deny(identity, "view application"))
    }
}

/// Bookmarks are private: only their own user, no admin override.
pub fn require_bookmark_owner(identity: &Identity, bookmark: &Bookmark) -> AppResult<()> {
    if identity.id == bookmark.user_id {
        Ok(())
    } else {
        Err(deny(identity, "bookmark owner"))
    }
}
