//! Job application entity and its status state machine.
//!
//! ```text
//! pending ──► shortlisted ──► interviewed ──► accepted | rejected
//!    │              └──────────────────────────► accepted | rejected
//!    └──► interviewed | accepted | rejected
//! ```
//!
//! `accepted` and `rejected` are terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Lifecycle, ListingSummary, UserSummary};
use crate::config::MAX_NOTES_LENGTH;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Shortlisted,
    Interviewed,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Interviewed,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Interviewed => "interviewed",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ApplicationStatus::Accepted | ApplicationStatus::Rejected)
    }

    /// Position along the pipeline; transitions only move forward.
    fn rank(&self) -> u8 {
        match self {
            ApplicationStatus::Pending => 0,
            ApplicationStatus::Shortlisted => 1,
            ApplicationStatus::Interviewed => 2,
            ApplicationStatus::Accepted | ApplicationStatus::Rejected => 3,
        }
    }

    /// Whether `self -> next` is a real move (same-state is not).
    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        !self.is_terminal() && next.rank() > self.rank()
    }

    /// Decide what an update request means from the current state.
    ///
    /// Same-state requests on open states are idempotent; every request
    /// against a terminal state fails.
    pub fn plan_transition(&self, next: ApplicationStatus) -> AppResult<TransitionPlan> {
        if self.is_terminal() {
            return Err(AppError::invalid_transition(self, next));
        }
        if *self == next {
            return Ok(TransitionPlan::Unchanged);
        }
        if self.can_transition_to(next) {
            Ok(TransitionPlan::Move)
        } else {
            Err(AppError::invalid_transition(self, next))
        }
    }
}

/// Outcome of [`ApplicationStatus::plan_transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPlan {
    Move,
    Unchanged,
}

impl std::str::FromStr for ApplicationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| AppError::validation(format!("Unknown application status '{}'", s)))
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A seeker's submission against a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub status: ApplicationStatus,
    pub resume_url: String,
    pub cover_letter: String,
    pub expected_salary: Option<i64>,
    pub interview_date: Option<DateTime<Utc>>,
    pub interview_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub application_date: DateTime<Utc>,
    pub lifecycle: Lifecycle,
}

/// Validated submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub resume_url: String,
    pub cover_letter: String,
    pub expected_salary: Option<i64>,
}

impl NewApplication {
    pub fn new(
        user_id: Uuid,
        job_id: Uuid,
        resume_url: &str,
        cover_letter: &str,
        expected_salary: Option<i64>,
    ) -> AppResult<Self> {
        let resume_url = resume_url.trim();
        let cover_letter = cover_letter.trim();
        if resume_url.is_empty() {
            return Err(AppError::validation("resumeUrl is required"));
        }
        if cover_letter.is_empty() {
            return Err(AppError::validation("coverLetter is required"));
        }
        if matches!(expected_salary, Some(s) if s < 0) {
            return Err(AppError::validation("expectedSalary cannot be negative"));
        }
        Ok(Self {
            job_id,
            user_id,
            resume_url: resume_url.to_string(),
            cover_letter: cover_letter.to_string(),
            expected_salary,
        })
    }
}

/// Details recorded alongside a status change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusExtra {
    pub interview_date: Option<DateTime<Utc>>,
    pub interview_notes: Option<String>,
    pub rejection_reason: Option<String>,
}

/// Column values written by a status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub status: ApplicationStatus,
    pub interview_date: Option<DateTime<Utc>>,
    pub interview_notes: Option<String>,
    pub rejection_reason: Option<String>,
}

fn bounded_notes(field: &str, value: Option<String>) -> AppResult<Option<String>> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    if let Some(v) = &value {
        if v.chars().count() > MAX_NOTES_LENGTH {
            return Err(AppError::validation(format!(
                "{} must be at most {} characters",
                field, MAX_NOTES_LENGTH
            )));
        }
    }
    Ok(value)
}

impl StatusChange {
    /// Keep only the extra fields relevant to `status`, falling back to the
    /// values already stored on `current`.
    pub fn build(
        current: &Application,
        status: ApplicationStatus,
        extra: StatusExtra,
    ) -> AppResult<Self> {
        let interview_notes = bounded_notes("interviewNotes", extra.interview_notes)?;
        let rejection_reason = bounded_notes("rejectionReason", extra.rejection_reason)?;

        let (interview_date, interview_notes) = if status == ApplicationStatus::Interviewed {
            (
                extra.interview_date.or(current.interview_date),
                interview_notes.or_else(|| current.interview_notes.clone()),
            )
        } else {
            (current.interview_date, current.interview_notes.clone())
        };

        let rejection_reason = if status == ApplicationStatus::Rejected {
            rejection_reason
        } else {
            current.rejection_reason.clone()
        };

        Ok(Self {
            status,
            interview_date,
            interview_notes,
            rejection_reason,
        })
    }
}

/// Application as returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub status: ApplicationStatus,
    pub resume_url: String,
    pub cover_letter: String,
    pub expected_salary: Option<i64>,
    pub interview_date: Option<DateTime<Utc>>,
    pub interview_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub application_date: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<ListingSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant: Option<UserSummary>,
    /// Set when the referenced listing no longer exists or was deleted
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub listing_removed: bool,
}

impl From<Application> for ApplicationResponse {
    fn from(app: Application) -> Self {
        Self {
            id: app.id,
            job_id: app.job_id,
            user_id: app.user_id,
            status: app.status,
            resume_url: app.resume_url,
            cover_letter: app.cover_letter,
            expected_salary: app.expected_salary,
            interview_date: app.interview_date,
            interview_notes: app.interview_notes,
            rejection_reason: app.rejection_reason,
            application_date: app.application_date,
            updated_at: app.lifecycle.updated_at,
            job: None,
            applicant: None,
            listing_removed: false,
        }
    }
}

impl ApplicationResponse {
    /// Attach the listing summary; a missing or deleted listing is flagged.
    pub fn with_job(mut self, job: Option<ListingSummary>) -> Self {
        self.listing_removed = job.as_ref().map_or(true, |j| j.removed);
        self.job = job;
        self
    }

    pub fn with_applicant(mut self, applicant: Option<UserSummary>) -> Self {
        self.applicant = applicant;
        self
    }
}
