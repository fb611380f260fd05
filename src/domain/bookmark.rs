//! Seeker bookmarks on listings.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{Lifecycle, ListingSummary};
use crate::config::MAX_NOTES_LENGTH;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookmarkStatus {
    #[default]
    Saved,
    Applied,
    Archived,
}

impl BookmarkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookmarkStatus::Saved => "saved",
            BookmarkStatus::Applied => "applied",
            BookmarkStatus::Archived => "archived",
        }
    }
}

impl std::str::FromStr for BookmarkStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "saved" => Ok(BookmarkStatus::Saved),
            "applied" => Ok(BookmarkStatus::Applied),
            "archived" => Ok(BookmarkStatus::Archived),
            _ => Err(AppError::validation(format!("Unknown bookmark status '{}'", s))),
        }
    }
}

impl std::fmt::Display for BookmarkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub notes: Option<String>,
    pub status: BookmarkStatus,
    pub reminder_date: Option<NaiveDate>,
    pub lifecycle: Lifecycle,
}

/// Body of `POST /bookmarks/:jobId`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkInput {
    pub notes: Option<String>,
    pub reminder_date: Option<NaiveDate>,
}

/// Body of `PUT /bookmarks/:jobId`; absent fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkChanges {
    #[validate(length(max = 2000, message = "notes must be at most 2000 characters"))]
    pub notes: Option<String>,
    pub status: Option<BookmarkStatus>,
    pub reminder_date: Option<NaiveDate>,
}

/// Trim notes, treating blank as "no notes".
pub fn normalize_notes(notes: Option<String>) -> AppResult<Option<String>> {
    let notes = notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    if matches!(&notes, Some(n) if n.chars().count() > MAX_NOTES_LENGTH) {
        return Err(AppError::validation(format!(
            "notes must be at most {} characters",
            MAX_NOTES_LENGTH
        )));
    }
    Ok(notes)
}

/// Bookmark as returned to clients, joined with listing fields.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkResponse {
    pub id: Uuid,
    pub job_id: Uuid,
    pub notes: Option<String>,
    pub status: BookmarkStatus,
    pub reminder_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<ListingSummary>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub listing_removed: bool,
}

impl From<Bookmark> for BookmarkResponse {
    fn from(bookmark: Bookmark) -> Self {
        Self {
            id: bookmark.id,
            job_id: bookmark.job_id,
            notes: bookmark.notes,
            status: bookmark.status,
            reminder_date: bookmark.reminder_date,
            created_at: bookmark.lifecycle.created_at,
            job: None,
            listing_removed: false,
        }
    }
}

impl BookmarkResponse {
    pub fn with_job(mut self, job: Option<ListingSummary>) -> Self {
        self.listing_removed = job.as_ref().map_or(true, |j| j.removed);
        self.job = job;
        self
    }
}
