//! Job listing entity, input parsing and query filters.
//!
//! Inputs arrive as loosely typed drafts ([`ListingInput`], [`ListingChanges`])
//! and are parsed into [`NewListing`] / [`ListingPatch`] before they reach
//! storage, so a malformed job type or deadline never leaves this module.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::Lifecycle;
use crate::config::MAX_TITLE_LENGTH;
use crate::errors::{AppError, AppResult};

/// Employment type of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Remote,
}

impl JobType {
    pub const ALL: [JobType; 5] = [
        JobType::FullTime,
        JobType::PartTime,
        JobType::Contract,
        JobType::Internship,
        JobType::Remote,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Contract => "contract",
            JobType::Internship => "internship",
            JobType::Remote => "remote",
        }
    }
}

impl std::str::FromStr for JobType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        JobType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| {
                AppError::validation(format!(
                    "jobType must be one of: full-time, part-time, contract, internship, remote (got '{}')",
                    s
                ))
            })
    }
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A job posting owned by an employer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobListing {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub benefits: Option<String>,
    pub job_type: JobType,
    pub vacancies: i32,
    pub location: String,
    pub salary: Option<i64>,
    pub deadline: NaiveDate,
    pub is_active: bool,
    pub is_premium: bool,
    pub view_count: i64,
    pub lifecycle: Lifecycle,
}

impl JobListing {
    /// Expiry is derived from the deadline, never stored.
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        self.deadline < today
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_on(today())
    }

    /// Seeker-facing "active": published, not deleted, deadline not passed.
    pub fn is_open_on(&self, today: NaiveDate) -> bool {
        self.is_active && !self.lifecycle.is_deleted && !self.is_expired_on(today)
    }

    pub fn is_open(&self) -> bool {
        self.is_open_on(today())
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.employer_id == user_id
    }
}

/// Current UTC calendar date used for deadline checks.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parse a deadline given as `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_deadline(raw: &str) -> AppResult<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::validation("deadline is required"));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| AppError::validation("deadline must be a date formatted as YYYY-MM-DD"))
}

fn required_text(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_title(title: &str) -> AppResult<()> {
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::validation(format!(
            "title must be at most {} characters",
            MAX_TITLE_LENGTH
        )));
    }
    Ok(())
}

fn check_vacancies(vacancies: i32) -> AppResult<()> {
    if vacancies < 1 {
        return Err(AppError::validation("vacancies must be at least 1"));
    }
    Ok(())
}

fn check_salary(salary: Option<i64>) -> AppResult<()> {
    if matches!(salary, Some(s) if s < 0) {
        return Err(AppError::validation("salary cannot be negative"));
    }
    Ok(())
}

fn check_deadline(deadline: NaiveDate, today: NaiveDate) -> AppResult<()> {
    if deadline < today {
        return Err(AppError::validation("deadline cannot be in the past"));
    }
    Ok(())
}

/// Raw listing creation payload.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingInput {
    #[schema(example = "Senior Rust Engineer")]
    pub title: String,
    pub description: String,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub benefits: Option<String>,
    #[schema(example = "Berlin, DE")]
    pub location: String,
    #[schema(example = "full-time")]
    pub job_type: String,
    #[schema(example = "2030-01-31")]
    pub deadline: String,
    #[validate(range(min = 1, message = "vacancies must be at least 1"))]
    pub vacancies: Option<i32>,
    #[validate(range(min = 0, message = "salary cannot be negative"))]
    pub salary: Option<i64>,
    pub category_id: Option<Uuid>,
    pub is_active: Option<bool>,
    pub is_premium: Option<bool>,
}

/// Validated listing ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewListing {
    pub category_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub benefits: Option<String>,
    pub job_type: JobType,
    pub vacancies: i32,
    pub location: String,
    pub salary: Option<i64>,
    pub deadline: NaiveDate,
    pub is_active: bool,
    pub is_premium: bool,
}

impl ListingInput {
    /// Check required fields and parse typed values.
    pub fn parse(self, today: NaiveDate) -> AppResult<NewListing> {
        let title = required_text("title", &self.title)?;
        check_title(&title)?;
        let description = required_text("description", &self.description)?;
        let location = required_text("location", &self.location)?;
        if self.job_type.trim().is_empty() {
            return Err(AppError::validation("jobType is required"));
        }
        let job_type = self.job_type.parse::<JobType>()?;
        let deadline = parse_deadline(&self.deadline)?;
        check_deadline(deadline, today)?;
        let vacancies = self.vacancies.unwrap_or(1);
        check_vacancies(vacancies)?;
        check_salary(self.salary)?;

        Ok(NewListing {
            category_id: self.category_id,
            title,
            description,
            requirements: optional_text(self.requirements),
            responsibilities: optional_text(self.responsibilities),
            benefits: optional_text(self.benefits),
            job_type,
            vacancies,
            location,
            salary: self.salary,
            deadline,
            is_active: self.is_active.unwrap_or(true),
            is_premium: self.is_premium.unwrap_or(false),
        })
    }
}

/// Keeps an explicit `null` apart from an absent field.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Raw partial update payload; absent fields stay unchanged.
///
/// `salary` and `categoryId` are cleared with an explicit `null`; the
/// optional text sections are cleared with an empty string.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub benefits: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub deadline: Option<String>,
    #[validate(range(min = 1, message = "vacancies must be at least 1"))]
    pub vacancies: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i64>, nullable)]
    pub salary: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<Uuid>, nullable)]
    pub category_id: Option<Option<Uuid>>,
    pub is_active: Option<bool>,
    pub is_premium: Option<bool>,
}

/// Validated partial update; `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub benefits: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub deadline: Option<NaiveDate>,
    pub vacancies: Option<i32>,
    pub salary: Option<Option<i64>>,
    pub category_id: Option<Option<Uuid>>,
    pub is_active: Option<bool>,
    pub is_premium: Option<bool>,
}

impl ListingChanges {
    pub fn parse(self, today: NaiveDate) -> AppResult<ListingPatch> {
        let title = match self.title {
            Some(t) => {
                let t = required_text("title", &t)?;
                check_title(&t)?;
                Some(t)
            }
            None => None,
        };
        let description = self
            .description
            .map(|d| required_text("description", &d))
            .transpose()?;
        let location = self
            .location
            .map(|l| required_text("location", &l))
            .transpose()?;
        let job_type = self.job_type.map(|t| t.parse::<JobType>()).transpose()?;
        let deadline = match self.deadline {
            Some(raw) => {
                let date = parse_deadline(&raw)?;
                check_deadline(date, today)?;
                Some(date)
            }
            None => None,
        };
        if let Some(v) = self.vacancies {
            check_vacancies(v)?;
        }
        check_salary(self.salary.flatten())?;

        Ok(ListingPatch {
            title,
            description,
            requirements: self.requirements.map(|r| r.trim().to_string()),
            responsibilities: self.responsibilities.map(|r| r.trim().to_string()),
            benefits: self.benefits.map(|b| b.trim().to_string()),
            location,
            job_type,
            deadline,
            vacancies: self.vacancies,
            salary: self.salary,
            category_id: self.category_id,
            is_active: self.is_active,
            is_premium: self.is_premium,
        })
    }
}

/// Which listings a query may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Seeker-facing: active, not deleted, deadline on or after the date.
    Open(NaiveDate),
    /// Management views: every non-deleted listing.
    Undeleted,
}

/// Result ordering for listing queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ListingSort {
    /// Most recently created first
    #[default]
    Newest,
    /// Soonest deadline first
    Deadline,
    /// Premium first, then most recently created
    Premium,
}

/// Filters for paged listing queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingFilter {
    pub visibility: Visibility,
    pub category_id: Option<Uuid>,
    pub job_type: Option<JobType>,
    pub location: Option<String>,
    pub employer_id: Option<Uuid>,
    pub is_active: Option<bool>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub search: Option<String>,
    pub sort: ListingSort,
}

impl ListingFilter {
    /// Seeker-facing filter as of `today`.
    pub fn open(today: NaiveDate) -> Self {
        Self {
            visibility: Visibility::Open(today),
            category_id: None,
            job_type: None,
            location: None,
            employer_id: None,
            is_active: None,
            salary_min: None,
            salary_max: None,
            search: None,
            sort: ListingSort::Newest,
        }
    }

    /// Management filter over all non-deleted listings.
    pub fn undeleted() -> Self {
        Self {
            visibility: Visibility::Undeleted,
            ..Self::open(today())
        }
    }

    /// Drop blank text filters and reject an inverted salary range.
    pub fn normalized(mut self) -> AppResult<Self> {
        self.location = optional_text(self.location);
        self.search = optional_text(self.search);
        if let (Some(min), Some(max)) = (self.salary_min, self.salary_max) {
            if min > max {
                return Err(AppError::validation(
                    "salaryMin cannot be greater than salaryMax",
                ));
            }
        }
        Ok(self)
    }
}

/// Listing as returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub benefits: Option<String>,
    pub job_type: JobType,
    pub vacancies: i32,
    pub location: String,
    pub salary: Option<i64>,
    pub deadline: NaiveDate,
    pub is_active: bool,
    pub is_premium: bool,
    pub is_expired: bool,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_deleted: Option<bool>,
    /// Present only when the caller is an authenticated job seeker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_bookmarked: Option<bool>,
}

impl ListingResponse {
    pub fn with_bookmark(mut self, bookmarked: Option<bool>) -> Self {
        self.is_bookmarked = bookmarked;
        self
    }
}

impl From<JobListing> for ListingResponse {
    fn from(listing: JobListing) -> Self {
        let is_expired = listing.is_expired();
        Self {
            id: listing.id,
            employer_id: listing.employer_id,
            category_id: listing.category_id,
            title: listing.title,
            description: listing.description,
            requirements: listing.requirements,
            responsibilities: listing.responsibilities,
            benefits: listing.benefits,
            job_type: listing.job_type,
            vacancies: listing.vacancies,
            location: listing.location,
            salary: listing.salary,
            deadline: listing.deadline,
            is_active: listing.is_active,
            is_premium: listing.is_premium,
            is_expired,
            view_count: listing.view_count,
            created_at: listing.lifecycle.created_at,
            updated_at: listing.lifecycle.updated_at,
            is_deleted: listing.lifecycle.is_deleted.then_some(true),
            is_bookmarked: None,
        }
    }
}

/// Minimal listing fields joined onto applications and bookmarks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingSummary {
    pub id: Uuid,
    pub title: String,
    pub location: String,
    pub job_type: JobType,
    pub salary: Option<i64>,
    pub deadline: NaiveDate,
    pub is_expired: bool,
    /// The listing was soft-deleted after the reference was made
    pub removed: bool,
}

impl From<&JobListing> for ListingSummary {
    fn from(listing: &JobListing) -> Self {
        Self {
            id: listing.id,
            title: listing.title.clone(),
            location: listing.location.clone(),
            job_type: listing.job_type,
            salary: listing.salary,
            deadline: listing.deadline,
            is_expired: listing.is_expired(),
            removed: listing.lifecycle.is_deleted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn input() -> ListingInput {
        ListingInput {
            title: "Backend Engineer".into(),
            description: "Build APIs".into(),
            location: "Remote, EU".into(),
            job_type: "full-time".into(),
            deadline: "2030-06-30".into(),
            ..Default::default()
        }
    }

    #[test]
    fn valid_input_gets_defaults() {
        let listing = input().parse(day("2030-01-01")).unwrap();
        assert_eq!(listing.job_type, JobType::FullTime);
        assert_eq!(listing.vacancies, 1);
        assert!(listing.is_active);
        assert!(!listing.is_premium);
        assert_eq!(listing.deadline, day("2030-06-30"));
    }

    #[test]
    fn each_required_field_is_checked() {
        let today = day("2030-01-01");
        for blank in ["title", "description", "location", "jobType", "deadline"] {
            let mut raw = input();
            match blank {
                "title" => raw.title = "  ".into(),
                "description" => raw.description = String::new(),
                "location" => raw.location = String::new(),
                "jobType" => raw.job_type = String::new(),
                _ => raw.deadline = String::new(),
            }
            let err = raw.parse(today).unwrap_err();
            assert!(
                matches!(&err, AppError::Validation(msg) if msg.contains(blank)),
                "{} -> {:?}",
                blank,
                err
            );
        }
    }

    #[test]
    fn deadline_today_is_allowed_but_yesterday_is_not() {
        let mut raw = input();
        raw.deadline = "2030-01-01".into();
        assert!(raw.clone().parse(day("2030-01-01")).is_ok());
        assert!(raw.parse(day("2030-01-02")).is_err());
    }

    #[test]
    fn unparseable_deadline_fails() {
        let mut raw = input();
        raw.deadline = "next friday".into();
        assert!(matches!(
            raw.parse(day("2030-01-01")),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn rfc3339_deadline_is_accepted() {
        assert_eq!(
            parse_deadline("2030-03-04T23:30:00+00:00").unwrap(),
            day("2030-03-04")
        );
    }

    #[test]
    fn job_type_parsing_is_case_insensitive() {
        assert_eq!("Part-Time".parse::<JobType>().unwrap(), JobType::PartTime);
        assert!("freelance".parse::<JobType>().is_err());
    }

    #[test]
    fn zero_vacancies_and_negative_salary_fail() {
        let mut raw = input();
        raw.vacancies = Some(0);
        assert!(raw.parse(day("2030-01-01")).is_err());

        let mut raw = input();
        raw.salary = Some(-5);
        assert!(raw.parse(day("2030-01-01")).is_err());
    }

    #[test]
    fn changes_validate_only_present_fields() {
        let patch = ListingChanges {
            title: Some(" New title ".into()),
            ..Default::default()
        }
        .parse(day("2030-01-01"))
        .unwrap();
        assert_eq!(patch.title.as_deref(), Some("New title"));
        assert!(patch.deadline.is_none());

        assert!(ListingChanges {
            title: Some("".into()),
            ..Default::default()
        }
        .parse(day("2030-01-01"))
        .is_err());

        assert_eq!(
            ListingChanges::default().parse(day("2030-01-01")).unwrap(),
            ListingPatch::default()
        );
    }

    #[test]
    fn explicit_null_clears_salary_and_category() {
        let cleared: ListingChanges =
            serde_json::from_value(serde_json::json!({"salary": null, "categoryId": null}))
                .unwrap();
        let patch = cleared.parse(day("2030-01-01")).unwrap();
        assert_eq!(patch.salary, Some(None));
        assert_eq!(patch.category_id, Some(None));

        let untouched: ListingChanges =
            serde_json::from_value(serde_json::json!({"title": "Kept"})).unwrap();
        let patch = untouched.parse(day("2030-01-01")).unwrap();
        assert_eq!(patch.salary, None);
        assert_eq!(patch.category_id, None);
    }

    #[test]
    fn negative_salary_change_fails() {
        let changes = ListingChanges {
            salary: Some(Some(-1)),
            ..Default::default()
        };
        assert!(matches!(
            changes.parse(day("2030-01-01")),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn open_requires_active_undeleted_and_unexpired() {
        let mut listing = JobListing {
            id: Uuid::new_v4(),
            employer_id: Uuid::new_v4(),
            category_id: None,
            title: "t".into(),
            description: "d".into(),
            requirements: None,
            responsibilities: None,
            benefits: None,
            job_type: JobType::Contract,
            vacancies: 1,
            location: "l".into(),
            salary: None,
            deadline: day("2030-01-10"),
            is_active: true,
            is_premium: false,
            view_count: 0,
            lifecycle: Lifecycle::created(None),
        };
        assert!(listing.is_open_on(day("2030-01-10")));
        assert!(!listing.is_open_on(day("2030-01-11")));

        listing.is_active = false;
        assert!(!listing.is_open_on(day("2030-01-01")));

        listing.is_active = true;
        listing.lifecycle.soft_delete(Uuid::new_v4());
        assert!(!listing.is_open_on(day("2030-01-01")));
    }

    #[test]
    fn inverted_salary_range_is_rejected() {
        let filter = ListingFilter {
            salary_min: Some(10),
            salary_max: Some(5),
            ..ListingFilter::open(day("2030-01-01"))
        };
        assert!(filter.normalized().is_err());
    }

    #[test]
    fn blank_text_filters_are_dropped() {
        let filter = ListingFilter {
            location: Some("  ".into()),
            search: Some("rust ".into()),
            ..ListingFilter::open(day("2030-01-01"))
        }
        .normalized()
        .unwrap();
        assert!(filter.location.is_none());
        assert_eq!(filter.search.as_deref(), Some("rust"));
    }
}
