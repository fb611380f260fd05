//! Audit and soft-delete metadata shared by every entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Who created, last touched and (soft) deleted a row, and when.
///
/// Rows are never physically removed: deletion flips `is_deleted` and
/// records the actor, so dependent records keep a valid reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lifecycle {
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub is_deleted: bool,
}

impl Lifecycle {
    /// Fresh lifecycle for a row created now by `actor`.
    pub fn created(actor: Option<Uuid>) -> Self {
        Self {
            created_by: actor,
            created_at: Utc::now(),
            updated_by: None,
            updated_at: None,
            deleted_by: None,
            deleted_at: None,
            is_deleted: false,
        }
    }

    pub fn touch(&mut self, actor: Uuid) {
        self.updated_by = Some(actor);
        self.updated_at = Some(Utc::now());
    }

    /// Mark the row deleted. Deleting twice keeps the first audit record.
    pub fn soft_delete(&mut self, actor: Uuid) {
        if self.is_deleted {
            return;
        }
        let now = Utc::now();
        self.is_deleted = true;
        self.deleted_by = Some(actor);
        self.deleted_at = Some(now);
        self.updated_by = Some(actor);
        self.updated_at = Some(now);
    }

    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}
