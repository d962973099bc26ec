//! Workshop record and draft types.
//!
//! Field names match the catalog service's wire format (`start_date`,
//! `created_at`), so these structs serialize straight onto the REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the catalog service. Immutable once created.
pub type WorkshopId = i64;

/// A workshop record as held by the catalog service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workshop {
    /// Unique identifier, assigned by the service
    pub id: WorkshopId,

    /// Display name
    pub name: String,

    /// Long-form description
    pub description: String,

    /// Free-text category used for filtering
    pub category: String,

    /// When the workshop takes place
    pub start_date: DateTime<Utc>,

    /// Server-assigned creation timestamp
    pub created_at: DateTime<Utc>,
}

/// The client-writable fields of a workshop, submitted on create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkshopDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    pub start_date: DateTime<Utc>,
}

impl Workshop {
    /// Snapshot the writable fields, e.g. to pre-fill an edit form.
    pub fn draft(&self) -> WorkshopDraft {
        WorkshopDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            start_date: self.start_date,
        }
    }
}
