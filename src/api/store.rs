//! The workshop store trait.

use async_trait::async_trait;

use crate::api::error::StoreError;
use crate::types::{Workshop, WorkshopDraft, WorkshopId};

/// An abstract store of workshop records.
///
/// This is the seam between the session controller and persistence: the
/// controller calls these four operations and applies the returned records
/// to its own collection, without knowing whether the other side is the
/// REST catalog service or an in-memory store.
///
/// Every call may fail; implementations must not retry on their own.
#[async_trait]
pub trait WorkshopStore: Send + Sync {
    /// Fetch all workshops, in the service's storage order.
    async fn list(&self) -> Result<Vec<Workshop>, StoreError>;

    /// Create a workshop from the draft and return the stored record,
    /// including its assigned id and creation timestamp.
    async fn create(&self, draft: WorkshopDraft) -> Result<Workshop, StoreError>;

    /// Replace the writable fields of an existing workshop and return the
    /// updated record.
    async fn update(&self, id: WorkshopId, draft: WorkshopDraft) -> Result<Workshop, StoreError>;

    /// Delete a workshop by id.
    async fn delete(&self, id: WorkshopId) -> Result<(), StoreError>;
}
