//! Editing/session coordination for the workshop catalog.
//!
//! [`SessionController`] owns the in-memory workshop collection and every
//! piece of UI-mode state: which card is expanded, which workshop is being
//! created/edited/deleted, whether the active form has unsaved changes, and
//! the single deferred navigation intent awaiting confirmation. The
//! presentation layer reads state through the accessors and calls the
//! action methods on user gestures; persistence goes through the
//! [`WorkshopStore`] the controller was built with.
//!
//! Mode-changing actions (`start_create`, `start_edit`, `cancel_editing`)
//! are guarded: while the form is dirty they park themselves in
//! `pending_action` instead of executing, until the user confirms or aborts
//! the discard. Deleting is an orthogonal confirmation, not navigation away
//! from the form, so it bypasses the guard.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::api::{StoreError, WorkshopStore};
use crate::types::{Workshop, WorkshopDraft, WorkshopId};

/// A navigation intent deferred behind the unsaved-changes confirmation.
///
/// At most one exists at a time; a guarded action issued while another is
/// already pending overwrites it, so the confirmation always reflects the
/// most recent gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    /// Open the create form
    Create,
    /// Open the edit form for this workshop
    Edit(Workshop),
    /// Close the form
    Cancel,
}

/// The session controller. See the module docs for the protocol.
pub struct SessionController {
    store: Arc<dyn WorkshopStore>,

    workshops: Vec<Workshop>,
    expanded_id: Option<WorkshopId>,
    editing: Option<Workshop>,
    deleting: Option<Workshop>,
    creating: bool,
    dirty: bool,
    pending: Option<PendingAction>,
    category_filter: String,
    last_edited_id: Option<WorkshopId>,
    loading: bool,
    load_error: Option<String>,
}

impl SessionController {
    pub fn new(store: Arc<dyn WorkshopStore>) -> Self {
        Self {
            store,
            workshops: Vec::new(),
            expanded_id: None,
            editing: None,
            deleting: None,
            creating: false,
            dirty: false,
            pending: None,
            category_filter: String::new(),
            last_edited_id: None,
            loading: true,
            load_error: None,
        }
    }

    // ─── Read-only state ─────────────────────────────────────────────────

    pub fn workshops(&self) -> &[Workshop] {
        &self.workshops
    }

    /// The collection narrowed to workshops whose category contains the
    /// filter text, case-insensitively. An empty filter passes everything.
    pub fn filtered(&self) -> Vec<&Workshop> {
        let needle = self.category_filter.to_lowercase();
        self.workshops
            .iter()
            .filter(|w| w.category.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn expanded_id(&self) -> Option<WorkshopId> {
        self.expanded_id
    }

    pub fn editing(&self) -> Option<&Workshop> {
        self.editing.as_ref()
    }

    pub fn deleting(&self) -> Option<&Workshop> {
        self.deleting.as_ref()
    }

    pub fn is_creating(&self) -> bool {
        self.creating
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn pending_action(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    pub fn category_filter(&self) -> &str {
        &self.category_filter
    }

    pub fn last_edited_id(&self) -> Option<WorkshopId> {
        self.last_edited_id
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    // ─── Collection lifecycle ────────────────────────────────────────────

    /// Fetch the collection from the store. On failure the collection is
    /// left as it was (empty on first load) and `load_error` is set; there
    /// is no automatic retry. Also re-initializes the dirty flag and the
    /// pending intent.
    pub async fn load(&mut self) {
        self.loading = true;
        match self.store.list().await {
            Ok(workshops) => {
                debug!(count = workshops.len(), "catalog loaded");
                self.workshops = workshops;
                self.load_error = None;
            }
            Err(err) => {
                warn!(error = %err, "catalog load failed");
                self.load_error = Some(err.to_string());
            }
        }
        self.loading = false;
        self.dirty = false;
        self.pending = None;
    }

    // ─── Non-destructive view state ──────────────────────────────────────

    /// Open the detail view for `id`, or close it if already open.
    pub fn toggle_expanded(&mut self, id: WorkshopId) {
        self.expanded_id = if self.expanded_id == Some(id) {
            None
        } else {
            Some(id)
        };
    }

    pub fn set_category_filter(&mut self, filter: impl Into<String>) {
        self.category_filter = filter.into();
    }

    // ─── Guarded navigation ──────────────────────────────────────────────

    /// Open the create form. Deferred while the active form is dirty.
    pub fn start_create(&mut self) {
        if self.dirty {
            self.pending = Some(PendingAction::Create);
            return;
        }
        self.editing = None;
        self.creating = true;
    }

    /// Open the edit form for `workshop`. Deferred while the active form is
    /// dirty.
    pub fn start_edit(&mut self, workshop: Workshop) {
        if self.dirty {
            self.pending = Some(PendingAction::Edit(workshop));
            return;
        }
        self.editing = Some(workshop);
        self.creating = true;
    }

    /// Close the form without committing. Deferred while it is dirty.
    pub fn cancel_editing(&mut self) {
        if self.dirty {
            self.pending = Some(PendingAction::Cancel);
            return;
        }
        self.creating = false;
        self.editing = None;
    }

    /// Reported by the active form whenever its fields diverge from (or
    /// return to) their snapshot. Idempotent; never navigates by itself.
    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// Apply the deferred intent: the discard was confirmed, so the dirty
    /// flag is cleared first and the parked navigation runs as it would
    /// have on a clean form.
    pub fn confirm_pending_action(&mut self) {
        let Some(action) = self.pending.take() else {
            return;
        };
        self.dirty = false;

        match action {
            PendingAction::Create => {
                self.editing = None;
                self.creating = true;
            }
            PendingAction::Edit(workshop) => {
                self.editing = Some(workshop);
                self.creating = true;
            }
            PendingAction::Cancel => {
                self.editing = None;
                self.creating = false;
            }
        }
    }

    /// Drop the deferred intent; the user stays in the dirty form with
    /// mode, fields and dirty flag untouched.
    pub fn abort_pending_action(&mut self) {
        self.pending = None;
    }

    // ─── Delete confirmation (orthogonal to the dirty guard) ─────────────

    /// Open the delete confirmation for `workshop`. Not a navigation away
    /// from the form, so the dirty guard does not apply.
    pub fn request_delete(&mut self, workshop: Workshop) {
        self.deleting = Some(workshop);
    }

    pub fn abort_delete(&mut self) {
        self.deleting = None;
    }

    /// Delete the workshop awaiting confirmation. On failure the
    /// confirmation stays open and the collection is untouched.
    pub async fn confirm_delete(&mut self) -> Result<(), StoreError> {
        let Some(target) = self.deleting.clone() else {
            return Ok(());
        };

        self.store.delete(target.id).await?;
        self.workshops.retain(|w| w.id != target.id);
        self.deleting = None;
        debug!(id = target.id, "workshop deleted");
        Ok(())
    }

    // ─── Commits ─────────────────────────────────────────────────────────

    /// Create a workshop from `draft`. On success the stored record is
    /// appended to the collection, form/dirty/pending state is cleared and
    /// the new id becomes the focus-follow target. On failure nothing
    /// changes, so the form stays open and populated for a retry.
    pub async fn handle_create(&mut self, draft: WorkshopDraft) -> Result<WorkshopId, StoreError> {
        let created = self.store.create(draft).await?;
        let id = created.id;

        self.workshops.push(created);
        self.dirty = false;
        self.pending = None;
        self.creating = false;
        self.editing = None;
        self.last_edited_id = Some(id);
        debug!(id, "workshop created");
        Ok(id)
    }

    /// Commit edited fields for the workshop with `id`. On success the
    /// matching collection entry is replaced in place, form/dirty/pending
    /// state is cleared and `id` becomes the focus-follow target. On
    /// failure nothing changes (same retry policy as create).
    pub async fn commit_edit(
        &mut self,
        id: WorkshopId,
        draft: WorkshopDraft,
    ) -> Result<(), StoreError> {
        let updated = self.store.update(id, draft).await?;

        if let Some(slot) = self.workshops.iter_mut().find(|w| w.id == id) {
            *slot = updated;
        }
        self.dirty = false;
        self.pending = None;
        self.creating = false;
        self.editing = None;
        self.last_edited_id = Some(id);
        debug!(id, "workshop updated");
        Ok(())
    }

    /// One-shot consumption of the focus-follow target, called after the
    /// post-commit highlight has run its course.
    pub fn clear_last_edited(&mut self) {
        self.last_edited_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryStore;
    use chrono::{Duration, Utc};

    fn workshop(id: WorkshopId, name: &str, category: &str) -> Workshop {
        Workshop {
            id,
            name: name.to_string(),
            description: format!("{name} description"),
            category: category.to_string(),
            start_date: Utc::now() + Duration::days(30),
            created_at: Utc::now(),
        }
    }

    fn draft(name: &str, category: &str) -> WorkshopDraft {
        WorkshopDraft {
            name: name.to_string(),
            description: format!("{name} description"),
            category: category.to_string(),
            start_date: Utc::now() + Duration::days(30),
        }
    }

    async fn loaded_controller(
        workshops: Vec<Workshop>,
    ) -> (Arc<MemoryStore>, SessionController) {
        let store = Arc::new(MemoryStore::with_workshops(workshops));
        let mut controller = SessionController::new(store.clone());
        controller.load().await;
        (store, controller)
    }

    #[tokio::test]
    async fn test_load_populates_collection() {
        let (_, controller) =
            loaded_controller(vec![workshop(1, "Ceramics", "Art"), workshop(2, "Bowls", "Craft")])
                .await;
        assert!(!controller.is_loading());
        assert!(controller.load_error().is_none());
        assert_eq!(controller.workshops().len(), 2);
    }

    #[tokio::test]
    async fn test_load_failure_sets_error_and_keeps_collection_empty() {
        let store = Arc::new(MemoryStore::seeded());
        store.set_failing(true);
        let mut controller = SessionController::new(store);
        controller.load().await;

        assert!(!controller.is_loading());
        assert!(controller.load_error().is_some());
        assert!(controller.workshops().is_empty());
    }

    #[tokio::test]
    async fn test_load_reinitializes_dirty_and_pending() {
        let (_, mut controller) = loaded_controller(vec![workshop(1, "Ceramics", "Art")]).await;
        controller.set_dirty(true);
        controller.start_create();
        assert!(controller.pending_action().is_some());

        controller.load().await;
        assert!(!controller.is_dirty());
        assert!(controller.pending_action().is_none());
    }

    #[tokio::test]
    async fn test_toggle_expanded_is_idempotent_in_pairs() {
        let (_, mut controller) = loaded_controller(vec![workshop(1, "Ceramics", "Art")]).await;
        assert_eq!(controller.expanded_id(), None);

        controller.toggle_expanded(1);
        assert_eq!(controller.expanded_id(), Some(1));
        controller.toggle_expanded(1);
        assert_eq!(controller.expanded_id(), None);
    }

    #[tokio::test]
    async fn test_expanding_another_card_moves_the_expansion() {
        let (_, mut controller) =
            loaded_controller(vec![workshop(1, "Ceramics", "Art"), workshop(2, "Bowls", "Craft")])
                .await;
        controller.toggle_expanded(1);
        controller.toggle_expanded(2);
        assert_eq!(controller.expanded_id(), Some(2));
    }

    #[tokio::test]
    async fn test_filter_is_case_insensitive_substring() {
        let (_, mut controller) =
            loaded_controller(vec![workshop(1, "Ceramics", "Art"), workshop(2, "Bowls", "Craft")])
                .await;

        controller.set_category_filter("art");
        let filtered = controller.filtered();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 1);

        // "Craft" also contains "ra"
        controller.set_category_filter("ra");
        assert_eq!(controller.filtered().len(), 1);

        controller.set_category_filter("");
        assert_eq!(controller.filtered().len(), 2);
    }

    #[tokio::test]
    async fn test_clean_navigation_switches_modes_directly() {
        let (_, mut controller) = loaded_controller(vec![workshop(1, "Ceramics", "Art")]).await;

        controller.start_create();
        assert!(controller.is_creating());
        assert!(controller.editing().is_none());

        let target = controller.workshops()[0].clone();
        controller.cancel_editing();
        controller.start_edit(target.clone());
        assert!(controller.is_creating());
        assert_eq!(controller.editing().map(|w| w.id), Some(1));

        controller.cancel_editing();
        assert!(!controller.is_creating());
        assert!(controller.editing().is_none());
    }

    #[tokio::test]
    async fn test_dirty_guard_defers_all_three_navigations() {
        let (_, mut controller) =
            loaded_controller(vec![workshop(1, "Ceramics", "Art"), workshop(2, "Bowls", "Craft")])
                .await;
        let second = controller.workshops()[1].clone();

        controller.start_edit(controller.workshops()[0].clone());
        controller.set_dirty(true);

        controller.start_create();
        assert_eq!(controller.pending_action(), Some(&PendingAction::Create));
        assert_eq!(controller.editing().map(|w| w.id), Some(1));

        controller.start_edit(second.clone());
        assert_eq!(
            controller.pending_action(),
            Some(&PendingAction::Edit(second.clone()))
        );
        assert_eq!(controller.editing().map(|w| w.id), Some(1));

        controller.cancel_editing();
        assert_eq!(controller.pending_action(), Some(&PendingAction::Cancel));
        assert!(controller.is_creating());
    }

    #[tokio::test]
    async fn test_last_intent_wins_when_guarded_twice() {
        let (_, mut controller) = loaded_controller(vec![workshop(1, "Ceramics", "Art")]).await;
        controller.start_create();
        controller.set_dirty(true);

        controller.cancel_editing();
        controller.start_create();
        assert_eq!(controller.pending_action(), Some(&PendingAction::Create));
    }

    #[tokio::test]
    async fn test_abort_leaves_everything_as_it_was() {
        let (_, mut controller) = loaded_controller(vec![workshop(1, "Ceramics", "Art")]).await;
        let target = controller.workshops()[0].clone();
        controller.start_edit(target);
        controller.set_dirty(true);

        controller.cancel_editing();
        controller.abort_pending_action();

        assert!(controller.pending_action().is_none());
        assert!(controller.is_dirty());
        assert!(controller.is_creating());
        assert_eq!(controller.editing().map(|w| w.id), Some(1));
    }

    #[tokio::test]
    async fn test_confirm_applies_deferred_edit() {
        let (_, mut controller) =
            loaded_controller(vec![workshop(1, "Ceramics", "Art"), workshop(2, "Bowls", "Craft")])
                .await;
        let second = controller.workshops()[1].clone();

        controller.start_create();
        controller.set_dirty(true);
        controller.start_edit(second);
        assert!(controller.editing().is_none());

        controller.confirm_pending_action();
        assert_eq!(controller.editing().map(|w| w.id), Some(2));
        assert!(controller.is_creating());
        assert!(controller.pending_action().is_none());
        assert!(!controller.is_dirty());
    }

    #[tokio::test]
    async fn test_confirm_applies_deferred_cancel() {
        let (_, mut controller) = loaded_controller(vec![workshop(1, "Ceramics", "Art")]).await;
        controller.start_create();
        controller.set_dirty(true);

        controller.cancel_editing();
        controller.confirm_pending_action();

        assert!(!controller.is_creating());
        assert!(controller.editing().is_none());
        assert!(!controller.is_dirty());
        assert!(controller.pending_action().is_none());
    }

    #[tokio::test]
    async fn test_confirm_with_nothing_pending_is_a_no_op() {
        let (_, mut controller) = loaded_controller(vec![workshop(1, "Ceramics", "Art")]).await;
        controller.start_create();
        controller.set_dirty(true);
        controller.confirm_pending_action();

        // Nothing was pending, so the dirty form is untouched.
        assert!(controller.is_dirty());
        assert!(controller.is_creating());
    }

    #[tokio::test]
    async fn test_delete_bypasses_the_dirty_guard() {
        let (_, mut controller) =
            loaded_controller(vec![workshop(1, "Ceramics", "Art"), workshop(2, "Bowls", "Craft")])
                .await;
        let victim = controller.workshops()[1].clone();

        controller.start_create();
        controller.set_dirty(true);
        controller.request_delete(victim);

        // The delete confirmation opened without parking a pending intent.
        assert_eq!(controller.deleting().map(|w| w.id), Some(2));
        assert!(controller.pending_action().is_none());
        assert!(controller.is_dirty());
    }

    #[tokio::test]
    async fn test_confirmed_delete_removes_exactly_one_entry() {
        let (_, mut controller) = loaded_controller(vec![
            workshop(1, "Ceramics", "Art"),
            workshop(2, "Bowls", "Craft"),
            workshop(3, "Baking", "Cooking"),
        ])
        .await;
        let victim = controller.workshops()[1].clone();

        controller.request_delete(victim);
        controller.confirm_delete().await.unwrap();

        assert!(controller.deleting().is_none());
        let ids: Vec<_> = controller.workshops().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_aborted_delete_changes_nothing() {
        let (_, mut controller) = loaded_controller(vec![workshop(1, "Ceramics", "Art")]).await;
        controller.request_delete(controller.workshops()[0].clone());
        controller.abort_delete();

        assert!(controller.deleting().is_none());
        assert_eq!(controller.workshops().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_confirmation_open() {
        let (store, mut controller) = loaded_controller(vec![workshop(1, "Ceramics", "Art")]).await;
        controller.request_delete(controller.workshops()[0].clone());

        store.set_failing(true);
        assert!(controller.confirm_delete().await.is_err());

        assert_eq!(controller.deleting().map(|w| w.id), Some(1));
        assert_eq!(controller.workshops().len(), 1);
    }

    #[tokio::test]
    async fn test_create_appends_and_clears_form_state() {
        let (_, mut controller) = loaded_controller(vec![workshop(1, "Ceramics", "Art")]).await;
        controller.start_create();
        controller.set_dirty(true);

        let id = controller
            .handle_create(draft("Bookbinding", "Craft"))
            .await
            .unwrap();

        assert_eq!(controller.workshops().len(), 2);
        assert_eq!(controller.workshops().last().unwrap().id, id);
        assert!(!controller.is_creating());
        assert!(!controller.is_dirty());
        assert!(controller.pending_action().is_none());
        assert_eq!(controller.last_edited_id(), Some(id));
    }

    #[tokio::test]
    async fn test_failed_create_leaves_the_form_open() {
        let (store, mut controller) = loaded_controller(vec![workshop(1, "Ceramics", "Art")]).await;
        controller.start_create();
        controller.set_dirty(true);

        store.set_failing(true);
        let result = controller.handle_create(draft("Bookbinding", "Craft")).await;

        assert!(result.is_err());
        assert_eq!(controller.workshops().len(), 1);
        assert!(controller.is_creating());
        assert!(controller.is_dirty());
        assert!(controller.last_edited_id().is_none());
    }

    #[tokio::test]
    async fn test_commit_replaces_in_place() {
        let (_, mut controller) = loaded_controller(vec![
            workshop(1, "Ceramics", "Art"),
            workshop(2, "Bowls", "Craft"),
            workshop(3, "Baking", "Cooking"),
        ])
        .await;
        let before_first = controller.workshops()[0].clone();
        let before_third = controller.workshops()[2].clone();

        controller.start_edit(controller.workshops()[1].clone());
        controller.set_dirty(true);
        controller
            .commit_edit(2, draft("Advanced bowls", "Craft"))
            .await
            .unwrap();

        let workshops = controller.workshops();
        assert_eq!(workshops.len(), 3);
        assert_eq!(workshops[1].id, 2);
        assert_eq!(workshops[1].name, "Advanced bowls");
        assert_eq!(workshops[0], before_first);
        assert_eq!(workshops[2], before_third);

        assert!(!controller.is_creating());
        assert!(controller.editing().is_none());
        assert!(!controller.is_dirty());
        assert_eq!(controller.last_edited_id(), Some(2));
    }

    #[tokio::test]
    async fn test_failed_commit_leaves_state_untouched() {
        let (store, mut controller) =
            loaded_controller(vec![workshop(1, "Ceramics", "Art")]).await;
        controller.start_edit(controller.workshops()[0].clone());
        controller.set_dirty(true);

        store.set_failing(true);
        let result = controller.commit_edit(1, draft("Renamed", "Art")).await;

        assert!(result.is_err());
        assert_eq!(controller.workshops()[0].name, "Ceramics");
        assert!(controller.is_creating());
        assert_eq!(controller.editing().map(|w| w.id), Some(1));
        assert!(controller.is_dirty());
        assert!(controller.last_edited_id().is_none());
    }

    #[tokio::test]
    async fn test_clear_last_edited_is_one_shot() {
        let (_, mut controller) = loaded_controller(vec![workshop(1, "Ceramics", "Art")]).await;
        controller.start_edit(controller.workshops()[0].clone());
        controller.commit_edit(1, draft("Renamed", "Art")).await.unwrap();

        assert_eq!(controller.last_edited_id(), Some(1));
        controller.clear_last_edited();
        assert_eq!(controller.last_edited_id(), None);
    }
}
