//! In-process workshop store.
//!
//! Backs `--demo` mode and the controller tests. Behaves like the real
//! service: ids are assigned here, `created_at` is stamped here, and update
//! returns the stored record rather than echoing the draft.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::api::error::StoreError;
use crate::api::store::WorkshopStore;
use crate::types::{Workshop, WorkshopDraft, WorkshopId};

struct Inner {
    workshops: Vec<Workshop>,
    next_id: WorkshopId,
    failing: bool,
}

/// A workshop store held entirely in memory.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_workshops(Vec::new())
    }

    /// Build a store pre-populated with `workshops`. The id counter starts
    /// above the highest seeded id.
    pub fn with_workshops(workshops: Vec<Workshop>) -> Self {
        let next_id = workshops.iter().map(|w| w.id).max().unwrap_or(0) + 1;
        Self {
            inner: Mutex::new(Inner {
                workshops,
                next_id,
                failing: false,
            }),
        }
    }

    /// A small demo catalog for running the TUI without a service.
    pub fn seeded() -> Self {
        let now = Utc::now();
        let mk = |id: WorkshopId, name: &str, category: &str, days: i64, description: &str| {
            Workshop {
                id,
                name: name.to_string(),
                description: description.to_string(),
                category: category.to_string(),
                start_date: now + Duration::days(days),
                created_at: now,
            }
        };
        Self::with_workshops(vec![
            mk(1, "Intro to ceramics", "Art", 14, "Hand-building, glazing and a first firing."),
            mk(2, "Woodturning basics", "Craft", 21, "Lathe safety, tool control and a first bowl."),
            mk(3, "Watercolor landscapes", "Art", 30, "Washes, wet-on-wet technique and composition."),
            mk(4, "Sourdough weekend", "Cooking", 10, "Starter care, shaping and baking schedules."),
        ])
    }

    /// Make every subsequent call fail with [`StoreError::Unavailable`]
    /// until switched back. Lets tests exercise the
    /// failure-leaves-state-untouched policy.
    pub fn set_failing(&self, failing: bool) {
        self.inner.lock().unwrap().failing = failing;
    }

    fn guard(inner: &Inner) -> Result<(), StoreError> {
        if inner.failing {
            Err(StoreError::Unavailable)
        } else {
            Ok(())
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkshopStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Workshop>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Self::guard(&inner)?;
        Ok(inner.workshops.clone())
    }

    async fn create(&self, draft: WorkshopDraft) -> Result<Workshop, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        Self::guard(&inner)?;

        let workshop = Workshop {
            id: inner.next_id,
            name: draft.name,
            description: draft.description,
            category: draft.category,
            start_date: draft.start_date,
            created_at: Utc::now(),
        };
        inner.next_id += 1;
        inner.workshops.push(workshop.clone());
        Ok(workshop)
    }

    async fn update(&self, id: WorkshopId, draft: WorkshopDraft) -> Result<Workshop, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        Self::guard(&inner)?;

        let slot = inner
            .workshops
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("workshop {id}")))?;

        slot.name = draft.name;
        slot.description = draft.description;
        slot.category = draft.category;
        slot.start_date = draft.start_date;
        Ok(slot.clone())
    }

    async fn delete(&self, id: WorkshopId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        Self::guard(&inner)?;

        let before = inner.workshops.len();
        inner.workshops.retain(|w| w.id != id);
        if inner.workshops.len() == before {
            return Err(StoreError::NotFound(format!("workshop {id}")));
        }
        Ok(())
    }
}
