//! Domain types for the workshop catalog.

mod workshop;

pub use workshop::{Workshop, WorkshopDraft, WorkshopId};
