//! Post-commit focus-follow.
//!
//! After a successful commit the affected card is scrolled into view,
//! selected, and transiently highlighted, exactly once per commit. The
//! sequence is a small explicit state machine rather than ad hoc flags:
//!
//! ```text
//! Idle ── new target ──▶ PendingFocus ── next tick, card present ──▶ Highlight
//!   ▲                        │                                          │
//!   └── card gone/target ────┘◀──────────── highlight expires ──────────┘
//!       cleared
//! ```
//!
//! The caller drives it from the UI tick loop, passing in `Instant`s, so
//! the whole thing is testable with synthetic clocks. When the highlight
//! expires the caller is told to clear the controller's `last_edited_id`;
//! that consumption is what makes the sequence one-shot — re-rendering
//! with an unchanged target never re-triggers it.

use std::time::{Duration, Instant};

use crate::types::{Workshop, WorkshopId};

/// Where the focus target came from, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusSource {
    /// A commit just landed for this id
    Committed,
    /// This workshop's edit form is open (e.g. on entry to edit mode)
    Editing,
}

/// The card the view should converge on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusTarget {
    pub id: WorkshopId,
    pub source: FocusSource,
}

/// Resolve the current focus target: a just-committed id wins over the
/// workshop currently being edited; with neither there is no target.
pub fn resolve_focus_target(
    last_edited: Option<WorkshopId>,
    editing: Option<&Workshop>,
) -> Option<FocusTarget> {
    if let Some(id) = last_edited {
        return Some(FocusTarget {
            id,
            source: FocusSource::Committed,
        });
    }
    editing.map(|w| FocusTarget {
        id: w.id,
        source: FocusSource::Editing,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    /// Scroll has been issued; focus fires on the next tick if the card
    /// still exists
    PendingFocus { id: WorkshopId },
    Highlight { id: WorkshopId, until: Instant },
}

/// What the caller should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusEvent {
    /// Move selection/input focus to this card and start its highlight
    Focus(WorkshopId),
    /// The highlight ran its course; consume the commit signal
    /// (`SessionController::clear_last_edited`)
    HighlightEnded(WorkshopId),
}

/// The focus-follow state machine. See the module docs.
pub struct FocusFollow {
    highlight_for: Duration,
    target: Option<FocusTarget>,
    phase: Phase,
}

impl FocusFollow {
    pub fn new(highlight_for: Duration) -> Self {
        Self {
            highlight_for,
            target: None,
            phase: Phase::Idle,
        }
    }

    /// Feed the currently resolved target. Returns the id to scroll to
    /// when the target changed to a new card; clearing the target cancels
    /// any focus step that has not fired yet.
    pub fn observe(&mut self, target: Option<FocusTarget>) -> Option<WorkshopId> {
        if target == self.target {
            return None;
        }
        self.target = target;

        match target {
            Some(t) => {
                self.phase = Phase::PendingFocus { id: t.id };
                Some(t.id)
            }
            None => {
                if matches!(self.phase, Phase::PendingFocus { .. }) {
                    self.phase = Phase::Idle;
                }
                None
            }
        }
    }

    /// Advance the machine. `card_present` reports whether the pending
    /// card is still rendered (it may have been deleted or filtered out
    /// since the scroll was issued); if not, the focus step is skipped
    /// without error.
    pub fn tick(&mut self, now: Instant, card_present: bool) -> Option<FocusEvent> {
        match self.phase {
            Phase::Idle => None,
            Phase::PendingFocus { id } => {
                if card_present {
                    self.phase = Phase::Highlight {
                        id,
                        until: now + self.highlight_for,
                    };
                    Some(FocusEvent::Focus(id))
                } else {
                    self.phase = Phase::Idle;
                    None
                }
            }
            Phase::Highlight { id, until } => {
                if now >= until {
                    self.phase = Phase::Idle;
                    Some(FocusEvent::HighlightEnded(id))
                } else {
                    None
                }
            }
        }
    }

    /// The card currently carrying the transient highlight, for rendering.
    pub fn highlighted(&self) -> Option<WorkshopId> {
        match self.phase {
            Phase::Highlight { id, .. } => Some(id),
            _ => None,
        }
    }

    /// The id awaiting its focus step, if any. The caller uses this to
    /// answer `card_present` on the next tick.
    pub fn pending_id(&self) -> Option<WorkshopId> {
        match self.phase {
            Phase::PendingFocus { id } => Some(id),
            _ => None,
        }
    }
}
