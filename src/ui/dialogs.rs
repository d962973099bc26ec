//! Confirmation dialogs: delete and discard-unsaved-changes.
//!
//! Visibility is not stored here; both dialogs are drawn iff the session
//! controller has a workshop awaiting delete confirmation or a deferred
//! navigation intent. The widgets only keep the Yes/No cursor.

use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::centered_rect;
use crate::session::PendingAction;
use crate::types::Workshop;

/// Selection state for a Yes/No dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmSelection {
    Yes,
    No,
}

impl ConfirmSelection {
    pub fn toggle(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }
}

fn render_confirm(
    frame: &mut Frame,
    title: &str,
    body: Vec<Line<'_>>,
    yes_label: &str,
    no_label: &str,
    selection: ConfirmSelection,
) {
    let area = centered_rect(50, 30, frame.area());
    frame.render_widget(Clear, area);

    let selected = Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let unselected = Style::default().fg(Color::Gray);

    let mut lines = body;
    lines.push(Line::from(""));
    lines.push(
        Line::from(vec![
            Span::styled(
                format!(" {yes_label} "),
                if selection == ConfirmSelection::Yes {
                    selected
                } else {
                    unselected
                },
            ),
            Span::raw("   "),
            Span::styled(
                format!(" {no_label} "),
                if selection == ConfirmSelection::No {
                    selected
                } else {
                    unselected
                },
            ),
        ])
        .alignment(Alignment::Center),
    );

    let dialog = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(format!(" {title} "))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
    frame.render_widget(dialog, area);
}

/// Confirmation for deleting a workshop.
pub struct DeleteDialog {
    pub selection: ConfirmSelection,
}

impl DeleteDialog {
    pub fn new() -> Self {
        Self {
            // Destructive default: start on No
            selection: ConfirmSelection::No,
        }
    }

    pub fn reset(&mut self) {
        self.selection = ConfirmSelection::No;
    }

    pub fn toggle(&mut self) {
        self.selection = self.selection.toggle();
    }

    pub fn render(&self, frame: &mut Frame, workshop: &Workshop) {
        let body = vec![
            Line::from(""),
            Line::from(vec![
                Span::raw("Delete "),
                Span::styled(
                    workshop.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw("?"),
            ]),
            Line::from(Span::styled(
                format!("{} · starts {}", workshop.category, workshop.start_date.format("%Y-%m-%d")),
                Style::default().fg(Color::DarkGray),
            )),
        ];
        render_confirm(frame, "Delete workshop", body, "Delete", "Keep", self.selection);
    }
}

impl Default for DeleteDialog {
    fn default() -> Self {
        Self::new()
    }
}

/// Confirmation for discarding unsaved form changes before a deferred
/// navigation runs.
pub struct DiscardDialog {
    pub selection: ConfirmSelection,
}

impl DiscardDialog {
    pub fn new() -> Self {
        Self {
            selection: ConfirmSelection::No,
        }
    }

    pub fn reset(&mut self) {
        self.selection = ConfirmSelection::No;
    }

    pub fn toggle(&mut self) {
        self.selection = self.selection.toggle();
    }

    pub fn render(&self, frame: &mut Frame, pending: &PendingAction) {
        let then = match pending {
            PendingAction::Create => "and start a new workshop".to_string(),
            PendingAction::Edit(w) => format!("and edit \"{}\"", w.name),
            PendingAction::Cancel => "and close the form".to_string(),
        };
        let body = vec![
            Line::from(""),
            Line::from("The form has unsaved changes."),
            Line::from(Span::styled(
                format!("Discard them {then}?"),
                Style::default().fg(Color::DarkGray),
            )),
        ];
        render_confirm(frame, "Unsaved changes", body, "Discard", "Keep editing", self.selection);
    }
}

impl Default for DiscardDialog {
    fn default() -> Self {
        Self::new()
    }
}
