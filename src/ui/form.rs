//! The create/edit form card.
//!
//! The form snapshots its field values when it opens and compares against
//! that snapshot to report unsaved changes; the session controller is told
//! about divergence through `set_dirty` and runs the discard protocol from
//! there. Field validation (blank name/category, malformed or past start
//! date) happens here, before a draft is ever handed to the controller.

use chrono::{NaiveTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::form_field::FormField;
use crate::types::{Workshop, WorkshopDraft, WorkshopId};

const FIELD_COUNT: usize = 4;
const FIELD_NAME: usize = 0;
const FIELD_CATEGORY: usize = 1;
const FIELD_START_DATE: usize = 2;
const FIELD_DESCRIPTION: usize = 3;

/// What a key press resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum FormResult {
    /// A validated draft ready to commit
    Submit(WorkshopDraft),
    /// The user asked to close the form
    Cancel,
}

pub struct WorkshopForm {
    visible: bool,
    /// `None` while creating, the target id while editing
    target: Option<WorkshopId>,
    fields: [FormField; FIELD_COUNT],
    focused: usize,
    snapshot: [String; FIELD_COUNT],
    error: Option<String>,
}

impl WorkshopForm {
    pub fn new() -> Self {
        Self {
            visible: false,
            target: None,
            fields: Self::blank_fields(),
            focused: 0,
            snapshot: Default::default(),
            error: None,
        }
    }

    fn blank_fields() -> [FormField; FIELD_COUNT] {
        [
            FormField::text("Workshop name"),
            FormField::text("Category"),
            FormField::date(),
            FormField::multiline("What this workshop covers"),
        ]
    }

    /// Open empty, in create mode.
    pub fn open_create(&mut self) {
        self.fields = Self::blank_fields();
        self.target = None;
        self.focused = 0;
        self.error = None;
        self.visible = true;
        self.snapshot = self.values();
    }

    /// Open pre-filled with `workshop`'s current fields, in edit mode.
    pub fn open_edit(&mut self, workshop: &Workshop) {
        self.fields = Self::blank_fields();
        self.fields[FIELD_NAME].set_value(&workshop.name);
        self.fields[FIELD_CATEGORY].set_value(&workshop.category);
        self.fields[FIELD_START_DATE]
            .set_value(&workshop.start_date.format("%Y-%m-%d").to_string());
        self.fields[FIELD_DESCRIPTION].set_value(&workshop.description);
        self.target = Some(workshop.id);
        self.focused = 0;
        self.error = None;
        self.visible = true;
        self.snapshot = self.values();
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.error = None;
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn target(&self) -> Option<WorkshopId> {
        self.target
    }

    /// Shown under the fields until the next key press; used for store
    /// rejections as well as local validation messages.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    fn values(&self) -> [String; FIELD_COUNT] {
        [
            self.fields[FIELD_NAME].value(),
            self.fields[FIELD_CATEGORY].value(),
            self.fields[FIELD_START_DATE].value(),
            self.fields[FIELD_DESCRIPTION].value(),
        ]
    }

    /// Whether the fields have diverged from their open-time snapshot.
    pub fn is_dirty(&self) -> bool {
        self.visible && self.values() != self.snapshot
    }

    fn next_field(&mut self) {
        self.focused = (self.focused + 1) % FIELD_COUNT;
    }

    fn prev_field(&mut self) {
        self.focused = (self.focused + FIELD_COUNT - 1) % FIELD_COUNT;
    }

    /// Validate the current fields into a draft.
    fn validate(&self) -> Result<WorkshopDraft, String> {
        let name = self.fields[FIELD_NAME].value().trim().to_string();
        if name.is_empty() {
            return Err("Name must not be empty".to_string());
        }

        let category = self.fields[FIELD_CATEGORY].value().trim().to_string();
        if category.is_empty() {
            return Err("Category must not be empty".to_string());
        }

        let date = self.fields[FIELD_START_DATE]
            .parsed_date()
            .ok_or_else(|| "Start date must be YYYY-MM-DD".to_string())?;
        if date < Utc::now().date_naive() {
            return Err("Start date must not be in the past".to_string());
        }

        Ok(WorkshopDraft {
            name,
            description: self.fields[FIELD_DESCRIPTION].value(),
            category,
            start_date: date.and_time(NaiveTime::MIN).and_utc(),
        })
    }

    fn try_submit(&mut self) -> Option<FormResult> {
        match self.validate() {
            Ok(draft) => Some(FormResult::Submit(draft)),
            Err(message) => {
                self.error = Some(message);
                None
            }
        }
    }

    /// Handle a key press while the form is open.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<FormResult> {
        self.error = None;

        match key.code {
            KeyCode::Esc => return Some(FormResult::Cancel),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return self.try_submit();
            }
            KeyCode::Tab => self.next_field(),
            KeyCode::BackTab => self.prev_field(),
            // Enter advances through the single-line fields; in the
            // description it inserts a newline, so saving is Ctrl+S there.
            KeyCode::Enter if self.focused != FIELD_DESCRIPTION => {
                if self.focused == FIELD_START_DATE {
                    return self.try_submit();
                }
                self.next_field();
            }
            _ => {
                self.fields[self.focused].handle_key(key);
            }
        }
        None
    }

    /// Render into the form panel. `focused` dims the border while the
    /// list pane has input focus.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        if !self.visible {
            return;
        }

        frame.render_widget(Clear, area);

        let title = if self.target.is_some() {
            " Edit workshop "
        } else {
            " New workshop "
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if focused {
                Color::Cyan
            } else {
                Color::Gray
            }));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut constraints: Vec<Constraint> = self
            .fields
            .iter()
            .map(|f| Constraint::Length(f.render_height()))
            .collect();
        constraints.push(Constraint::Length(1)); // error line
        constraints.push(Constraint::Min(1)); // hint line

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        let labels = ["Name", "Category", "Start date", "Description"];
        for (i, label) in labels.iter().enumerate() {
            let active = focused && i == self.focused;
            self.fields[i].render(frame, rows[i], label, active);
        }

        if let Some(ref message) = self.error {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    message.clone(),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                rows[FIELD_COUNT],
            );
        }

        let hint = Line::from(Span::styled(
            "Tab next field · Ctrl+S save · Esc cancel",
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(Paragraph::new(hint), rows[FIELD_COUNT + 1]);
    }
}

impl Default for WorkshopForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn sample() -> Workshop {
        Workshop {
            id: 2,
            name: "Bowls".to_string(),
            description: "Turning green wood.".to_string(),
            category: "Craft".to_string(),
            start_date: Utc::now() + Duration::days(30),
            created_at: Utc::now(),
        }
    }

    fn press(form: &mut WorkshopForm, code: KeyCode) -> Option<FormResult> {
        form.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_open_edit_is_clean_until_typed_into() {
        let mut form = WorkshopForm::new();
        form.open_edit(&sample());
        assert!(!form.is_dirty());

        press(&mut form, KeyCode::Char('x'));
        assert!(form.is_dirty());
    }

    #[test]
    fn test_reverting_a_change_clears_dirty() {
        let mut form = WorkshopForm::new();
        form.open_edit(&sample());
        press(&mut form, KeyCode::Char('x'));
        assert!(form.is_dirty());

        press(&mut form, KeyCode::Backspace);
        assert!(!form.is_dirty());
    }

    #[test]
    fn test_reopening_resets_the_snapshot() {
        let mut form = WorkshopForm::new();
        form.open_edit(&sample());
        press(&mut form, KeyCode::Char('x'));
        assert!(form.is_dirty());

        form.open_create();
        assert!(!form.is_dirty());
        assert_eq!(form.target(), None);
    }

    #[test]
    fn test_hidden_form_is_never_dirty() {
        let mut form = WorkshopForm::new();
        form.open_edit(&sample());
        press(&mut form, KeyCode::Char('x'));
        form.hide();
        assert!(!form.is_dirty());
    }

    #[test]
    fn test_submit_rejects_blank_name() {
        let mut form = WorkshopForm::new();
        form.open_create();
        let result = form.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert_eq!(result, None);
        assert!(form.error.is_some());
    }

    #[test]
    fn test_submit_rejects_past_start_date() {
        let mut form = WorkshopForm::new();
        form.open_edit(&sample());
        let yesterday = (Utc::now() - Duration::days(1)).format("%Y-%m-%d").to_string();
        form.fields[FIELD_START_DATE].set_value(&yesterday);

        let result = form.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert_eq!(result, None);
        assert!(form.error.as_deref().unwrap_or("").contains("past"));
    }

    #[test]
    fn test_valid_form_submits_a_draft() {
        let mut form = WorkshopForm::new();
        form.open_edit(&sample());

        let result = form.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        match result {
            Some(FormResult::Submit(draft)) => {
                assert_eq!(draft.name, "Bowls");
                assert_eq!(draft.category, "Craft");
            }
            other => panic!("expected a draft, got {other:?}"),
        }
    }

    #[test]
    fn test_escape_cancels() {
        let mut form = WorkshopForm::new();
        form.open_create();
        assert_eq!(press(&mut form, KeyCode::Esc), Some(FormResult::Cancel));
    }

    #[test]
    fn test_enter_advances_and_submits_from_date_field() {
        let mut form = WorkshopForm::new();
        form.open_edit(&sample());

        assert_eq!(press(&mut form, KeyCode::Enter), None); // name -> category
        assert_eq!(press(&mut form, KeyCode::Enter), None); // category -> date
        let result = press(&mut form, KeyCode::Enter); // date: submit
        assert!(matches!(result, Some(FormResult::Submit(_))));
    }
}
