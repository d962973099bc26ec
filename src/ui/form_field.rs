//! Input field widgets for the workshop form

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_textarea::TextArea;

/// A form field widget that can handle different input types
pub enum FormField {
    /// Single-line text input
    TextInput {
        value: String,
        cursor_pos: usize,
        placeholder: String,
    },
    /// Date input (YYYY-MM-DD format)
    DateInput { value: String, cursor_pos: usize },
    /// Multi-line text input using tui-textarea
    TextArea {
        textarea: Box<TextArea<'static>>,
        placeholder: String,
    },
}

impl FormField {
    pub fn text(placeholder: impl Into<String>) -> Self {
        FormField::TextInput {
            value: String::new(),
            cursor_pos: 0,
            placeholder: placeholder.into(),
        }
    }

    pub fn date() -> Self {
        FormField::DateInput {
            value: String::new(),
            cursor_pos: 0,
        }
    }

    pub fn multiline(placeholder: impl Into<String>) -> Self {
        FormField::TextArea {
            textarea: Box::new(TextArea::default()),
            placeholder: placeholder.into(),
        }
    }

    /// Get the current value as a string
    pub fn value(&self) -> String {
        match self {
            FormField::TextInput { value, .. } => value.clone(),
            FormField::DateInput { value, .. } => value.clone(),
            FormField::TextArea { textarea, .. } => textarea.lines().join("\n"),
        }
    }

    /// Set the value from a string
    pub fn set_value(&mut self, new_value: &str) {
        match self {
            FormField::TextInput {
                value, cursor_pos, ..
            } => {
                *value = new_value.to_string();
                *cursor_pos = value.len();
            }
            FormField::DateInput { value, cursor_pos } => {
                *value = new_value.to_string();
                *cursor_pos = value.len();
            }
            FormField::TextArea { textarea, .. } => {
                textarea.select_all();
                textarea.cut();
                textarea.insert_str(new_value);
            }
        }
    }

    /// Whether the field holds a non-blank value
    pub fn is_filled(&self) -> bool {
        match self {
            FormField::TextInput { value, .. } => !value.trim().is_empty(),
            FormField::DateInput { value, .. } => !value.trim().is_empty(),
            FormField::TextArea { textarea, .. } => {
                !textarea.lines().iter().all(|l| l.trim().is_empty())
            }
        }
    }

    /// For date fields, the parsed date if the text is a valid YYYY-MM-DD
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        match self {
            FormField::DateInput { value, .. } => {
                NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
            }
            _ => None,
        }
    }

    /// Handle a key event, returns true if the key was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self {
            FormField::TextInput {
                value, cursor_pos, ..
            } => match key.code {
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    value.insert(*cursor_pos, c);
                    *cursor_pos += 1;
                    true
                }
                KeyCode::Backspace => {
                    if *cursor_pos > 0 {
                        *cursor_pos -= 1;
                        value.remove(*cursor_pos);
                    }
                    true
                }
                KeyCode::Delete => {
                    if *cursor_pos < value.len() {
                        value.remove(*cursor_pos);
                    }
                    true
                }
                KeyCode::Left => {
                    if *cursor_pos > 0 {
                        *cursor_pos -= 1;
                    }
                    true
                }
                KeyCode::Right => {
                    if *cursor_pos < value.len() {
                        *cursor_pos += 1;
                    }
                    true
                }
                KeyCode::Home => {
                    *cursor_pos = 0;
                    true
                }
                KeyCode::End => {
                    *cursor_pos = value.len();
                    true
                }
                _ => false,
            },
            FormField::DateInput { value, cursor_pos } => match key.code {
                KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => {
                    if value.len() < 10 {
                        value.insert(*cursor_pos, c);
                        *cursor_pos += 1;
                    }
                    true
                }
                KeyCode::Backspace => {
                    if *cursor_pos > 0 {
                        *cursor_pos -= 1;
                        value.remove(*cursor_pos);
                    }
                    true
                }
                KeyCode::Left => {
                    if *cursor_pos > 0 {
                        *cursor_pos -= 1;
                    }
                    true
                }
                KeyCode::Right => {
                    if *cursor_pos < value.len() {
                        *cursor_pos += 1;
                    }
                    true
                }
                _ => false,
            },
            FormField::TextArea { textarea, .. } => {
                // TextArea handles its own key events
                textarea.input(key);
                true
            }
        }
    }

    /// Get the height needed to render this field, label row included
    pub fn render_height(&self) -> u16 {
        match self {
            FormField::TextInput { .. } | FormField::DateInput { .. } => 2,
            FormField::TextArea { .. } => 6,
        }
    }

    /// Render the field under a one-line label
    pub fn render(&mut self, frame: &mut Frame, area: Rect, label: &str, focused: bool) {
        let label_style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let label_area = Rect { height: 1, ..area };
        frame.render_widget(Paragraph::new(Span::styled(label, label_style)), label_area);

        let input_area = Rect {
            y: area.y + 1,
            height: area.height.saturating_sub(1),
            ..area
        };

        match self {
            FormField::TextInput {
                value,
                cursor_pos,
                placeholder,
            } => {
                render_line_input(frame, input_area, value, *cursor_pos, placeholder, focused);
            }
            FormField::DateInput { value, cursor_pos } => {
                render_line_input(frame, input_area, value, *cursor_pos, "YYYY-MM-DD", focused);
            }
            FormField::TextArea {
                textarea,
                placeholder,
            } => {
                textarea.set_cursor_line_style(Style::default());
                textarea.set_cursor_style(if focused {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                });
                textarea.set_block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(if focused {
                            Color::Cyan
                        } else {
                            Color::Gray
                        })),
                );

                if textarea.lines().iter().all(|l| l.is_empty()) && !focused {
                    textarea.set_placeholder_text(placeholder.clone());
                    textarea.set_placeholder_style(Style::default().fg(Color::DarkGray));
                }

                frame.render_widget(&**textarea, input_area);
            }
        }
    }
}

fn render_line_input(
    frame: &mut Frame,
    area: Rect,
    value: &str,
    cursor_pos: usize,
    placeholder: &str,
    focused: bool,
) {
    let content = if value.is_empty() && !focused {
        Line::from(Span::styled(
            placeholder.to_string(),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut text = value.to_string();
        if focused {
            if cursor_pos < text.len() {
                text.insert(cursor_pos, '|');
            } else {
                text.push('|');
            }
        }
        Line::from(Span::raw(text))
    };

    let para = Paragraph::new(content).style(Style::default().fg(if focused {
        Color::White
    } else {
        Color::Gray
    }));
    frame.render_widget(para, area);
}
