//! The workshop card list.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::types::{Workshop, WorkshopId};

pub struct CatalogView {
    state: ListState,
    /// Rows visible in the last render, for centering scrolls
    viewport_rows: usize,
}

impl CatalogView {
    pub fn new() -> Self {
        Self {
            state: ListState::default(),
            viewport_rows: 0,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.state.selected()
    }

    pub fn offset(&self) -> usize {
        self.state.offset()
    }

    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            self.state.select(None);
            return;
        }
        let next = match self.state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.state.select(Some(next));
    }

    pub fn select_prev(&mut self, len: usize) {
        if len == 0 {
            self.state.select(None);
            return;
        }
        let prev = self.state.selected().map_or(0, |i| i.saturating_sub(1));
        self.state.select(Some(prev));
    }

    /// Keep the selection valid after the row set changed (filter edits,
    /// deletions).
    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.state.select(None);
            return;
        }
        match self.state.selected() {
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            None => self.state.select(Some(0)),
            _ => {}
        }
    }

    /// Move the selection to the row showing `id`, if present.
    pub fn select_id(&mut self, id: WorkshopId, rows: &[&Workshop]) {
        if let Some(index) = rows.iter().position(|w| w.id == id) {
            self.state.select(Some(index));
        }
    }

    /// Scroll so the row showing `id` sits roughly centered in the
    /// viewport.
    pub fn scroll_to(&mut self, id: WorkshopId, rows: &[&Workshop]) {
        let Some(index) = rows.iter().position(|w| w.id == id) else {
            return;
        };
        let half = (self.viewport_rows / 2).max(1);
        *self.state.offset_mut() = index.saturating_sub(half);
        self.state.select(Some(index));
    }

    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        rows: &[&Workshop],
        expanded: Option<WorkshopId>,
        highlighted: Option<WorkshopId>,
        loading: bool,
        load_error: Option<&str>,
    ) {
        self.viewport_rows = area.height.saturating_sub(2) as usize;

        let block = Block::default()
            .title(format!(" Workshops ({}) ", rows.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray));

        if loading {
            let message = Paragraph::new("Loading catalog...")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        if let Some(error) = load_error {
            let message = Paragraph::new(vec![
                Line::from(Span::styled(
                    "Could not load the catalog.",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    error.to_string(),
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Press r to retry.",
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .wrap(Wrap { trim: true })
            .block(block);
            frame.render_widget(message, area);
            return;
        }

        if rows.is_empty() {
            let message = Paragraph::new("No workshops to show. Press n to create one, or loosen the filter.")
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let max_name_len = (area.width as usize).saturating_sub(30);
        let items: Vec<ListItem> = rows
            .iter()
            .map(|w| {
                let name = if w.name.len() > max_name_len && max_name_len > 3 {
                    format!("{}...", &w.name[..max_name_len - 3])
                } else {
                    w.name.clone()
                };

                let name_style = if highlighted == Some(w.id) {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().add_modifier(Modifier::BOLD)
                };

                let mut lines = vec![Line::from(vec![
                    Span::styled(name, name_style),
                    Span::raw("  "),
                    Span::styled(w.category.clone(), Style::default().fg(Color::Cyan)),
                    Span::styled(
                        format!("  starts {}", w.start_date.format("%Y-%m-%d")),
                        Style::default().fg(Color::DarkGray),
                    ),
                ])];

                if expanded == Some(w.id) {
                    for text_line in w.description.lines() {
                        lines.push(Line::from(Span::styled(
                            format!("    {text_line}"),
                            Style::default().fg(Color::Gray),
                        )));
                    }
                    lines.push(Line::from(Span::styled(
                        format!("    added {}", w.created_at.format("%Y-%m-%d")),
                        Style::default().fg(Color::DarkGray),
                    )));
                }

                ListItem::new(lines)
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, area, &mut self.state);
    }
}

impl Default for CatalogView {
    fn default() -> Self {
        Self::new()
    }
}
