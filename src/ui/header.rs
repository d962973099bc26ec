//! Title bar with the category filter.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub struct HeaderBar {
    pub version: &'static str,
}

impl HeaderBar {
    pub fn new() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    /// Height the header wants from the layout. It collapses to a single
    /// dense line once the list is scrolled.
    pub fn height(&self, compact: bool) -> u16 {
        if compact {
            1
        } else {
            2
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        filter: &str,
        filter_active: bool,
        shown: usize,
        total: usize,
        compact: bool,
    ) {
        let title_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let dim = Style::default().fg(Color::DarkGray);

        let filter_span = if filter_active {
            Span::styled(
                format!("Filter: {filter}|"),
                Style::default().fg(Color::Yellow),
            )
        } else if filter.is_empty() {
            Span::styled("Filter: (press / to filter)".to_string(), dim)
        } else {
            Span::styled(format!("Filter: {filter}"), Style::default().fg(Color::White))
        };

        let counts = Span::styled(format!("{shown}/{total} workshops"), dim);

        if compact {
            let line = Line::from(vec![
                Span::styled("TALLER", title_style),
                Span::raw("  "),
                counts,
                Span::raw("  "),
                filter_span,
            ]);
            frame.render_widget(Paragraph::new(line), area);
        } else {
            let lines = vec![
                Line::from(vec![
                    Span::styled("TALLER", title_style),
                    Span::styled(format!(" v{}", self.version), dim),
                    Span::raw("  —  workshop catalog    "),
                    counts,
                ]),
                Line::from(filter_span),
            ];
            frame.render_widget(Paragraph::new(lines), area);
        }
    }
}

impl Default for HeaderBar {
    fn default() -> Self {
        Self::new()
    }
}
