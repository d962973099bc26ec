use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::api::WorkshopStore;
use crate::config::Config;
use crate::focus::{resolve_focus_target, FocusEvent, FocusFollow};
use crate::session::SessionController;
use crate::types::{Workshop, WorkshopDraft};
use crate::ui::{
    CatalogView, ConfirmSelection, DeleteDialog, DiscardDialog, FormResult, HeaderBar,
    WorkshopForm,
};

/// Which pane receives list-style key input while the form is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FocusedPane {
    List,
    Form,
}

pub struct App {
    config: Config,
    controller: SessionController,
    focus: FocusFollow,

    header: HeaderBar,
    catalog: CatalogView,
    form: WorkshopForm,
    delete_dialog: DeleteDialog,
    discard_dialog: DiscardDialog,

    pane: FocusedPane,
    filter_active: bool,
    /// Transient message shown in the status bar (mutation errors, mostly)
    status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, store: Arc<dyn WorkshopStore>) -> Self {
        let highlight = Duration::from_millis(config.ui.highlight_duration_ms);
        Self {
            config,
            controller: SessionController::new(store),
            focus: FocusFollow::new(highlight),
            header: HeaderBar::new(),
            catalog: CatalogView::new(),
            form: WorkshopForm::new(),
            delete_dialog: DeleteDialog::new(),
            discard_dialog: DiscardDialog::new(),
            pane: FocusedPane::List,
            filter_active: false,
            status: None,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Initial data load
        self.controller.load().await;
        self.clamp_selection();

        let tick_rate = Duration::from_millis(self.config.ui.refresh_rate_ms);

        while !self.should_quit {
            self.sync_form();
            self.controller.set_dirty(self.form.is_dirty());
            self.drive_focus();

            terminal.draw(|f| self.render(f))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key).await;
                    }
                }
            }
        }

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(())
    }

    /// Derive the form widget's state from the controller's mode. The
    /// controller is the source of truth; the form only ever follows it.
    fn sync_form(&mut self) {
        if self.controller.is_creating() {
            match self.controller.editing() {
                Some(workshop) => {
                    if !self.form.visible() || self.form.target() != Some(workshop.id) {
                        let workshop = workshop.clone();
                        self.form.open_edit(&workshop);
                        self.pane = FocusedPane::Form;
                    }
                }
                None => {
                    if !self.form.visible() || self.form.target().is_some() {
                        self.form.open_create();
                        self.pane = FocusedPane::Form;
                    }
                }
            }
        } else if self.form.visible() {
            self.form.hide();
            self.pane = FocusedPane::List;
        }
    }

    /// Run the focus-follow pipeline: resolve the target, issue the
    /// scroll on a change, then the focus step on the next tick, and
    /// consume the commit signal once the highlight has expired.
    fn drive_focus(&mut self) {
        let target = resolve_focus_target(
            self.controller.last_edited_id(),
            self.controller.editing(),
        );

        if let Some(id) = self.focus.observe(target) {
            let rows = self.controller.filtered();
            self.catalog.scroll_to(id, &rows);
        }

        let card_present = match self.focus.pending_id() {
            Some(id) => self.controller.filtered().iter().any(|w| w.id == id),
            None => true,
        };

        match self.focus.tick(Instant::now(), card_present) {
            Some(FocusEvent::Focus(id)) => {
                let rows = self.controller.filtered();
                self.catalog.select_id(id, &rows);
            }
            Some(FocusEvent::HighlightEnded(_)) => self.controller.clear_last_edited(),
            None => {}
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let compact = self.catalog.offset() > self.config.ui.scroll_threshold;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(self.header.height(compact)),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let shown = self.controller.filtered().len();
        self.header.render(
            frame,
            chunks[0],
            self.controller.category_filter(),
            self.filter_active,
            shown,
            self.controller.workshops().len(),
            compact,
        );

        // Split the main area when the form panel is open
        let (list_area, form_area) = if self.form.visible() {
            let halves = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(40), Constraint::Length(48)])
                .split(chunks[1]);
            (halves[0], Some(halves[1]))
        } else {
            (chunks[1], None)
        };

        let rows = self.controller.filtered();
        self.catalog.render(
            frame,
            list_area,
            &rows,
            self.controller.expanded_id(),
            self.focus.highlighted(),
            self.controller.is_loading(),
            self.controller.load_error(),
        );

        if let Some(area) = form_area {
            self.form
                .render(frame, area, self.pane == FocusedPane::Form);
        }

        self.render_status(frame, chunks[2]);

        // Confirmation overlays (never both: deleting bypasses the dirty
        // guard, so a gesture opens at most one of them)
        if let Some(workshop) = self.controller.deleting() {
            self.delete_dialog.render(frame, workshop);
        } else if let Some(pending) = self.controller.pending_action() {
            self.discard_dialog.render(frame, pending);
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(ref message) = self.status {
            Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red),
            ))
        } else {
            let hint = match self.pane {
                FocusedPane::Form => {
                    "Tab next field · Ctrl+S save · Esc cancel · Ctrl+O list pane"
                }
                FocusedPane::List if self.form.visible() => {
                    "j/k move · n new · e edit · d delete · Ctrl+O form pane · q quit"
                }
                FocusedPane::List => {
                    "j/k move · Enter expand · n new · e edit · d delete · / filter · r reload · q quit"
                }
            };
            Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray)))
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn selected_workshop(&self) -> Option<Workshop> {
        let index = self.catalog.selected()?;
        self.controller.filtered().get(index).map(|w| (*w).clone())
    }

    fn clamp_selection(&mut self) {
        let len = self.controller.filtered().len();
        self.catalog.clamp(len);
    }

    async fn handle_key(&mut self, key: KeyEvent) {
        self.status = None;

        // Delete confirmation takes priority
        if self.controller.deleting().is_some() {
            self.handle_delete_dialog_key(key).await;
            return;
        }

        // Discard confirmation for the deferred navigation
        if self.controller.pending_action().is_some() {
            self.handle_discard_dialog_key(key);
            return;
        }

        // Ctrl+O hops between the list and an open form
        if self.form.visible()
            && key.code == KeyCode::Char('o')
            && key.modifiers.contains(KeyModifiers::CONTROL)
        {
            self.pane = match self.pane {
                FocusedPane::List => FocusedPane::Form,
                FocusedPane::Form => FocusedPane::List,
            };
            return;
        }

        if self.form.visible() && self.pane == FocusedPane::Form {
            self.handle_form_key(key).await;
            return;
        }

        if self.filter_active {
            self.handle_filter_key(key);
            return;
        }

        self.handle_list_key(key).await;
    }

    async fn handle_delete_dialog_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.confirm_delete().await;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.controller.abort_delete();
                self.delete_dialog.reset();
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                self.delete_dialog.toggle();
            }
            KeyCode::Enter => match self.delete_dialog.selection {
                ConfirmSelection::Yes => self.confirm_delete().await,
                ConfirmSelection::No => {
                    self.controller.abort_delete();
                    self.delete_dialog.reset();
                }
            },
            _ => {}
        }
    }

    async fn confirm_delete(&mut self) {
        match self.controller.confirm_delete().await {
            Ok(()) => {
                self.delete_dialog.reset();
                self.clamp_selection();
            }
            Err(err) => {
                // Confirmation stays open; the collection was not touched
                self.status = Some(format!("Delete failed: {err}"));
            }
        }
    }

    fn handle_discard_dialog_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => self.discard_confirmed(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.discard_aborted(),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                self.discard_dialog.toggle();
            }
            KeyCode::Enter => match self.discard_dialog.selection {
                ConfirmSelection::Yes => self.discard_confirmed(),
                ConfirmSelection::No => self.discard_aborted(),
            },
            _ => {}
        }
    }

    fn discard_confirmed(&mut self) {
        self.controller.confirm_pending_action();
        self.discard_dialog.reset();
        // Re-open the form even when the deferred intent lands on the
        // same target: the changes were discarded, so the fields must
        // snap back to a fresh snapshot
        if self.controller.is_creating() {
            match self.controller.editing() {
                Some(workshop) => {
                    let workshop = workshop.clone();
                    self.form.open_edit(&workshop);
                }
                None => self.form.open_create(),
            }
            self.pane = FocusedPane::Form;
        } else {
            self.form.hide();
            self.pane = FocusedPane::List;
        }
        self.controller.set_dirty(false);
    }

    fn discard_aborted(&mut self) {
        self.controller.abort_pending_action();
        self.discard_dialog.reset();
        // The user chose to keep editing; put them back in the form
        if self.form.visible() {
            self.pane = FocusedPane::Form;
        }
    }

    async fn handle_form_key(&mut self, key: KeyEvent) {
        if let Some(result) = self.form.handle_key(key) {
            match result {
                FormResult::Submit(draft) => self.submit(draft).await,
                FormResult::Cancel => {
                    self.controller.set_dirty(self.form.is_dirty());
                    self.controller.cancel_editing();
                }
            }
        }
        self.controller.set_dirty(self.form.is_dirty());
    }

    async fn submit(&mut self, draft: WorkshopDraft) {
        let result = match self.form.target() {
            Some(id) => self.controller.commit_edit(id, draft).await,
            None => self.controller.handle_create(draft).await.map(|_| ()),
        };

        match result {
            Ok(()) => self.clamp_selection(),
            Err(err) => {
                // Leave the form open and populated for a retry
                self.form.set_error(err.to_string());
            }
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.filter_active = false;
            }
            KeyCode::Char(c) => {
                let mut filter = self.controller.category_filter().to_string();
                filter.push(c);
                self.controller.set_category_filter(filter);
                self.clamp_selection();
            }
            KeyCode::Backspace => {
                let mut filter = self.controller.category_filter().to_string();
                filter.pop();
                self.controller.set_category_filter(filter);
                self.clamp_selection();
            }
            _ => {}
        }
    }

    async fn handle_list_key(&mut self, key: KeyEvent) {
        let row_count = self.controller.filtered().len();

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.catalog.select_next(row_count);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.catalog.select_prev(row_count);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(workshop) = self.selected_workshop() {
                    self.controller.toggle_expanded(workshop.id);
                }
            }
            KeyCode::Char('n') => {
                // Guarded: with unsaved changes this parks a pending
                // intent and the discard dialog opens instead
                self.controller.start_create();
            }
            KeyCode::Char('e') => {
                if let Some(workshop) = self.selected_workshop() {
                    self.controller.start_edit(workshop);
                }
            }
            KeyCode::Char('d') => {
                if let Some(workshop) = self.selected_workshop() {
                    self.delete_dialog.reset();
                    self.controller.request_delete(workshop);
                }
            }
            KeyCode::Char('/') => {
                self.filter_active = true;
            }
            KeyCode::Char('r') => {
                self.controller.load().await;
                self.clamp_selection();
            }
            _ => {}
        }
    }
}
