pub mod catalog;
pub mod dialogs;
pub mod form;
pub mod form_field;
pub mod header;

pub use catalog::CatalogView;
pub use dialogs::{ConfirmSelection, DeleteDialog, DiscardDialog};
pub use form::{FormResult, WorkshopForm};
pub use header::HeaderBar;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Center a popup of the given percentage size within `r`.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
