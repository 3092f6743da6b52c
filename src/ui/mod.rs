mod detail;
mod help;
mod list;

use crate::app::App;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

pub use detail::overlay_rect;

/// Top-level render dispatch. The card list always renders underneath; the
/// detail and help overlays draw on top of it.
pub fn render(app: &App, frame: &mut Frame) {
    list::render(app, frame);

    if app.showcase.is_modal_open() {
        detail::render(app, frame);
    }

    if app.show_help {
        help::render(frame);
    }
}

/// Create a centered rectangle using percentage of parent area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
