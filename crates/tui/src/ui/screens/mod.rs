pub mod auth;
pub mod settings;
pub mod summary;
pub mod transactions;

use engine::LoadStatus;
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::theme::Theme;

/// One-line status for a request slot: a spinner word or the error.
fn render_status(frame: &mut Frame<'_>, area: Rect, status: &LoadStatus, theme: &Theme) {
    let line = match status {
        LoadStatus::Loading => Line::from(Span::styled(
            "Loading...",
            Style::default().fg(theme.warning),
        )),
        LoadStatus::Failed(message) => Line::from(vec![
            Span::styled("Error: ", Style::default().fg(theme.error)),
            Span::styled(message.as_str(), Style::default().fg(theme.error)),
            Span::styled("  (r to retry)", Style::default().fg(theme.dim)),
        ]),
        LoadStatus::Idle | LoadStatus::Loaded => return,
    };
    frame.render_widget(Paragraph::new(line), area);
}
