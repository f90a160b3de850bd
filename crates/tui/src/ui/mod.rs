pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, Screen, Section, SettingsMode, TransactionsMode};
use components::hints::{self, KeyHint, common};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    match state.screen {
        Screen::Auth(screen) => screens::auth::render(frame, area, state, screen),
        Screen::Main => render_shell(frame, area, state),
    }
}

fn render_shell(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tab bar
            Constraint::Min(0),    // Section content
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    components::tabs::render_tabs(frame, layout[1], state.section, &theme);

    match state.section {
        Section::Transactions => screens::transactions::render(frame, layout[2], state),
        Section::Summary => screens::summary::render(frame, layout[2], state),
        Section::Settings => screens::settings::render(frame, layout[2], state),
    }

    render_bottom_bar(frame, layout[3], state, &theme);
    components::toast::render(frame, area, state.toast.as_ref(), &theme);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let user = state
        .auth
        .session()
        .map(|s| s.user.name.as_str())
        .unwrap_or("-");
    let filters = if state.list.filters().has_active_filters() {
        "on"
    } else {
        "off"
    };
    let currency = state.list.display_currency().unwrap_or("native");

    let line = Line::from(vec![
        Span::styled("User", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {user}  ")),
        Span::styled("Filters", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {filters}  ")),
        Span::styled("Currency", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {currency}  ")),
        Span::styled("Server", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}", state.base_url)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let context = context_hints(state);
    let mut parts = hints::hints_to_spans(context, theme);

    // Section switching and quitting only work while no form is open.
    if state.is_idle() {
        parts.push(hints::hint_separator(theme));
        parts.extend(hints::hints_to_spans(&common::GLOBAL, theme));
    }

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

fn context_hints(state: &AppState) -> &'static [KeyHint] {
    match state.section {
        Section::Transactions => match state.transactions.mode {
            TransactionsMode::List => &common::TRANSACTIONS_LIST,
            TransactionsMode::Filter | TransactionsMode::Record => &common::FORM_EDITING,
            TransactionsMode::ConfirmDelete => &[],
        },
        Section::Summary => &common::SUMMARY,
        Section::Settings => match state.settings.mode {
            SettingsMode::View => &common::SETTINGS,
            SettingsMode::EditProfile => &common::FORM_EDITING,
        },
    }
}
