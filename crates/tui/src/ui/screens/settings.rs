use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Row, Table},
};

use crate::{
    app::{AppState, SettingsMode},
    ui::{
        components::{card::Card, centered_rect, form},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // profile
            Constraint::Length(3), // display currency
            Constraint::Min(0),    // rates
        ])
        .split(area);

    render_profile(frame, layout[0], state, &theme);
    render_display_currency(frame, layout[1], state, &theme);
    render_rates(frame, layout[2], state, &theme);

    if state.settings.mode == SettingsMode::EditProfile {
        let form = &state.settings.profile_form;
        let rect = centered_rect(56, form::form_height(form), area);
        form::render_form(frame, rect, form, &theme);
    }
}

fn field<'a>(label: &'a str, value: String, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label:<10}"), Style::default().fg(theme.text_muted)),
        Span::raw(value),
    ])
}

fn render_profile(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let lines = match state.auth.session() {
        Some(session) => {
            let user = &session.user;
            let verified = match &user.email_verified_at {
                Some(at) => format!("yes ({at})"),
                None => "no".to_string(),
            };
            vec![
                field("Name", user.name.clone(), theme),
                field("Email", user.email.clone(), theme),
                field("Verified", verified, theme),
                field("Server", state.base_url.clone(), theme),
            ]
        }
        None => vec![Line::from("Not signed in.")],
    };
    Card::new("Profile", theme).render_with(frame, area, Paragraph::new(lines));
}

fn render_display_currency(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let current = state
        .list
        .display_currency()
        .unwrap_or("native (per currency)");
    let line = Line::from(vec![
        Span::styled("Summary totals in", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {current}")),
    ]);
    Card::new("Display currency", theme).render_with(frame, area, Paragraph::new(line));
}

fn render_rates(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let rates = &state.lookups.rates;
    let title = if rates.base.is_empty() {
        "Exchange rates".to_string()
    } else {
        format!("Exchange rates (1 {})", rates.base)
    };
    let card = Card::new(&title, theme);
    if rates.rates.is_empty() {
        card.render_with(
            frame,
            area,
            Paragraph::new(Span::styled(
                "No exchange rates available.",
                Style::default().fg(theme.dim),
            )),
        );
        return;
    }

    let rows = rates
        .rates
        .iter()
        .map(|(code, rate)| Row::new([code.clone(), rate.normalize().to_string()]));
    let table = Table::new(rows, [Constraint::Length(10), Constraint::Min(12)])
        .header(
            Row::new(["Currency", "Rate"])
                .style(Style::default().fg(theme.text_muted))
                .bottom_margin(1),
        )
        .block(card.block());
    frame.render_widget(table, area);
}
