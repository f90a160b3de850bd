use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::{AppState, AuthScreen},
    ui::{
        components::{centered_rect, form},
        theme::Theme,
    },
};

const SCREENS: [(AuthScreen, &str); 5] = [
    (AuthScreen::Login, "F1 login"),
    (AuthScreen::Register, "F2 register"),
    (AuthScreen::ForgotPassword, "F3 forgot"),
    (AuthScreen::ResetPassword, "F4 reset"),
    (AuthScreen::VerifyEmail, "F5 verify"),
];

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, screen: AuthScreen) {
    let theme = Theme::default();
    let form = state.auth_forms.form(screen);
    let height = form::form_height(form);
    let card_area = centered_rect(48, height, area);
    form::render_form(frame, card_area, form, &theme);

    let mut spans = Vec::new();
    for (i, (target, label)) in SCREENS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let style = if *target == screen {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text_muted)
        };
        spans.push(Span::styled(*label, style));
    }

    let below = card_area.y + card_area.height + 1;
    let hints_area = Rect {
        x: area.x,
        y: below.min(area.bottom().saturating_sub(2)),
        width: area.width,
        height: 1,
    };
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        hints_area,
    );

    let status = if state.auth.is_pending() {
        "Signing in..."
    } else {
        "Enter submit  Tab next field  Esc back  Ctrl+C quit"
    };
    let status_area = Rect {
        y: hints_area.y + 1,
        ..hints_area
    };
    frame.render_widget(
        Paragraph::new(Span::styled(status, Style::default().fg(theme.dim)))
            .alignment(Alignment::Center),
        status_area,
    );
}
