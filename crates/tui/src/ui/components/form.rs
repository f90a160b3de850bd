use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};

use crate::{
    app::{Form, MessageLevel},
    ui::{components::card::Card, theme::Theme},
};

const LABEL_WIDTH: u16 = 14;

/// Rows a form needs including borders and the message line.
pub fn form_height(form: &Form) -> u16 {
    u16::try_from(form.fields.len()).unwrap_or(u16::MAX).saturating_add(4)
}

/// Draws `form` as a bordered panel over whatever is underneath.
pub fn render_form(frame: &mut Frame<'_>, area: Rect, form: &Form, theme: &Theme) {
    frame.render_widget(Clear, area);
    let card = Card::new(form.title, theme).focused(true);
    let inner = card.inner(area);
    frame.render_widget(card.block(), area);

    let mut constraints = vec![Constraint::Length(1); form.fields.len()];
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focus;
        let cursor = if focused { "│" } else { "" };
        let value = if field.masked {
            mask_password(&field.value)
        } else {
            field.value.clone()
        };
        let value_style = if focused {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text)
        };

        let line = Line::from(vec![
            Span::styled(
                format!("{:<width$}", field.label, width = LABEL_WIDTH as usize),
                Style::default().fg(theme.text_muted),
            ),
            Span::styled(format!("{value}{cursor}"), value_style),
        ]);
        frame.render_widget(Paragraph::new(line), rows[i]);
    }

    if let Some(message) = &form.message {
        let color = match message.level {
            MessageLevel::Info => theme.text_muted,
            MessageLevel::Error => theme.error,
        };
        frame.render_widget(
            Paragraph::new(Span::styled(message.text.as_str(), Style::default().fg(color))),
            rows[form.fields.len() + 1],
        );
    }
}

/// One bullet per character.
fn mask_password(password: &str) -> String {
    "•".repeat(password.chars().count())
}
