use api_types::summary::{CurrencyTotals, SummaryGroup};
use engine::{Counts, SummaryTotals};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Paragraph, Row, Table},
};
use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::{
    app::AppState,
    ui::{
        components::{
            card::Card,
            money::{signed_amount, total_amount},
        },
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let slot = state.list.summary();
    let groups = slot.totals.groups();

    let mut constraints = vec![
        Constraint::Length(1), // status
        Constraint::Length(3), // counts
        Constraint::Min(6),    // totals
    ];
    if !groups.is_empty() {
        constraints.push(Constraint::Min(10));
    }
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    super::render_status(frame, layout[0], &slot.status, &theme);
    render_counts(frame, layout[1], slot.totals.counts(), state, &theme);
    render_totals(frame, layout[2], &slot.totals, &theme);
    if !groups.is_empty() {
        render_groups(frame, layout[3], groups, &theme);
    }
}

fn render_counts(frame: &mut Frame<'_>, area: Rect, counts: Counts, state: &AppState, theme: &Theme) {
    let currency = state.list.display_currency().unwrap_or("native");
    let line = Line::from(vec![
        Span::styled("Income", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}   ", counts.income)),
        Span::styled("Expense", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}   ", counts.expense)),
        Span::styled("Shown in", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {currency}")),
    ]);
    Card::new("Records", theme).render_with(frame, area, Paragraph::new(line));
}

/// Totals the server sent without a currency code.
fn currency_label(code: &str) -> &str {
    if code.is_empty() { "-" } else { code }
}

fn totals_row<'a>(currency: &str, totals: &CurrencyTotals, theme: &Theme) -> Row<'a> {
    Row::new(vec![
        Line::from(currency_label(currency).to_string()),
        Line::from(signed_amount(totals.total_income, "", theme)),
        Line::from(signed_amount(-totals.total_expense, "", theme)),
        Line::from(total_amount(totals.total_balance, "", theme)),
    ])
}

fn render_totals(frame: &mut Frame<'_>, area: Rect, totals: &SummaryTotals, theme: &Theme) {
    let card = Card::new("Totals", theme);
    let rows: Vec<Row<'_>> = match totals {
        SummaryTotals::Empty => {
            card.render_with(
                frame,
                area,
                Paragraph::new(Span::styled(
                    "No transactions match the current filters.",
                    Style::default().fg(theme.dim),
                )),
            );
            return;
        }
        SummaryTotals::Single {
            currency, totals, ..
        } => vec![totals_row(currency, totals, theme)],
        SummaryTotals::Breakdown { per_currency, .. } => per_currency
            .iter()
            .map(|(currency, totals)| totals_row(currency, totals, theme))
            .collect(),
    };

    let header = Row::new(["Currency", "Income", "Expense", "Balance"])
        .style(Style::default().fg(theme.text_muted))
        .bottom_margin(1);
    let widths = [
        Constraint::Length(10),
        Constraint::Min(14),
        Constraint::Min(14),
        Constraint::Min(14),
    ];
    let mut table = Table::new(rows, widths).header(header).block(card.block());
    if matches!(totals, SummaryTotals::Breakdown { .. }) {
        table = table.footer(
            Row::new(["Mixed currencies: choose a display currency in Settings to combine."])
                .style(Style::default().fg(theme.dim)),
        );
    }
    frame.render_widget(table, area);
}

/// Bars are whole units; amounts below one unit show as empty.
fn bar_value(amount: Decimal) -> u64 {
    amount.abs().round().to_u64().unwrap_or(0)
}

fn render_groups(frame: &mut Frame<'_>, area: Rect, groups: &[SummaryGroup], theme: &Theme) {
    let card = Card::new("Income / expense by period", theme);
    let mut chart = BarChart::default()
        .bar_width(4)
        .bar_gap(1)
        .group_gap(2)
        .value_style(Style::default().fg(theme.text))
        .label_style(Style::default().fg(theme.dim))
        .block(card.block());

    for group in groups {
        let bars = [
            Bar::default()
                .value(bar_value(group.total_income))
                .style(Style::default().fg(theme.positive)),
            Bar::default()
                .value(bar_value(group.total_expense))
                .style(Style::default().fg(theme.negative)),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(group.key.clone()))
                .bars(&bars),
        );
    }

    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_use_rounded_magnitudes() {
        assert_eq!(bar_value(Decimal::new(12_345, 2)), 123);
        assert_eq!(bar_value(Decimal::new(-995, 1)), 100);
        assert_eq!(bar_value(Decimal::ZERO), 0);
    }

    #[test]
    fn missing_currency_code_shows_placeholder() {
        assert_eq!(currency_label(""), "-");
        assert_eq!(currency_label("EUR"), "EUR");
    }
}
