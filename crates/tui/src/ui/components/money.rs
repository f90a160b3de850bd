use api_types::transaction::TransactionKind;
use engine::money::format_amount;
use ratatui::{
    style::{Modifier, Style},
    text::Span,
};
use rust_decimal::Decimal;

use crate::ui::theme::Theme;

/// Amount colored by kind: income green, expense red.
#[must_use]
pub fn kind_amount(
    amount: Decimal,
    currency: &str,
    kind: TransactionKind,
    theme: &Theme,
) -> Span<'static> {
    let (color, prefix) = match kind {
        TransactionKind::Income => (theme.positive, "+"),
        TransactionKind::Expense => (theme.negative, "-"),
    };
    Span::styled(
        format!("{prefix}{}", format_amount(amount, currency)),
        Style::default().fg(color),
    )
}

/// Signed amount (e.g. a balance) colored by sign.
#[must_use]
pub fn signed_amount(amount: Decimal, currency: &str, theme: &Theme) -> Span<'static> {
    let color = if amount > Decimal::ZERO {
        theme.positive
    } else if amount < Decimal::ZERO {
        theme.negative
    } else {
        theme.text
    };
    Span::styled(format_amount(amount, currency), Style::default().fg(color))
}

/// Bold variant for totals.
#[must_use]
pub fn total_amount(amount: Decimal, currency: &str, theme: &Theme) -> Span<'static> {
    let span = signed_amount(amount, currency, theme);
    let style = span.style.add_modifier(Modifier::BOLD);
    span.style(style)
}
