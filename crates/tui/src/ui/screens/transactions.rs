use api_types::transaction::{SortColumn, SortDirection, Transaction};
use engine::{FilterSpec, LoadStatus, money::format_amount};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};

use crate::{
    app::{AppState, Form, Lookups, TransactionsMode},
    parsing::{format_list, option_hint},
    ui::{
        components::{card::Card, centered_rect, form, money::kind_amount},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // active filters
            Constraint::Length(1), // status
            Constraint::Min(0),    // table
            Constraint::Length(1), // pager
        ])
        .split(area);

    render_filters(frame, layout[0], state.list.filters().active(), &theme);
    super::render_status(frame, layout[1], &state.list.rows().status, &theme);
    render_table(frame, layout[2], state, &theme);
    render_pager(frame, layout[3], state, &theme);

    match state.transactions.mode {
        TransactionsMode::List => {}
        TransactionsMode::Filter => {
            render_form_with_hints(frame, area, &state.transactions.filter_form, state, &theme)
        }
        TransactionsMode::Record => {
            render_form_with_hints(frame, area, &state.transactions.record_form, state, &theme)
        }
        TransactionsMode::ConfirmDelete => render_confirm_delete(frame, area, state, &theme),
    }
}

/// Label and value of every active filter, in display order.
fn filter_summary(filters: &FilterSpec) -> Vec<(&'static str, String)> {
    let mut parts = Vec::new();
    if let Some(kind) = filters.kind() {
        parts.push(("Kind", kind.as_str().to_string()));
    }
    if filters.types().is_some() {
        parts.push(("Types", format_list(filters.types())));
    }
    if filters.currencies().is_some() {
        parts.push(("Currencies", format_list(filters.currencies())));
    }
    if let Some(from) = filters.from_date() {
        parts.push(("From", from.to_string()));
    }
    if let Some(to) = filters.to_date() {
        parts.push(("To", to.to_string()));
    }
    if let Some(group_by) = filters.group_by() {
        parts.push(("Group by", group_by.as_str().to_string()));
    }
    parts
}

fn render_filters(frame: &mut Frame<'_>, area: Rect, filters: &FilterSpec, theme: &Theme) {
    let label = |text: &'static str| Span::styled(text, Style::default().fg(theme.text_muted));
    if filters.is_empty() {
        frame.render_widget(Paragraph::new(label(" No filters")), area);
        return;
    }

    let mut spans = vec![Span::raw(" ")];
    for (name, value) in filter_summary(filters) {
        spans.push(label(name));
        spans.push(Span::raw(format!(": {value}   ")));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

const HINT_LIMIT: usize = 6;

/// Known types and currencies for the free-text fields of the open form.
fn lookup_hints(lookups: &Lookups) -> [(&'static str, String); 2] {
    [
        ("Types", option_hint(&lookups.types, HINT_LIMIT)),
        ("Currencies", option_hint(&lookups.currencies, HINT_LIMIT)),
    ]
}

fn render_form_with_hints(
    frame: &mut Frame<'_>,
    area: Rect,
    form: &Form,
    state: &AppState,
    theme: &Theme,
) {
    let hints = lookup_hints(&state.lookups);
    let height = form::form_height(form);
    let rect = centered_rect(56, height.saturating_add(2), area);
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(height), Constraint::Min(0)])
        .split(rect);

    form::render_form(frame, parts[0], form, theme);
    let lines: Vec<Line<'_>> = hints
        .into_iter()
        .map(|(name, value)| {
            Line::from(vec![
                Span::styled(format!(" {name}: "), Style::default().fg(theme.text_muted)),
                Span::styled(value, Style::default().fg(theme.dim)),
            ])
        })
        .collect();
    frame.render_widget(Clear, parts[1]);
    frame.render_widget(Paragraph::new(lines), parts[1]);
}

/// Header text such as `1 Date ▼`; the arrow marks the active sort.
fn header_label(index: usize, column: SortColumn, direction: Option<SortDirection>) -> String {
    let title = match column {
        SortColumn::Date => "Date",
        SortColumn::Kind => "Kind",
        SortColumn::Type => "Type",
        SortColumn::Resource => "Resource",
        SortColumn::Amount => "Amount",
        SortColumn::Currency => "Currency",
    };
    let arrow = match direction {
        Some(SortDirection::Desc) => " ▼",
        Some(SortDirection::Asc) => " ▲",
        None => "",
    };
    format!("{} {title}{arrow}", index + 1)
}

fn render_table(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let sort = state.list.sort();
    let header = Row::new(SortColumn::ALL.iter().enumerate().map(|(i, &column)| {
        let direction = sort.direction_of(column);
        let style = if direction.is_some() {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text_muted)
        };
        Cell::from(header_label(i, column, direction)).style(style)
    }))
    .bottom_margin(1);

    let rows_slot = state.list.rows();
    let card = Card::new("Transactions", theme);
    if rows_slot.items.is_empty() {
        let text = match rows_slot.status {
            LoadStatus::Loading => "Loading...",
            _ => "No transactions match the current filters.",
        };
        card.render_with(
            frame,
            area,
            Paragraph::new(Span::styled(text, Style::default().fg(theme.dim))),
        );
        return;
    }

    let rows = rows_slot.items.iter().map(|tx| transaction_row(tx, theme));
    let widths = [
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Min(10),
        Constraint::Min(10),
        Constraint::Length(16),
        Constraint::Length(10),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(card.block())
        .row_highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    let mut table_state = TableState::default();
    table_state.select(Some(state.transactions.selected));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn transaction_row<'a>(tx: &'a Transaction, theme: &Theme) -> Row<'a> {
    Row::new(vec![
        Cell::from(tx.date.to_string()),
        Cell::from(tx.kind.as_str()),
        Cell::from(tx.tx_type.as_str()),
        Cell::from(tx.resource.as_deref().unwrap_or("-")),
        Cell::from(Line::from(kind_amount(tx.amount, "", tx.kind, theme))),
        Cell::from(tx.currency.as_str()),
    ])
}

fn render_pager(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let page = state.list.page();
    let total = state.list.rows().total;
    let line = Line::from(vec![
        Span::styled(" Page ", Style::default().fg(theme.text_muted)),
        Span::raw(format!("{}/{}", page.index() + 1, state.list.page_count())),
        Span::styled("  ·  ", Style::default().fg(theme.border)),
        Span::raw(format!("{} per page", page.size())),
        Span::styled("  ·  ", Style::default().fg(theme.border)),
        Span::raw(format!("{total} total")),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_confirm_delete(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let target = state.transactions.pending_delete.and_then(|id| {
        state
            .list
            .rows()
            .items
            .iter()
            .find(|tx| tx.id == id)
    });
    let description = target
        .map(|tx| {
            format!(
                "{} {} {} on {}",
                tx.kind.as_str(),
                tx.tx_type,
                format_amount(tx.amount, &tx.currency),
                tx.date
            )
        })
        .unwrap_or_else(|| "this transaction".to_string());

    let rect = centered_rect(52, 5, area);
    frame.render_widget(Clear, rect);
    let card = Card::new("delete", theme).focused(true);
    let lines = vec![
        Line::from(format!("Delete {description}?")),
        Line::from(vec![
            Span::styled("y", Style::default().fg(theme.error)),
            Span::raw(" delete  "),
            Span::styled("any other key", Style::default().fg(theme.accent)),
            Span::raw(" cancel"),
        ]),
    ];
    card.render_with(frame, rect, Paragraph::new(lines).wrap(Wrap { trim: true }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_marks_active_sort() {
        assert_eq!(
            header_label(0, SortColumn::Date, Some(SortDirection::Desc)),
            "1 Date ▼"
        );
        assert_eq!(
            header_label(4, SortColumn::Amount, Some(SortDirection::Asc)),
            "5 Amount ▲"
        );
        assert_eq!(header_label(5, SortColumn::Currency, None), "6 Currency");
    }

    #[test]
    fn filter_line_includes_grouping() {
        use api_types::summary::GroupBy;
        use engine::FilterField;

        let filters = FilterSpec::default()
            .with(FilterField::Currencies(vec!["eur".to_string()]))
            .with(FilterField::GroupBy(Some(GroupBy::Month)));
        assert_eq!(
            filter_summary(&filters),
            vec![
                ("Currencies", "EUR".to_string()),
                ("Group by", "month".to_string()),
            ]
        );
    }

    #[test]
    fn form_hints_come_from_loaded_lookups() {
        let lookups = Lookups {
            types: vec!["food".to_string(), "rent".to_string()],
            currencies: Vec::new(),
            ..Lookups::default()
        };
        let [types, currencies] = lookup_hints(&lookups);
        assert_eq!(types, ("Types", "food, rent".to_string()));
        assert_eq!(currencies, ("Currencies", "none loaded".to_string()));
    }
}
