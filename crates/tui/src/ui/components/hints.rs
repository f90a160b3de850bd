use ratatui::{style::Style, text::Span};

use crate::ui::theme::Theme;

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone, Copy)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }

    spans
}

pub fn hint_separator(theme: &Theme) -> Span<'static> {
    Span::styled("  │  ", Style::default().fg(theme.border))
}

pub mod common {
    use super::KeyHint;

    pub const FORM_EDITING: [KeyHint; 4] = [
        KeyHint::new("Tab", "next"),
        KeyHint::new("S-Tab", "prev"),
        KeyHint::new("Enter", "save"),
        KeyHint::new("Esc", "cancel"),
    ];

    pub const TRANSACTIONS_LIST: [KeyHint; 9] = [
        KeyHint::new("↑↓", "select"),
        KeyHint::new("1-6", "sort"),
        KeyHint::new("n/p", "page"),
        KeyHint::new("z", "size"),
        KeyHint::new("/", "filters"),
        KeyHint::new("c", "clear"),
        KeyHint::new("a", "add"),
        KeyHint::new("e", "edit"),
        KeyHint::new("d", "delete"),
    ];

    pub const SUMMARY: [KeyHint; 2] = [KeyHint::new("r", "refresh"), KeyHint::new("/", "filters")];

    pub const SETTINGS: [KeyHint; 3] = [
        KeyHint::new("e", "edit profile"),
        KeyHint::new("c", "currency"),
        KeyHint::new("l", "logout"),
    ];

    pub const GLOBAL: [KeyHint; 3] = [
        KeyHint::new("Tab", "section"),
        KeyHint::new("r", "refresh"),
        KeyHint::new("q", "quit"),
    ];
}
