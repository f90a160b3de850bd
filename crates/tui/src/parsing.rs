//! Turns form text into typed filter and record values.

use api_types::{
    summary::GroupBy,
    transaction::{Transaction, TransactionDraft, TransactionKind},
};
use chrono::NaiveDate;
use engine::{EngineError, FilterField, FilterSpec, money};

type ParseResult<T> = Result<T, EngineError>;

/// Empty input means "no kind". Accepts any prefix of `expense`/`income`.
pub fn parse_kind(input: &str) -> ParseResult<Option<TransactionKind>> {
    let value = input.trim().to_ascii_lowercase();
    if value.is_empty() {
        return Ok(None);
    }
    if "expense".starts_with(&value) {
        return Ok(Some(TransactionKind::Expense));
    }
    if "income".starts_with(&value) {
        return Ok(Some(TransactionKind::Income));
    }
    Err(EngineError::Validation(format!(
        "kind must be expense or income, got {value:?}"
    )))
}

pub fn parse_group_by(input: &str) -> ParseResult<Option<GroupBy>> {
    match input.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "day" => Ok(Some(GroupBy::Day)),
        "week" => Ok(Some(GroupBy::Week)),
        "month" => Ok(Some(GroupBy::Month)),
        "year" => Ok(Some(GroupBy::Year)),
        other => Err(EngineError::Validation(format!(
            "group by must be day, week, month or year, got {other:?}"
        ))),
    }
}

/// `YYYY-MM-DD`, or empty for no bound.
pub fn parse_date(input: &str) -> ParseResult<Option<NaiveDate>> {
    let value = input.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| EngineError::Validation(format!("invalid date {value:?}, use YYYY-MM-DD")))
}

/// Comma separated values; blanks are dropped later by the filter state.
pub fn parse_list(input: &str) -> Vec<String> {
    input.split(',').map(|v| v.trim().to_string()).collect()
}

pub fn format_list<'a>(values: Option<impl IntoIterator<Item = &'a String>>) -> String {
    values
        .map(|v| v.into_iter().cloned().collect::<Vec<_>>().join(", "))
        .unwrap_or_default()
}

/// Known values shown next to a free-text field, e.g. `food, rent +2 more`.
pub fn option_hint(options: &[String], limit: usize) -> String {
    if options.is_empty() {
        return "none loaded".to_string();
    }
    let shown = options[..options.len().min(limit)].join(", ");
    match options.len().saturating_sub(limit) {
        0 => shown,
        rest => format!("{shown} +{rest} more"),
    }
}

pub const FILTER_KIND: usize = 0;
pub const FILTER_TYPES: usize = 1;
pub const FILTER_CURRENCIES: usize = 2;
pub const FILTER_FROM: usize = 3;
pub const FILTER_TO: usize = 4;
pub const FILTER_GROUP_BY: usize = 5;
pub const FILTER_LABELS: [&str; 6] = ["Kind", "Types", "Currencies", "From", "To", "Group by"];

/// Parses one filter form field into the draft value it stands for.
pub fn filter_field(index: usize, input: &str) -> ParseResult<FilterField> {
    match index {
        FILTER_KIND => parse_kind(input).map(FilterField::Kind),
        FILTER_TYPES => Ok(FilterField::Types(parse_list(input))),
        FILTER_CURRENCIES => Ok(FilterField::Currencies(parse_list(input))),
        FILTER_FROM => parse_date(input).map(FilterField::FromDate),
        FILTER_TO => parse_date(input).map(FilterField::ToDate),
        FILTER_GROUP_BY => parse_group_by(input).map(FilterField::GroupBy),
        other => Err(EngineError::Validation(format!("unknown filter field {other}"))),
    }
}

/// Form text for each filter field, in [`FILTER_LABELS`] order.
pub fn filter_texts(spec: &FilterSpec) -> [String; 6] {
    [
        spec.kind().map(|k| k.as_str().to_string()).unwrap_or_default(),
        format_list(spec.types()),
        format_list(spec.currencies()),
        spec.from_date().map(|d| d.to_string()).unwrap_or_default(),
        spec.to_date().map(|d| d.to_string()).unwrap_or_default(),
        spec.group_by().map(|g| g.as_str().to_string()).unwrap_or_default(),
    ]
}

pub const RECORD_KIND: usize = 0;
pub const RECORD_TYPE: usize = 1;
pub const RECORD_AMOUNT: usize = 2;
pub const RECORD_CURRENCY: usize = 3;
pub const RECORD_RESOURCE: usize = 4;
pub const RECORD_DATE: usize = 5;
pub const RECORD_DESCRIPTION: usize = 6;
pub const RECORD_LABELS: [&str; 7] = [
    "Kind",
    "Type",
    "Amount",
    "Currency",
    "Resource",
    "Date",
    "Description",
];

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Builds a create/update body from record form values.
pub fn record_draft(values: &[&str; 7]) -> ParseResult<TransactionDraft> {
    let kind = parse_kind(values[RECORD_KIND])?
        .ok_or_else(|| EngineError::Validation("kind is required".to_string()))?;
    let tx_type = optional(values[RECORD_TYPE])
        .ok_or_else(|| EngineError::Validation("type is required".to_string()))?;
    let amount = money::parse_amount(values[RECORD_AMOUNT])?;
    let currency = optional(values[RECORD_CURRENCY])
        .map(|c| c.to_ascii_uppercase())
        .ok_or_else(|| EngineError::Validation("currency is required".to_string()))?;
    let date = parse_date(values[RECORD_DATE])?
        .ok_or_else(|| EngineError::Validation("date is required".to_string()))?;

    Ok(TransactionDraft {
        kind,
        tx_type,
        amount,
        currency,
        resource: optional(values[RECORD_RESOURCE]),
        date,
        description: optional(values[RECORD_DESCRIPTION]),
    })
}

/// Form text for editing an existing record.
pub fn record_texts(tx: &Transaction) -> [String; 7] {
    [
        tx.kind.as_str().to_string(),
        tx.tx_type.clone(),
        tx.amount.to_string(),
        tx.currency.clone(),
        tx.resource.clone().unwrap_or_default(),
        tx.date.to_string(),
        tx.description.clone().unwrap_or_default(),
    ]
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn option_hint_lists_known_values() {
        let types: Vec<String> = ["food", "rent", "salary", "travel"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(option_hint(&types, 2), "food, rent +2 more");
        assert_eq!(option_hint(&types, 10), "food, rent, salary, travel");
        assert_eq!(option_hint(&[], 5), "none loaded");
    }

    #[test]
    fn kind_accepts_prefixes_and_blank() {
        assert_eq!(parse_kind("").unwrap(), None);
        assert_eq!(parse_kind("e").unwrap(), Some(TransactionKind::Expense));
        assert_eq!(parse_kind("INC").unwrap(), Some(TransactionKind::Income));
        assert!(parse_kind("refund").is_err());
    }

    #[test]
    fn dates_are_iso_calendar_days() {
        assert_eq!(parse_date(" ").unwrap(), None);
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert!(parse_date("29/02/2024").is_err());
        assert!(parse_date("2023-02-29").is_err());
    }

    #[test]
    fn filter_texts_roundtrip_through_fields() {
        let spec = FilterSpec::default()
            .with(FilterField::Kind(Some(TransactionKind::Expense)))
            .with(FilterField::Types(vec!["rent".to_string(), "food".to_string()]))
            .with(FilterField::FromDate(NaiveDate::from_ymd_opt(2024, 1, 1)))
            .with(FilterField::GroupBy(Some(GroupBy::Month)));

        let texts = filter_texts(&spec);
        assert_eq!(texts[FILTER_TYPES], "food, rent");
        assert_eq!(texts[FILTER_FROM], "2024-01-01");

        let mut rebuilt = FilterSpec::default();
        for (i, text) in texts.iter().enumerate() {
            rebuilt.set(filter_field(i, text).unwrap());
        }
        assert_eq!(rebuilt, spec);
    }

    #[test]
    fn record_draft_requires_core_fields() {
        let ok = record_draft(&["income", "salary", "1500,00", "eur", "", "2024-01-31", " "]).unwrap();
        assert_eq!(ok.kind, TransactionKind::Income);
        assert_eq!(ok.amount, Decimal::new(150000, 2));
        assert_eq!(ok.currency, "EUR");
        assert_eq!(ok.resource, None);
        assert_eq!(ok.description, None);

        assert!(record_draft(&["", "salary", "10", "EUR", "", "2024-01-31", ""]).is_err());
        assert!(record_draft(&["income", "", "10", "EUR", "", "2024-01-31", ""]).is_err());
        assert!(record_draft(&["income", "salary", "10", "EUR", "", "", ""]).is_err());
    }
}
