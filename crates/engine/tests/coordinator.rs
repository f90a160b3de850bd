use api_types::{
    summary::SummaryResponse,
    transaction::{SortColumn, SortDirection, Transaction, TransactionKind, TransactionPage},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;

use engine::{FilterField, ListQueryCoordinator, SortSpec, UserAction};

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn tx(id: u64, tx_type: &str) -> Transaction {
    Transaction {
        id,
        kind: TransactionKind::Expense,
        tx_type: tx_type.to_string(),
        amount: Decimal::new(1250, 2),
        currency: "EUR".to_string(),
        resource: Some("CASH".to_string()),
        date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        description: None,
    }
}

fn page_of(items: Vec<Transaction>) -> Result<TransactionPage, String> {
    let total = items.len() as u64;
    Ok(TransactionPage { data: items, total })
}

fn coordinator() -> ListQueryCoordinator {
    ListQueryCoordinator::new(25, SortSpec::NONE).unwrap()
}

#[test]
fn applying_filters_refetches_rows_and_summary_with_same_filters() {
    let mut c = coordinator();
    c.filters_mut()
        .set_draft_field(FilterField::Kind(Some(TransactionKind::Income)));
    c.filters_mut()
        .set_draft_field(FilterField::Currencies(vec!["EUR".to_string()]));

    let dispatch = c.apply(UserAction::ApplyFilters).unwrap();
    let rows = dispatch.rows.expect("rows request");
    let summary = dispatch.summary.expect("summary request");
    assert_eq!(rows.query.filters, summary.query.filters);
    assert_eq!(rows.query.filters.kind, Some(TransactionKind::Income));
}

#[test]
fn page_change_refetches_rows_only_with_unchanged_filters() {
    let mut c = coordinator();
    c.filters_mut()
        .set_draft_field(FilterField::Types(vec!["food".to_string()]));
    let applied = c.apply(UserAction::ApplyFilters).unwrap();
    let before = applied.rows.unwrap().query.filters;

    let dispatch = c.apply(UserAction::SetPage(1)).unwrap();
    assert!(dispatch.summary.is_none());
    let rows = dispatch.rows.unwrap();
    assert_eq!(rows.query.filters, before);
    assert_eq!(rows.query.page, 2);
}

#[test]
fn last_possible_page_index_is_requested_without_overflow() {
    let mut c = coordinator();
    let dispatch = c.apply(UserAction::SetPage(u32::MAX)).unwrap();
    assert_eq!(dispatch.rows.unwrap().query.page, u32::MAX);
    assert_eq!(c.page().index(), u32::MAX);
}

#[test]
fn sort_change_refetches_rows_only() {
    let mut c = coordinator();
    let dispatch = c.apply(UserAction::SortBy(SortColumn::Amount)).unwrap();
    assert!(dispatch.summary.is_none());
    let rows = dispatch.rows.unwrap();
    assert_eq!(rows.query.order_by, Some(SortColumn::Amount));
    assert_eq!(rows.query.order_dir, Some(SortDirection::Desc));
}

#[test]
fn record_change_refetches_both_without_touching_state() {
    let mut c = coordinator();
    c.apply(UserAction::SortBy(SortColumn::Date)).unwrap();
    c.apply(UserAction::SetPage(2)).unwrap();

    let dispatch = c.apply(UserAction::RecordsChanged).unwrap();
    assert!(dispatch.summary.is_some());
    assert_eq!(dispatch.rows.unwrap().query.page, 3);
    assert_eq!(c.sort().column(), Some(SortColumn::Date));
}

#[test]
fn new_filter_resets_page_before_rows_request() {
    let mut c = coordinator();
    c.apply(UserAction::SetPage(3)).unwrap();
    assert_eq!(c.page().index(), 3);

    c.filters_mut()
        .set_draft_field(FilterField::Kind(Some(TransactionKind::Expense)));
    let dispatch = c.apply(UserAction::ApplyFilters).unwrap();
    assert_eq!(c.page().index(), 0);
    assert_eq!(dispatch.rows.unwrap().query.page, 1);
}

#[test]
fn sort_resets_page_before_rows_request() {
    let mut c = coordinator();
    c.apply(UserAction::SetPage(3)).unwrap();
    let dispatch = c.apply(UserAction::SortBy(SortColumn::Type)).unwrap();
    assert_eq!(c.page().index(), 0);
    assert_eq!(dispatch.rows.unwrap().query.page, 1);
}

#[test]
fn clearing_filters_resets_page() {
    let mut c = coordinator();
    c.filters_mut()
        .set_draft_field(FilterField::Kind(Some(TransactionKind::Expense)));
    c.apply(UserAction::ApplyFilters).unwrap();
    c.apply(UserAction::SetPage(5)).unwrap();

    let dispatch = c.apply(UserAction::ClearFilters).unwrap();
    assert_eq!(c.page().index(), 0);
    assert!(!c.filters().has_active_filters());
    assert_eq!(dispatch.summary.unwrap().query.filters.kind, None);
}

#[test]
fn late_response_of_superseded_request_is_dropped() {
    let mut c = coordinator();
    c.filters_mut()
        .set_draft_field(FilterField::Types(vec!["food".to_string()]));
    let a = c.apply(UserAction::ApplyFilters).unwrap();

    c.filters_mut()
        .set_draft_field(FilterField::Types(vec!["rent".to_string()]));
    let b = c.apply(UserAction::ApplyFilters).unwrap();

    let (rows_a, summary_a) = (a.rows.unwrap(), a.summary.unwrap());
    let (rows_b, summary_b) = (b.rows.unwrap(), b.summary.unwrap());
    assert!(rows_b.ticket > rows_a.ticket);

    assert!(c.complete_rows(rows_b.ticket, page_of(vec![tx(2, "rent")])));
    assert!(!c.complete_rows(rows_a.ticket, page_of(vec![tx(1, "food")])));
    assert_eq!(c.rows().items.len(), 1);
    assert_eq!(c.rows().items[0].tx_type, "rent");

    let summary = SummaryResponse {
        income_count: 0,
        expense_count: 1,
        ..SummaryResponse::default()
    };
    assert!(c.complete_summary(summary_b.ticket, Ok::<_, String>(summary)));
    assert!(!c.complete_summary(summary_a.ticket, Err::<SummaryResponse, _>("late failure")));
    assert_eq!(c.summary().totals.counts().expense, 1);
    assert!(c.summary().status.error().is_none());
}

#[test]
fn stale_rows_do_not_consume_summary_generation() {
    let mut c = coordinator();
    let mount = c.apply(UserAction::Mount).unwrap();
    let page = c.apply(UserAction::SetPage(1)).unwrap();

    // Paging superseded the mount rows but not the mount summary.
    assert!(!c.complete_rows(mount.rows.unwrap().ticket, page_of(vec![tx(1, "food")])));
    assert!(c.complete_summary(
        mount.summary.unwrap().ticket,
        Ok::<_, String>(SummaryResponse::default())
    ));
    assert!(c.complete_rows(page.rows.unwrap().ticket, page_of(vec![])));
}

#[test]
fn request_parameters_end_to_end() {
    let mut c = coordinator();
    c.filters_mut()
        .set_draft_field(FilterField::Kind(Some(TransactionKind::Expense)));
    c.filters_mut()
        .set_draft_field(FilterField::FromDate(date(2024, 1, 1)));
    c.filters_mut()
        .set_draft_field(FilterField::ToDate(date(2024, 1, 31)));
    c.apply(UserAction::ApplyFilters).unwrap();
    c.apply(UserAction::SortBy(SortColumn::Amount)).unwrap();
    assert_eq!(c.page().index(), 0);
    assert_eq!(c.page().size(), 25);

    let rows = serde_json::to_value(c.rows_query()).unwrap();
    assert_eq!(
        rows,
        json!({
            "kind": "expense",
            "from": "2024-01-01",
            "to": "2024-01-31",
            "order_by": "amount",
            "order_dir": "desc",
            "page": 1,
            "page_size": 25
        })
    );

    let summary = serde_json::to_value(c.summary_query()).unwrap();
    assert_eq!(
        summary,
        json!({"kind": "expense", "from": "2024-01-01", "to": "2024-01-31"})
    );
}

#[test]
fn removed_sort_drops_order_params() {
    let mut c = coordinator();
    for _ in 0..3 {
        c.apply(UserAction::SortBy(SortColumn::Currency)).unwrap();
    }
    let rows = serde_json::to_value(c.rows_query()).unwrap();
    assert_eq!(rows, json!({"page": 1, "page_size": 25}));
}
