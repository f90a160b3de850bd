use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Error body returned by the API on non-2xx responses.
///
/// Some endpoints answer with `message`, others with `error`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn into_message(self) -> Option<String> {
        self.message.or(self.error)
    }
}

/// Plain `{message}` acknowledgement (password reset, email verification).
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

pub mod auth {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct User {
        pub id: u64,
        pub name: String,
        pub email: String,
        #[serde(default)]
        pub email_verified_at: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Register {
        pub name: String,
        pub email: String,
        pub password: String,
        pub password_confirmation: String,
    }

    /// Response of `login` and `register`.
    ///
    /// The token is opaque; it is only echoed back as a bearer credential.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct AuthResponse {
        pub token: String,
        pub user: User,
    }

    /// Partial profile update. Absent fields are left untouched server side.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ProfileUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub email: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub password: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub password_confirmation: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ForgotPassword {
        pub email: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ResetPassword {
        pub token: String,
        pub email: String,
        pub password: String,
        pub password_confirmation: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VerifyEmail {
        pub code: String,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Expense,
        Income,
    }

    impl TransactionKind {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Expense => "expense",
                Self::Income => "income",
            }
        }
    }

    /// Columns the server accepts in `order_by`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SortColumn {
        Date,
        Kind,
        Type,
        Resource,
        Amount,
        Currency,
    }

    impl SortColumn {
        /// Column order as shown in the transaction table.
        pub const ALL: [SortColumn; 6] = [
            Self::Date,
            Self::Kind,
            Self::Type,
            Self::Resource,
            Self::Amount,
            Self::Currency,
        ];

        pub fn as_str(self) -> &'static str {
            match self {
                Self::Date => "date",
                Self::Kind => "kind",
                Self::Type => "type",
                Self::Resource => "resource",
                Self::Amount => "amount",
                Self::Currency => "currency",
            }
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SortDirection {
        Asc,
        Desc,
    }

    impl SortDirection {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Asc => "asc",
                Self::Desc => "desc",
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Transaction {
        pub id: u64,
        pub kind: TransactionKind,
        #[serde(rename = "type")]
        pub tx_type: String,
        pub amount: Decimal,
        pub currency: String,
        #[serde(default)]
        pub resource: Option<String>,
        /// Calendar day, `YYYY-MM-DD`.
        pub date: NaiveDate,
        #[serde(default)]
        pub description: Option<String>,
    }

    /// Body of create and update requests.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct TransactionDraft {
        pub kind: TransactionKind,
        #[serde(rename = "type")]
        pub tx_type: String,
        pub amount: Decimal,
        pub currency: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub resource: Option<String>,
        pub date: NaiveDate,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
    }

    /// Filter fields shared by the rows and summary queries.
    ///
    /// Absent fields are never serialized, so an empty filter and no filter
    /// produce the same request.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FilterParams {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub kind: Option<TransactionKind>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub types: Option<Vec<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub currencies: Option<Vec<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub from: Option<NaiveDate>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub to: Option<NaiveDate>,
    }

    impl FilterParams {
        /// Query-string pairs. Lists are sent as repeated `name[]` keys.
        pub fn query_pairs(&self) -> Vec<(String, String)> {
            let mut pairs = Vec::new();
            if let Some(kind) = self.kind {
                pairs.push(("kind".to_string(), kind.as_str().to_string()));
            }
            for ty in self.types.iter().flatten() {
                pairs.push(("types[]".to_string(), ty.clone()));
            }
            for currency in self.currencies.iter().flatten() {
                pairs.push(("currencies[]".to_string(), currency.clone()));
            }
            if let Some(from) = self.from {
                pairs.push(("from".to_string(), from.format("%Y-%m-%d").to_string()));
            }
            if let Some(to) = self.to {
                pairs.push(("to".to_string(), to.format("%Y-%m-%d").to_string()));
            }
            pairs
        }
    }

    /// Paged, sorted, filtered listing request.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct RowsQuery {
        #[serde(flatten)]
        pub filters: FilterParams,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub order_by: Option<SortColumn>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub order_dir: Option<SortDirection>,
        /// 1-indexed.
        pub page: u32,
        pub page_size: u32,
    }

    impl RowsQuery {
        pub fn query_pairs(&self) -> Vec<(String, String)> {
            let mut pairs = self.filters.query_pairs();
            if let (Some(column), Some(direction)) = (self.order_by, self.order_dir) {
                pairs.push(("order_by".to_string(), column.as_str().to_string()));
                pairs.push(("order_dir".to_string(), direction.as_str().to_string()));
            }
            pairs.push(("page".to_string(), self.page.to_string()));
            pairs.push(("page_size".to_string(), self.page_size.to_string()));
            pairs
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionPage {
        pub data: Vec<Transaction>,
        pub total: u64,
    }
}

pub mod summary {
    use super::*;
    use crate::transaction::FilterParams;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum GroupBy {
        Day,
        Week,
        Month,
        Year,
    }

    impl GroupBy {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Day => "day",
                Self::Week => "week",
                Self::Month => "month",
                Self::Year => "year",
            }
        }
    }

    /// Aggregate request. Never carries sort or pagination.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SummaryQuery {
        #[serde(flatten)]
        pub filters: FilterParams,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub group_by: Option<GroupBy>,
        /// Ask the server for a single total converted into this currency.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub convert_to: Option<String>,
    }

    impl SummaryQuery {
        pub fn query_pairs(&self) -> Vec<(String, String)> {
            let mut pairs = self.filters.query_pairs();
            if let Some(group_by) = self.group_by {
                pairs.push(("group_by".to_string(), group_by.as_str().to_string()));
            }
            if let Some(currency) = &self.convert_to {
                pairs.push(("convert_to".to_string(), currency.clone()));
            }
            pairs
        }
    }

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CurrencyTotals {
        pub total_income: Decimal,
        pub total_expense: Decimal,
        pub total_balance: Decimal,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SummaryGroup {
        pub key: String,
        pub total_income: Decimal,
        pub total_expense: Decimal,
    }

    /// Summary payload.
    ///
    /// Multi-currency answers fill `by_currency`; converted (single-currency)
    /// answers fill `currency` and the flat `total_*` fields instead.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct SummaryResponse {
        #[serde(default)]
        pub income_count: u64,
        #[serde(default)]
        pub expense_count: u64,
        #[serde(default)]
        pub by_currency: BTreeMap<String, CurrencyTotals>,
        #[serde(default)]
        pub currency: Option<String>,
        #[serde(default)]
        pub total_income: Option<Decimal>,
        #[serde(default)]
        pub total_expense: Option<Decimal>,
        #[serde(default)]
        pub total_balance: Option<Decimal>,
        #[serde(default)]
        pub groups: Vec<SummaryGroup>,
    }
}

pub mod lookup {
    use super::*;

    /// Pre-computed rates relative to `base`.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ExchangeRates {
        pub base: String,
        #[serde(default)]
        pub rates: BTreeMap<String, Decimal>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        summary::{GroupBy, SummaryQuery, SummaryResponse},
        transaction::{FilterParams, RowsQuery, SortColumn, SortDirection, TransactionKind},
    };

    #[test]
    fn rows_query_repeats_list_params() {
        let query = RowsQuery {
            filters: FilterParams {
                kind: Some(TransactionKind::Income),
                types: Some(vec!["food".to_string(), "rent".to_string()]),
                currencies: Some(vec!["EUR".to_string()]),
                from: None,
                to: None,
            },
            order_by: Some(SortColumn::Date),
            order_dir: Some(SortDirection::Asc),
            page: 2,
            page_size: 10,
        };

        let pairs = query.query_pairs();
        let pairs: Vec<(&str, &str)> = pairs
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("kind", "income"),
                ("types[]", "food"),
                ("types[]", "rent"),
                ("currencies[]", "EUR"),
                ("order_by", "date"),
                ("order_dir", "asc"),
                ("page", "2"),
                ("page_size", "10"),
            ]
        );
    }

    #[test]
    fn dates_are_plain_calendar_days() {
        let query = SummaryQuery {
            filters: FilterParams {
                from: NaiveDate::from_ymd_opt(2024, 3, 1),
                to: NaiveDate::from_ymd_opt(2024, 3, 31),
                ..FilterParams::default()
            },
            group_by: Some(GroupBy::Week),
            convert_to: None,
        };

        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"from": "2024-03-01", "to": "2024-03-31", "group_by": "week"})
        );
        assert_eq!(
            query.query_pairs().last().map(|(k, v)| (k.as_str(), v.as_str())),
            Some(("group_by", "week"))
        );
    }

    #[test]
    fn summary_response_accepts_numbers_and_strings() {
        let body = r#"{
            "income_count": 2,
            "expense_count": 5,
            "by_currency": {
                "EUR": {"total_income": 1200.5, "total_expense": "300.25", "total_balance": 900.25}
            }
        }"#;
        let summary: SummaryResponse = serde_json::from_str(body).unwrap();
        let eur = &summary.by_currency["EUR"];
        assert_eq!(eur.total_expense, Decimal::new(30025, 2));
        assert_eq!(eur.total_balance, Decimal::new(90025, 2));
        assert!(summary.currency.is_none());
        assert!(summary.groups.is_empty());
    }

    #[test]
    fn error_response_prefers_message() {
        let body: ErrorResponse =
            serde_json::from_str(r#"{"message":"invalid","error":"other"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("invalid"));
        let body: ErrorResponse = serde_json::from_str(r#"{"error":"denied"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("denied"));
    }
}
