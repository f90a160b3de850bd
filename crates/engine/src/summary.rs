use std::collections::BTreeMap;

use api_types::summary::{CurrencyTotals, SummaryGroup, SummaryResponse};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counts {
    pub income: u64,
    pub expense: u64,
}

/// How the summary view presents totals.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SummaryTotals {
    #[default]
    Empty,
    /// One currency, either because every matching record shares it or
    /// because the server converted the totals.
    Single {
        counts: Counts,
        currency: String,
        totals: CurrencyTotals,
        groups: Vec<SummaryGroup>,
    },
    /// Per-currency subtotals, no converted total.
    Breakdown {
        counts: Counts,
        per_currency: BTreeMap<String, CurrencyTotals>,
        groups: Vec<SummaryGroup>,
    },
}

impl SummaryTotals {
    pub fn counts(&self) -> Counts {
        match self {
            Self::Empty => Counts::default(),
            Self::Single { counts, .. } | Self::Breakdown { counts, .. } => *counts,
        }
    }

    pub fn groups(&self) -> &[SummaryGroup] {
        match self {
            Self::Empty => &[],
            Self::Single { groups, .. } | Self::Breakdown { groups, .. } => groups,
        }
    }
}

impl From<SummaryResponse> for SummaryTotals {
    fn from(res: SummaryResponse) -> Self {
        let counts = Counts {
            income: res.income_count,
            expense: res.expense_count,
        };

        let flat = [res.total_income, res.total_expense, res.total_balance]
            .iter()
            .any(Option::is_some);
        let flat_totals = CurrencyTotals {
            total_income: res.total_income.unwrap_or_default(),
            total_expense: res.total_expense.unwrap_or_default(),
            total_balance: res.total_balance.unwrap_or_default(),
        };

        if let Some(currency) = res.currency {
            return Self::Single {
                counts,
                currency,
                totals: flat_totals,
                groups: res.groups,
            };
        }

        let mut per_currency = res.by_currency;
        match per_currency.len() {
            // Flat totals or bare counts without a currency code.
            0 if flat || counts != Counts::default() => Self::Single {
                counts,
                currency: String::new(),
                totals: flat_totals,
                groups: res.groups,
            },
            0 => Self::Empty,
            1 => {
                let Some((currency, totals)) = per_currency.pop_first() else {
                    return Self::Empty;
                };
                Self::Single {
                    counts,
                    currency,
                    totals,
                    groups: res.groups,
                }
            }
            _ => Self::Breakdown {
                counts,
                per_currency,
                groups: res.groups,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn totals(income: i64, expense: i64) -> CurrencyTotals {
        CurrencyTotals {
            total_income: Decimal::from(income),
            total_expense: Decimal::from(expense),
            total_balance: Decimal::from(income - expense),
        }
    }

    #[test]
    fn no_currencies_is_empty() {
        let summary = SummaryTotals::from(SummaryResponse::default());
        assert_eq!(summary, SummaryTotals::Empty);
        assert_eq!(summary.counts(), Counts::default());
    }

    #[test]
    fn counts_survive_without_a_currency() {
        let res = SummaryResponse {
            income_count: 2,
            expense_count: 3,
            total_income: Some(Decimal::from(50)),
            ..SummaryResponse::default()
        };
        let summary = SummaryTotals::from(res);
        assert_eq!(summary.counts(), Counts { income: 2, expense: 3 });
        let SummaryTotals::Single { currency, totals, .. } = summary else {
            panic!("expected single");
        };
        assert!(currency.is_empty());
        assert_eq!(totals.total_income, Decimal::from(50));
        assert_eq!(totals.total_expense, Decimal::ZERO);

        let bare = SummaryTotals::from(SummaryResponse {
            expense_count: 1,
            ..SummaryResponse::default()
        });
        assert_eq!(bare.counts().expense, 1);
    }

    #[test]
    fn one_currency_is_single() {
        let res = SummaryResponse {
            income_count: 1,
            expense_count: 3,
            by_currency: BTreeMap::from([("EUR".to_string(), totals(100, 40))]),
            ..SummaryResponse::default()
        };
        let SummaryTotals::Single {
            counts,
            currency,
            totals: t,
            ..
        } = SummaryTotals::from(res)
        else {
            panic!("expected single");
        };
        assert_eq!(counts, Counts { income: 1, expense: 3 });
        assert_eq!(currency, "EUR");
        assert_eq!(t.total_balance, Decimal::from(60));
    }

    #[test]
    fn several_currencies_is_breakdown() {
        let res = SummaryResponse {
            income_count: 2,
            expense_count: 2,
            by_currency: BTreeMap::from([
                ("EUR".to_string(), totals(100, 40)),
                ("USD".to_string(), totals(10, 20)),
            ]),
            ..SummaryResponse::default()
        };
        let summary = SummaryTotals::from(res);
        let SummaryTotals::Breakdown { per_currency, .. } = &summary else {
            panic!("expected breakdown");
        };
        assert_eq!(per_currency.len(), 2);
        assert_eq!(summary.counts().expense, 2);
    }

    #[test]
    fn converted_answer_is_single_even_with_breakdown() {
        let res = SummaryResponse {
            income_count: 1,
            expense_count: 1,
            by_currency: BTreeMap::from([
                ("EUR".to_string(), totals(100, 40)),
                ("USD".to_string(), totals(10, 20)),
            ]),
            currency: Some("EUR".to_string()),
            total_income: Some(Decimal::from(109)),
            total_expense: Some(Decimal::from(58)),
            total_balance: Some(Decimal::from(51)),
            groups: Vec::new(),
        };
        let SummaryTotals::Single { currency, totals, .. } = SummaryTotals::from(res) else {
            panic!("expected single");
        };
        assert_eq!(currency, "EUR");
        assert_eq!(totals.total_balance, Decimal::from(51));
    }
}
