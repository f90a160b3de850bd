//! Draft and active transaction filters.
//!
//! Every field of a [`FilterSpec`] is either absent or non-empty. Setting a
//! field to an empty value removes it, so "no filter" and "empty filter" can
//! not be told apart once they leave this module.

use std::collections::BTreeSet;

use api_types::{
    summary::GroupBy,
    transaction::{FilterParams, TransactionKind},
};
use chrono::NaiveDate;

use crate::{EngineError, ResultEngine};

/// One editable filter field with its new value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterField {
    Kind(Option<TransactionKind>),
    Types(Vec<String>),
    Currencies(Vec<String>),
    FromDate(Option<NaiveDate>),
    ToDate(Option<NaiveDate>),
    GroupBy(Option<GroupBy>),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSpec {
    kind: Option<TransactionKind>,
    types: Option<BTreeSet<String>>,
    currencies: Option<BTreeSet<String>>,
    from_date: Option<NaiveDate>,
    to_date: Option<NaiveDate>,
    group_by: Option<GroupBy>,
}

impl FilterSpec {
    pub fn kind(&self) -> Option<TransactionKind> {
        self.kind
    }

    pub fn types(&self) -> Option<&BTreeSet<String>> {
        self.types.as_ref()
    }

    pub fn currencies(&self) -> Option<&BTreeSet<String>> {
        self.currencies.as_ref()
    }

    pub fn from_date(&self) -> Option<NaiveDate> {
        self.from_date
    }

    pub fn to_date(&self) -> Option<NaiveDate> {
        self.to_date
    }

    pub fn group_by(&self) -> Option<GroupBy> {
        self.group_by
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.types.is_none()
            && self.currencies.is_none()
            && self.from_date.is_none()
            && self.to_date.is_none()
            && self.group_by.is_none()
    }

    pub fn set(&mut self, field: FilterField) {
        match field {
            FilterField::Kind(kind) => self.kind = kind,
            FilterField::Types(values) => self.types = normalize_set(values, |v| v.to_string()),
            FilterField::Currencies(values) => {
                self.currencies = normalize_set(values, |v| v.to_ascii_uppercase())
            }
            FilterField::FromDate(date) => self.from_date = date,
            FilterField::ToDate(date) => self.to_date = date,
            FilterField::GroupBy(group_by) => self.group_by = group_by,
        }
    }

    /// Builder-style [`FilterSpec::set`].
    #[must_use]
    pub fn with(mut self, field: FilterField) -> Self {
        self.set(field);
        self
    }

    pub fn validate(&self) -> ResultEngine<()> {
        if let (Some(from), Some(to)) = (self.from_date, self.to_date)
            && from > to
        {
            return Err(EngineError::Validation(format!(
                "date range starts after it ends ({from} > {to})"
            )));
        }
        Ok(())
    }

    /// Wire parameters shared by the rows and summary requests.
    pub fn to_params(&self) -> FilterParams {
        FilterParams {
            kind: self.kind,
            types: self.types.as_ref().map(|s| s.iter().cloned().collect()),
            currencies: self.currencies.as_ref().map(|s| s.iter().cloned().collect()),
            from: self.from_date,
            to: self.to_date,
        }
    }
}

fn normalize_set(values: Vec<String>, map: impl Fn(&str) -> String) -> Option<BTreeSet<String>> {
    let set: BTreeSet<String> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(map)
        .collect();
    (!set.is_empty()).then_some(set)
}

/// Filters being edited (`draft`) and filters in effect (`active`).
#[derive(Clone, Debug, Default)]
pub struct FilterState {
    draft: FilterSpec,
    active: FilterSpec,
}

impl FilterState {
    pub fn draft(&self) -> &FilterSpec {
        &self.draft
    }

    pub fn active(&self) -> &FilterSpec {
        &self.active
    }

    pub fn set_draft_field(&mut self, field: FilterField) {
        self.draft.set(field);
    }

    /// Copies the draft into the active spec.
    ///
    /// On a validation error the active spec is left untouched.
    pub fn commit(&mut self) -> ResultEngine<&FilterSpec> {
        self.draft.validate()?;
        self.active = self.draft.clone();
        Ok(&self.active)
    }

    pub fn clear(&mut self) {
        self.draft = FilterSpec::default();
        self.active = FilterSpec::default();
    }

    /// Drops uncommitted edits.
    pub fn revert_draft(&mut self) {
        self.draft = self.active.clone();
    }

    pub fn has_active_filters(&self) -> bool {
        !self.active.is_empty()
    }
}
