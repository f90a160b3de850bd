//! Tri-state column sort.
//!
//! Repeated activation of the same column walks `Desc -> Asc -> none`;
//! activating a different column always restarts at `Desc`.

use api_types::transaction::{SortColumn, SortDirection};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveSort {
    pub column: SortColumn,
    pub direction: SortDirection,
}

/// A column is present iff a direction is present.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SortSpec(Option<ActiveSort>);

impl SortSpec {
    pub const NONE: SortSpec = SortSpec(None);

    #[must_use]
    pub const fn by(column: SortColumn, direction: SortDirection) -> Self {
        Self(Some(ActiveSort { column, direction }))
    }

    #[must_use]
    pub fn column(self) -> Option<SortColumn> {
        self.0.map(|s| s.column)
    }

    #[must_use]
    pub fn direction(self) -> Option<SortDirection> {
        self.0.map(|s| s.direction)
    }

    #[must_use]
    pub fn active(self) -> Option<ActiveSort> {
        self.0
    }

    /// Direction applied to `column`, if it is the sorted one.
    #[must_use]
    pub fn direction_of(self, column: SortColumn) -> Option<SortDirection> {
        self.0
            .filter(|s| s.column == column)
            .map(|s| s.direction)
    }

    #[must_use]
    pub fn cycle(self, column: SortColumn) -> Self {
        match self.0 {
            Some(ActiveSort {
                column: current,
                direction: SortDirection::Desc,
            }) if current == column => Self::by(column, SortDirection::Asc),
            Some(ActiveSort {
                column: current,
                direction: SortDirection::Asc,
            }) if current == column => Self::NONE,
            _ => Self::by(column, SortDirection::Desc),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SortState {
    spec: SortSpec,
}

impl SortState {
    pub fn new(initial: SortSpec) -> Self {
        Self { spec: initial }
    }

    pub fn spec(&self) -> SortSpec {
        self.spec
    }

    /// Replaces the spec wholesale and returns the new value.
    pub fn cycle(&mut self, column: SortColumn) -> SortSpec {
        self.spec = self.spec.cycle(column);
        self.spec
    }
}
