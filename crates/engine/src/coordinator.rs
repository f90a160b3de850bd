//! Decides which requests a user action re-issues and which completions may
//! be applied.
//!
//! Rows reflect filters, sort and pagination together; summary totals
//! reflect filters only. Each slot keeps its own generation counter: a
//! completion is applied only when its [`Ticket`] is the newest one issued
//! for that slot, so the last request by initiation order wins regardless of
//! the order responses arrive in.

use api_types::{
    summary::{SummaryQuery, SummaryResponse},
    transaction::{RowsQuery, SortColumn, Transaction, TransactionPage},
};

use crate::{
    FilterSpec, FilterState, PageSpec, ResultEngine, SortSpec, SortState, SummaryTotals,
};

/// Generation stamp of an issued request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Generation(u64);

impl Generation {
    fn next(&mut self) -> Ticket {
        self.0 += 1;
        Ticket(self.0)
    }

    fn is_current(self, ticket: Ticket) -> bool {
        self.0 == ticket.0
    }
}

#[derive(Clone, Debug)]
pub enum UserAction {
    /// Commit the draft filters.
    ApplyFilters,
    ClearFilters,
    SortBy(SortColumn),
    SetPage(u32),
    SetPageSize(u32),
    Mount,
    /// A record was created, edited or deleted.
    RecordsChanged,
    Refresh,
    /// Target currency for converted summary totals.
    SetDisplayCurrency(Option<String>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowsRequest {
    pub ticket: Ticket,
    pub query: RowsQuery,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryRequest {
    pub ticket: Ticket,
    pub query: SummaryQuery,
}

/// Requests to issue after an action. Both are independent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dispatch {
    pub rows: Option<RowsRequest>,
    pub summary: Option<SummaryRequest>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

impl LoadStatus {
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RowsSlot {
    pub items: Vec<Transaction>,
    pub total: u64,
    pub status: LoadStatus,
}

#[derive(Clone, Debug, Default)]
pub struct SummarySlot {
    pub totals: SummaryTotals,
    pub status: LoadStatus,
}

#[derive(Debug, Default)]
pub struct ListQueryCoordinator {
    sort: SortState,
    filters: FilterState,
    page: PageSpec,
    display_currency: Option<String>,
    rows_generation: Generation,
    summary_generation: Generation,
    rows: RowsSlot,
    summary: SummarySlot,
}

impl ListQueryCoordinator {
    pub fn new(page_size: u32, initial_sort: SortSpec) -> ResultEngine<Self> {
        Ok(Self {
            sort: SortState::new(initial_sort),
            page: PageSpec::new(0, page_size)?,
            ..Self::default()
        })
    }

    pub fn sort(&self) -> SortSpec {
        self.sort.spec()
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Draft edits go through here; they never trigger a request by themselves.
    pub fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    pub fn page(&self) -> PageSpec {
        self.page
    }

    pub fn page_count(&self) -> u32 {
        self.page.page_count(self.rows.total)
    }

    pub fn display_currency(&self) -> Option<&str> {
        self.display_currency.as_deref()
    }

    pub fn rows(&self) -> &RowsSlot {
        &self.rows
    }

    pub fn summary(&self) -> &SummarySlot {
        &self.summary
    }

    /// Applies `action` and returns the requests it invalidated.
    ///
    /// On a validation error nothing changes and nothing is dispatched.
    pub fn apply(&mut self, action: UserAction) -> ResultEngine<Dispatch> {
        let (rows, summary) = match action {
            UserAction::ApplyFilters => {
                self.filters.commit()?;
                self.page = self.page.with_index(0);
                (true, true)
            }
            UserAction::ClearFilters => {
                self.filters.clear();
                self.page = self.page.with_index(0);
                (true, true)
            }
            UserAction::SortBy(column) => {
                self.sort.cycle(column);
                self.page = self.page.with_index(0);
                (true, false)
            }
            UserAction::SetPage(index) => {
                self.page = self.page.with_index(index);
                (true, false)
            }
            UserAction::SetPageSize(size) => {
                self.page = self.page.with_size(size)?;
                (true, false)
            }
            UserAction::Mount | UserAction::RecordsChanged | UserAction::Refresh => (true, true),
            UserAction::SetDisplayCurrency(currency) => {
                self.display_currency = currency
                    .map(|c| c.trim().to_ascii_uppercase())
                    .filter(|c| !c.is_empty());
                (false, true)
            }
        };

        let mut dispatch = Dispatch::default();
        if rows {
            dispatch.rows = Some(self.issue_rows());
        }
        if summary {
            dispatch.summary = Some(self.issue_summary());
        }
        Ok(dispatch)
    }

    pub fn rows_query(&self) -> RowsQuery {
        build_rows_query(self.filters.active(), self.sort.spec(), self.page)
    }

    pub fn summary_query(&self) -> SummaryQuery {
        build_summary_query(self.filters.active(), self.display_currency.clone())
    }

    fn issue_rows(&mut self) -> RowsRequest {
        self.rows.status = LoadStatus::Loading;
        RowsRequest {
            ticket: self.rows_generation.next(),
            query: self.rows_query(),
        }
    }

    fn issue_summary(&mut self) -> SummaryRequest {
        self.summary.status = LoadStatus::Loading;
        SummaryRequest {
            ticket: self.summary_generation.next(),
            query: self.summary_query(),
        }
    }

    /// Applies a rows completion. Returns `false` when `ticket` was
    /// superseded and the result was dropped.
    ///
    /// A failure empties the rows but keeps page, sort and filters.
    pub fn complete_rows<E: ToString>(
        &mut self,
        ticket: Ticket,
        result: Result<TransactionPage, E>,
    ) -> bool {
        if !self.rows_generation.is_current(ticket) {
            return false;
        }
        match result {
            Ok(page) => {
                self.rows.items = page.data;
                self.rows.total = page.total;
                self.rows.status = LoadStatus::Loaded;
            }
            Err(err) => {
                self.rows.items.clear();
                self.rows.total = 0;
                self.rows.status = LoadStatus::Failed(err.to_string());
            }
        }
        true
    }

    /// Applies a summary completion. A failure resets the totals instead of
    /// keeping stale numbers.
    pub fn complete_summary<E: ToString>(
        &mut self,
        ticket: Ticket,
        result: Result<SummaryResponse, E>,
    ) -> bool {
        if !self.summary_generation.is_current(ticket) {
            return false;
        }
        match result {
            Ok(res) => {
                self.summary.totals = SummaryTotals::from(res);
                self.summary.status = LoadStatus::Loaded;
            }
            Err(err) => {
                self.summary.totals = SummaryTotals::Empty;
                self.summary.status = LoadStatus::Failed(err.to_string());
            }
        }
        true
    }

    /// Forgets loaded data, e.g. after logout. In-flight tickets become stale.
    pub fn reset_results(&mut self) {
        self.rows_generation.next();
        self.summary_generation.next();
        self.rows = RowsSlot::default();
        self.summary = SummarySlot::default();
    }
}

pub fn build_rows_query(filters: &FilterSpec, sort: SortSpec, page: PageSpec) -> RowsQuery {
    RowsQuery {
        filters: filters.to_params(),
        order_by: sort.column(),
        order_dir: sort.direction(),
        page: page.server_page(),
        page_size: page.size(),
    }
}

pub fn build_summary_query(filters: &FilterSpec, convert_to: Option<String>) -> SummaryQuery {
    SummaryQuery {
        filters: filters.to_params(),
        group_by: filters.group_by(),
        convert_to,
    }
}
