//! Client-side state for the Tally finance client.
//!
//! Nothing in here performs I/O. The coordinator decides *which* requests must
//! be issued and validates *which* completions may be applied; the caller
//! (the terminal client) owns the transport.

pub use auth::{AuthEvent, AuthState, Session};
pub use coordinator::{
    Dispatch, ListQueryCoordinator, LoadStatus, RowsRequest, RowsSlot, SummaryRequest,
    SummarySlot, Ticket, UserAction,
};
pub use error::EngineError;
pub use filter::{FilterField, FilterSpec, FilterState};
pub use page::{PAGE_SIZES, PageSpec};
pub use sort::{ActiveSort, SortSpec, SortState};
pub use summary::{Counts, SummaryTotals};

pub mod money;

mod auth;
mod coordinator;
mod error;
mod filter;
mod page;
mod sort;
mod summary;

type ResultEngine<T> = Result<T, EngineError>;
