use api_types::{
    MessageResponse,
    auth::{AuthResponse, User},
    lookup::ExchangeRates,
    summary::SummaryResponse,
    transaction::{Transaction, TransactionPage},
};
use engine::Ticket;

use crate::client::ClientError;

use super::AuthScreen;

/// Completion of a background request, delivered to the event loop.
#[derive(Debug)]
pub enum AppEvent {
    Rows {
        ticket: Ticket,
        result: Result<TransactionPage, ClientError>,
    },
    Summary {
        ticket: Ticket,
        result: Result<SummaryResponse, ClientError>,
    },
    /// Login or registration finished.
    SignedIn(Result<AuthResponse, ClientError>),
    /// Forgot/reset password or email verification finished.
    AuthMessage {
        screen: AuthScreen,
        result: Result<MessageResponse, ClientError>,
    },
    ProfileSaved(Result<User, ClientError>),
    Types(Result<Vec<String>, ClientError>),
    Currencies(Result<Vec<String>, ClientError>),
    Rates(Result<ExchangeRates, ClientError>),
    /// Create or update finished; `updated` is fixed when the request starts.
    RecordSaved {
        updated: bool,
        result: Result<Transaction, ClientError>,
    },
    RecordDeleted(Result<(), ClientError>),
    /// Server-side logout; the local session is already gone.
    LoggedOut(Result<(), ClientError>),
}
