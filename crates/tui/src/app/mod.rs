use std::{future::Future, time::Duration};

use crossterm::event::{self, Event, KeyEvent};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use api_types::lookup::ExchangeRates;
use engine::{AuthEvent, AuthState, Dispatch, EngineError, ListQueryCoordinator, SortSpec, UserAction};

use crate::{
    client::{Client, ClientError},
    config::AppConfig,
    error::{AppError, Result},
    session_store::SessionStore,
    ui::{self, keymap::AppAction},
};

pub use events::AppEvent;
pub use forms::{Form, MessageLevel};

mod auth;
mod events;
mod forms;
mod settings;
mod transactions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScreen {
    Login,
    Register,
    ForgotPassword,
    ResetPassword,
    VerifyEmail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Auth(AuthScreen),
    Main,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Transactions,
    Summary,
    Settings,
}

impl Section {
    pub const ALL: [Section; 3] = [Self::Transactions, Self::Summary, Self::Settings];

    pub fn label(self) -> &'static str {
        match self {
            Self::Transactions => "Transactions",
            Self::Summary => "Summary",
            Self::Settings => "Settings",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Transactions => Self::Summary,
            Self::Summary => Self::Settings,
            Self::Settings => Self::Transactions,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthForms {
    pub login: Form,
    pub register: Form,
    pub forgot: Form,
    pub reset: Form,
    pub verify: Form,
}

impl Default for AuthForms {
    fn default() -> Self {
        Self {
            login: Form::new("login", &["Email", "Password"]).masked(&[1]),
            register: Form::new("register", &["Name", "Email", "Password", "Confirm"])
                .masked(&[2, 3]),
            forgot: Form::new("forgot password", &["Email"]),
            reset: Form::new("reset password", &["Token", "Email", "Password", "Confirm"])
                .masked(&[2, 3]),
            verify: Form::new("verify email", &["Code"]),
        }
    }
}

impl AuthForms {
    pub fn form(&self, screen: AuthScreen) -> &Form {
        match screen {
            AuthScreen::Login => &self.login,
            AuthScreen::Register => &self.register,
            AuthScreen::ForgotPassword => &self.forgot,
            AuthScreen::ResetPassword => &self.reset,
            AuthScreen::VerifyEmail => &self.verify,
        }
    }

    pub fn form_mut(&mut self, screen: AuthScreen) -> &mut Form {
        match screen {
            AuthScreen::Login => &mut self.login,
            AuthScreen::Register => &mut self.register,
            AuthScreen::ForgotPassword => &mut self.forgot,
            AuthScreen::ResetPassword => &mut self.reset,
            AuthScreen::VerifyEmail => &mut self.verify,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionsMode {
    List,
    Filter,
    Record,
    ConfirmDelete,
}

#[derive(Debug)]
pub struct TransactionsUi {
    pub mode: TransactionsMode,
    pub selected: usize,
    pub filter_form: Form,
    pub record_form: Form,
    /// Record being edited; `None` while creating.
    pub editing: Option<u64>,
    pub pending_delete: Option<u64>,
}

impl Default for TransactionsUi {
    fn default() -> Self {
        Self {
            mode: TransactionsMode::List,
            selected: 0,
            filter_form: Form::new("filters", &crate::parsing::FILTER_LABELS),
            record_form: Form::new("transaction", &crate::parsing::RECORD_LABELS),
            editing: None,
            pending_delete: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsMode {
    View,
    EditProfile,
}

#[derive(Debug)]
pub struct SettingsUi {
    pub mode: SettingsMode,
    pub profile_form: Form,
}

impl Default for SettingsUi {
    fn default() -> Self {
        Self {
            mode: SettingsMode::View,
            profile_form: Form::new("profile", &["Name", "Email", "New password", "Confirm"])
                .masked(&[2, 3]),
        }
    }
}

/// Fetch-once option lists. Empty when the lookup failed.
#[derive(Debug, Default)]
pub struct Lookups {
    pub types: Vec<String>,
    pub currencies: Vec<String>,
    pub rates: ExchangeRates,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub level: ToastLevel,
    pub message: String,
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub auth: AuthState,
    pub auth_forms: AuthForms,
    pub section: Section,
    pub list: ListQueryCoordinator,
    pub transactions: TransactionsUi,
    pub settings: SettingsUi,
    pub lookups: Lookups,
    pub toast: Option<ToastState>,
    pub base_url: String,
}

impl AppState {
    /// True when no form or prompt owns the keyboard.
    pub fn is_idle(&self) -> bool {
        self.transactions.mode == TransactionsMode::List
            && self.settings.mode == SettingsMode::View
    }

    pub fn toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(ToastState {
            level,
            message: message.into(),
        });
    }
}

pub struct App {
    client: Client,
    store: SessionStore,
    pub state: AppState,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::new(&config.base_url)?;
        let store = SessionStore::new(&config.session_path);
        let session = match store.load() {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!("ignoring unreadable session file: {err}");
                None
            }
        };
        let list = ListQueryCoordinator::new(config.page_size, SortSpec::NONE)?;
        let (events_tx, events_rx) = unbounded_channel();

        let state = AppState {
            screen: Screen::Auth(AuthScreen::Login),
            auth: AuthState::restore(session),
            auth_forms: AuthForms::default(),
            section: Section::Transactions,
            list,
            transactions: TransactionsUi::default(),
            settings: SettingsUi::default(),
            lookups: Lookups::default(),
            toast: None,
            base_url: config.base_url.clone(),
        };

        Ok(Self {
            client,
            store,
            state,
            events_tx,
            events_rx,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        if self.state.auth.is_authenticated() {
            tracing::info!("restored stored session");
            self.enter_main();
        }

        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(50);

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }

            while let Ok(event) = self.events_rx.try_recv() {
                self.handle_event(event);
            }
            tokio::task::yield_now().await;
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let action = ui::keymap::map_key(key);
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }
        if action != AppAction::None {
            self.state.toast = None;
        }

        match self.state.screen {
            Screen::Auth(screen) => self.handle_auth_key(screen, action),
            Screen::Main => self.handle_main_key(action),
        }
    }

    fn handle_main_key(&mut self, action: AppAction) {
        if self.state.is_idle() {
            match action {
                AppAction::NextField => {
                    self.state.section = self.state.section.next();
                    return;
                }
                AppAction::Input('q') => {
                    self.should_quit = true;
                    return;
                }
                _ => {}
            }
        }

        match self.state.section {
            Section::Transactions => self.handle_transactions_key(action),
            Section::Summary => self.handle_summary_key(action),
            Section::Settings => self.handle_settings_key(action),
        }
    }

    fn token(&self) -> Option<String> {
        self.state.auth.token().map(str::to_string)
    }

    /// Runs `request` on the runtime and feeds its event back to the loop.
    fn spawn<F, Fut>(&self, request: F)
    where
        F: FnOnce(Client) -> Fut,
        Fut: Future<Output = AppEvent> + Send + 'static,
    {
        let fut = request(self.client.clone());
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let event = fut.await;
            if tx.send(event).is_err() {
                tracing::debug!("event loop closed, dropping completion");
            }
        });
    }

    fn enter_main(&mut self) {
        self.state.screen = Screen::Main;
        self.state.section = Section::Transactions;
        self.state.transactions.selected = 0;
        if let Err(err) = self.dispatch(UserAction::Mount) {
            self.state.toast(ToastLevel::Error, err.to_string());
        }
        self.load_lookups();
    }

    fn load_lookups(&self) {
        let Some(token) = self.token() else {
            return;
        };
        let t = token.clone();
        self.spawn(move |client| async move {
            AppEvent::Types(client.transaction_types(&t).await)
        });
        let t = token.clone();
        self.spawn(move |client| async move { AppEvent::Currencies(client.currencies(&t).await) });
        self.spawn(move |client| async move {
            AppEvent::Rates(client.exchange_rates(&token).await)
        });
    }

    /// Feeds `action` to the coordinator and issues whatever it invalidated.
    fn dispatch(&mut self, action: UserAction) -> std::result::Result<(), EngineError> {
        tracing::debug!(?action, "list action");
        let dispatch = self.state.list.apply(action)?;
        self.issue(dispatch);
        Ok(())
    }

    fn issue(&self, dispatch: Dispatch) {
        let Some(token) = self.token() else {
            return;
        };
        if let Some(request) = dispatch.rows {
            let token = token.clone();
            tracing::debug!(ticket = request.ticket.generation(), "rows request");
            self.spawn(move |client| async move {
                let result = client.transactions_list(&token, &request.query).await;
                AppEvent::Rows {
                    ticket: request.ticket,
                    result,
                }
            });
        }
        if let Some(request) = dispatch.summary {
            tracing::debug!(ticket = request.ticket.generation(), "summary request");
            self.spawn(move |client| async move {
                let result = client.transactions_summary(&token, &request.query).await;
                AppEvent::Summary {
                    ticket: request.ticket,
                    result,
                }
            });
        }
    }

    /// Central handling of a rejected credential: forget it and go back to
    /// the login screen.
    fn expire_session(&mut self) {
        tracing::info!("session rejected by server, signing out");
        if let Err(err) = self.store.clear() {
            tracing::warn!("failed to remove session file: {err}");
        }
        self.sign_out(AuthEvent::Expired);
        self.state
            .auth_forms
            .login
            .error("Session expired, please sign in again.");
    }

    fn sign_out(&mut self, event: AuthEvent) {
        let auth = std::mem::take(&mut self.state.auth);
        self.state.auth = auth.transition(event);
        self.state.list.reset_results();
        self.state.lookups = Lookups::default();
        self.state.transactions = TransactionsUi::default();
        self.state.settings = SettingsUi::default();
        self.state.screen = Screen::Auth(AuthScreen::Login);
    }

    /// Returns `true` if `result` was a rejected credential and the session
    /// has been expired.
    fn intercept_unauthorized<T>(&mut self, result: &std::result::Result<T, ClientError>) -> bool {
        if let Err(err) = result
            && err.is_unauthorized()
            && self.state.auth.is_authenticated()
        {
            self.expire_session();
            return true;
        }
        false
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Rows { ticket, result } => {
                if self.intercept_unauthorized(&result) {
                    return;
                }
                let result = result.map_err(|err| message_for_error(&err));
                if self.state.list.complete_rows(ticket, result) {
                    let len = self.state.list.rows().items.len();
                    self.state.transactions.selected =
                        self.state.transactions.selected.min(len.saturating_sub(1));
                } else {
                    tracing::debug!(ticket = ticket.generation(), "dropping stale rows");
                }
            }
            AppEvent::Summary { ticket, result } => {
                if self.intercept_unauthorized(&result) {
                    return;
                }
                let result = result.map_err(|err| message_for_error(&err));
                if !self.state.list.complete_summary(ticket, result) {
                    tracing::debug!(ticket = ticket.generation(), "dropping stale summary");
                }
            }
            AppEvent::Types(result) => {
                if self.intercept_unauthorized(&result) {
                    return;
                }
                self.state.lookups.types = result.unwrap_or_else(|err| {
                    tracing::warn!("failed to load transaction types: {err}");
                    Vec::new()
                });
            }
            AppEvent::Currencies(result) => {
                if self.intercept_unauthorized(&result) {
                    return;
                }
                self.state.lookups.currencies = result.unwrap_or_else(|err| {
                    tracing::warn!("failed to load currencies: {err}");
                    Vec::new()
                });
            }
            AppEvent::Rates(result) => {
                if self.intercept_unauthorized(&result) {
                    return;
                }
                self.state.lookups.rates = result.unwrap_or_else(|err| {
                    tracing::warn!("failed to load exchange rates: {err}");
                    ExchangeRates::default()
                });
            }
            AppEvent::SignedIn(result) => self.on_signed_in(result),
            AppEvent::AuthMessage { screen, result } => self.on_auth_message(screen, result),
            AppEvent::ProfileSaved(result) => {
                if self.intercept_unauthorized(&result) {
                    return;
                }
                self.on_profile_saved(result);
            }
            AppEvent::RecordSaved { updated, result } => {
                if self.intercept_unauthorized(&result) {
                    return;
                }
                self.on_record_saved(updated, result.map(|_| ()));
            }
            AppEvent::RecordDeleted(result) => {
                if self.intercept_unauthorized(&result) {
                    return;
                }
                self.on_record_deleted(result);
            }
            AppEvent::LoggedOut(result) => {
                if let Err(err) = result {
                    tracing::debug!("logout request failed: {err}");
                }
            }
        }
    }
}

/// User-facing text for a failed request.
pub fn message_for_error(err: &ClientError) -> String {
    match err {
        ClientError::Unauthorized => "Wrong credentials or session expired.".to_string(),
        ClientError::Forbidden => "Not allowed.".to_string(),
        ClientError::NotFound => "Not found.".to_string(),
        ClientError::Conflict(message) => format!("Conflict: {message}"),
        ClientError::Validation(message) => message.clone(),
        ClientError::Server(message) => format!("Server error: {message}"),
        ClientError::Transport(err) => format!("Server unreachable: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use api_types::{
        auth::User,
        summary::SummaryResponse,
        transaction::{Transaction, TransactionKind},
    };
    use chrono::NaiveDate;
    use engine::Session;
    use rust_decimal::Decimal;

    use super::*;

    /// An app whose session file already holds a signed-in user.
    fn signed_in_app(name: &str) -> (App, PathBuf) {
        let path = std::env::temp_dir()
            .join(format!("tally_app_{}_{name}", std::process::id()))
            .join("session.json");
        let session = Session {
            token: "abc".to_string(),
            user: User {
                id: 7,
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                email_verified_at: None,
            },
        };
        SessionStore::new(path.clone()).save(&session).unwrap();
        let config = AppConfig {
            session_path: path.to_string_lossy().into_owned(),
            ..AppConfig::default()
        };
        let mut app = App::new(config).unwrap();
        app.state.screen = Screen::Main;
        (app, path)
    }

    fn record(id: u64) -> Transaction {
        Transaction {
            id,
            kind: TransactionKind::Expense,
            tx_type: "food".to_string(),
            amount: Decimal::new(1250, 2),
            currency: "EUR".to_string(),
            resource: None,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            description: None,
        }
    }

    #[test]
    fn rejected_credential_signs_out_and_drops_in_flight_results() {
        let (mut app, path) = signed_in_app("expired");
        assert!(app.state.auth.is_authenticated());
        let dispatch = app.state.list.apply(UserAction::Mount).unwrap();
        let rows = dispatch.rows.unwrap();
        let summary = dispatch.summary.unwrap();

        app.handle_event(AppEvent::Rows {
            ticket: rows.ticket,
            result: Err(ClientError::Unauthorized),
        });

        assert!(!path.exists());
        assert!(!app.state.auth.is_authenticated());
        assert_eq!(app.state.screen, Screen::Auth(AuthScreen::Login));
        let message = app.state.auth_forms.login.message.as_ref().unwrap();
        assert_eq!(message.level, MessageLevel::Error);
        assert!(
            !app.state
                .list
                .complete_summary(summary.ticket, Ok::<_, String>(SummaryResponse::default()))
        );
    }

    #[test]
    fn failed_lookups_fall_back_to_empty_lists() {
        let (mut app, path) = signed_in_app("lookups");
        app.state.lookups.types = vec!["food".to_string()];
        app.state.lookups.currencies = vec!["EUR".to_string()];

        app.handle_event(AppEvent::Types(Err(ClientError::NotFound)));
        app.handle_event(AppEvent::Currencies(Err(ClientError::Server(
            "boom".to_string(),
        ))));

        assert!(app.state.lookups.types.is_empty());
        assert!(app.state.lookups.currencies.is_empty());
        assert!(app.state.auth.is_authenticated());
        assert!(path.exists());
        app.store.clear().unwrap();
    }

    #[tokio::test]
    async fn saved_toast_keeps_verb_after_form_is_closed() {
        let (mut app, _path) = signed_in_app("verb");
        app.state.transactions.editing = Some(5);
        app.state.transactions.mode = TransactionsMode::Record;
        app.handle_transactions_key(AppAction::Cancel);
        assert_eq!(app.state.transactions.editing, None);

        app.handle_event(AppEvent::RecordSaved {
            updated: true,
            result: Ok(record(5)),
        });

        let toast = app.state.toast.as_ref().unwrap();
        assert_eq!(toast.level, ToastLevel::Success);
        assert_eq!(toast.message, "Transaction updated.");
        app.store.clear().unwrap();
    }
}
