use api_types::transaction::SortColumn;
use engine::UserAction;

use crate::{
    client::ClientError,
    parsing::{self, FILTER_LABELS, RECORD_CURRENCY, RECORD_DATE, RECORD_KIND},
    ui::keymap::AppAction,
};

use super::{App, AppEvent, ToastLevel, TransactionsMode, message_for_error};

impl App {
    pub(super) fn handle_transactions_key(&mut self, action: AppAction) {
        match self.state.transactions.mode {
            TransactionsMode::List => self.handle_list_key(action),
            TransactionsMode::Filter => self.handle_filter_key(action),
            TransactionsMode::Record => self.handle_record_key(action),
            TransactionsMode::ConfirmDelete => self.handle_delete_key(action),
        }
    }

    pub(super) fn handle_summary_key(&mut self, action: AppAction) {
        match action {
            AppAction::Input('r') => self.apply_list_action(UserAction::Refresh),
            AppAction::Input('/') => {
                self.state.section = super::Section::Transactions;
                self.open_filters();
            }
            _ => {}
        }
    }

    fn handle_list_key(&mut self, action: AppAction) {
        let len = self.state.list.rows().items.len();
        let selected = self.state.transactions.selected;
        match action {
            AppAction::Down | AppAction::Input('j') => {
                if selected + 1 < len {
                    self.state.transactions.selected = selected + 1;
                }
            }
            AppAction::Up | AppAction::Input('k') => {
                self.state.transactions.selected = selected.saturating_sub(1);
            }
            AppAction::Input(ch @ '1'..='6') => {
                let index = (ch as usize) - ('1' as usize);
                if let Some(&column) = SortColumn::ALL.get(index) {
                    self.apply_list_action(UserAction::SortBy(column));
                }
            }
            AppAction::Input('n') => {
                let page = self.state.list.page().index();
                if page.saturating_add(1) < self.state.list.page_count() {
                    self.apply_list_action(UserAction::SetPage(page + 1));
                }
            }
            AppAction::Input('p') => {
                let page = self.state.list.page().index();
                if page > 0 {
                    self.apply_list_action(UserAction::SetPage(page - 1));
                }
            }
            AppAction::Input('z') => {
                let size = self.state.list.page().next_size();
                self.apply_list_action(UserAction::SetPageSize(size));
            }
            AppAction::Input('/') => self.open_filters(),
            AppAction::Input('c') => self.apply_list_action(UserAction::ClearFilters),
            AppAction::Input('r') => self.apply_list_action(UserAction::Refresh),
            AppAction::Input('a') => self.open_new_record(),
            AppAction::Input('e') | AppAction::Submit => self.open_edit_record(),
            AppAction::Input('d') => {
                if let Some(id) = self.selected_record().map(|tx| tx.id) {
                    self.state.transactions.pending_delete = Some(id);
                    self.state.transactions.mode = TransactionsMode::ConfirmDelete;
                }
            }
            _ => {}
        }
    }

    /// Runs a list action, surfacing validation failures as a toast.
    fn apply_list_action(&mut self, action: UserAction) {
        if let Err(err) = self.dispatch(action) {
            self.state.toast(ToastLevel::Error, err.to_string());
        }
    }

    fn selected_record(&self) -> Option<&api_types::transaction::Transaction> {
        self.state
            .list
            .rows()
            .items
            .get(self.state.transactions.selected)
    }

    fn open_filters(&mut self) {
        let texts = parsing::filter_texts(self.state.list.filters().draft());
        let form = &mut self.state.transactions.filter_form;
        for (i, text) in texts.into_iter().enumerate() {
            form.set(i, text);
        }
        form.focus = 0;
        form.message = None;
        self.state.transactions.mode = TransactionsMode::Filter;
    }

    /// Copies the focused filter field into the draft. Returns `false` and
    /// flags the form when the text does not parse.
    fn sync_filter_field(&mut self, index: usize) -> bool {
        let form = &mut self.state.transactions.filter_form;
        match parsing::filter_field(index, form.value(index)) {
            Ok(field) => {
                self.state.list.filters_mut().set_draft_field(field);
                true
            }
            Err(err) => {
                form.error(format!("{}: {err}", FILTER_LABELS[index]));
                false
            }
        }
    }

    fn handle_filter_key(&mut self, action: AppAction) {
        match action {
            AppAction::NextField | AppAction::Down => {
                let focus = self.state.transactions.filter_form.focus;
                if self.sync_filter_field(focus) {
                    self.state.transactions.filter_form.message = None;
                    self.state.transactions.filter_form.next_field();
                }
            }
            AppAction::PrevField | AppAction::Up => {
                let focus = self.state.transactions.filter_form.focus;
                if self.sync_filter_field(focus) {
                    self.state.transactions.filter_form.message = None;
                    self.state.transactions.filter_form.prev_field();
                }
            }
            AppAction::Input(ch) => self.state.transactions.filter_form.push(ch),
            AppAction::Backspace => self.state.transactions.filter_form.pop(),
            AppAction::Submit => {
                for index in 0..FILTER_LABELS.len() {
                    if !self.sync_filter_field(index) {
                        return;
                    }
                }
                match self.dispatch(UserAction::ApplyFilters) {
                    Ok(()) => {
                        tracing::debug!("filters applied");
                        self.state.transactions.selected = 0;
                        self.state.transactions.mode = TransactionsMode::List;
                    }
                    Err(err) => self.state.transactions.filter_form.error(err.to_string()),
                }
            }
            AppAction::Cancel => {
                self.state.list.filters_mut().revert_draft();
                self.state.transactions.mode = TransactionsMode::List;
            }
            _ => {}
        }
    }

    fn open_new_record(&mut self) {
        let currency = self
            .state
            .list
            .display_currency()
            .map(str::to_string)
            .or_else(|| self.state.lookups.currencies.first().cloned())
            .unwrap_or_default();
        let today = chrono::Local::now().date_naive();

        let form = &mut self.state.transactions.record_form;
        form.clear_values();
        form.message = None;
        form.set(RECORD_KIND, "expense");
        form.set(RECORD_CURRENCY, currency);
        form.set(RECORD_DATE, today.to_string());
        self.state.transactions.editing = None;
        self.state.transactions.mode = TransactionsMode::Record;
    }

    fn open_edit_record(&mut self) {
        let Some(tx) = self.selected_record() else {
            return;
        };
        let id = tx.id;
        let texts = parsing::record_texts(tx);

        let form = &mut self.state.transactions.record_form;
        for (i, text) in texts.into_iter().enumerate() {
            form.set(i, text);
        }
        form.focus = 0;
        form.message = None;
        self.state.transactions.editing = Some(id);
        self.state.transactions.mode = TransactionsMode::Record;
    }

    fn handle_record_key(&mut self, action: AppAction) {
        let form = &mut self.state.transactions.record_form;
        match action {
            AppAction::NextField | AppAction::Down => form.next_field(),
            AppAction::PrevField | AppAction::Up => form.prev_field(),
            AppAction::Input(ch) => form.push(ch),
            AppAction::Backspace => form.pop(),
            AppAction::Cancel => {
                self.state.transactions.editing = None;
                self.state.transactions.mode = TransactionsMode::List;
            }
            AppAction::Submit => self.submit_record(),
            _ => {}
        }
    }

    fn submit_record(&mut self) {
        let Some(token) = self.token() else {
            return;
        };
        let form = &self.state.transactions.record_form;
        let values: [&str; 7] = std::array::from_fn(|i| form.value(i));
        let draft = match parsing::record_draft(&values) {
            Ok(draft) => draft,
            Err(err) => {
                self.state.transactions.record_form.error(err.to_string());
                return;
            }
        };

        self.state.transactions.record_form.info("Saving...");
        match self.state.transactions.editing {
            Some(id) => self.spawn(move |client| async move {
                AppEvent::RecordSaved {
                    updated: true,
                    result: client.transaction_update(&token, id, &draft).await,
                }
            }),
            None => self.spawn(move |client| async move {
                AppEvent::RecordSaved {
                    updated: false,
                    result: client.transaction_create(&token, &draft).await,
                }
            }),
        }
    }

    fn handle_delete_key(&mut self, action: AppAction) {
        let pending = self.state.transactions.pending_delete.take();
        self.state.transactions.mode = TransactionsMode::List;

        let (AppAction::Input('y'), Some(id), Some(token)) = (action, pending, self.token()) else {
            return;
        };
        tracing::debug!(id, "deleting transaction");
        self.spawn(move |client| async move {
            AppEvent::RecordDeleted(client.transaction_delete(&token, id).await)
        });
    }

    pub(super) fn on_record_saved(&mut self, updated: bool, result: Result<(), ClientError>) {
        match result {
            Ok(()) => {
                let verb = if updated { "updated" } else { "created" };
                self.state.transactions.editing = None;
                self.state.transactions.mode = TransactionsMode::List;
                self.state.toast(ToastLevel::Success, format!("Transaction {verb}."));
                self.apply_list_action(UserAction::RecordsChanged);
            }
            Err(err) => {
                tracing::error!("failed to save transaction: {err}");
                let message = message_for_error(&err);
                if self.state.transactions.mode == TransactionsMode::Record {
                    self.state.transactions.record_form.error(message);
                } else {
                    self.state.toast(ToastLevel::Error, message);
                }
            }
        }
    }

    pub(super) fn on_record_deleted(&mut self, result: Result<(), ClientError>) {
        match result {
            Ok(()) => {
                self.state.toast(ToastLevel::Success, "Transaction deleted.");
                self.apply_list_action(UserAction::RecordsChanged);
            }
            Err(err) => {
                tracing::error!("failed to delete transaction: {err}");
                self.state.toast(ToastLevel::Error, message_for_error(&err));
            }
        }
    }
}
