use api_types::auth::{ProfileUpdate, User};
use engine::{AuthEvent, UserAction};

use crate::{client::ClientError, ui::keymap::AppAction};

use super::{App, AppEvent, SettingsMode, ToastLevel, message_for_error};

const PROFILE_NAME: usize = 0;
const PROFILE_EMAIL: usize = 1;
const PROFILE_PASSWORD: usize = 2;
const PROFILE_CONFIRM: usize = 3;

impl App {
    pub(super) fn handle_settings_key(&mut self, action: AppAction) {
        match self.state.settings.mode {
            SettingsMode::View => self.handle_settings_view_key(action),
            SettingsMode::EditProfile => self.handle_profile_key(action),
        }
    }

    fn handle_settings_view_key(&mut self, action: AppAction) {
        match action {
            AppAction::Input('e') => self.open_profile(),
            AppAction::Input('c') => self.cycle_display_currency(),
            AppAction::Input('l') => self.logout(),
            AppAction::Input('r') => self.load_lookups(),
            _ => {}
        }
    }

    fn open_profile(&mut self) {
        let Some(user) = self.state.auth.session().map(|s| s.user.clone()) else {
            return;
        };
        let form = &mut self.state.settings.profile_form;
        form.clear_values();
        form.message = None;
        form.set(PROFILE_NAME, user.name);
        form.set(PROFILE_EMAIL, user.email);
        self.state.settings.mode = SettingsMode::EditProfile;
    }

    /// Steps through "native" and each known currency.
    fn cycle_display_currency(&mut self) {
        let currencies = &self.state.lookups.currencies;
        let next = match self.state.list.display_currency() {
            None => currencies.first().cloned(),
            Some(current) => currencies
                .iter()
                .position(|c| c == current)
                .and_then(|i| currencies.get(i + 1))
                .cloned(),
        };
        tracing::debug!(currency = ?next, "display currency");
        if let Err(err) = self.dispatch(UserAction::SetDisplayCurrency(next)) {
            self.state.toast(ToastLevel::Error, err.to_string());
        }
    }

    fn handle_profile_key(&mut self, action: AppAction) {
        let form = &mut self.state.settings.profile_form;
        match action {
            AppAction::NextField | AppAction::Down => form.next_field(),
            AppAction::PrevField | AppAction::Up => form.prev_field(),
            AppAction::Input(ch) => form.push(ch),
            AppAction::Backspace => form.pop(),
            AppAction::Cancel => self.state.settings.mode = SettingsMode::View,
            AppAction::Submit => self.submit_profile(),
            _ => {}
        }
    }

    fn submit_profile(&mut self) {
        let (Some(token), Some(user)) = (
            self.token(),
            self.state.auth.session().map(|s| s.user.clone()),
        ) else {
            return;
        };
        let form = &mut self.state.settings.profile_form;
        let update = match profile_update(
            &user,
            form.value(PROFILE_NAME),
            form.value(PROFILE_EMAIL),
            form.raw(PROFILE_PASSWORD),
            form.raw(PROFILE_CONFIRM),
        ) {
            Ok(Some(update)) => update,
            Ok(None) => {
                form.info("Nothing to save.");
                return;
            }
            Err(message) => {
                form.error(message);
                return;
            }
        };

        form.info("Saving...");
        self.spawn(move |client| async move {
            AppEvent::ProfileSaved(client.update_profile(&token, &update).await)
        });
    }

    pub(super) fn on_profile_saved(&mut self, result: Result<User, ClientError>) {
        match result {
            Ok(user) => {
                let auth = std::mem::take(&mut self.state.auth);
                self.state.auth = auth.transition(AuthEvent::ProfileUpdated(user));
                if let Some(session) = self.state.auth.session()
                    && let Err(err) = self.store.save(session)
                {
                    tracing::warn!("failed to persist session: {err}");
                }
                self.state.settings.profile_form.clear_values();
                self.state.settings.mode = SettingsMode::View;
                self.state.toast(ToastLevel::Success, "Profile updated.");
            }
            Err(err) => {
                tracing::error!("failed to update profile: {err}");
                self.state
                    .settings
                    .profile_form
                    .error(message_for_error(&err));
            }
        }
    }
}

/// Only changed fields are sent. `Ok(None)` means there is nothing to save.
fn profile_update(
    current: &User,
    name: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<Option<ProfileUpdate>, &'static str> {
    if name.is_empty() || email.is_empty() {
        return Err("Name and email cannot be empty.");
    }
    if password != confirm {
        return Err("Passwords do not match.");
    }

    let changed = |new: &str, old: &str| (new != old).then(|| new.to_string());
    let password = (!password.is_empty()).then(|| password.to_string());
    let update = ProfileUpdate {
        name: changed(name, &current.name),
        email: changed(email, &current.email),
        password_confirmation: password.clone(),
        password,
    };

    let empty = update.name.is_none() && update.email.is_none() && update.password.is_none();
    Ok((!empty).then_some(update))
}
