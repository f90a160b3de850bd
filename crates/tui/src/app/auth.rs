use api_types::{
    MessageResponse,
    auth::{AuthResponse, ForgotPassword, Login, Register, ResetPassword, VerifyEmail},
};
use engine::{AuthEvent, Session};

use crate::{client::ClientError, ui::keymap::AppAction};

use super::{App, AppEvent, AuthScreen, Screen, ToastLevel, message_for_error};

impl App {
    pub(super) fn handle_auth_key(&mut self, screen: AuthScreen, action: AppAction) {
        match action {
            AppAction::Function(n) => {
                let target = match n {
                    1 => AuthScreen::Login,
                    2 => AuthScreen::Register,
                    3 => AuthScreen::ForgotPassword,
                    4 => AuthScreen::ResetPassword,
                    5 => AuthScreen::VerifyEmail,
                    _ => return,
                };
                self.state.screen = Screen::Auth(target);
            }
            AppAction::Cancel => self.state.screen = Screen::Auth(AuthScreen::Login),
            AppAction::NextField | AppAction::Down => {
                self.state.auth_forms.form_mut(screen).next_field()
            }
            AppAction::PrevField | AppAction::Up => {
                self.state.auth_forms.form_mut(screen).prev_field()
            }
            AppAction::Backspace => self.state.auth_forms.form_mut(screen).pop(),
            AppAction::Input(ch) => self.state.auth_forms.form_mut(screen).push(ch),
            AppAction::Submit => self.submit_auth(screen),
            _ => {}
        }
    }

    fn submit_auth(&mut self, screen: AuthScreen) {
        if self.state.auth.is_pending() {
            return;
        }
        let form = self.state.auth_forms.form(screen);

        match screen {
            AuthScreen::Login => {
                let payload = Login {
                    email: form.value(0).to_string(),
                    password: form.raw(1).to_string(),
                };
                if payload.email.is_empty() || payload.password.is_empty() {
                    self.state.auth_forms.login.error("Fill in every field.");
                    return;
                }
                self.begin_sign_in();
                self.spawn(move |client| async move {
                    AppEvent::SignedIn(client.login(&payload).await)
                });
            }
            AuthScreen::Register => {
                let payload = Register {
                    name: form.value(0).to_string(),
                    email: form.value(1).to_string(),
                    password: form.raw(2).to_string(),
                    password_confirmation: form.raw(3).to_string(),
                };
                if payload.name.is_empty() || payload.email.is_empty() || payload.password.is_empty()
                {
                    self.state.auth_forms.register.error("Fill in every field.");
                    return;
                }
                if payload.password != payload.password_confirmation {
                    self.state.auth_forms.register.error("Passwords do not match.");
                    return;
                }
                self.begin_sign_in();
                self.spawn(move |client| async move {
                    AppEvent::SignedIn(client.register(&payload).await)
                });
            }
            AuthScreen::ForgotPassword => {
                let payload = ForgotPassword {
                    email: form.value(0).to_string(),
                };
                if payload.email.is_empty() {
                    self.state.auth_forms.forgot.error("Enter your email.");
                    return;
                }
                self.state.auth_forms.forgot.info("Sending...");
                self.spawn(move |client| async move {
                    AppEvent::AuthMessage {
                        screen: AuthScreen::ForgotPassword,
                        result: client.forgot_password(&payload).await,
                    }
                });
            }
            AuthScreen::ResetPassword => {
                let payload = ResetPassword {
                    token: form.value(0).to_string(),
                    email: form.value(1).to_string(),
                    password: form.raw(2).to_string(),
                    password_confirmation: form.raw(3).to_string(),
                };
                if payload.token.is_empty() || payload.email.is_empty() || payload.password.is_empty()
                {
                    self.state.auth_forms.reset.error("Fill in every field.");
                    return;
                }
                if payload.password != payload.password_confirmation {
                    self.state.auth_forms.reset.error("Passwords do not match.");
                    return;
                }
                self.state.auth_forms.reset.info("Sending...");
                self.spawn(move |client| async move {
                    AppEvent::AuthMessage {
                        screen: AuthScreen::ResetPassword,
                        result: client.reset_password(&payload).await,
                    }
                });
            }
            AuthScreen::VerifyEmail => {
                let payload = VerifyEmail {
                    code: form.value(0).to_string(),
                };
                if payload.code.is_empty() {
                    self.state.auth_forms.verify.error("Enter the verification code.");
                    return;
                }
                let token = self.token();
                self.state.auth_forms.verify.info("Sending...");
                self.spawn(move |client| async move {
                    AppEvent::AuthMessage {
                        screen: AuthScreen::VerifyEmail,
                        result: client.verify_email(token.as_deref(), &payload).await,
                    }
                });
            }
        }
    }

    fn begin_sign_in(&mut self) {
        let auth = std::mem::take(&mut self.state.auth);
        self.state.auth = auth.transition(AuthEvent::Submitted);
    }

    pub(super) fn on_signed_in(&mut self, result: Result<AuthResponse, ClientError>) {
        let auth = std::mem::take(&mut self.state.auth);
        match result {
            Ok(res) => {
                let session = Session::from(res);
                tracing::info!(user = session.user.id, "signed in");
                if let Err(err) = self.store.save(&session) {
                    tracing::warn!("failed to persist session: {err}");
                }
                self.state.auth = auth.transition(AuthEvent::Succeeded(session));
                self.state.auth_forms.login.clear_values();
                self.state.auth_forms.login.message = None;
                self.state.auth_forms.register.clear_values();
                self.state.auth_forms.register.message = None;
                self.enter_main();
            }
            Err(err) => {
                let message = message_for_error(&err);
                tracing::debug!("sign in failed: {err}");
                self.state.auth = auth.transition(AuthEvent::Failed(message.clone()));
                if let Screen::Auth(screen) = self.state.screen {
                    self.state.auth_forms.form_mut(screen).error(message);
                }
            }
        }
    }

    pub(super) fn on_auth_message(
        &mut self,
        screen: AuthScreen,
        result: Result<MessageResponse, ClientError>,
    ) {
        let form = self.state.auth_forms.form_mut(screen);
        match result {
            Ok(res) => {
                let text = if res.message.is_empty() {
                    "Done.".to_string()
                } else {
                    res.message
                };
                form.clear_values();
                form.info(text);
            }
            Err(err) => form.error(message_for_error(&err)),
        }
    }

    /// Explicit logout: tell the server, forget the stored token either way.
    pub(super) fn logout(&mut self) {
        if let Some(token) = self.token() {
            self.spawn(move |client| async move {
                AppEvent::LoggedOut(client.logout(&token).await)
            });
        }
        if let Err(err) = self.store.clear() {
            tracing::warn!("failed to remove session file: {err}");
        }
        tracing::info!("signed out");
        self.sign_out(AuthEvent::LoggedOut);
        self.state.toast(ToastLevel::Info, "Signed out.");
    }
}
