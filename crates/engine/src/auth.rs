//! Authentication state machine.
//!
//! ```text
//! Anonymous --Submitted--> Authenticating --Succeeded--> Authenticated
//!     ^                         |                             |
//!     |                       Failed                   LoggedOut/Expired
//!     |                         v                             |
//!     +----LoggedOut/Expired-- Error <------------------------+
//! ```
//!
//! `LoggedOut` and `Expired` land on `Anonymous` from every state.

use api_types::auth::{AuthResponse, User};
use serde::{Deserialize, Serialize};

/// Credential held while authenticated. The token is opaque.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl From<AuthResponse> for Session {
    fn from(res: AuthResponse) -> Self {
        Self {
            token: res.token,
            user: res.user,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticating,
    Authenticated(Session),
    Error(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    Submitted,
    Succeeded(Session),
    Failed(String),
    ProfileUpdated(User),
    LoggedOut,
    Expired,
}

impl AuthState {
    /// Initial state from a persisted credential, if any.
    pub fn restore(session: Option<Session>) -> Self {
        session.map_or(Self::Anonymous, Self::Authenticated)
    }

    #[must_use]
    pub fn transition(self, event: AuthEvent) -> Self {
        match (self, event) {
            (_, AuthEvent::LoggedOut | AuthEvent::Expired) => Self::Anonymous,
            (Self::Anonymous | Self::Error(_), AuthEvent::Submitted) => Self::Authenticating,
            (Self::Authenticating, AuthEvent::Succeeded(session)) => Self::Authenticated(session),
            (Self::Authenticating, AuthEvent::Failed(message)) => Self::Error(message),
            (Self::Authenticated(session), AuthEvent::ProfileUpdated(user)) => {
                Self::Authenticated(Session { user, ..session })
            }
            (state, _) => state,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Authenticating)
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.session().map(|s| s.token.as_str())
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            token: "tok".to_string(),
            user: User {
                id: 1,
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                email_verified_at: None,
            },
        }
    }

    #[test]
    fn login_success_path() {
        let state = AuthState::Anonymous
            .transition(AuthEvent::Submitted)
            .transition(AuthEvent::Succeeded(session()));
        assert!(state.is_authenticated());
        assert_eq!(state.token(), Some("tok"));
    }

    #[test]
    fn login_failure_allows_retry() {
        let state = AuthState::Anonymous
            .transition(AuthEvent::Submitted)
            .transition(AuthEvent::Failed("bad credentials".to_string()));
        assert_eq!(state.error(), Some("bad credentials"));
        assert!(state.transition(AuthEvent::Submitted).is_pending());
    }

    #[test]
    fn success_without_submit_is_ignored() {
        let state = AuthState::Anonymous.transition(AuthEvent::Succeeded(session()));
        assert_eq!(state, AuthState::Anonymous);
    }

    #[test]
    fn logout_and_expiry_always_reach_anonymous() {
        for state in [
            AuthState::Anonymous,
            AuthState::Authenticating,
            AuthState::Authenticated(session()),
            AuthState::Error("x".to_string()),
        ] {
            assert_eq!(state.clone().transition(AuthEvent::LoggedOut), AuthState::Anonymous);
            assert_eq!(state.transition(AuthEvent::Expired), AuthState::Anonymous);
        }
    }

    #[test]
    fn profile_update_keeps_token() {
        let mut user = session().user;
        user.name = "Grace".to_string();
        let state = AuthState::restore(Some(session())).transition(AuthEvent::ProfileUpdated(user));
        let current = state.session().unwrap();
        assert_eq!(current.user.name, "Grace");
        assert_eq!(current.token, "tok");
    }

    #[test]
    fn restore_without_session_is_anonymous() {
        assert_eq!(AuthState::restore(None), AuthState::Anonymous);
    }
}
