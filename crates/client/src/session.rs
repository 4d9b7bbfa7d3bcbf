//! Authenticated session: who is signed in and with which token.

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use bloodbank_auth::{AuthSnapshot, AuthUser, Role, SessionClaims, SessionRejected};

use crate::operation::LogoutHook;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<AuthUser>,
    pub token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_loading: bool,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        AuthSnapshot {
            is_authenticated: self.is_authenticated(),
            is_loading: self.is_loading,
            user: self.user.clone(),
        }
    }
}

/// Process-wide session handle. Changes are broadcast to subscribers.
#[derive(Debug)]
pub struct Session {
    state: watch::Sender<SessionState>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self { state }
    }

    /// Mark the session as being restored/verified (e.g. token refresh on start-up).
    pub fn begin_loading(&self) {
        self.state.send_modify(|s| s.is_loading = true);
    }

    /// Stop loading without establishing a session (no stored credentials).
    pub fn finish_loading(&self) {
        self.state.send_modify(|s| s.is_loading = false);
    }

    /// Adopt a user and token whose validity window is unknown to the client.
    pub fn establish(&self, user: AuthUser, token: impl Into<String>) {
        tracing::info!(
            user_id = %user.id,
            role = user.role.map(|r| r.as_str()).unwrap_or("none"),
            "session established"
        );
        self.state.send_replace(SessionState {
            user: Some(user),
            token: Some(token.into()),
            expires_at: None,
            is_loading: false,
        });
    }

    pub fn establish_claims(&self, claims: SessionClaims) -> Result<(), SessionRejected> {
        self.establish_claims_at(claims, Utc::now())
    }

    /// Adopt a login response, rejecting tokens already outside their window.
    pub fn establish_claims_at(
        &self,
        claims: SessionClaims,
        now: DateTime<Utc>,
    ) -> Result<(), SessionRejected> {
        if let Err(err) = claims.check_at(now) {
            tracing::warn!(user_id = %claims.user.id, "rejecting session: {err}");
            self.state.send_modify(|s| s.is_loading = false);
            return Err(err);
        }

        let expires_at = claims.expires_at;
        self.establish(claims.user, claims.token);
        self.state.send_modify(|s| s.expires_at = Some(expires_at));
        Ok(())
    }

    pub fn logout(&self) {
        let was_authenticated = self.state.borrow().is_authenticated();
        self.state.send_replace(SessionState::default());
        if was_authenticated {
            tracing::info!("session cleared");
        }
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn user(&self) -> Option<AuthUser> {
        self.state.borrow().user.clone()
    }

    pub fn role(&self) -> Option<Role> {
        self.state.borrow().user.as_ref().and_then(|u| u.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Whether the token's known expiry has passed.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.state.borrow().expires_at.is_some_and(|exp| now >= exp)
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.state.borrow().snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }
}

impl LogoutHook for Session {
    fn force_logout(&self) {
        tracing::warn!("server rejected credentials; forcing logout");
        self.logout();
    }
}
