use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::AuthUser;

/// Login response body: the signed-in staff member and their bearer token.
///
/// The dashboard never decodes the token. It only refuses to sign in with one
/// whose validity window has already closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub user: AuthUser,
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Why a login response cannot start a session.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionRejected {
    #[error("session token already expired")]
    Expired,

    #[error("session token issued in the future; check the workstation clock")]
    IssuedInFuture,

    #[error("login response has an empty or inverted validity window")]
    EmptyWindow,
}

impl SessionClaims {
    /// Whether the token may back a session at `now`.
    ///
    /// A malformed window is reported before any clock comparison.
    pub fn check_at(&self, now: DateTime<Utc>) -> Result<(), SessionRejected> {
        if self.expires_at <= self.issued_at {
            Err(SessionRejected::EmptyWindow)
        } else if now < self.issued_at {
            Err(SessionRejected::IssuedInFuture)
        } else if now >= self.expires_at {
            Err(SessionRejected::Expired)
        } else {
            Ok(())
        }
    }
}
