//! Route guard: decides whether a screen renders, waits, or redirects.
//!
//! The guard is a pure function of its inputs. It never talks to the network
//! and never reads global state, so every branch is testable by building an
//! [`AuthSnapshot`] and a [`RouteRequirements`] by hand.
//!
//! Decision order:
//! 1. auth still loading → [`GuardDecision::CheckingAuth`]
//! 2. auth required but missing → redirect to login, remembering the origin
//! 3. role not in the allowed list → fallback if supplied, else unauthorized redirect
//! 4. permissions not all held → same as 3
//! 5. otherwise → [`GuardDecision::Render`]

use serde::Serialize;

use crate::{AuthUser, Permission, Role, RolePermissionMap};

pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Authentication state as the guard sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub user: Option<AuthUser>,
}

impl AuthSnapshot {
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Self::default()
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user: AuthUser) -> Self {
        Self {
            is_authenticated: true,
            is_loading: false,
            user: Some(user),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().and_then(|u| u.role)
    }
}

/// What a screen demands before it renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequirements {
    pub require_auth: bool,
    /// Allowed roles; empty means any role.
    pub roles: Vec<Role>,
    /// Permissions that must *all* be held; empty means none.
    pub permissions: Vec<Permission>,
    pub login_path: String,
    pub unauthorized_path: String,
}

impl Default for RouteRequirements {
    fn default() -> Self {
        Self {
            require_auth: true,
            roles: Vec::new(),
            permissions: Vec::new(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            unauthorized_path: DEFAULT_UNAUTHORIZED_PATH.to_string(),
        }
    }
}

impl RouteRequirements {
    pub fn new() -> Self {
        Self::default()
    }

    /// A screen reachable without signing in.
    pub fn public() -> Self {
        Self {
            require_auth: false,
            ..Self::default()
        }
    }

    pub fn roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    pub fn permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions = permissions.into_iter().collect();
        self
    }

    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    pub fn unauthorized_path(mut self, path: impl Into<String>) -> Self {
        self.unauthorized_path = path.into();
        self
    }
}

/// Why access was refused.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    Unauthenticated,
    RoleNotAllowed,
    MissingPermissions,
}

/// Navigation instruction produced by the guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub to: String,
    /// Location to return to after login (only set for unauthenticated redirects).
    pub from: Option<String>,
    pub reason: DenyReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GuardDecision {
    /// Auth state not known yet; show a loading indicator.
    CheckingAuth,
    Redirect(Redirect),
    /// Render the caller-supplied fallback in place of the screen.
    Fallback { reason: DenyReason },
    Render,
}

impl GuardDecision {
    pub fn is_render(&self) -> bool {
        matches!(self, GuardDecision::Render)
    }
}

/// Evaluates [`RouteRequirements`] against an [`AuthSnapshot`].
#[derive(Debug, Clone, Copy)]
pub struct RouteGuard<'a> {
    permissions: &'a RolePermissionMap,
}

impl<'a> RouteGuard<'a> {
    pub fn new(permissions: &'a RolePermissionMap) -> Self {
        Self { permissions }
    }

    /// Decide what to show for `location`.
    ///
    /// `has_fallback` tells the guard whether the caller can render fallback
    /// content; when it can, role and permission denials prefer it over a
    /// redirect.
    pub fn evaluate(
        &self,
        requirements: &RouteRequirements,
        auth: &AuthSnapshot,
        location: &str,
        has_fallback: bool,
    ) -> GuardDecision {
        if auth.is_loading {
            return GuardDecision::CheckingAuth;
        }

        if requirements.require_auth && !auth.is_authenticated {
            tracing::info!(
                location,
                to = %requirements.login_path,
                "redirecting unauthenticated visitor"
            );
            return GuardDecision::Redirect(Redirect {
                to: requirements.login_path.clone(),
                from: Some(location.to_string()),
                reason: DenyReason::Unauthenticated,
            });
        }

        let role = auth.role();

        if !requirements.roles.is_empty()
            && !role.is_some_and(|r| requirements.roles.contains(&r))
        {
            return self.deny(requirements, location, has_fallback, DenyReason::RoleNotAllowed);
        }

        if !requirements.permissions.is_empty()
            && !self.permissions.has_all_permissions(role, &requirements.permissions)
        {
            return self.deny(requirements, location, has_fallback, DenyReason::MissingPermissions);
        }

        GuardDecision::Render
    }

    fn deny(
        &self,
        requirements: &RouteRequirements,
        location: &str,
        has_fallback: bool,
        reason: DenyReason,
    ) -> GuardDecision {
        tracing::debug!(location, ?reason, has_fallback, "route access denied");
        if has_fallback {
            GuardDecision::Fallback { reason }
        } else {
            GuardDecision::Redirect(Redirect {
                to: requirements.unauthorized_path.clone(),
                from: None,
                reason,
            })
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
