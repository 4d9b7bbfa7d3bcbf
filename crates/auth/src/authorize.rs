//! Permission evaluator.
//!
//! All checks take `Option<Role>`: `None` stands for an unset or unrecognised
//! role and fails every check.

use thiserror::Error;

use crate::{Permission, Role, RolePermissionMap, RouteId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("no role assigned")]
    NoRole,

    #[error("forbidden: missing permission '{0}'")]
    Forbidden(Permission),
}

impl RolePermissionMap {
    pub fn has_permission(&self, role: Option<Role>, permission: Permission) -> bool {
        role.and_then(|r| self.grant(r))
            .is_some_and(|grant| grant.allows(permission))
    }

    /// Wire-level check against a raw permission token.
    ///
    /// A wildcard grant accepts any token, including ones this build doesn't
    /// know; otherwise the token must parse and be granted.
    pub fn has_permission_token(&self, role: Option<Role>, token: &str) -> bool {
        let Some(grant) = role.and_then(|r| self.grant(r)) else {
            return false;
        };
        if grant.is_wildcard() {
            return true;
        }
        token
            .parse::<Permission>()
            .is_ok_and(|permission| grant.allows(permission))
    }

    /// At least one of `permissions`. An empty list is `false`.
    pub fn has_any_permission(&self, role: Option<Role>, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.has_permission(role, *p))
    }

    /// Every one of `permissions`. An empty list is `true` (given the role exists).
    pub fn has_all_permissions(&self, role: Option<Role>, permissions: &[Permission]) -> bool {
        if role.and_then(|r| self.grant(r)).is_none() {
            return false;
        }
        permissions.iter().all(|p| self.has_permission(role, *p))
    }

    /// Whether `role` may open `route`. Routes without requirements are open to
    /// any role; the rest need any one of their listed permissions.
    pub fn can_access_route(&self, role: Option<Role>, route: RouteId) -> bool {
        if role.and_then(|r| self.grant(r)).is_none() {
            return false;
        }
        let required = route.required_permissions();
        required.is_empty() || self.has_any_permission(role, required)
    }

    /// Routes to show in the navigation for `role`, in declaration order.
    pub fn accessible_routes(&self, role: Option<Role>) -> Vec<RouteId> {
        RouteId::ALL
            .into_iter()
            .filter(|route| self.can_access_route(role, *route))
            .collect()
    }
}

/// Gate an action on a single permission.
///
/// - No IO
/// - No panics
pub fn authorize(
    map: &RolePermissionMap,
    role: Option<Role>,
    required: Permission,
) -> Result<(), AuthzError> {
    let Some(role) = role else {
        return Err(AuthzError::NoRole);
    };
    if map.has_permission(Some(role), required) {
        Ok(())
    } else {
        tracing::debug!(%role, permission = %required, "permission denied");
        Err(AuthzError::Forbidden(required))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
