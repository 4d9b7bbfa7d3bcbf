//! `bloodbank-auth`: client-side authorization model (zero network).
//!
//! Roles, permissions and the compiled-in tables that connect them, plus the
//! pure route guard built on top. Nothing here performs IO.

pub mod authorize;
pub mod claims;
pub mod guard;
pub mod permissions;
pub mod policy;
pub mod roles;
pub mod routes;
pub mod user;

pub use authorize::{authorize, AuthzError};
pub use claims::{SessionClaims, SessionRejected};
pub use guard::{AuthSnapshot, DenyReason, GuardDecision, Redirect, RouteGuard, RouteRequirements};
pub use permissions::{ParsePermissionError, Permission};
pub use policy::{Grant, RolePermissionMap};
pub use roles::{ParseRoleError, Role};
pub use routes::RouteId;
pub use user::AuthUser;
