//! `bloodbank-client`
//!
//! Client core of the blood-bank admin dashboard: everything a UI shell
//! needs below the rendering layer.
//!
//! - HTTP access to the REST API and the signed-in session
//! - the async-operation runner every screen routes its calls through
//! - notification and toast state
//! - paged resource lists, debounced search, theme preference
//!
//! [`AppContext`] wires these together once per process.

pub mod config;
pub mod context;
pub mod debounce;
pub mod http;
pub mod list;
pub mod notifications;
pub mod operation;
pub mod resources;
pub mod session;
pub mod theme;

pub use config::{ClientConfig, ConfigError};
pub use context::AppContext;
pub use debounce::Debouncer;
pub use http::ApiClient;
pub use list::{PagedList, Snapshot};
pub use notifications::{
    Notification, NotificationAction, NotificationKind, NotificationService, NotificationState,
    NotificationStore,
};
pub use operation::{AsyncOperation, ExecuteOptions, LogoutHook, OperationState, Outcome};
pub use resources::{ListQuery, Resource, ResourceService};
pub use session::{Session, SessionState};
pub use theme::{ThemeError, ThemePreference, ThemeStore};
