//! In-app notifications and transient toasts.

pub mod reducer;
pub mod service;
pub mod store;
pub mod types;

pub use reducer::{reduce, NotificationAction, NotificationState};
pub use service::NotificationService;
pub use store::NotificationStore;
pub use types::{DeliveryStatus, Notification, NotificationFilters, NotificationKind};
