//! `bloodbank-core`: foundation types shared by the dashboard crates.
//!
//! Pure data and state: no IO, no async, no panics.

pub mod entity;
pub mod envelope;
pub mod error;
pub mod id;
pub mod pagination;

pub use entity::Entity;
pub use envelope::{ApiEnvelope, PaginationMeta};
pub use error::{ApiError, ApiResult, ErrorClass, DEFAULT_ERROR_MESSAGE};
pub use id::{NotificationId, RecordId, UserId};
pub use pagination::{Pagination, PaginationInfo, DEFAULT_LIMIT, DEFAULT_MAX_LIMIT};
