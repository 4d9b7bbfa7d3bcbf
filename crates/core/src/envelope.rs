//! Response envelope shared by every blood-bank API endpoint.
//!
//! ```json
//! {
//!   "success": true,
//!   "data": { ... },
//!   "pagination": { "current": 2, "pages": 5, "total": 47, "limit": 10 }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// Server-side pagination metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// Current page (1-indexed).
    pub current: u64,
    /// Total number of pages.
    pub pages: u64,
    /// Total number of items across all pages.
    pub total: u64,
    /// Items per page.
    pub limit: u64,
}

/// `{success, data, pagination?}` wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            pagination: None,
        }
    }

    pub fn with_pagination(mut self, meta: PaginationMeta) -> Self {
        self.pagination = Some(meta);
        self
    }

    /// Fail on `success: false`, otherwise keep the envelope.
    ///
    /// `status` is the HTTP status the envelope arrived with; a `false` flag on a
    /// 2xx response is reported as 400 so it lands in the client-error class.
    pub fn ensure_success(self, status: u16) -> ApiResult<Self> {
        if self.success {
            return Ok(self);
        }
        let status = if (200..300).contains(&status) { 400 } else { status };
        Err(ApiError::from_status(status, self.message))
    }

    /// Unwrap the payload, treating a missing `data` field as a decode failure.
    pub fn into_data(self) -> ApiResult<T> {
        self.data
            .ok_or_else(|| ApiError::decode("response has no data field"))
    }
}
