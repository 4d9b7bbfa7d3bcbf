//! Client-side error model for calls against the blood-bank REST API.

use thiserror::Error;

/// Message used when a failure carries no usable text.
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";

/// Result type used for every API-facing operation.
pub type ApiResult<T> = Result<T, ApiError>;

/// Normalised failure of an API call.
///
/// Every transport or server failure is folded into one of these variants so
/// callers only ever match on a small, closed set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The server rejected the credentials (HTTP 401). Triggers a forced logout.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// The server answered with a non-success status or `success: false`.
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The request never produced a response (DNS, connect, reset...).
    #[error("network error: {0}")]
    Network(String),

    /// The response arrived but could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),
}

/// Coarse classification used by the async-operation runner.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorClass {
    /// 401-equivalent: handled globally by logging out.
    Unauthorized,
    /// 4xx other than 401: validation or business rule failure.
    Client,
    /// Everything else: 5xx, network and decoding failures.
    Unexpected,
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: non_empty(message.into()),
        }
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: non_empty(message.into()),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(non_empty(message.into()))
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(non_empty(message.into()))
    }

    /// Build an error from an HTTP status and an optional server message.
    ///
    /// 401 always maps to [`ApiError::Unauthorized`].
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        let message = message.unwrap_or_default();
        if status == 401 {
            Self::unauthorized(message)
        } else {
            Self::rejected(status, message)
        }
    }

    /// HTTP status, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Rejected { status, .. } => Some(*status),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }

    /// User-facing message (never empty).
    pub fn message(&self) -> &str {
        match self {
            Self::Unauthorized { message } | Self::Rejected { message, .. } => message,
            Self::Network(message) | Self::Decode(message) => message,
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Unauthorized { .. } => ErrorClass::Unauthorized,
            Self::Rejected { status, .. } if (400..500).contains(status) => ErrorClass::Client,
            _ => ErrorClass::Unexpected,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.class() == ErrorClass::Unauthorized
    }
}

fn non_empty(message: String) -> String {
    if message.trim().is_empty() {
        DEFAULT_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_401_is_unauthorized() {
        let err = ApiError::from_status(401, Some("token expired".into()));
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.message(), "token expired");
    }

    #[test]
    fn client_errors_are_classified_as_client() {
        let err = ApiError::from_status(422, Some("donor is not eligible".into()));
        assert_eq!(err.class(), ErrorClass::Client);

        let err = ApiError::from_status(403, None);
        assert_eq!(err.class(), ErrorClass::Client);
    }

    #[test]
    fn server_and_transport_errors_are_unexpected() {
        assert_eq!(ApiError::from_status(500, None).class(), ErrorClass::Unexpected);
        assert_eq!(ApiError::network("connection reset").class(), ErrorClass::Unexpected);
        assert_eq!(ApiError::decode("missing field").class(), ErrorClass::Unexpected);
    }

    #[test]
    fn missing_message_falls_back_to_default() {
        assert_eq!(ApiError::from_status(400, None).message(), DEFAULT_ERROR_MESSAGE);
        assert_eq!(ApiError::network("   ").message(), DEFAULT_ERROR_MESSAGE);
        assert_eq!(ApiError::unauthorized("").message(), DEFAULT_ERROR_MESSAGE);
    }

    #[test]
    fn display_includes_status() {
        let err = ApiError::rejected(409, "campaign already exists");
        assert_eq!(err.to_string(), "request rejected (409): campaign already exists");
    }
}
