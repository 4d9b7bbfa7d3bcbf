//! Strongly-typed identifiers used across the dashboard.
//!
//! The backend hands out opaque string ids; locally created records (toasts)
//! get a UUIDv7 rendered as a string so both kinds share one representation.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a notification or toast.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(String);

/// Identifier of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

/// Identifier of any CRUD record (donor, campaign, hospital...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

macro_rules! impl_string_id {
    ($t:ty) => {
        impl $t {
            /// Wrap an id issued by the server.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Create a fresh client-side identifier (UUIDv7, time-ordered).
            pub fn generate() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl FromStr for $t {
            type Err = core::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_string()))
            }
        }
    };
}

impl_string_id!(NotificationId);
impl_string_id!(UserId);
impl_string_id!(RecordId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = NotificationId::generate();
        let b = NotificationId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = RecordId::new("64f1c0ffee");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""64f1c0ffee""#);
        let back: RecordId = serde_json::from_str(r#""64f1c0ffee""#).unwrap();
        assert_eq!(back, id);
    }
}
