use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Coarse identity class assigned to a user by the auth service.
///
/// Closed on purpose: comparisons against role strings belong here and in the
/// evaluator, nowhere else.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    HospitalStaff,
    Donor,
    Recipient,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct ParseRoleError(pub String);

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::HospitalStaff, Role::Donor, Role::Recipient];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::HospitalStaff => "hospital_staff",
            Role::Donor => "donor",
            Role::Recipient => "recipient",
        }
    }

    /// Human-readable name for badges and menus.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::HospitalStaff => "Hospital Staff",
            Role::Donor => "Donor",
            Role::Recipient => "Recipient",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| ParseRoleError(s.to_string()))
    }
}

/// Deserializes an optional role string, mapping unknown values to `None`.
///
/// A user whose role the client doesn't recognise must fail closed, not fail
/// to load.
pub fn deserialize_lenient_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(s) => match s.parse::<Role>() {
            Ok(role) => Some(role),
            Err(err) => {
                tracing::warn!(role = %s, "{err}; treating user as having no role");
                None
            }
        },
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names() {
        assert_eq!("hospital_staff".parse::<Role>().unwrap(), Role::HospitalStaff);
        assert_eq!("donor".parse::<Role>().unwrap(), Role::Donor);
        assert!("superuser".parse::<Role>().is_err());
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn round_trips_through_display() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn serde_uses_snake_case() {
        assert_eq!(serde_json::to_string(&Role::HospitalStaff).unwrap(), r#""hospital_staff""#);
    }
}
