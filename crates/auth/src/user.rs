use serde::{Deserialize, Serialize};

use bloodbank_core::UserId;

use crate::roles::deserialize_lenient_role;
use crate::Role;

/// The signed-in user as reported by the auth endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    #[serde(alias = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// `None` when the server sent no role or one this build doesn't know.
    #[serde(default, deserialize_with = "deserialize_lenient_role")]
    pub role: Option<Role>,
}

impl AuthUser {
    pub fn new(
        id: impl Into<UserId>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role: Some(role),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_known_role() {
        let json = r#"{"_id":"u1","name":"Ada","email":"ada@example.org","role":"hospital_staff"}"#;
        let user: AuthUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.id.as_str(), "u1");
        assert_eq!(user.role, Some(Role::HospitalStaff));
    }

    #[test]
    fn unknown_or_missing_role_becomes_none() {
        let json = r#"{"id":"u2","name":"Bo","email":"bo@example.org","role":"superuser"}"#;
        let user: AuthUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, None);

        let json = r#"{"id":"u3","name":"Cy","email":"cy@example.org"}"#;
        let user: AuthUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, None);
    }
}
