//! User records and session identity types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Access role assigned to a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "USER")]
    User,
}

impl Role {
    pub fn all() -> &'static [Role] {
        &[Role::Admin, Role::User]
    }

    /// Wire representation used by the server and durable storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            other => Err(ModelError::UnknownRole(other.to_string())),
        }
    }
}

/// A managed user record as returned by the collection endpoint.
///
/// Identity is `id`; records are immutable on the client except through
/// an explicit update mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub profession: String,
    /// Server-assigned creation stamp. Opaque to the client.
    #[serde(rename = "createdAt")]
    pub created_at: String,
    pub role: Role,
    #[serde(rename = "tcknPrefix", default)]
    pub tckn_prefix: String,
}

/// Payload for creating a user. `id` and `createdAt` are server-assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub profession: String,
    pub role: Role,
    #[serde(rename = "tcknPrefix", default)]
    pub tckn_prefix: String,
}

/// Partial update payload; only present fields are patched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(rename = "tcknPrefix", skip_serializing_if = "Option::is_none")]
    pub tckn_prefix: Option<String>,
}

impl UserPatch {
    /// True when no field is set; such a patch is a no-op upstream.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.surname.is_none()
            && self.email.is_none()
            && self.profession.is_none()
            && self.role.is_none()
            && self.tckn_prefix.is_none()
    }
}

/// Credentials submitted to the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Successful login response: an opaque bearer token plus the role it
/// was granted for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginOutcome {
    pub token: String,
    pub role: Role,
}

/// In-memory authentication state.
///
/// `is_authenticated` is derived: a session is authenticated exactly when
/// a token is present. There is no expiry handling; a token stays valid
/// until an explicit logout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub token: Option<String>,
    pub role: Option<Role>,
}

impl SessionState {
    pub fn authenticated(token: String, role: Role) -> Self {
        Self {
            token: Some(token),
            role: Some(role),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_wire_names() {
        for role in Role::all() {
            assert_eq!(Role::from_str(role.as_str()).unwrap(), *role);
        }
        assert!(Role::from_str("MANAGER").is_err());
    }

    #[test]
    fn user_deserializes_from_server_shape() {
        let body = r#"{
            "id": 3,
            "name": "Ayse",
            "surname": "Demir",
            "email": "ayse@example.com",
            "profession": "Geliştirici",
            "createdAt": "2024-05-01T10:00:00Z",
            "role": "USER",
            "tcknPrefix": "123"
        }"#;
        let user: User = serde_json::from_str(body).unwrap();
        assert_eq!(user.id, 3);
        assert_eq!(user.role, Role::User);
        assert_eq!(user.tckn_prefix, "123");
    }

    #[test]
    fn empty_patch_serializes_to_empty_object() {
        let patch = UserPatch::default();
        assert!(patch.is_empty());
        assert_eq!(serde_json::to_string(&patch).unwrap(), "{}");
    }

    #[test]
    fn session_authentication_is_token_presence() {
        let mut state = SessionState::default();
        assert!(!state.is_authenticated());
        state = SessionState::authenticated("tok".into(), Role::Admin);
        assert!(state.is_authenticated());
    }
}
