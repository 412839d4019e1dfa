//! User model and related functionality

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Full user row, including the stored password hash.
///
/// Deliberately not `Serialize`: only [`UserResponse`] goes over the wire.
#[derive(Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl User {
    /// Strip the credential, leaving the public projection
    pub fn into_response(self) -> UserResponse {
        UserResponse {
            id: self.id,
            username: self.username,
            email: self.email,
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"[redacted]")
            .finish()
    }
}

/// Public projection of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Row to insert; `password_hash` is already hashed
#[derive(Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial row update; `None` leaves a column untouched
#[derive(Clone, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password_hash.is_none()
    }
}

/// Request for user creation
///
/// Missing fields deserialize as empty strings so they fail validation
/// instead of JSON extraction.
#[derive(Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Request for user update
#[derive(Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for UpdateUserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateUserRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

/// Request for user login
#[derive(Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Response for user login
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 7,
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        }
    }

    #[test]
    fn test_projection_drops_password_hash() {
        let json = serde_json::to_value(user().into_response()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 7, "username": "alice", "email": "a@x.com"})
        );
    }

    #[test]
    fn test_debug_output_redacts_secrets() {
        let rendered = format!("{:?}", user());
        assert!(!rendered.contains("argon2"));

        let request = CreateUserRequest {
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password: "pw1234".to_string(),
        };
        assert!(!format!("{:?}", request).contains("pw1234"));

        let login = LoginRequest {
            email: "a@x.com".to_string(),
            password: "pw1234".to_string(),
        };
        assert!(!format!("{:?}", login).contains("pw1234"));
    }

    #[test]
    fn test_create_request_defaults_missing_fields() {
        let request: CreateUserRequest =
            serde_json::from_str(r#"{"username": "alice"}"#).unwrap();
        assert_eq!(request.username, "alice");
        assert!(request.email.is_empty());
        assert!(request.password.is_empty());
    }

    #[test]
    fn test_update_user_is_empty() {
        assert!(UpdateUser::default().is_empty());
        let changes = UpdateUser {
            email: Some("b@x.com".to_string()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
