use crate::domain::user::{NewUser, User};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Registration body. Every field is required and must be non-empty; absence is
/// reported by `into_new_user` rather than by deserialization.
#[derive(Deserialize)]
pub struct Registration {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

impl Registration {
    #[must_use]
    pub fn into_new_user(self) -> Option<NewUser> {
        Some(NewUser {
            username: non_empty(self.username)?,
            email: non_empty(self.email)?,
            password: non_empty(self.password)?,
        })
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
pub struct Login {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Login {
    /// Returns `(username, password)` when both are present and non-empty.
    #[must_use]
    pub fn into_credentials(self) -> Option<(String, String)> {
        Some((non_empty(self.username)?, non_empty(self.password)?))
    }
}

impl fmt::Debug for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Login").field("username", &self.username).finish_non_exhaustive()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Public view of an account. Never carries the credential hash.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self { id: user.id, username: user.username, email: user.email, role: user.role }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    /// Unix timestamp after which `token` is rejected.
    pub expires_at: i64,
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: UserProfile,
}
