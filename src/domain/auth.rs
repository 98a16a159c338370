use crate::domain::user::User;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

/// Claims carried by a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User id, rendered as a decimal string.
    pub sub: String,
    pub username: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    #[must_use]
    pub fn for_user(user: &User, issued_at: OffsetDateTime, ttl: Duration) -> Self {
        Self {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role.clone(),
            iat: issued_at.unix_timestamp(),
            exp: (issued_at + ttl).unix_timestamp(),
        }
    }

    /// Returns the user id the token was issued for.
    ///
    /// # Errors
    /// Returns `AppError::Unauthorized` if the subject is not a user id.
    pub fn user_id(&self) -> Result<i64> {
        self.sub.parse().map_err(|_| AppError::Unauthorized)
    }
}
