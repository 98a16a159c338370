use std::fmt;
use time::OffsetDateTime;

/// Role assigned to every account created through registration.
pub const DEFAULT_ROLE: &str = "user";

#[derive(Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub(crate) password_hash: String,
    pub role: String,
    pub created_at: OffsetDateTime,
}

impl User {
    #[must_use]
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

// The credential hash stays out of logs.
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Validated registration input. Holds the plaintext password only until it is hashed.
#[derive(Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_credentials() {
        let user = User {
            id: 7,
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            role: DEFAULT_ROLE.to_string(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let rendered = format!("{user:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("argon2"));

        let new_user = NewUser {
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password: "p@ss1234".to_string(),
        };
        assert!(!format!("{new_user:?}").contains("p@ss1234"));
    }
}
