use crate::domain::user::{DEFAULT_ROLE, User};
use crate::error::{AppError, Result};
use crate::storage::records::UserRecord;
use sqlx::SqliteConnection;
use time::OffsetDateTime;

#[derive(Clone, Debug, Default)]
pub struct UserRepository {}

impl UserRepository {
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }

    /// Inserts a new user. The UNIQUE constraints on `username` and `email` decide
    /// the outcome when two registrations race past the pre-checks.
    ///
    /// # Errors
    /// Returns `AppError::UsernameTaken` or `AppError::EmailTaken` on a uniqueness
    /// violation, `AppError::Database` for any other failure.
    #[tracing::instrument(level = "debug", skip(self, conn, password_hash), err)]
    pub(crate) async fn create(
        &self,
        conn: &mut SqliteConnection,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            r"
            INSERT INTO users (username, email, password_hash, role, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, username, email, password_hash, role, created_at
            ",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(DEFAULT_ROLE)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(conn)
        .await
        .map_err(map_unique_violation)?;

        Ok(record.into())
    }

    #[tracing::instrument(level = "debug", skip(self, conn), err)]
    pub(crate) async fn find_by_username(&self, conn: &mut SqliteConnection, username: &str) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, email, password_hash, role, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(conn)
        .await?;

        Ok(record.map(Into::into))
    }

    #[tracing::instrument(level = "debug", skip(self, conn), err)]
    pub(crate) async fn find_by_email(&self, conn: &mut SqliteConnection, email: &str) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, email, password_hash, role, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(conn)
        .await?;

        Ok(record.map(Into::into))
    }

    #[tracing::instrument(level = "debug", skip(self, conn), err)]
    pub(crate) async fn find_by_id(&self, conn: &mut SqliteConnection, id: i64) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, email, password_hash, role, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(record.map(Into::into))
    }
}

fn map_unique_violation(error: sqlx::Error) -> AppError {
    let conflict = match &error {
        // SQLite reports the violated column as "UNIQUE constraint failed: users.email".
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            Some(if db.message().contains("users.email") { AppError::EmailTaken } else { AppError::UsernameTaken })
        }
        _ => None,
    };

    conflict.unwrap_or_else(|| AppError::Database(error))
}
