use crate::domain::auth::Claims;
use crate::domain::auth_session::AuthSession;
use crate::domain::user::{NewUser, User};
use crate::error::{AppError, Result};
use crate::services::credential_service::CredentialService;
use crate::services::token_service::TokenService;
use crate::storage::DbPool;
use crate::storage::user_repo::UserRepository;
use opentelemetry::{global, metrics::Counter};

#[derive(Clone, Debug)]
struct Metrics {
    users_registered_total: Counter<u64>,
    login_total: Counter<u64>,
    login_failures_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("study-assistant-server");
        Self {
            users_registered_total: meter
                .u64_counter("users_registered_total")
                .with_description("Total number of successful user registrations")
                .build(),
            login_total: meter
                .u64_counter("auth_login_total")
                .with_description("Total number of successful login attempts")
                .build(),
            login_failures_total: meter
                .u64_counter("auth_login_failures_total")
                .with_description("Total number of rejected login attempts")
                .build(),
        }
    }
}

/// Registration and login over the user store, credential hashing and token issuance.
#[derive(Clone, Debug)]
pub struct AccountService {
    pool: DbPool,
    user_repo: UserRepository,
    credentials: CredentialService,
    tokens: TokenService,
    metrics: Metrics,
}

impl AccountService {
    #[must_use]
    pub fn new(pool: DbPool, user_repo: UserRepository, credentials: CredentialService, tokens: TokenService) -> Self {
        Self { pool, user_repo, credentials, tokens, metrics: Metrics::new() }
    }

    /// Creates an account. The username and email pre-checks give precise errors; the
    /// insert itself still fails with the same errors if a concurrent registration wins.
    ///
    /// # Errors
    /// Returns `AppError::UsernameTaken` / `AppError::EmailTaken` on conflicts, or a
    /// server error if the store or the hasher fails.
    #[tracing::instrument(
        skip(self, new_user),
        fields(username = %new_user.username, user_id = tracing::field::Empty),
        err(level = "warn")
    )]
    pub async fn register(&self, new_user: NewUser) -> Result<User> {
        let mut conn = self.pool.acquire().await?;
        if self.user_repo.find_by_username(&mut conn, &new_user.username).await?.is_some() {
            return Err(AppError::UsernameTaken);
        }
        if self.user_repo.find_by_email(&mut conn, &new_user.email).await?.is_some() {
            return Err(AppError::EmailTaken);
        }
        drop(conn);

        let password_hash = self.credentials.hash(&new_user.password).await?;

        let mut tx = self.pool.begin().await?;
        let user = self.user_repo.create(&mut tx, &new_user.username, &new_user.email, &password_hash).await?;
        tx.commit().await?;

        tracing::Span::current().record("user_id", user.id);
        tracing::info!("User registered successfully");
        self.metrics.users_registered_total.add(1, &[]);

        Ok(user)
    }

    /// Checks credentials and issues a bearer token. Unknown usernames and wrong
    /// passwords are indistinguishable to the caller.
    ///
    /// # Errors
    /// Returns `AppError::InvalidCredentials` on any mismatch, or a server error.
    #[tracing::instrument(skip(self, username, password), fields(user_id = tracing::field::Empty), err(level = "warn"))]
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthSession> {
        let mut conn = self.pool.acquire().await?;
        let user = self.user_repo.find_by_username(&mut conn, username).await?;
        drop(conn);

        let Some(user) = user else {
            self.credentials.verify_absent(password).await?;
            tracing::warn!("Login failed: user not found");
            self.metrics.login_failures_total.add(1, &[]);
            return Err(AppError::InvalidCredentials);
        };

        tracing::Span::current().record("user_id", user.id);

        if !self.credentials.verify(password, user.password_hash()).await? {
            tracing::warn!("Login failed: invalid password");
            self.metrics.login_failures_total.add(1, &[]);
            return Err(AppError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user)?;

        tracing::info!("User logged in successfully");
        self.metrics.login_total.add(1, &[]);

        Ok(AuthSession { token: token.token, expires_at: token.expires_at, user })
    }

    /// Verifies a bearer token and returns its claims.
    ///
    /// # Errors
    /// Returns `AppError::Unauthorized` if the token is invalid or expired.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        self.tokens.decode(token)
    }

    /// Loads the account a verified token was issued for.
    ///
    /// # Errors
    /// Returns `AppError::Unauthorized` if the account no longer exists.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn profile(&self, user_id: i64) -> Result<User> {
        let mut conn = self.pool.acquire().await?;
        self.user_repo.find_by_id(&mut conn, user_id).await?.ok_or(AppError::Unauthorized)
    }
}
