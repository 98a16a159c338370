use crate::error::{AppError, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::{RngCore, rngs::OsRng};
use std::sync::Arc;

/// Hashes and verifies account passwords with Argon2.
///
/// Both operations run on the blocking pool.
#[derive(Clone, Debug)]
pub struct CredentialService {
    // Verified against when a login names an unknown user, so both failure paths cost the same.
    dummy_hash: Arc<str>,
}

impl CredentialService {
    /// # Errors
    /// Returns `AppError::Internal` if the reference hash cannot be computed.
    pub fn new() -> Result<Self> {
        let mut seed = [0u8; 32];
        OsRng.fill_bytes(&mut seed);
        let dummy_hash = hash_password(&seed)?;
        Ok(Self { dummy_hash: dummy_hash.into() })
    }

    #[tracing::instrument(err, skip(self, password))]
    pub async fn hash(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hash_password(password.as_bytes()))
            .await
            .map_err(|e| AppError::Internal(format!("password hashing task failed: {e}")))?
    }

    /// Returns whether `password` matches `password_hash`. A stored hash that cannot be
    /// parsed counts as a mismatch.
    #[tracing::instrument(err, skip(self, password, password_hash))]
    pub async fn verify(&self, password: &str, password_hash: &str) -> Result<bool> {
        let password = password.to_string();
        let password_hash = password_hash.to_string();
        tokio::task::spawn_blocking(move || verify_password(password.as_bytes(), &password_hash))
            .await
            .map_err(|e| AppError::Internal(format!("password verification task failed: {e}")))
    }

    /// Spends the same effort as a real verification and discards the result.
    #[tracing::instrument(err, skip(self, password))]
    pub async fn verify_absent(&self, password: &str) -> Result<()> {
        let dummy_hash = Arc::clone(&self.dummy_hash);
        self.verify(password, &dummy_hash).await.map(|_| ())
    }
}

fn hash_password(password: &[u8]) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password, &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
}

fn verify_password(password: &[u8], password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default().verify_password(password, &parsed).is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is malformed");
            false
        }
    }
}
