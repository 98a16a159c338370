use crate::domain::auth::Claims;
use crate::domain::user::User;
use crate::error::{AppError, Result};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::fmt;
use time::{Duration, OffsetDateTime};

/// Lifetime of every bearer token.
pub const TOKEN_TTL: Duration = Duration::hours(24);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub token: String,
    pub expires_at: i64,
}

/// Signs and decodes HS256 bearer tokens with the process-wide secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}

impl TokenService {
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issues a token for `user` valid for [`TOKEN_TTL`] from now.
    ///
    /// # Errors
    /// Returns `AppError::Internal` if signing fails.
    #[tracing::instrument(level = "debug", skip(self, user), fields(user_id = %user.id), err)]
    pub fn issue(&self, user: &User) -> Result<AuthToken> {
        let claims = Claims::for_user(user, OffsetDateTime::now_utc(), TOKEN_TTL);
        let token = self.encode(&claims)?;
        Ok(AuthToken { token, expires_at: claims.exp })
    }

    /// # Errors
    /// Returns `AppError::Internal` if signing fails.
    pub fn encode(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("token signing failed: {e}")))
    }

    /// Verifies signature and expiry and returns the embedded claims.
    ///
    /// # Errors
    /// Returns `AppError::Unauthorized` for any invalid, tampered or expired token.
    pub fn decode(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation).map(|data| data.claims).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            AppError::Unauthorized
        })
    }
}
