use crate::domain::user::User;

/// Outcome of a successful login: a signed bearer token and the account it was issued for.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub expires_at: i64,
    pub user: User,
}
