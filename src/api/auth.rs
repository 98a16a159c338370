use crate::api::AppState;
use crate::api::extract::JsonBody;
use crate::api::middleware::AuthUser;
use crate::api::schemas::auth::{Login, LoginResponse, ProfileResponse, RegisterResponse, Registration};
use crate::error::{AppError, Result};
use axum::{Json, extract::State, response::IntoResponse};

const MISSING_REGISTRATION_FIELDS: &str = "missing required information";
const MISSING_LOGIN_FIELDS: &str = "username and password are required";

pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<Registration>,
) -> Result<impl IntoResponse> {
    let new_user =
        payload.into_new_user().ok_or_else(|| AppError::Validation(MISSING_REGISTRATION_FIELDS.to_string()))?;

    let user = state.account_service.register(new_user).await?;

    Ok(Json(RegisterResponse { success: true, message: "registration successful".to_string(), user: user.into() }))
}

pub async fn login(State(state): State<AppState>, JsonBody(payload): JsonBody<Login>) -> Result<impl IntoResponse> {
    let (username, password) =
        payload.into_credentials().ok_or_else(|| AppError::Validation(MISSING_LOGIN_FIELDS.to_string()))?;

    let session = state.account_service.login(&username, &password).await?;

    Ok(Json(LoginResponse {
        success: true,
        token: session.token,
        expires_at: session.expires_at,
        user: session.user.into(),
    }))
}

pub async fn me(auth_user: AuthUser, State(state): State<AppState>) -> Result<impl IntoResponse> {
    let user = state.account_service.profile(auth_user.user_id).await?;
    Ok(Json(ProfileResponse { success: true, user: user.into() }))
}
