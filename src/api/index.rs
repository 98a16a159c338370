use crate::api::schemas::index::{AuthEndpoints, Endpoints, ServiceBanner};
use crate::error::AppError;
use axum::{Json, response::IntoResponse};

pub async fn banner() -> impl IntoResponse {
    Json(ServiceBanner {
        message: "Welcome to the Study Assistant API",
        status: "running",
        endpoints: Endpoints {
            auth: AuthEndpoints { login: "/api/auth/login", register: "/api/auth/register", me: "/api/auth/me" },
        },
    })
}

/// Fallback for `/api/*` paths that match no route, so they never fall through to the frontend.
pub async fn api_not_found() -> AppError {
    AppError::NotFound
}

pub async fn api_method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
