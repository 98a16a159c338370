use crate::config::{Config, CorsConfig};
use crate::services::account_service::AccountService;
use crate::services::health_service::HealthService;
use axum::body::Body;
use axum::http::{HeaderValue, Request};
use axum::{
    Router,
    routing::{any, get, post},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod extract;
pub mod frontend;
pub mod health;
pub mod index;
pub mod middleware;
pub mod schemas;

#[derive(Clone, Debug)]
pub struct AppState {
    pub account_service: AccountService,
    pub health_service: HealthService,
}

#[derive(Debug)]
pub struct ServiceContainer {
    pub account_service: AccountService,
    pub health_service: HealthService,
}

/// Configures and returns the application router: the JSON API under `/api`, the
/// service banner and probes at the root, and the frontend for everything else.
pub fn app_router(config: &Config, services: ServiceContainer) -> Router {
    let state =
        AppState { account_service: services.account_service, health_service: services.health_service };

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
        .method_not_allowed_fallback(index::api_method_not_allowed);

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .fallback(index::api_not_found)
        .layer(cors_layer(&config.cors));

    Router::new()
        .route("/", get(index::banner))
        .route("/health", get(health::health))
        .route("/readyz", get(health::readyz))
        .nest("/api", api_routes)
        // The nested fallback does not see a bare trailing slash.
        .route("/api/", any(index::api_not_found))
        .fallback_service(frontend::spa_service(&config.server.frontend_dir))
        .layer(PropagateRequestIdLayer::new(axum::http::HeaderName::from_static("x-request-id")))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(move |request: &Request<Body>| {
                    let request_id = request
                        .extensions()
                        .get::<tower_http::request_id::RequestId>()
                        .map(|id| id.header_value().to_str().unwrap_or_default())
                        .unwrap_or_default()
                        .to_string();

                    tracing::info_span!(
                        "request",
                        "request_id" = %request_id,
                        "http.request.method" = %request.method(),
                        "url.path" = %request.uri().path(),
                        "http.response.status_code" = tracing::field::Empty,
                        "otel.kind" = "server",
                        "user_id" = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: std::time::Duration, _span: &tracing::Span| {
                        let status = response.status();
                        tracing::Span::current().record("http.response.status_code", status.as_u16());

                        tracing::info!(
                            latency_ms = %latency.as_millis(),
                            status = %status.as_u16(),
                            "request completed"
                        );
                    },
                )
                .on_failure(|error, _latency, _span: &tracing::Span| {
                    tracing::error!(error = %error, "request failed");
                }),
        )
        .layer(SetRequestIdLayer::new(
            axum::http::HeaderName::from_static("x-request-id"),
            middleware::MakeRequestUuidOrHeader,
        ))
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if config.allowed_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(config.allowed_origins.iter().filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        }))
    };

    CorsLayer::new().allow_origin(origins).allow_methods(Any).allow_headers(Any)
}
