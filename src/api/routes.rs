//! HTTP API route definitions.

use axum::{
    http::{HeaderValue, Method, StatusCode, Uri},
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::config::Config;

use super::handlers::{health, metrics, ping, prometheus, status, AppState};
use super::middleware::{
    expose_error_details, track_requests, PanicResponder, API_VERSION_HEADER,
};
use super::users::{create_user, delete_user, get_user, get_user_profile, list_users, update_user};
use super::ApiResponse;

/// Routes listed in unmatched-route responses.
pub const AVAILABLE_ROUTES: &[&str] = &[
    "GET /api/health",
    "GET /api/health/status",
    "GET /api/health/metrics",
    "GET /api/health/ping",
    "GET /api/users",
    "GET /api/users/:id",
    "GET /api/users/:id/profile",
    "POST /api/users",
    "PUT /api/users/:id",
    "DELETE /api/users/:id",
];

/// Create the API router.
pub fn create_router(state: AppState, config: &Config) -> Router {
    let expose_details = state.environment.exposes_error_details();

    let router = Router::new()
        // Health endpoints
        .route("/api/health", get(health).fallback(not_found))
        .route("/api/health/status", get(status).fallback(not_found))
        .route("/api/health/metrics", get(metrics).fallback(not_found))
        .route("/api/health/ping", get(ping).fallback(not_found))
        // User endpoints
        .route(
            "/api/users",
            get(list_users).post(create_user).fallback(not_found),
        )
        .route(
            "/api/users/:id",
            get(get_user)
                .put(update_user)
                .delete(delete_user)
                .fallback(not_found),
        )
        .route(
            "/api/users/:id/profile",
            get(get_user_profile).fallback(not_found),
        )
        // Prometheus scrape endpoint
        .route("/metrics", get(prometheus).fallback(not_found))
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(PanicResponder::new(expose_details)));

    let router = if expose_details {
        router.layer(middleware::from_fn(expose_error_details))
    } else {
        router
    };

    let version = HeaderValue::from_str(&state.version)
        .unwrap_or_else(|_| HeaderValue::from_static(env!("CARGO_PKG_VERSION")));

    router
        .layer(middleware::from_fn(track_requests))
        .layer(SetResponseHeaderLayer::overriding(API_VERSION_HEADER, version))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let layer = if config.allows_any_origin() {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins()
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(origins)
    };

    layer.allow_methods(Any).allow_headers(Any)
}

/// Fallback for unmatched routes, including unsupported methods on known paths.
async fn not_found(method: Method, uri: Uri) -> impl IntoResponse {
    let mut body = ApiResponse::error("Route not found").with_available_routes(AVAILABLE_ROUTES);
    body.message = Some(format!("Cannot {} {}", method, uri.path()));
    (StatusCode::NOT_FOUND, Json(body))
}
