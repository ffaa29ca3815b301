//! Shared application state and health handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use time::OffsetDateTime;

use crate::config::{Config, Environment};
use crate::system::ProcessSnapshot;
use crate::users::UserRegistry;
use crate::utils::format_rfc3339;

use super::{ApiError, ApiResponse};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// The user registry.
    pub registry: Arc<UserRegistry>,
    /// Deployment mode.
    pub environment: Environment,
    /// Reported API version.
    pub version: String,
    /// Monotonic process start, for uptime.
    pub started_at: Instant,
    /// Wall-clock process start.
    pub started_at_utc: OffsetDateTime,
    /// Prometheus render handle, when the recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state with an empty registry.
    pub fn new(config: &Config) -> Self {
        Self::with_registry(config, Arc::new(UserRegistry::new()))
    }

    /// Create app state around an existing registry.
    pub fn with_registry(config: &Config, registry: Arc<UserRegistry>) -> Self {
        Self {
            registry,
            environment: config.app_env,
            version: config.api_version.clone(),
            started_at: Instant::now(),
            started_at_utc: OffsetDateTime::now_utc(),
            prometheus: None,
        }
    }

    /// Attach the Prometheus handle used by `/metrics`.
    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    /// Seconds since start.
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Health check payload.
#[derive(Debug, Serialize)]
pub struct HealthData {
    /// Status: "healthy".
    pub status: &'static str,
    /// Seconds since start.
    pub uptime: u64,
    /// Deployment mode.
    pub environment: String,
    /// API version.
    pub version: String,
}

/// Detailed status payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusData {
    /// Service status.
    pub status: &'static str,
    /// Deployment mode.
    pub environment: String,
    /// API version.
    pub version: String,
    /// Start time, RFC 3339.
    pub started_at: String,
    /// Registered users.
    pub users: usize,
    /// Process diagnostics.
    pub process: ProcessSnapshot,
}

/// Metrics payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsData {
    /// Registered users.
    pub registered_users: usize,
    /// Process diagnostics.
    pub process: ProcessSnapshot,
}

/// GET /api/health - liveness summary, always 200.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(
        ApiResponse::success(HealthData {
            status: "healthy",
            uptime: state.uptime_seconds(),
            environment: state.environment.to_string(),
            version: state.version.clone(),
        })
        .with_message("Service is healthy"),
    )
}

/// GET /api/health/status - detailed process and registry status.
pub async fn status(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = state.registry.len()?;

    Ok(Json(
        ApiResponse::success(StatusData {
            status: "running",
            environment: state.environment.to_string(),
            version: state.version.clone(),
            started_at: format_rfc3339(state.started_at_utc),
            users,
            process: ProcessSnapshot::capture(state.started_at),
        })
        .with_message("Service status retrieved successfully"),
    ))
}

/// GET /api/health/metrics - process metrics as JSON.
pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let registered_users = state.registry.len()?;
    let process = ProcessSnapshot::capture(state.started_at);
    tracing::debug!("{}", process.to_log_string());

    Ok(Json(
        ApiResponse::success(MetricsData {
            registered_users,
            process,
        })
        .with_message("Metrics retrieved successfully"),
    ))
}

/// GET /api/health/ping - pong.
pub async fn ping() -> impl IntoResponse {
    Json(ApiResponse::message("pong"))
}

/// GET /metrics - Prometheus text exposition, 503 when the recorder is off.
pub async fn prometheus(State(state): State<AppState>) -> impl IntoResponse {
    match &state.prometheus {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics recorder not installed".to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_state_shares_registry_between_clones() {
        let state = AppState::new(&Config::default());
        let clone = state.clone();

        state
            .registry
            .create(crate::users::NewUser::new("a", "a@x.com", "p"))
            .unwrap();

        assert_eq!(clone.registry.len().unwrap(), 1);
        assert_eq!(clone.environment, Environment::Development);
        assert!(clone.prometheus.is_none());
    }
}
