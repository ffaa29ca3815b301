//! Request middleware: timing and logging, internal error disclosure and
//! panic recovery.

use std::any::Any;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{MatchedPath, Request},
    http::{HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tower_http::catch_panic::ResponseForPanic;
use tracing::{error, info, info_span, Instrument};

use crate::metrics;

use super::error::{InternalErrorDetail, INTERNAL_ERROR_MESSAGE};
use super::ApiResponse;

/// Header carrying the handling time of each request.
pub const RESPONSE_TIME_HEADER: HeaderName = HeaderName::from_static("x-response-time");

/// Header carrying the API version.
pub const API_VERSION_HEADER: HeaderName = HeaderName::from_static("x-api-version");

/// Log one event per request, record request metrics and stamp the
/// response time header.
pub async fn track_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string());

    let span = info_span!("request", method = %method, path = %path);

    async move {
        let mut response = next.run(req).await;

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        let status = response.status().as_u16();
        // Unmatched paths share one label to bound cardinality.
        let route_label = route.as_deref().unwrap_or("unmatched");

        metrics::record_http_request(start, &method, route_label, status);

        if let Ok(value) = HeaderValue::from_str(&format!("{:.3}ms", elapsed_ms)) {
            response.headers_mut().insert(RESPONSE_TIME_HEADER, value);
        }

        info!(
            event = "http_request_finished",
            route = route_label,
            status_code = status,
            duration_ms = elapsed_ms,
        );

        response
    }
    .instrument(span)
    .await
}

/// Replace the generic 500 body with the logged detail. Installed only when
/// the deployment mode allows it.
pub async fn expose_error_details(req: Request, next: Next) -> Response {
    let response = next.run(req).await;

    let Some(InternalErrorDetail(detail)) = response.extensions().get::<InternalErrorDetail>().cloned()
    else {
        return response;
    };

    let mut body = ApiResponse::error(INTERNAL_ERROR_MESSAGE);
    body.message = Some(detail);
    (response.status(), Json(body)).into_response()
}

/// Turns handler panics into a 500 envelope.
#[derive(Debug, Clone, Copy)]
pub struct PanicResponder {
    expose_details: bool,
}

impl PanicResponder {
    /// Create a responder; `expose_details` adds the panic message to the body.
    pub fn new(expose_details: bool) -> Self {
        Self { expose_details }
    }
}

impl ResponseForPanic for PanicResponder {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response<Body> {
        let detail = if let Some(s) = err.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = err.downcast_ref::<&str>() {
            s.to_string()
        } else {
            "unknown panic".to_string()
        };

        error!("Handler panicked: {}", detail);

        let mut body = ApiResponse::error(INTERNAL_ERROR_MESSAGE);
        if self.expose_details {
            body.message = Some(detail);
        }
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
