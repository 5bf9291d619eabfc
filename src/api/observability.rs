use axum::{
    extract::{MatchedPath, Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use super::AppState;

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

const SECURITY_HEADERS: [(&str, &str); 4] = [
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    ("cache-control", "no-store"),
];

/// GET /metrics
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.prometheus_handle {
        Some(handle) => handle.render(),
        None => "Metrics disabled".to_string(),
    }
}

/// Opens a `request` span (request id, route, and the username filled in by
/// the auth middleware) and counts each response by route and status class.
pub async fn track_requests(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let request_id = Uuid::new_v4();

    // Unmatched paths are grouped so arbitrary URLs cannot blow up label sets.
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_string(), |p| p.as_str().to_string());
    let method = req.method().clone();

    let span = info_span!(
        "request",
        %request_id,
        %method,
        route = %route,
        username = tracing::field::Empty,
    );

    async move {
        let mut response = next.run(req).await;
        let status = response.status();
        let elapsed = started.elapsed();

        let class = match status.as_u16() {
            500.. => "5xx",
            400..=499 => "4xx",
            _ => "2xx",
        };

        metrics::counter!(
            "contec_http_requests_total",
            "route" => route.clone(),
            "method" => method.to_string(),
            "class" => class,
        )
        .increment(1);
        metrics::histogram!("contec_http_request_duration_seconds", "route" => route)
            .record(elapsed.as_secs_f64());

        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }

        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        info!(status = status.as_u16(), elapsed_ms, "Request finished");
        response
    }
    .instrument(span)
    .await
}

pub async fn security_headers_middleware(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;

    for (name, value) in SECURITY_HEADERS {
        response
            .headers_mut()
            .insert(name, HeaderValue::from_static(value));
    }

    response
}
