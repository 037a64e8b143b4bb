//! Offline stand-in for the FFM planning service.
//!
//! Serves the canned plan on `POST /v1/plan` with the production wire schema,
//! so network mode can be exercised without the real service.

pub mod config;

use std::fmt;
use std::time::Instant;

use aero_core::{FeasibilityRequest, FeasibilityResponse};
use axum::{
    extract::{Extension, Request},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::Instrument;

/// Correlation header the FFM client sends with every plan request.
const CORRELATION_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Correlation id of the plan request being served.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// The caller's id, or a fresh one when it sent none usable.
    fn from_headers(headers: &HeaderMap) -> Self {
        let supplied = headers
            .get(&CORRELATION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty() && value.len() <= 128);
        match supplied {
            Some(id) => Self(id.to_string()),
            None => Self(uuid::Uuid::new_v4().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn router() -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/v1/plan", post(plan))
        .layer(middleware::from_fn(correlate))
        .layer(TraceLayer::new_for_http())
}

/// Run each request inside a span carrying its correlation id, log how the
/// mock answered, and hand the id back on the response.
async fn correlate(mut request: Request, next: Next) -> Response {
    let id = CorrelationId::from_headers(request.headers());
    let path = request.uri().path().to_string();
    request.extensions_mut().insert(id.clone());

    let started = Instant::now();
    let span = tracing::info_span!("mock_ffm", correlation_id = %id, %path);
    let mut response = next.run(request).instrument(span).await;
    tracing::debug!(
        correlation_id = %id,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Mock FFM answered"
    );

    if let Ok(value) = HeaderValue::from_str(id.as_str()) {
        response.headers_mut().insert(CORRELATION_HEADER, value);
    }
    response
}

async fn plan(
    Extension(correlation_id): Extension<CorrelationId>,
    Json(request): Json<FeasibilityRequest>,
) -> Result<Json<FeasibilityResponse>, (StatusCode, Json<Value>)> {
    if request.route.len() < 2 {
        tracing::warn!(%correlation_id, points = request.route.len(), "Rejected plan request without a leg");
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"error": "route must contain at least 2 points"})),
        ));
    }

    tracing::info!(
        %correlation_id,
        aircraft = %request.aircraft.aircraft_type,
        points = request.route.len(),
        "Serving canned plan"
    );
    Ok(Json(FeasibilityResponse::canned()))
}
