use axum::{Router, http::HeaderName};
use std::sync::Arc;

use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod config;
pub mod guard;
pub mod session;
pub mod theme;
pub mod verify;
pub mod zones;

// Routers split by access policy (public vs. guarded page trees).
pub mod routes;
use routes::{guarded, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use guard::{Decision, RouteGuard};
pub use verify::{HttpSessionVerifier, MockSessionVerifier, SessionVerifier, VerifierState};
pub use zones::{Zone, ZoneTable};

/// AppState
///
/// Everything a request needs, shared immutably across all requests: the guard
/// with its zone table, the session verifier and the loaded configuration.
#[derive(Clone)]
pub struct AppState {
    pub guard: Arc<RouteGuard>,
    pub verifier: VerifierState,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(verifier: VerifierState, config: AppConfig) -> Self {
        Self {
            guard: Arc::new(RouteGuard::default()),
            verifier,
            config,
        }
    }
}

/// create_router
///
/// Assembles the public and guarded page trees and wraps them in the
/// request-id and tracing layers.
pub fn create_router(state: AppState) -> Router {
    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(guarded::guarded_routes(&state))
        .merge(public::public_routes(&state))
        .with_state(state);

    base_router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(
                x_request_id.clone(),
                MakeRequestUuid,
            ))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(trace_span_logger)
                    .on_response(
                        DefaultOnResponse::new()
                            .level(Level::INFO)
                            .latency_unit(tower_http::LatencyUnit::Millis),
                    ),
            )
            .layer(PropagateRequestIdLayer::new(x_request_id)),
    )
}

/// trace_span_logger
///
/// Span for every request, carrying the `x-request-id` so all log lines of one
/// navigation (guard decision, verification failure, response) correlate.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
