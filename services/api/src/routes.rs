use crate::infra::{AppState, Services};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use careflow::risk::assessment_router;
use careflow::scheduling::booking_router;
use serde_json::json;

pub(crate) fn with_service_routes(services: Services) -> axum::Router {
    assessment_router(services.assessments)
        .merge(booking_router(services.booking))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Ready once the listener is bound. Classifier training may still be running; the
/// assessment path waits for it or falls back to the rule engine.
pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let classifier = state.classifier.state();
    let payload = if ready {
        json!({ "status": "ready", "classifier": classifier.label() })
    } else {
        json!({ "status": "initializing", "classifier": classifier.label() })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
